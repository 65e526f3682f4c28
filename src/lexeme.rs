//! Character classes and the recognizers for each kind of lexeme. Every
//! recognizer returns the matched text verbatim, leaving the remaining input.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1, take_while_m_n},
    character::complete::char,
    combinator::recognize,
    sequence::{delimited, pair},
    IResult,
};

pub const COMMENT_START: &str = "(*";
pub const COMMENT_END: &str = "*)";

pub fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || is_numeric(c)
}

pub fn is_operator(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '[' | ']' | '{' | '}' | '=' | '.' | ';' | '|' | ',' | '-' | ':'
    )
}

pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\r' | '\t')
}

pub fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

pub fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while(is_whitespace)(input)
}

/// A comment, which may span multiple lines.
pub fn comment(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        tag(COMMENT_START),
        take_until(COMMENT_END),
        tag(COMMENT_END),
    ))(input)
}

/// A quoted literal, terminated by the next occurrence of its opening quote.
/// No escape sequences are recognized.
pub fn literal(input: &str) -> IResult<&str, &str> {
    recognize(alt((
        delimited(char('"'), take_until("\""), char('"')),
        delimited(char('\''), take_until("'"), char('\'')),
    )))(input)
}

pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_alpha), take_while(is_alphanumeric)))(input)
}

/// A single operator character, preferring `:==` over `:`.
pub fn operator(input: &str) -> IResult<&str, &str> {
    alt((tag(":=="), take_while_m_n(1, 1, is_operator)))(input)
}
