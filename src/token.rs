use std::fmt::{self, Display};

use crate::lexeme::is_quote;
use crate::position::Position;

/// Token values longer than this are shortened when displayed.
const DISPLAY_WIDTH: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Operator,
    Literal,
    Comment,
    EndOfFile,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Operator => "operator",
            TokenKind::Literal => "literal",
            TokenKind::Comment => "comment",
            TokenKind::EndOfFile => "end of file",
        };
        write!(f, "{}", s)
    }
}

/// A classified lexeme together with the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            value: value.into(),
            position,
        }
    }

    pub fn eof(position: Position) -> Self {
        Token::new(TokenKind::EndOfFile, "", position)
    }

    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.is_kind(TokenKind::EndOfFile)
    }

    pub fn is_operator(&self) -> bool {
        self.is_kind(TokenKind::Operator)
    }

    pub fn is_equal(&self, value: &str) -> bool {
        self.value == value
    }

    pub fn is_any_of(&self, values: &[&str]) -> bool {
        values.iter().any(|v| self.is_equal(v))
    }

    /// The value with one leading and one trailing quote character removed.
    pub fn unquoted_value(&self) -> &str {
        let mut s = self.value.as_str();
        if s.starts_with(is_quote) {
            s = &s[1..];
        }
        if s.ends_with(is_quote) {
            s = &s[..s.len() - 1];
        }
        s
    }

    /// Position just past the token, assuming it doesn't span lines.
    pub fn end_position(&self) -> Position {
        Position {
            column: self.position.column + self.value.chars().count(),
            ..self.position.clone()
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<")?;
        if !self.value.is_empty() {
            if self.value.chars().count() > DISPLAY_WIDTH {
                let short: String = self.value.chars().take(DISPLAY_WIDTH).collect();
                write!(f, "'{}...', ", short)?;
            } else {
                write!(f, "'{}', ", self.value)?;
            }
        }
        write!(f, "{}, {}>", self.kind, self.position)
    }
}
