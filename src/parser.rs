use log::debug;

use crate::ast::Node;
use crate::builder::Builder;
use crate::error::{NestingError, Result, SyntaxError};
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

const ASSIGN_OPS: &[&str] = &["=", ":", ":=="];
const RULE_TERMINATORS: &[&str] = &[".", ";"];
const FACTOR_OPENERS: &[&str] = &["[", "(", "{"];

/// Default bound on nested brackets. Every level costs a few stack frames.
pub const DEFAULT_MAX_NESTING: usize = 256;

/// Check that `token` is of `kind` with exactly `value`.
pub fn assert_token(token: &Token, kind: TokenKind, value: &str) -> bool {
    token.is_kind(kind) && token.is_equal(value)
}

/// Check that `token` is of `kind` with one of `values`.
pub fn assert_tokens(token: &Token, kind: TokenKind, values: &[&str]) -> bool {
    token.is_kind(kind) && token.is_any_of(values)
}

/// Recursive descent parser for EBNF grammars.
///
/// ```text
/// syntax     = [ literal ] "{" { rule } "}" [ literal ] "." .
/// rule       = identifier ( "=" | ":" | ":==" ) expression ( "." | ";" ) .
/// expression = term { "|" term } .
/// term       = factor { factor } .
/// factor     = identifier | literal
///            | "[" expression "]" | "(" expression ")" | "{" expression "}" .
/// ```
///
/// Comments are skipped. Brackets may nest up to [`DEFAULT_MAX_NESTING`]
/// levels unless changed with [`Parser::with_max_nesting`]; deeper input is
/// rejected with a [`NestingError`]. A parser consumes its scanner and parses
/// once.
#[derive(Debug)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    builder: Builder,
    /// One token of lookahead.
    current: Token,
    nesting: usize,
    max_nesting: usize,
}

impl<'a> Parser<'a> {
    pub fn new(scanner: Scanner<'a>) -> Self {
        Parser {
            scanner,
            builder: Builder::new(),
            current: Token::eof(Default::default()),
            nesting: 0,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    /// Parse the whole input into a syntax node. The first scan or syntax
    /// error aborts the parse.
    pub fn parse(mut self) -> Result<Node> {
        self.advance()?;
        self.parse_syntax()?;
        let syntax = self.builder.build()?;
        debug!("parsed syntax with {} rules", syntax.count_children());
        Ok(syntax)
    }

    fn parse_syntax(&mut self) -> Result<()> {
        if self.current.is_kind(TokenKind::Literal) {
            self.builder.title(self.current.unquoted_value());
            self.advance()?;
        }

        self.expect(TokenKind::Operator, &["{"])?;
        self.advance()?;

        while !assert_token(&self.current, TokenKind::Operator, "}") {
            self.parse_rule()?;
        }
        self.advance()?;

        if self.current.is_kind(TokenKind::Literal) {
            self.builder.meta(self.current.unquoted_value());
            self.advance()?;
        }

        self.expect(TokenKind::Operator, &["."])?;
        self.advance()?;
        self.expect(TokenKind::EndOfFile, &[])
    }

    fn parse_rule(&mut self) -> Result<()> {
        self.expect(TokenKind::Identifier, &[])?;
        let name = self.current.value.clone();
        self.builder.rule(name.as_str());
        self.advance()?;

        self.expect(TokenKind::Operator, ASSIGN_OPS)?;
        self.advance()?;

        self.parse_expression()?;

        self.expect(TokenKind::Operator, RULE_TERMINATORS)?;
        self.advance()?;
        self.builder.end();
        debug!("parsed rule {}", name);
        Ok(())
    }

    fn parse_expression(&mut self) -> Result<()> {
        self.builder.choice();
        self.parse_term()?;
        while assert_token(&self.current, TokenKind::Operator, "|") {
            self.advance()?;
            self.parse_term()?;
        }
        self.builder.end_collapsing();
        Ok(())
    }

    fn parse_term(&mut self) -> Result<()> {
        self.builder.sequence();
        self.parse_factor()?;
        while self.starts_factor() {
            self.parse_factor()?;
        }
        self.builder.end_collapsing();
        Ok(())
    }

    fn parse_factor(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::Identifier => {
                self.builder.identifier(self.current.value.as_str());
                self.advance()
            }
            TokenKind::Literal => {
                self.builder.literal(self.current.value.as_str());
                self.advance()
            }
            TokenKind::Operator if self.current.is_equal("[") => {
                self.builder.option();
                self.parse_enclosed("]")
            }
            TokenKind::Operator if self.current.is_equal("(") => {
                self.builder.group();
                self.parse_enclosed(")")
            }
            TokenKind::Operator if self.current.is_equal("{") => {
                self.builder.repetition();
                self.parse_enclosed("}")
            }
            _ => Err(SyntaxError::new(
                vec![
                    TokenKind::Identifier,
                    TokenKind::Literal,
                    TokenKind::Operator,
                ],
                FACTOR_OPENERS,
                self.current.clone(),
            )
            .into()),
        }
    }

    /// Parse the expression after an opening bracket up to the matching
    /// `close`, then end the node opened for it.
    fn parse_enclosed(&mut self, close: &str) -> Result<()> {
        if self.nesting == self.max_nesting {
            return Err(NestingError {
                limit: self.max_nesting,
                position: self.current.position.clone(),
            }
            .into());
        }
        self.nesting += 1;
        self.advance()?;
        self.parse_expression()?;
        self.nesting -= 1;
        self.expect(TokenKind::Operator, &[close])?;
        self.advance()?;
        self.builder.end();
        Ok(())
    }

    fn starts_factor(&self) -> bool {
        self.current.is_kind(TokenKind::Identifier)
            || self.current.is_kind(TokenKind::Literal)
            || assert_tokens(&self.current, TokenKind::Operator, FACTOR_OPENERS)
    }

    /// Fail unless the current token is of `kind` and, if `values` isn't
    /// empty, has one of them.
    fn expect(&self, kind: TokenKind, values: &[&str]) -> Result<()> {
        let ok = if values.is_empty() {
            self.current.is_kind(kind)
        } else {
            assert_tokens(&self.current, kind, values)
        };
        if ok {
            Ok(())
        } else {
            Err(SyntaxError::new(vec![kind], values, self.current.clone()).into())
        }
    }

    /// Move to the next token that isn't a comment.
    fn advance(&mut self) -> Result<()> {
        loop {
            let token = self.scanner.fetch_token()?;
            if !token.is_kind(TokenKind::Comment) {
                self.current = token;
                return Ok(());
            }
        }
    }
}
