use std::sync::Arc;

use log::trace;

use crate::error::{ScanError, ScanErrorKind};
use crate::lexeme::{self, is_alpha, is_operator, is_quote, COMMENT_START};
use crate::position::Cursor;
use crate::token::{Token, TokenKind};

/// Turns grammar source into tokens, one at a time.
///
/// The scanner only moves forward. Once the end of input is reached it keeps
/// handing out the same end of file token.
///
/// ```
/// use ebnf::{Scanner, TokenKind};
///
/// let mut scanner = Scanner::new("title = literal .");
/// let tok = scanner.fetch_token().unwrap();
/// assert_eq!(tok.kind, TokenKind::Identifier);
/// assert_eq!(tok.value, "title");
/// ```
#[derive(Debug)]
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
    current: Option<Token>,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Scanner {
            cursor: Cursor::new(input, None),
            current: None,
            failed: false,
        }
    }

    /// Create a scanner that tags every position with `name`.
    pub fn with_source_name(input: &'a str, name: impl Into<Arc<str>>) -> Self {
        Scanner {
            cursor: Cursor::new(input, Some(name.into())),
            current: None,
            failed: false,
        }
    }

    /// False once the end of file token has been produced.
    pub fn has_next_token(&self) -> bool {
        !matches!(self.current, Some(ref tok) if tok.is_eof())
    }

    /// The token produced by the last call to `next_token`.
    pub fn current_token(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Advance to the next token and return a copy of it.
    pub fn fetch_token(&mut self) -> Result<Token, ScanError> {
        self.next_token()?;
        match self.current {
            Some(ref tok) => Ok(tok.clone()),
            None => Ok(Token::eof(self.cursor.last_position())),
        }
    }

    /// Advance to the next token.
    pub fn next_token(&mut self) -> Result<(), ScanError> {
        if !self.has_next_token() {
            return Ok(());
        }

        match self.scan() {
            Ok(tok) => {
                trace!("scanned {}", tok);
                self.current = Some(tok);
                Ok(())
            }
            Err(err) => {
                self.failed = true;
                Err(err)
            }
        }
    }

    fn scan(&mut self) -> Result<Token, ScanError> {
        if let Ok((_, ws)) = lexeme::whitespace(self.cursor.rest()) {
            self.cursor.consume(ws);
        }

        let position = self.cursor.position();
        let rest = self.cursor.rest();
        let c = match self.cursor.peek() {
            Some(c) => c,
            None => return Ok(Token::eof(self.cursor.last_position())),
        };

        let (kind, matched) = if rest.starts_with(COMMENT_START) {
            let (_, matched) = lexeme::comment(rest).map_err(|_| {
                ScanError::new(ScanErrorKind::UnterminatedComment, position.clone())
            })?;
            (TokenKind::Comment, matched)
        } else if is_quote(c) {
            let (_, matched) = lexeme::literal(rest).map_err(|_| {
                ScanError::new(ScanErrorKind::UnterminatedLiteral, position.clone())
            })?;
            (TokenKind::Literal, matched)
        } else if is_alpha(c) {
            let (_, matched) = lexeme::identifier(rest).map_err(|_| {
                ScanError::new(ScanErrorKind::InvalidCharacter(c), position.clone())
            })?;
            (TokenKind::Identifier, matched)
        } else if is_operator(c) {
            let (_, matched) = lexeme::operator(rest).map_err(|_| {
                ScanError::new(ScanErrorKind::InvalidCharacter(c), position.clone())
            })?;
            (TokenKind::Operator, matched)
        } else {
            return Err(ScanError::new(ScanErrorKind::InvalidCharacter(c), position));
        };

        self.cursor.consume(matched);
        Ok(Token::new(kind, matched, position))
    }
}

/// Yields every token up to and including end of file, or the first error.
impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.has_next_token() {
            return None;
        }
        Some(self.fetch_token())
    }
}
