use std::error;
use std::fmt::{self, Display};

use crate::ast::NodeKind;
use crate::position::Position;
use crate::token::{Token, TokenKind};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Scan(ScanError),
    Syntax(SyntaxError),
    Nesting(NestingError),
    Build(BuildError),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Scan(ref e) => write!(f, "{}", e),
            Error::Syntax(ref e) => write!(f, "{}", e),
            Error::Nesting(ref e) => write!(f, "{}", e),
            Error::Build(ref e) => write!(f, "{}", e),
        }
    }
}

impl error::Error for Error {}

impl From<ScanError> for Error {
    fn from(err: ScanError) -> Error {
        Error::Scan(err)
    }
}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Error {
        Error::Syntax(err)
    }
}

impl From<NestingError> for Error {
    fn from(err: NestingError) -> Error {
        Error::Nesting(err)
    }
}

impl From<BuildError> for Error {
    fn from(err: BuildError) -> Error {
        Error::Build(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanErrorKind {
    UnterminatedComment,
    UnterminatedLiteral,
    InvalidCharacter(char),
}

/// The scanner could not turn the input at `position` into a token.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub position: Position,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, position: Position) -> Self {
        ScanError { kind, position }
    }
}

impl Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ScanErrorKind::UnterminatedComment => {
                write!(f, "Scan error: unterminated comment at {}!", self.position)
            }
            ScanErrorKind::UnterminatedLiteral => {
                write!(f, "Scan error: unterminated literal at {}!", self.position)
            }
            ScanErrorKind::InvalidCharacter(c) => write!(
                f,
                "Scan error: invalid character '{}' at {}!",
                c, self.position
            ),
        }
    }
}

impl error::Error for ScanError {}

/// The parser found a token it did not expect.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    /// Token kinds that would have been accepted.
    pub expected_kinds: Vec<TokenKind>,
    /// Exact values accepted for the last of `expected_kinds`. Empty if any
    /// value of that kind is fine.
    pub expected_values: Vec<String>,
    pub found: Token,
}

impl SyntaxError {
    pub fn new(expected_kinds: Vec<TokenKind>, expected_values: &[&str], found: Token) -> Self {
        SyntaxError {
            expected_kinds,
            expected_values: expected_values.iter().map(|v| (*v).to_owned()).collect(),
            found,
        }
    }

    pub fn position(&self) -> &Position {
        &self.found.position
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Syntax error: expected ")?;
        let count = self.expected_kinds.len();
        for (idx, kind) in self.expected_kinds.iter().enumerate() {
            match idx {
                0 => (),
                _ if idx + 1 == count => write!(f, " or ")?,
                _ => write!(f, ", ")?,
            }
            write!(f, "{}", kind)?;
        }
        if !self.expected_values.is_empty() {
            let values: Vec<String> = self
                .expected_values
                .iter()
                .map(|v| format!("'{}'", v))
                .collect();
            write!(f, " ({})", values.join(", "))?;
        }
        write!(f, " but found {} at {}!", self.found, self.found.position)
    }
}

impl error::Error for SyntaxError {}

/// Brackets were opened deeper than the parser allows.
#[derive(Debug, Clone, PartialEq)]
pub struct NestingError {
    pub limit: usize,
    /// Position of the first bracket past the limit.
    pub position: Position,
}

impl Display for NestingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Syntax error: brackets nested deeper than {} at {}!",
            self.limit, self.position
        )
    }
}

impl error::Error for NestingError {}

/// A tree could not be assembled from the builder calls made.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// `end` was called with no open node below the syntax root.
    UnbalancedEnd,
    /// Only rules may be placed directly in a syntax node.
    Misplaced(NodeKind),
    /// A node that takes exactly one child was closed with `found` children.
    ChildCount { kind: NodeKind, found: usize },
}

impl Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BuildError::UnbalancedEnd => write!(f, "Build error: no open node to end!"),
            BuildError::Misplaced(kind) => {
                write!(f, "Build error: {} is not allowed in a syntax node!", kind)
            }
            BuildError::ChildCount { kind, found } => write!(
                f,
                "Build error: {} expects exactly one child but has {}!",
                kind, found
            ),
        }
    }
}

impl error::Error for BuildError {}
