use std::fmt::{self, Display};
use std::sync::Arc;

/// A location in the grammar source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub source_name: Option<Arc<str>>,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position {
            line,
            column,
            source_name: None,
        }
    }

    pub fn with_source_name(line: usize, column: usize, name: impl Into<Arc<str>>) -> Self {
        Position {
            line,
            column,
            source_name: Some(name.into()),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new(1, 1)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.source_name {
            Some(ref name) => write!(f, "{} ({}, {})", name, self.line, self.column),
            None => write!(f, "({}, {})", self.line, self.column),
        }
    }
}

/// Keep track of a position within a str, updating line and column as input
/// is consumed.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    idx: usize,
    line: usize,
    column: usize,
    /// Position of the most recently consumed character.
    last: Option<(usize, usize)>,
    source_name: Option<Arc<str>>,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str, source_name: Option<Arc<str>>) -> Self {
        Cursor {
            input,
            idx: 0,
            line: 1,
            column: 1,
            last: None,
            source_name,
        }
    }

    /// The input that has not been consumed yet.
    pub fn rest(&self) -> &'a str {
        &self.input[self.idx..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Position of the next character to be consumed.
    pub fn position(&self) -> Position {
        self.make_position(self.line, self.column)
    }

    /// Position reported for the end of input: the last consumed character,
    /// or the very start when nothing was consumed.
    pub fn last_position(&self) -> Position {
        match self.last {
            Some((line, column)) => self.make_position(line, column),
            None => self.make_position(1, 1),
        }
    }

    /// Move past `s`, which must be a prefix of the remaining input.
    pub fn consume(&mut self, s: &str) {
        debug_assert!(self.rest().starts_with(s));
        for c in s.chars() {
            self.last = Some((self.line, self.column));
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.idx += s.len();
    }

    fn make_position(&self, line: usize, column: usize) -> Position {
        Position {
            line,
            column,
            source_name: self.source_name.clone(),
        }
    }
}
