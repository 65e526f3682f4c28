//! Reads EBNF grammar descriptions into trees that can be walked with a
//! [`Visitor`] and compared with [`Node::probe_equivalence`].
//!
//! ```
//! let tree = ebnf::parse("\"Example\" { rule = 'a' { 'b' } . }").unwrap();
//! assert_eq!(tree.count_children(), 1);
//! assert_eq!(tree.depth(), 5);
//! ```

mod ast;
mod builder;
mod error;
mod lexeme;
mod notification;
mod parser;
mod position;
mod scanner;
mod token;
mod visitor;

pub use ast::{Node, NodeKind, DEFAULT_META};
pub use builder::Builder;
pub use error::{BuildError, Error, NestingError, Result, ScanError, ScanErrorKind, SyntaxError};
pub use lexeme::{is_alpha, is_alphanumeric, is_numeric, is_operator, is_quote, is_whitespace};
pub use notification::Notification;
pub use parser::{assert_token, assert_tokens, Parser, DEFAULT_MAX_NESTING};
pub use position::Position;
pub use scanner::Scanner;
pub use token::{Token, TokenKind};
pub use visitor::Visitor;

/// Parse a whole grammar.
pub fn parse(input: &str) -> Result<Node> {
    Parser::new(Scanner::new(input)).parse()
}
