use std::fmt::{self, Display};

/// Collects the differences found while probing two trees for equivalence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    errors: Vec<String>,
}

impl Notification {
    pub fn new() -> Self {
        Notification { errors: Vec::new() }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// All messages, one per line.
    pub fn report(&self) -> String {
        self.errors.join("\n")
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.report())
    }
}
