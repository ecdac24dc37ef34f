//! Diagnostic values and the scanner-owned error stack.
//!
//! Scanning and parsing never abort on the first problem; they push a
//! [`Diagnostic`] onto an [`ErrorStack`] and keep going where recovery is
//! possible. The stack is LIFO: the most recent diagnostic is the one a
//! failed parse reports. Combinator misses are ordinary control flow and
//! never appear here.

use std::cell::RefCell;
use std::fmt;

use crate::span::Location;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// A problem that fails the surrounding parse.
    Error,
    /// A problem the parse survives.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// A single diagnostic message with its source position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub location: Location,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, location: Location) -> Self {
        Self {
            level,
            message: message.into(),
            location,
        }
    }

    pub fn error(message: impl Into<String>, location: Location) -> Self {
        Self::new(Level::Error, message, location)
    }

    pub fn warning(message: impl Into<String>, location: Location) -> Self {
        Self::new(Level::Warning, message, location)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

/// A stack of diagnostics, most recent on top.
///
/// Shared parts of a parser push through a `&ErrorStack`, so the stack
/// keeps its buffer in a `RefCell`. It is not `Sync` and is owned by
/// exactly one scanner at a time.
///
/// # Examples
///
/// ```
/// use ebnfc_util::{Diagnostic, ErrorStack, Location};
///
/// let errors = ErrorStack::new();
/// errors.push(Diagnostic::error("unterminated string", Location::DUMMY));
/// assert!(errors.has_errors());
/// assert_eq!(errors.top().unwrap().message, "unterminated string");
/// ```
#[derive(Debug, Default)]
pub struct ErrorStack {
    stack: RefCell<Vec<Diagnostic>>,
}

impl ErrorStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        self.stack.borrow_mut().push(diagnostic);
    }

    /// The most recent diagnostic, if any.
    pub fn top(&self) -> Option<Diagnostic> {
        self.stack.borrow().last().cloned()
    }

    /// The most recent error-level message, if any.
    pub fn top_error(&self) -> Option<String> {
        self.stack
            .borrow()
            .iter()
            .rev()
            .find(|d| d.level == Level::Error)
            .map(|d| d.message.clone())
    }

    pub fn has_errors(&self) -> bool {
        self.stack.borrow().iter().any(|d| d.level == Level::Error)
    }

    pub fn len(&self) -> usize {
        self.stack.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.borrow().is_empty()
    }

    /// Drains the stack, bottom first.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.stack.borrow_mut())
    }

    pub fn clear(&self) {
        self.stack.borrow_mut().clear();
    }
}
