//! Source location tracking.
//!
//! A [`Location`] is a point in one in-memory source buffer: the byte
//! offset, the 1-based line, and the 1-based column within that line.
//! Locations render as `line:column`, which is the position format every
//! diagnostic in the toolkit uses.

use std::fmt;

/// A point in a source buffer.
///
/// # Examples
///
/// ```
/// use ebnfc_util::Location;
///
/// let loc = Location::new(12, 2, 5);
/// assert_eq!(loc.to_string(), "2:5");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    /// Byte offset into the source buffer.
    pub offset: usize,
    /// Line number (1-based).
    pub line: u32,
    /// Column number (1-based, bytes from the start of the line).
    pub column: u32,
}

impl Location {
    /// A placeholder location for diagnostics with no useful position.
    pub const DUMMY: Location = Location {
        offset: 0,
        line: 0,
        column: 0,
    };

    pub const fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Start of a buffer.
    pub const fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Renders a location prefixed with its file name, the form used by
/// grammar and INI diagnostics.
///
/// # Examples
///
/// ```
/// use ebnfc_util::span::{file_position, Location};
///
/// let s = file_position("rules.bnf", Location::new(0, 3, 7));
/// assert_eq!(s, "file: 'rules.bnf' position : 3:7");
/// ```
pub fn file_position(file: &str, loc: Location) -> String {
    format!("file: '{file}' position : {loc}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Location::new(0, 1, 1).to_string(), "1:1");
        assert_eq!(Location::new(99, 12, 40).to_string(), "12:40");
    }

    #[test]
    fn test_start() {
        let loc = Location::start();
        assert_eq!(loc.offset, 0);
        assert_eq!(loc.line, 1);
        assert_eq!(loc.column, 1);
    }

    #[test]
    fn test_file_position() {
        let s = file_position("test.ini", Location::new(5, 2, 3));
        assert_eq!(s, "file: 'test.ini' position : 2:3");
    }
}
