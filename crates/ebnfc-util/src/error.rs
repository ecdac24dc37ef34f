//! Error types returned by the public entry points.
//!
//! Each enum carries the topmost diagnostic of the failed run; the full
//! stack stays with the scanner that produced it.

use thiserror::Error;

/// Error type for grammar compilation.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// The grammar text failed to compile.
    #[error("grammar error: {0}")]
    Compile(String),

    /// The grammar compiled but produced no rules.
    #[error("grammar '{0}' defines no rules")]
    Empty(String),
}

/// Error type for AST parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The root combinator rejected the input.
    #[error("parse error: {0}")]
    Rejected(String),

    /// A rule reference could not be resolved.
    #[error("undefined rule <{0}>")]
    UndefinedRule(String),

    /// The input matched nothing at all.
    #[error("input produced no syntax tree")]
    NoMatch,
}

/// Error type for INI parsing.
#[derive(Debug, Error)]
pub enum IniError {
    /// The document failed to parse.
    #[error("ini error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formats() {
        let e = GrammarError::Compile("missing '>'".into());
        assert_eq!(e.to_string(), "grammar error: missing '>'");

        let e = ParseError::UndefinedRule("expr".into());
        assert_eq!(e.to_string(), "undefined rule <expr>");

        let e = IniError::Parse("section item repeated".into());
        assert_eq!(e.to_string(), "ini error: section item repeated");
    }
}
