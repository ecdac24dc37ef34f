//! Scanner configuration: comment dialect and lexeme cap.
//!
//! Comment recognition is the one part of the scanner concrete consumers
//! need to change. The C-style default elides `/* ... */` and `// ...`;
//! the INI parser disables block comments entirely and treats `;` and `#`
//! as line-comment leaders. Each predicate sees the current byte and the
//! byte after it.

/// Comment recognition predicates.
#[derive(Clone, Copy, Debug)]
pub struct Dialect {
    /// True if `c` (with lookahead `next`) opens a block comment.
    pub begin_comment: fn(c: u8, next: u8) -> bool,
    /// True if `c` (with lookahead `next`) closes a block comment.
    pub end_comment: fn(c: u8, next: u8) -> bool,
    /// True if `c` (with lookahead `next`) starts a line comment.
    pub line_comment: fn(c: u8, next: u8) -> bool,
}

impl Dialect {
    /// C-style comments: `/* ... */` and `// ...`.
    pub fn c_style() -> Self {
        Self {
            begin_comment: |c, next| c == b'/' && next == b'*',
            end_comment: |c, next| c == b'*' && next == b'/',
            line_comment: |c, next| c == b'/' && next == b'/',
        }
    }

    /// INI comments: `;` or `#` to end of line, no block comments.
    pub fn ini() -> Self {
        Self {
            begin_comment: |_, _| false,
            end_comment: |_, _| false,
            line_comment: |c, _| c == b';' || c == b'#',
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::c_style()
    }
}

/// Scanner configuration.
#[derive(Clone, Copy, Debug)]
pub struct ScannerConfig {
    /// Cap on identifier, number and string lexemes. Exceeding it pushes
    /// an error and truncates.
    pub max_lexeme_len: usize,
    pub dialect: Dialect,
}

impl ScannerConfig {
    pub const DEFAULT_MAX_LEXEME_LEN: usize = 1024;

    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_lexeme_len: Self::DEFAULT_MAX_LEXEME_LEN,
            dialect: Dialect::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_style() {
        let d = Dialect::c_style();
        assert!((d.begin_comment)(b'/', b'*'));
        assert!((d.end_comment)(b'*', b'/'));
        assert!((d.line_comment)(b'/', b'/'));
        assert!(!(d.line_comment)(b'/', b'*'));
        assert!(!(d.begin_comment)(b';', b' '));
    }

    #[test]
    fn test_ini() {
        let d = Dialect::ini();
        assert!((d.line_comment)(b';', b'x'));
        assert!((d.line_comment)(b'#', b'x'));
        assert!(!(d.begin_comment)(b'/', b'*'));
        assert!(!(d.end_comment)(b'*', b'/'));
    }

    #[test]
    fn test_default_cap() {
        assert_eq!(
            ScannerConfig::default().max_lexeme_len,
            ScannerConfig::DEFAULT_MAX_LEXEME_LEN
        );
    }
}
