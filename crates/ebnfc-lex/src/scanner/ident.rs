//! Identifier lexing and keyword constants.

use crate::scanner::Scanner;
use crate::token::{ConstValue, Token};

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

impl<'a> Scanner<'a> {
    /// Lexes an identifier starting with `first`.
    ///
    /// Unless `no_consts` is set, the keywords `true` / `false` become
    /// Bool constants and `null` becomes the Null constant.
    pub(super) fn lex_identifier(
        &mut self,
        first: u8,
        start: usize,
        line: u32,
        no_consts: bool,
    ) -> Token {
        let max = self.config().max_lexeme_len;
        let mut lexeme = String::new();
        let mut c = first;
        loop {
            lexeme.push(c as char);
            if lexeme.len() > max {
                self.set_error(format!(
                    "Identifier length exceeds maximum of {} : at {}",
                    max,
                    self.location()
                ));
                lexeme.truncate(max);
                break;
            }
            c = self.get_char(false);
            if !is_ident_continue(c) {
                break;
            }
        }
        self.unget_char();

        if !no_consts {
            match lexeme.as_str() {
                "true" => return Token::constant(lexeme, ConstValue::Bool(true), start, line),
                "false" => return Token::constant(lexeme, ConstValue::Bool(false), start, line),
                "null" => return Token::constant(lexeme, ConstValue::Null, start, line),
                _ => {}
            }
        }
        Token::identifier(lexeme, start, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::ScannerConfig;
    use crate::token::TokenKind;

    #[test]
    fn test_plain_identifier() {
        let mut scanner = Scanner::new("test", b"some_name2 rest");
        let t = scanner.get_token(false);
        assert_eq!(t.kind, TokenKind::Identifier);
        assert_eq!(t.lexeme, "some_name2");
    }

    #[test]
    fn test_underscore_start() {
        let mut scanner = Scanner::new("test", b"_private");
        assert_eq!(scanner.get_token(false).lexeme, "_private");
    }

    #[test]
    fn test_keyword_constants() {
        let mut scanner = Scanner::new("test", b"true false null");
        assert_eq!(
            scanner.get_token(false).value,
            Some(ConstValue::Bool(true))
        );
        assert_eq!(
            scanner.get_token(false).value,
            Some(ConstValue::Bool(false))
        );
        assert_eq!(scanner.get_token(false).value, Some(ConstValue::Null));
    }

    #[test]
    fn test_no_consts_keeps_keywords_identifiers() {
        let mut scanner = Scanner::new("test", b"true");
        let t = scanner.get_token(true);
        assert_eq!(t.kind, TokenKind::Identifier);
        assert_eq!(t.lexeme, "true");
    }

    #[test]
    fn test_overflow_truncates_and_errors() {
        let config = ScannerConfig {
            max_lexeme_len: 8,
            ..ScannerConfig::default()
        };
        let mut scanner = Scanner::with_config("test", b"averylongidentifier", config);
        let t = scanner.get_token(false);
        assert_eq!(t.lexeme.len(), 8);
        assert!(scanner.has_errors());
    }
}
