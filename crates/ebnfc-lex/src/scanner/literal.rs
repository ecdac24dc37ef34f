//! Char and string constant lexing.
//!
//! Char constants honour `\t`, `\n` and `\r`; a `\u`, `\x` or `\U` escape
//! introduces a four-character unicode escape that is recorded verbatim,
//! with the escape letter standing in as the value. String constants
//! resolve `\n` and pass every other escaped byte through. Comment
//! recognition is off inside both (all fetches use `literal == true`).

use crate::scanner::{is_eol, Scanner};
use crate::token::{ConstValue, Token};

impl<'a> Scanner<'a> {
    /// Lexes a char constant; the opening `'` is already consumed.
    pub(super) fn lex_char_const(&mut self, start: usize, line: u32) -> Token {
        let mut actual = self.get_char(true);
        let mut unicode_front = None;

        if actual == b'\\' {
            actual = self.get_char(true);
            match actual {
                b't' => actual = b'\t',
                b'n' => actual = b'\n',
                b'r' => actual = b'\r',
                b'u' | b'x' | b'U' => unicode_front = Some(actual),
                _ => {}
            }
        }

        if let Some(front) = unicode_front {
            // Record the escape verbatim; the value is the escape letter.
            let mut verbatim = String::new();
            verbatim.push(front as char);
            for _ in 0..4 {
                verbatim.push(self.get_char(true) as char);
            }
            let close = self.get_char(true);
            if close != b'\'' {
                self.set_error(format!(
                    "Unterminated character constant : at {} : {}",
                    self.file(),
                    self.location()
                ));
                self.unget_char();
            }
            let value = (front as char).to_string();
            return Token::constant(verbatim, ConstValue::Str(value), start, line);
        }

        let close = self.get_char(true);
        if close != b'\'' {
            self.set_error(format!(
                "Unterminated character constant : at {} : {}",
                self.file(),
                self.location()
            ));
            self.unget_char();
        }
        let value = (actual as char).to_string();
        Token::constant(value.clone(), ConstValue::Str(value), start, line)
    }

    /// Lexes a string constant; the opening `"` is already consumed.
    pub(super) fn lex_string_const(&mut self, start: usize, line: u32) -> Token {
        let max = self.config().max_lexeme_len;
        let mut content = String::new();
        let mut c = self.get_char(true);

        while c != b'"' && !is_eol(c) {
            if c == b'\\' {
                c = self.get_char(true);
                if is_eol(c) {
                    break;
                }
                if c == b'n' {
                    c = b'\n';
                }
            }
            content.push(c as char);
            if content.len() >= max {
                self.set_error(format!(
                    "String constant exceeds maximum of {} characters : at {} : {}",
                    max,
                    self.file(),
                    self.location()
                ));
                content.truncate(max);
                c = b'"';
                break;
            }
            c = self.get_char(true);
        }

        if c != b'"' {
            self.set_error(format!(
                "Unterminated string constant: {} at {} : {}",
                content,
                self.file(),
                self.location()
            ));
            self.unget_char();
        }

        Token::constant(content.clone(), ConstValue::Str(content), start, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::ScannerConfig;

    fn first_token(src: &str) -> Token {
        Scanner::new("test", src.as_bytes()).get_token(false)
    }

    #[test]
    fn test_char_constant() {
        let t = first_token("'a'");
        assert_eq!(t.value, Some(ConstValue::Str("a".into())));
    }

    #[test]
    fn test_char_escapes() {
        assert_eq!(first_token("'\\n'").value, Some(ConstValue::Str("\n".into())));
        assert_eq!(first_token("'\\t'").value, Some(ConstValue::Str("\t".into())));
        assert_eq!(first_token("'\\r'").value, Some(ConstValue::Str("\r".into())));
    }

    #[test]
    fn test_unicode_escape_recorded_verbatim() {
        let t = first_token("'\\u0041'");
        assert_eq!(t.lexeme, "u0041");
        assert_eq!(t.value, Some(ConstValue::Str("u".into())));
    }

    #[test]
    fn test_unterminated_char_is_error() {
        let mut scanner = Scanner::new("test", b"'ab'");
        scanner.get_token(false);
        assert!(scanner.has_errors());
    }

    #[test]
    fn test_string_constant() {
        let t = first_token("\"hello\"");
        assert_eq!(t.value, Some(ConstValue::Str("hello".into())));
    }

    #[test]
    fn test_string_newline_escape_resolved() {
        let t = first_token("\"hello\\nworld\"");
        assert_eq!(t.value, Some(ConstValue::Str("hello\nworld".into())));
        assert_eq!(t.line, 1);
    }

    #[test]
    fn test_string_other_escapes_pass_through() {
        let t = first_token("\"a\\\"b\"");
        assert_eq!(t.value, Some(ConstValue::Str("a\"b".into())));
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let mut scanner = Scanner::new("test", b"\"oops\nnext");
        let t = scanner.get_token(false);
        assert_eq!(t.value, Some(ConstValue::Str("oops".into())));
        assert!(scanner.has_errors());
    }

    #[test]
    fn test_string_overflow_truncates() {
        let config = ScannerConfig {
            max_lexeme_len: 4,
            ..ScannerConfig::default()
        };
        let mut scanner = Scanner::with_config("test", b"\"abcdefgh\"", config);
        let t = scanner.get_token(false);
        assert_eq!(t.value, Some(ConstValue::Str("abcd".into())));
        assert!(scanner.has_errors());
    }
}
