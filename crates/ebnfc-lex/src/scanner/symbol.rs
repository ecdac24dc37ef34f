//! Symbol lexing.
//!
//! Symbols are one byte, except for a fixed fusion set of two-byte
//! operators, and `>>` may extend to `>>>`.

use crate::scanner::Scanner;
use crate::token::Token;

/// Two-byte operators fused into a single Symbol token.
const PAIRS: &[[u8; 2]] = &[
    *b"<<", *b">>", *b"!=", *b"<=", *b">=", *b"++", *b"--", *b"+=", *b"-=", *b"*=", *b"/=",
    *b"&&", *b"||", *b"^^", *b"==", *b"**", *b"~=", *b"::",
];

impl<'a> Scanner<'a> {
    pub(super) fn lex_symbol(&mut self, first: u8, start: usize, line: u32) -> Token {
        let mut lexeme = String::new();
        lexeme.push(first as char);

        let second = self.get_char(false);
        if PAIRS.contains(&[first, second]) {
            lexeme.push(second as char);
            if first == b'>' && second == b'>' {
                if self.get_char(false) == b'>' {
                    lexeme.push('>');
                } else {
                    self.unget_char();
                }
            }
        } else {
            self.unget_char();
        }

        Token::symbol(lexeme, start, line)
    }
}
