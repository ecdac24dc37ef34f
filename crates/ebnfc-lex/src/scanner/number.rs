//! Numeric constant lexing.
//!
//! A `.` anywhere promotes the constant to a float (stored as Double); a
//! leading `0x`/`0X` marks hex and accepts hex digits. A trailing `F` is
//! consumed, but only after a float. Plain and hex integers both produce
//! Int64 constants.

use crate::scanner::Scanner;
use crate::token::{ConstValue, Token};

impl<'a> Scanner<'a> {
    pub(super) fn lex_number(&mut self, first: u8, start: usize, line: u32) -> Token {
        let max = self.config().max_lexeme_len;
        let mut is_float = false;
        let mut is_hex = false;
        let mut lexeme = String::new();
        let mut c = first;

        loop {
            if c == b'.' {
                is_float = true;
            }
            if c == b'x' || c == b'X' {
                is_hex = true;
            }
            lexeme.push(c as char);
            if lexeme.len() >= max {
                self.set_error(format!(
                    "Number length exceeds maximum of {} : at {}",
                    max,
                    self.location()
                ));
                lexeme.truncate(max);
                break;
            }
            c = self.get_char(false).to_ascii_uppercase();
            let more = c.is_ascii_digit()
                || (!is_float && c == b'.')
                || (!is_hex && c == b'X')
                || (is_hex && (b'A'..=b'F').contains(&c));
            if !more {
                break;
            }
        }
        if !is_float || c != b'F' {
            self.unget_char();
        }

        let value = if is_float {
            ConstValue::Double(lexeme.parse().unwrap_or(0.0))
        } else if is_hex {
            ConstValue::Int64(parse_hex(&lexeme))
        } else {
            ConstValue::Int64(lexeme.parse().unwrap_or(0))
        };
        Token::constant(lexeme, value, start, line)
    }
}

fn parse_hex(lexeme: &str) -> i64 {
    let (negative, rest) = match lexeme.as_bytes().first() {
        Some(b'-') => (true, &lexeme[1..]),
        Some(b'+') => (false, &lexeme[1..]),
        _ => (false, lexeme),
    };
    let digits = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .unwrap_or(rest);
    let magnitude = i64::from_str_radix(digits, 16).unwrap_or(0);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
