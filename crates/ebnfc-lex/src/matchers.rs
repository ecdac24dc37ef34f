//! Token matchers layered on the scanner.
//!
//! Three families, all built on fetch-test-unget:
//!
//! - `match_*` - consume the next token if it satisfies the test,
//!   otherwise unget it. Return whether it matched.
//! - `peek_*` - test the next token and always unget it.
//! - `require_*` - like `match_*`, but a miss pushes an error naming the
//!   expectation and the supplied context tag. They still return `false`
//!   rather than failing.
//!
//! `get_identifier` / `get_symbol` / `get_const_int*` fetch-and-filter,
//! returning the token or value instead of a flag.

use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

impl<'a> Scanner<'a> {
    /// Consumes the next token if it is the identifier `text`.
    pub fn match_identifier(&mut self, text: &str) -> bool {
        let token = self.get_token(false);
        if token.kind == TokenKind::Identifier && token.matches(text) {
            return true;
        }
        self.unget_token(&token);
        false
    }

    /// Consumes the next token if it is the single-byte symbol `symbol`.
    pub fn match_symbol_char(&mut self, symbol: char) -> bool {
        let token = self.get_token(true);
        if token.matches_symbol(symbol) {
            return true;
        }
        self.unget_token(&token);
        false
    }

    /// Consumes the next token if it is the symbol `text`.
    pub fn match_symbol(&mut self, text: &str) -> bool {
        let token = self.get_token(true);
        if token.kind == TokenKind::Symbol && token.lexeme == text {
            return true;
        }
        self.unget_token(&token);
        false
    }

    /// Consumes the next token if it is an integer constant whose lexeme
    /// equals `text`.
    pub fn match_const_int(&mut self, text: &str) -> bool {
        let token = self.get_token(false);
        if token.is_const_int() && token.lexeme == text {
            return true;
        }
        self.unget_token(&token);
        false
    }

    /// Consumes the next token if it is any integer constant.
    pub fn match_any_const_int(&mut self) -> bool {
        let token = self.get_token(false);
        if token.is_const_int() {
            return true;
        }
        self.unget_token(&token);
        false
    }

    /// Consumes the next token if `pred` accepts it.
    pub fn match_token(&mut self, pred: impl FnOnce(&Token) -> bool) -> bool {
        let token = self.get_token(true);
        if !token.is_eof() && pred(&token) {
            return true;
        }
        self.unget_token(&token);
        false
    }

    pub fn match_semi(&mut self) -> bool {
        self.match_symbol_char(';')
    }

    /// Tests whether the next token is the identifier `text`, without
    /// consuming it.
    pub fn peek_identifier(&mut self, text: &str) -> bool {
        let token = self.get_token(true);
        self.unget_token(&token);
        token.kind == TokenKind::Identifier && token.lexeme == text
    }

    /// Tests whether the next token is the single-byte symbol `symbol`,
    /// without consuming it.
    pub fn peek_symbol(&mut self, symbol: char) -> bool {
        let token = self.get_token(true);
        self.unget_token(&token);
        token.matches_symbol(symbol)
    }

    /// Fetches the next token if it is an identifier, ungetting otherwise.
    pub fn get_identifier(&mut self, no_consts: bool) -> Option<Token> {
        let token = self.get_token(no_consts);
        if token.kind == TokenKind::Identifier {
            return Some(token);
        }
        self.unget_token(&token);
        None
    }

    /// Fetches the next token if it is a symbol, ungetting otherwise.
    pub fn get_symbol(&mut self) -> Option<Token> {
        let token = self.get_token(false);
        if token.kind == TokenKind::Symbol {
            return Some(token);
        }
        self.unget_token(&token);
        None
    }

    /// Reads any constant as an `i32` (bools as 0/1, null as 0, floats
    /// truncated). With a tag, a miss pushes an error.
    pub fn get_const_int(&mut self, tag: Option<&str>) -> Option<i32> {
        self.get_const_int64(tag).map(|v| v as i32)
    }

    /// Reads any constant as an `i64`, with the same coercions as
    /// [`Scanner::get_const_int`].
    pub fn get_const_int64(&mut self, tag: Option<&str>) -> Option<i64> {
        let token = self.get_token(false);
        if let Some(value) = token.const_int64() {
            return Some(value);
        }
        self.unget_token(&token);
        if let Some(tag) = tag {
            self.set_error(format!(
                "Missing constant integer : {} : at {}",
                tag,
                self.location()
            ));
        }
        None
    }

    /// Requires the identifier `text`; a miss pushes an error naming
    /// `tag`.
    pub fn require_identifier(&mut self, text: &str, tag: &str) -> bool {
        if self.match_identifier(text) {
            return true;
        }
        self.set_error(format!(
            "Missing {} in {} : at {}",
            text,
            tag,
            self.location()
        ));
        false
    }

    /// Requires the single-byte symbol `symbol`; a miss pushes an error
    /// naming `tag`.
    pub fn require_symbol(&mut self, symbol: char, tag: &str) -> bool {
        if self.match_symbol_char(symbol) {
            return true;
        }
        self.set_error(format!(
            "Missing {} in {} : at {}",
            symbol,
            tag,
            self.location()
        ));
        false
    }

    /// Requires an integer constant with lexeme `text`.
    pub fn require_const_int(&mut self, text: &str, tag: &str) -> bool {
        if self.match_const_int(text) {
            return true;
        }
        self.set_error(format!(
            "Missing integer '{}' in {} : at {}",
            text,
            tag,
            self.location()
        ));
        false
    }

    /// Requires any integer constant.
    pub fn require_any_const_int(&mut self, tag: &str) -> bool {
        if self.match_any_const_int() {
            return true;
        }
        self.set_error(format!("Missing integer in {} : at {}", tag, self.location()));
        false
    }

    /// Requires a `;`, reporting the offending token in the error.
    pub fn require_semi(&mut self) -> bool {
        if self.match_semi() {
            return true;
        }
        let token = self.get_token(false);
        if token.is_eof() {
            self.set_error(format!("Missing ';' : at {}", self.location()));
        } else {
            self.set_error(format!(
                "Missing ';' before {} : at {}",
                token.text(),
                self.location()
            ));
            self.unget_token(&token);
        }
        false
    }
}
