//! The scanner: character-level operations and the tokenizer entry point.
//!
//! Token-family lexing lives in sibling modules, all extending
//! [`Scanner`]:
//! - `ident` - identifiers and the keyword constants
//! - `number` - integer, hex and float constants
//! - `literal` - char and string constants
//! - `symbol` - punctuation, including two-byte fusions
//!
//! Character fetches go through [`Scanner::get_char`], which elides block
//! comments (per the configured [`Dialect`](crate::Dialect)) and records
//! their text in a comment buffer. [`Scanner::get_leading_char`]
//! additionally skips whitespace and line comments. Both maintain the
//! one-step shadow position, so a single [`Scanner::unget_char`] rewinds
//! the whole fetch, comments included.

mod ident;
mod literal;
mod number;
mod symbol;

use ebnfc_util::{Diagnostic, ErrorStack, Location};

use crate::cursor::Cursor;
use crate::dialect::ScannerConfig;
use crate::token::Token;

/// Stateful tokenizer over one source buffer.
///
/// # Examples
///
/// ```
/// use ebnfc_lex::{Scanner, TokenKind};
///
/// let mut scanner = Scanner::new("demo", b"x = 42;");
/// assert_eq!(scanner.get_token(false).lexeme, "x");
/// assert_eq!(scanner.get_token(false).lexeme, "=");
/// assert_eq!(scanner.get_token(false).const_int(), Some(42));
/// assert_eq!(scanner.get_token(false).lexeme, ";");
/// assert_eq!(scanner.get_token(false).kind, TokenKind::Eof);
/// ```
pub struct Scanner<'a> {
    file: String,
    cursor: Cursor<'a>,
    comment: Vec<u8>,
    errors: ErrorStack,
    config: ScannerConfig,
}

pub(crate) fn is_whitespace(c: u8) -> bool {
    c == b' ' || c == b'\t' || c == b'\r' || c == b'\n'
}

pub(crate) fn is_eol(c: u8) -> bool {
    c == b'\n' || c == b'\r' || c == 0
}

impl<'a> Scanner<'a> {
    pub fn new(file: impl Into<String>, input: &'a [u8]) -> Self {
        Self::with_config(file, input, ScannerConfig::default())
    }

    pub fn with_config(file: impl Into<String>, input: &'a [u8], config: ScannerConfig) -> Self {
        Self {
            file: file.into(),
            cursor: Cursor::new(input),
            comment: Vec::new(),
            errors: ErrorStack::new(),
            config,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Current line (1-based).
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.cursor.pos()
    }

    /// Current position rendered as `line:column`.
    pub fn location(&self) -> String {
        self.cursor.location().to_string()
    }

    /// Current position with the file name, the form grammar diagnostics
    /// use.
    pub fn file_location(&self) -> String {
        ebnfc_util::span::file_position(&self.file, self.cursor.location())
    }

    // ---- error stack ------------------------------------------------

    /// Pushes an error onto the scanner's stack.
    pub fn set_error(&self, message: impl Into<String>) {
        self.errors
            .push(Diagnostic::error(message, self.error_location()));
    }

    fn error_location(&self) -> Location {
        self.cursor.location()
    }

    /// The most recent error message, if any.
    pub fn get_error(&self) -> Option<String> {
        self.errors.top_error()
    }

    pub fn has_errors(&self) -> bool {
        self.errors.has_errors()
    }

    pub fn errors(&self) -> &ErrorStack {
        &self.errors
    }

    // ---- comment buffer ---------------------------------------------

    /// Text of the comments elided since the buffer was last cleared.
    pub fn comment(&self) -> String {
        String::from_utf8_lossy(&self.comment).into_owned()
    }

    pub fn clear_comment(&mut self) {
        self.comment.clear();
    }

    // ---- character level --------------------------------------------

    /// Returns the next byte without advancing, 0 at end.
    pub fn peek_char(&self) -> u8 {
        self.cursor.peek()
    }

    /// Consumes and returns one byte.
    ///
    /// With `literal == false`, block comments are recognized, elided and
    /// appended to the comment buffer; a closing delimiter outside a
    /// comment is an error, as is end of input inside one. With
    /// `literal == true` (inside char/string constants) bytes pass
    /// through untouched.
    pub fn get_char(&mut self, literal: bool) -> u8 {
        let mut inside_comment = false;
        self.cursor.mark();

        loop {
            let c = self.cursor.bump();
            if inside_comment {
                self.comment.push(c);
            }

            if c != b'\n' && !literal {
                let next = self.cursor.peek();
                if (self.config.dialect.begin_comment)(c, next) {
                    if !inside_comment {
                        self.clear_comment();
                        self.comment.push(c);
                        self.comment.push(next);
                        inside_comment = true;
                        // Skip the second delimiter byte now, so an
                        // immediate closer is not mistaken for another
                        // opener (e.g. `/*/`).
                        self.cursor.bump();
                    }
                    continue;
                } else if (self.config.dialect.end_comment)(c, next) {
                    if !inside_comment {
                        self.clear_comment();
                        self.set_error(format!(
                            "Unexpected '*/' outside of comment : at {}",
                            self.location()
                        ));
                    }
                    inside_comment = false;
                    self.comment.push(next);
                    self.cursor.bump();
                    continue;
                }
            }

            if inside_comment {
                if c == 0 {
                    self.clear_comment();
                    self.set_error(format!(
                        "End of input encountered inside comment : at {}",
                        self.location()
                    ));
                    return 0;
                }
                continue;
            }
            return c;
        }
    }

    /// Skips whitespace and line comments, then returns the next byte.
    ///
    /// Line-comment text accumulates in the comment buffer; a blank line
    /// between comments clears the buffer, so the buffer always holds the
    /// comment block immediately preceding the next token.
    pub fn get_leading_char(&mut self) -> u8 {
        let mut trailing_comment_newline = 0u8;

        loop {
            let mut multiple_newlines = false;
            let mut c;

            // Skip blanks.
            loop {
                c = self.get_char(false);
                if c == trailing_comment_newline {
                    multiple_newlines = true;
                }
                if !is_whitespace(c) {
                    break;
                }
            }

            let next = self.cursor.peek();
            if !(self.config.dialect.line_comment)(c, next) {
                return c;
            }

            if multiple_newlines {
                self.clear_comment();
            }

            // Record the leader byte; the loop below records the rest of
            // the line.
            self.comment.push(c);
            loop {
                c = self.get_char(true);
                if c == 0 {
                    return c;
                }
                self.comment.push(c);
                if is_eol(c) {
                    break;
                }
            }

            trailing_comment_newline = c;
            loop {
                c = self.get_char(false);
                if c == 0 {
                    return c;
                }
                if c == trailing_comment_newline || !is_eol(c) {
                    self.unget_char();
                    break;
                }
                self.comment.push(c);
            }
        }
    }

    /// Rewinds the last [`Scanner::get_char`] (or
    /// [`Scanner::get_leading_char`]) fetch.
    pub fn unget_char(&mut self) {
        self.cursor.rewind();
    }

    // ---- token level ------------------------------------------------

    /// Scans and returns the next token.
    ///
    /// With `no_consts == true`, keyword and numeric constant recognition
    /// is suppressed: `true` stays an identifier and `-3` scans as the
    /// symbol `-` followed by a number. End of input yields an
    /// [`Eof`](crate::TokenKind::Eof) token.
    pub fn get_token(&mut self, no_consts: bool) -> Token {
        let c = self.get_leading_char();
        if c == 0 {
            self.unget_char();
            return Token::eof(self.cursor.pos(), self.cursor.line());
        }

        let start = self.cursor.marked_pos();
        let line = self.cursor.marked_line();
        let next = self.cursor.peek();

        if c.is_ascii_alphabetic() || c == b'_' {
            self.lex_identifier(c, start, line, no_consts)
        } else if !no_consts
            && (c.is_ascii_digit() || ((c == b'+' || c == b'-') && next.is_ascii_digit()))
        {
            self.lex_number(c, start, line)
        } else if c == b'\'' {
            self.lex_char_const(start, line)
        } else if c == b'"' {
            self.lex_string_const(start, line)
        } else {
            self.lex_symbol(c, start, line)
        }
    }

    /// Restores the scanner to just before `token`. O(1), cannot fail,
    /// and idempotent for the most recently returned token.
    pub fn unget_token(&mut self, token: &Token) {
        self.cursor.restore(token.start, token.line);
    }

    /// True if the next token starts on a line after `line` (or input is
    /// exhausted). Does not consume the token.
    pub fn is_end_of_line(&mut self, line: u32) -> bool {
        let token = self.get_token(false);
        let ended = token.is_eof() || token.line > line;
        self.unget_token(&token);
        ended
    }

    // ---- bulk helpers -----------------------------------------------

    /// Collects tokens until `pred` accepts one (included in the result).
    /// EOF before that pushes an error.
    pub fn tokens_until(
        &mut self,
        mut pred: impl FnMut(&Token) -> bool,
        no_consts: bool,
        context: &str,
    ) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.get_token(no_consts);
            if token.is_eof() {
                self.set_error(format!(
                    "Unexpected end of input in {} : at {} : {}",
                    context,
                    self.file,
                    self.location()
                ));
                return tokens;
            }
            let done = pred(&token);
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Collects tokens up to and including the first whose lexeme equals
    /// `text`.
    pub fn tokens_until_match(&mut self, text: &str, no_consts: bool, context: &str) -> Vec<Token> {
        self.tokens_until(|t| t.matches(text), no_consts, context)
    }

    /// Collects tokens until the `right` delimiter that balances an
    /// already-consumed `left`. Nesting-aware; both delimiters are
    /// included in the result.
    pub fn tokens_until_pair(&mut self, left: char, right: char, context: &str) -> Vec<Token> {
        let mut depth = 1i32;
        let mut tokens = Vec::new();
        loop {
            let token = self.get_token(false);
            if token.is_eof() {
                self.set_error(format!(
                    "Unexpected end of input in {} : at {} : {}",
                    context,
                    self.file,
                    self.location()
                ));
                return tokens;
            }
            if token.matches_symbol(left) {
                depth += 1;
            } else if token.matches_symbol(right) {
                depth -= 1;
            }
            tokens.push(token);
            if depth == 0 {
                return tokens;
            }
        }
    }
}
