//! Byte cursor for traversing source buffers.
//!
//! The cursor tracks the current byte offset and 1-based line, plus a
//! one-step shadow of both. [`Cursor::mark`] saves the shadow before a
//! character fetch and [`Cursor::rewind`] restores it, which is all the
//! state the scanner's `unget_char` needs. Columns are not tracked
//! eagerly; [`Cursor::column`] derives the column by scanning back to the
//! previous newline, so rewinds stay O(1).

use ebnfc_util::Location;

/// A byte cursor over one source buffer.
///
/// # Examples
///
/// ```
/// use ebnfc_lex::cursor::Cursor;
///
/// let mut cursor = Cursor::new(b"ab\nc");
/// assert_eq!(cursor.bump(), b'a');
/// assert_eq!(cursor.peek(), b'b');
/// assert_eq!(cursor.line(), 1);
/// ```
#[derive(Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    line: u32,
    prev_pos: usize,
    prev_line: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            prev_pos: 0,
            prev_line: 1,
        }
    }

    /// Returns the next byte without advancing, 0 at end of input.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.input.get(self.pos).copied().unwrap_or(0)
    }

    /// Consumes and returns the next byte, 0 at end of input.
    ///
    /// Counts lines; does not touch the shadow position.
    #[inline]
    pub fn bump(&mut self) -> u8 {
        match self.input.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                if b == b'\n' {
                    self.line += 1;
                }
                b
            }
            None => 0,
        }
    }

    /// Saves the current position into the one-step shadow.
    #[inline]
    pub fn mark(&mut self) {
        self.prev_pos = self.pos;
        self.prev_line = self.line;
    }

    /// Restores the position saved by the last [`Cursor::mark`].
    #[inline]
    pub fn rewind(&mut self) {
        self.pos = self.prev_pos;
        self.line = self.prev_line;
    }

    /// Jumps to an arbitrary earlier position. Used to restore the cursor
    /// to a token's start for token pushback.
    #[inline]
    pub fn restore(&mut self, pos: usize, line: u32) {
        self.pos = pos;
        self.line = line;
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Position and line of the shadow, i.e. where the last marked fetch
    /// began.
    pub fn marked_pos(&self) -> usize {
        self.prev_pos
    }

    pub fn marked_line(&self) -> u32 {
        self.prev_line
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Column of the current position, 1-based, derived by scanning back
    /// to the previous newline.
    pub fn column(&self) -> u32 {
        let line_start = self.input[..self.pos.min(self.input.len())]
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        (self.pos - line_start) as u32 + 1
    }

    /// The full current location.
    pub fn location(&self) -> Location {
        Location::new(self.pos, self.line, self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_bump() {
        let mut cursor = Cursor::new(b"ab");
        assert_eq!(cursor.peek(), b'a');
        assert_eq!(cursor.bump(), b'a');
        assert_eq!(cursor.bump(), b'b');
        assert_eq!(cursor.bump(), 0);
        assert_eq!(cursor.peek(), 0);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_line_counting() {
        let mut cursor = Cursor::new(b"a\nb\nc");
        assert_eq!(cursor.line(), 1);
        cursor.bump();
        cursor.bump();
        assert_eq!(cursor.line(), 2);
        cursor.bump();
        cursor.bump();
        assert_eq!(cursor.line(), 3);
    }

    #[test]
    fn test_mark_rewind() {
        let mut cursor = Cursor::new(b"a\nb");
        cursor.mark();
        cursor.bump();
        cursor.bump();
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.line(), 2);
        cursor.rewind();
        assert_eq!(cursor.pos(), 0);
        assert_eq!(cursor.line(), 1);
    }

    #[test]
    fn test_column() {
        let mut cursor = Cursor::new(b"ab\ncd");
        assert_eq!(cursor.column(), 1);
        cursor.bump();
        assert_eq!(cursor.column(), 2);
        cursor.bump();
        cursor.bump();
        assert_eq!(cursor.column(), 1);
        cursor.bump();
        assert_eq!(cursor.column(), 2);
    }

    #[test]
    fn test_restore() {
        let mut cursor = Cursor::new(b"ab\ncd");
        for _ in 0..4 {
            cursor.bump();
        }
        cursor.restore(0, 1);
        assert_eq!(cursor.pos(), 0);
        assert_eq!(cursor.line(), 1);
        assert_eq!(cursor.bump(), b'a');
    }
}
