//! Read cursor over an immutable program text.

/// Bidirectional cursor over program characters.
///
/// The position always stays in `0..=len`; `len` means end-of-stream. Every
/// movement is clamped rather than reported as an error.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    pub fn new(code: &str) -> Self {
        Self {
            chars: code.chars().collect(),
            pos: 0,
        }
    }

    /// Replace the program text and rewind.
    pub fn reload(&mut self, code: &str) {
        self.chars = code.chars().collect();
        self.pos = 0;
    }

    pub fn position(&self) -> usize { self.pos }
    pub fn len(&self) -> usize { self.chars.len() }
    pub fn is_empty(&self) -> bool { self.chars.is_empty() }
    pub fn as_chars(&self) -> &[char] { &self.chars }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Up to `n` characters starting at the cursor, without moving it.
    pub fn peek(&self, n: usize) -> &[char] {
        let end = self.pos.saturating_add(n).min(self.chars.len());
        &self.chars[self.pos..end]
    }

    /// The character under the cursor, `None` at end-of-stream.
    pub fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Move forward by `n`, stopping at the end. Returns how far it moved.
    pub fn advance(&mut self, n: usize) -> usize {
        let before = self.pos;
        self.pos = self.pos.saturating_add(n).min(self.chars.len());
        self.pos - before
    }

    /// Move backward by `n`, stopping at `0`. Returns how far it moved.
    pub fn retreat(&mut self, n: usize) -> usize {
        let before = self.pos;
        self.pos = self.pos.saturating_sub(n);
        before - self.pos
    }

    /// Jump to `pos`, clamped to the stream length.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.chars.len());
    }

    pub fn rewind(&mut self) {
        self.pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_move() {
        let c = Cursor::new("+-><");
        assert_eq!(c.peek(2), &['+', '-']);
        assert_eq!(c.peek(1), &['+']);
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn peek_clamps_at_end() {
        let mut c = Cursor::new("+-");
        c.advance(1);
        assert_eq!(c.peek(10), &['-']);
        c.advance(1);
        assert!(c.peek(3).is_empty());
        assert_eq!(c.current(), None);
    }

    #[test]
    fn advance_clamps_and_reports_distance() {
        let mut c = Cursor::new("abc");
        assert_eq!(c.advance(2), 2);
        assert_eq!(c.advance(5), 1);
        assert_eq!(c.position(), 3);
        assert!(c.is_at_end());
        assert_eq!(c.advance(1), 0);
        assert_eq!(c.advance(usize::MAX), 0);
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn retreat_clamps_and_reports_distance() {
        let mut c = Cursor::new("abc");
        c.advance(3);
        assert_eq!(c.retreat(1), 1);
        assert_eq!(c.retreat(10), 2);
        assert_eq!(c.position(), 0);
        assert_eq!(c.retreat(1), 0);
        assert_eq!(c.retreat(usize::MAX), 0);
    }

    #[test]
    fn positions_stay_in_bounds_for_any_step() {
        let mut c = Cursor::new("[->+<]");
        for n in [0usize, 1, 3, 7, 100, usize::MAX] {
            c.advance(n);
            assert!(c.position() <= c.len());
            c.retreat(n / 2);
            assert!(c.position() <= c.len());
        }
    }

    #[test]
    fn empty_program_is_at_end() {
        let c = Cursor::new("");
        assert!(c.is_empty());
        assert!(c.is_at_end());
        assert_eq!(c.current(), None);
    }

    #[test]
    fn multibyte_chars_count_once() {
        let mut c = Cursor::new("é+");
        assert_eq!(c.len(), 2);
        c.advance(1);
        assert_eq!(c.current(), Some('+'));
    }

    #[test]
    fn seek_and_reload() {
        let mut c = Cursor::new("+++");
        c.seek(99);
        assert_eq!(c.position(), 3);
        c.reload(".");
        assert_eq!(c.position(), 0);
        assert_eq!(c.as_chars(), &['.']);
    }
}
