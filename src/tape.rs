//! Sparse memory tape with bounded, wrapping cells.
//!
//! The tape is addressable by any signed position. Cells are materialized
//! lazily: a position that was never written reads as `0`. Every stored value
//! stays inside the configured [`CellRange`]; arithmetic wraps at the bounds.

use std::fmt;

use crate::error::EngineError;

/// Inclusive value range of a single cell, derived from a bit width and a
/// signedness flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    bits: u32,
    signed: bool,
    min: i64,
    max: i64,
}

impl CellRange {
    /// Widest supported cell; values are stored as `i64`.
    pub const MAX_BITS: u32 = 63;

    /// Build a range for `bits`-wide cells.
    ///
    /// Unsigned cells hold `0..=2^bits - 1`, signed cells hold
    /// `-2^(bits-1)..=2^(bits-1) - 1`.
    pub fn new(bits: u32, signed: bool) -> Result<Self, EngineError> {
        if bits == 0 || bits > Self::MAX_BITS {
            return Err(EngineError::InvalidBitWidth { bits });
        }
        let (min, max) = if signed {
            let half = 1i64 << (bits - 1);
            (-half, half - 1)
        } else {
            (0, i64::MAX >> (Self::MAX_BITS - bits))
        };
        Ok(Self { bits, signed, min, max })
    }

    /// Classic byte cells: unsigned, 8 bits.
    pub const fn unsigned_byte() -> Self {
        Self { bits: 8, signed: false, min: 0, max: 255 }
    }

    pub fn bits(&self) -> u32 { self.bits }
    pub fn is_signed(&self) -> bool { self.signed }
    pub fn min(&self) -> i64 { self.min }
    pub fn max(&self) -> i64 { self.max }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Fold an arbitrary integer into the range by wraparound.
    ///
    /// Same result as starting from `0` and stepping `|value|` times in the
    /// direction of its sign.
    pub fn normalize(&self, value: i128) -> i64 {
        let span = (self.max as i128) - (self.min as i128) + 1;
        let offset = (value - self.min as i128).rem_euclid(span);
        (self.min as i128 + offset) as i64
    }
}

impl Default for CellRange {
    fn default() -> Self {
        Self::unsigned_byte()
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.signed { "signed" } else { "unsigned" };
        write!(f, "{}-bit {} [{}, {}]", self.bits, kind, self.min, self.max)
    }
}

/// One cell as seen through [`Tape::window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub index: i64,
    pub value: i64,
}

/// Bidirectionally unbounded memory tape.
///
/// Storage is split by sign of the offset: `forward[i]` holds position `i`,
/// `backward[i]` holds position `-(i + 1)`. Both buffers only grow when a
/// nonzero value lands past their current end.
#[derive(Debug, Clone)]
pub struct Tape {
    range: CellRange,
    position: i64,
    forward: Vec<i64>,
    backward: Vec<i64>,
}

impl Tape {
    /// Widest window a caller can ask for.
    pub const MAX_WINDOW_RADIUS: usize = 1024;

    pub fn new(range: CellRange) -> Self {
        Self {
            range,
            position: 0,
            forward: Vec::new(),
            backward: Vec::new(),
        }
    }

    pub fn range(&self) -> CellRange { self.range }

    /// Current data pointer.
    pub fn position(&self) -> i64 { self.position }

    pub fn move_forward(&mut self) {
        self.position += 1;
    }

    pub fn move_backward(&mut self) {
        self.position -= 1;
    }

    /// Value at the data pointer.
    pub fn read(&self) -> i64 {
        self.cell_at(self.position)
    }

    /// Value at an arbitrary position; never-written cells read as `0`.
    pub fn cell_at(&self, position: i64) -> i64 {
        let (buf, idx) = if position >= 0 {
            (&self.forward, position as usize)
        } else {
            (&self.backward, (-(position + 1)) as usize)
        };
        buf.get(idx).copied().unwrap_or(0)
    }

    pub fn increment(&mut self) {
        let v = self.read();
        let next = if v == self.range.max() { self.range.min() } else { v + 1 };
        self.store(next);
    }

    pub fn decrement(&mut self) {
        let v = self.read();
        let next = if v == self.range.min() { self.range.max() } else { v - 1 };
        self.store(next);
    }

    /// Store `value` at the data pointer, wrapped into the cell range.
    pub fn write(&mut self, value: i64) {
        let v = self.range.normalize(value as i128);
        self.store(v);
    }

    /// Parse a host-supplied token as an integer and write it.
    ///
    /// A malformed token leaves the cell untouched and is reported as
    /// [`EngineError::InvalidWrite`]; callers usually just log it and carry on.
    pub fn write_str(&mut self, token: &str) -> Result<i64, EngineError> {
        let trimmed = token.trim();
        match trimmed.parse::<i128>() {
            Ok(n) => {
                let v = self.range.normalize(n);
                self.store(v);
                Ok(v)
            }
            Err(_) => {
                tracing::warn!(token = %token, position = self.position, "ignoring non-numeric tape write");
                Err(EngineError::InvalidWrite { value: token.to_string() })
            }
        }
    }

    /// The `2 * radius + 1` cells centered on the data pointer, capped at
    /// [`Tape::MAX_WINDOW_RADIUS`] cells per side.
    pub fn window(&self, radius: usize) -> Vec<CellView> {
        let r = i64::try_from(radius.min(Self::MAX_WINDOW_RADIUS)).unwrap_or(0);
        (self.position.saturating_sub(r)..=self.position.saturating_add(r))
            .map(|index| CellView { index, value: self.cell_at(index) })
            .collect()
    }

    /// Drop every cell and move the pointer back to `0`.
    pub fn clear(&mut self) {
        self.position = 0;
        self.forward.clear();
        self.backward.clear();
    }

    /// True when no cell holds a nonzero value.
    pub fn is_blank(&self) -> bool {
        self.forward.iter().chain(self.backward.iter()).all(|&v| v == 0)
    }

    fn store(&mut self, value: i64) {
        debug_assert!(self.range.contains(value));
        let (buf, idx) = if self.position >= 0 {
            (&mut self.forward, self.position as usize)
        } else {
            (&mut self.backward, (-(self.position + 1)) as usize)
        };
        if idx >= buf.len() {
            // Zero is the implicit value; don't grow just to record it.
            if value == 0 {
                return;
            }
            buf.resize(idx + 1, 0);
        }
        buf[idx] = value;
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(CellRange::default())
    }
}
