//! Floyd–Steinberg error diffusion.
//!
//! Carries the error truncated by the `>> 8` down-shift into the right
//! neighbor and the three lower neighbors with the classic 7/3/5/1 weights,
//! in 1/16 fixed point. The state is strictly call-scoped: reset at plane
//! start, advanced at each row end, dropped at plane end. Pixel order is
//! therefore load-bearing — rows must be walked top to bottom, pixels left
//! to right.

use alloc::vec;
use alloc::vec::Vec;

/// Per-plane error accumulator.
///
/// Rows are two entries wider than the (block-padded) plane so the
/// distribution step never needs edge branches.
pub(crate) struct ErrorDiffusion {
    /// Errors flowing into the row currently being processed.
    current: Vec<i32>,
    /// Errors accumulated for the next row.
    next: Vec<i32>,
}

impl ErrorDiffusion {
    /// State for a plane whose rows hold `padded_width` pixels
    /// (width rounded up to whole blocks).
    pub(crate) fn new(padded_width: usize) -> Self {
        Self {
            current: vec![0; padded_width + 2],
            next: vec![0; padded_width + 2],
        }
    }

    /// Placeholder for pipelines that never dither; allocates nothing.
    pub(crate) fn disabled() -> Self {
        Self {
            current: Vec::new(),
            next: Vec::new(),
        }
    }

    /// Adjusts one 16-bit value and records the truncation error for the
    /// neighbors. `column` is the pixel's x position.
    #[inline]
    pub(crate) fn apply(&mut self, value: u16, column: usize) -> u16 {
        let idx = column + 1;
        let incoming = self.current[idx] >> 4;
        let adjusted = (value as i32 + incoming).clamp(0, 0xffff) as u16;

        // The low byte is what the down-shift will discard.
        let error = (adjusted & 0xff) as i32;
        self.current[idx + 1] += error * 7;
        self.next[idx - 1] += error * 3;
        self.next[idx] += error * 5;
        self.next[idx + 1] += error;

        adjusted
    }

    /// Rotates the accumulators at the end of a row.
    pub(crate) fn advance_row(&mut self) {
        core::mem::swap(&mut self.current, &mut self.next);
        self.next.fill(0);
    }
}
