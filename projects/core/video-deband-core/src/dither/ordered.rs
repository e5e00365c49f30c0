//! Ordered (Bayer) dithering.
//!
//! A fixed 8x8 Bayer threshold pattern keyed by `(row, column)` position.
//! The pattern value is scaled into the 0..=255 range of the bits discarded
//! by the `>> 8` down-shift, centered on a mean of 128 so flat areas keep
//! their average level.

/// Classic 8x8 Bayer index matrix, values 0..=63.
const BAYER_8X8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Adjusts a 16-bit value so the subsequent truncating `>> 8` produces an
/// ordered-dithered 8-bit result.
#[inline(always)]
pub(crate) fn adjust(value: u16, row: usize, column: usize) -> u16 {
    let pattern = BAYER_8X8[row & 7][column & 7] as u16;
    value.saturating_add(pattern * 4 + 2)
}
