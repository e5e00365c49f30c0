//! Plane descriptor and per-call mode selection.
//!
//! A [`PlaneParams`] describes one color plane for the duration of one
//! [`process_plane`] call: buffer pointers, geometry, storage modes and the
//! flattened threshold/clamp configuration. All validation (legal parameter
//! ranges, buffer sizing, guard margins) happens in the embedding filter
//! before this crate is reached.
//!
//! [`process_plane`]: crate::process_plane

use crate::pixel_info::PixelDitherInfo;
use derive_enum_all_values::AllValues;

/// Number of pixels processed per inner-loop block.
pub const BLOCK_PIXELS: usize = 16;

/// Storage layout of the source samples.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AllValues)]
pub enum InputMode {
    /// One byte per sample.
    LowBitDepth = 0,
    /// Two planes: most significant bytes, with the least significant bytes
    /// stored `height` rows below at the same pitch.
    HighBitDepthStacked = 1,
    /// Little-endian `u16` samples; horizontal neighbor distance is 2 bytes.
    HighBitDepthInterleaved = 2,
}

impl InputMode {
    /// Byte distance between horizontally adjacent samples.
    #[inline]
    pub fn pixel_step(self) -> i32 {
        match self {
            InputMode::HighBitDepthInterleaved => 2,
            _ => 1,
        }
    }

    /// `log2` of [`Self::pixel_step`], used when scaling horizontal offsets.
    #[inline]
    pub(crate) fn pixel_step_shift(self) -> u32 {
        match self {
            InputMode::HighBitDepthInterleaved => 1,
            _ => 0,
        }
    }
}

/// Number and shape of reference pixels sampled per output pixel.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AllValues)]
pub enum SampleMode {
    /// One reference, displaced vertically (mode 0). No grain is applied.
    Vertical = 0,
    /// Two references mirrored around the pixel (mode 1).
    SymmetricPair = 1,
    /// Four references forming two mirrored diagonal pairs (mode 2).
    DiagonalCross = 2,
}

impl SampleMode {
    /// Number of reference pixels gathered per output pixel.
    #[inline]
    pub fn reference_count(self) -> usize {
        match self {
            SampleMode::Vertical => 1,
            SampleMode::SymmetricPair => 2,
            SampleMode::DiagonalCross => 4,
        }
    }
}

/// Output precision, storage layout and dithering strategy.
///
/// Everything except [`PrecisionMode::Low`] runs the blend pipeline on
/// 16-bit upsampled values; the variants differ in how those values are
/// converted for storage.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AllValues)]
pub enum PrecisionMode {
    /// 8-bit internal pipeline, 8-bit output. Input must be
    /// [`InputMode::LowBitDepth`].
    Low = 0,
    /// 16-bit internal, truncating conversion to 8-bit output.
    HighNoDithering = 1,
    /// 16-bit internal, ordered (Bayer) dithering down to 8-bit output.
    HighOrderedDithering = 2,
    /// 16-bit internal, Floyd–Steinberg error diffusion down to 8-bit output.
    HighFloydSteinberg = 3,
    /// 16-bit output split into MSB/LSB planes, LSB plane `height` rows
    /// below the primary plane.
    Stacked16 = 4,
    /// 16-bit little-endian interleaved output, 32 destination bytes per
    /// block.
    Interleaved16 = 5,
}

impl PrecisionMode {
    /// Whether the blend pipeline runs on 16-bit upsampled values.
    #[inline]
    pub fn is_high(self) -> bool {
        !matches!(self, PrecisionMode::Low)
    }

    /// Destination bytes consumed per 16-pixel block.
    #[inline]
    pub(crate) fn dst_block_bytes(self) -> usize {
        match self {
            PrecisionMode::Interleaved16 => 32,
            _ => 16,
        }
    }
}

/// Everything the kernel needs to process one plane.
///
/// Owned and fully validated by the caller; immutable for the duration of
/// one call. The pointers are raw because source/destination frames live in
/// externally managed frame buffers with guard margins.
#[derive(Debug, Clone, Copy)]
pub struct PlaneParams {
    /// Source plane base pointer (top-left pixel).
    pub src_ptr: *const u8,
    /// Destination plane base pointer (top-left pixel).
    pub dst_ptr: *mut u8,
    /// Source row stride in bytes.
    pub src_pitch: i32,
    /// Destination row stride in bytes.
    pub dst_pitch: i32,
    /// Plane width in pixels.
    pub width: i32,
    /// Plane height in pixels.
    pub height: i32,
    /// Horizontal chroma subsampling, as a right-shift amount.
    pub width_subsampling: u32,
    /// Vertical chroma subsampling, as a right-shift amount.
    pub height_subsampling: u32,
    /// Storage layout of the source samples.
    pub input_mode: InputMode,
    /// Significant bits per source sample (8..=16).
    pub input_depth: u32,
    /// Blend threshold, pre-scaled to the internal 16-bit range. The low
    /// precision path uses its low 8 bits.
    pub threshold: u16,
    /// Lowest allowed output value, internal 16-bit scale.
    pub pixel_min: u16,
    /// Highest allowed output value, internal 16-bit scale.
    pub pixel_max: u16,
    /// Per-pixel offset/grain table, row-major.
    pub info_ptr: *const PixelDitherInfo,
    /// Records per row in the info table. Must be a multiple of
    /// [`BLOCK_PIXELS`] and at least `width`, so the final partial block of
    /// each row has records.
    pub info_stride: i32,
}

impl PlaneParams {
    /// Bit shift that upsamples source samples to the internal 16-bit range.
    #[inline]
    pub(crate) fn upsample_shift(&self) -> u32 {
        16 - self.input_depth
    }

    /// Whether output values need clamping into `[pixel_min, pixel_max]`.
    #[inline]
    pub(crate) fn need_clamping(&self) -> bool {
        self.pixel_min > 0 || self.pixel_max < 0xffff
    }

    /// Blocks per row, including the final partial block.
    #[inline]
    pub(crate) fn blocks_per_row(&self) -> usize {
        (self.width as usize).div_ceil(BLOCK_PIXELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(InputMode::LowBitDepth, 1)]
    #[case(InputMode::HighBitDepthStacked, 1)]
    #[case(InputMode::HighBitDepthInterleaved, 2)]
    fn pixel_step_matches_layout(#[case] mode: InputMode, #[case] step: i32) {
        assert_eq!(mode.pixel_step(), step);
        assert_eq!(1 << mode.pixel_step_shift(), step);
    }

    #[test]
    fn reference_counts() {
        assert_eq!(SampleMode::Vertical.reference_count(), 1);
        assert_eq!(SampleMode::SymmetricPair.reference_count(), 2);
        assert_eq!(SampleMode::DiagonalCross.reference_count(), 4);
    }

    #[test]
    fn partial_blocks_round_up() {
        let mut params = flat_plane_params(24, 4, 32);
        assert_eq!(params.blocks_per_row(), 2);
        params.width = 32;
        assert_eq!(params.blocks_per_row(), 2);
        params.width = 33;
        assert_eq!(params.blocks_per_row(), 3);
    }
}
