//! Reference offset resolution.
//!
//! Converts [`PixelDitherInfo`] records into byte offsets relative to each
//! pixel's own address, honoring chroma subsampling and the storage step of
//! interleaved 16-bit input. Resolved blocks double as the derived-offset
//! cache payload: the arithmetic here runs once per geometry when a cache
//! build succeeds, and per call otherwise.
//!
//! Offsets are deterministic for a given `(info, pitch, subsampling)` tuple;
//! warm and cold calls must resolve byte-identical addresses.

use crate::pixel_info::PixelDitherInfo;
use crate::plane::{PlaneParams, BLOCK_PIXELS};

/// Resolved offsets and grain values for one 16-pixel block.
///
/// `off1` holds the first reference offset per pixel. `off2` is only
/// populated in diagonal-cross mode (second diagonal); the mirrored
/// references are the negations of `off1`/`off2` and are derived at the
/// gather site rather than stored.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetBlock {
    /// First reference byte offset, per pixel.
    pub off1: [i32; BLOCK_PIXELS],
    /// Second reference byte offset (diagonal cross), per pixel.
    pub off2: [i32; BLOCK_PIXELS],
    /// Grain values, per pixel.
    pub change: [i16; BLOCK_PIXELS],
}

impl OffsetBlock {
    /// An all-zero block, used as scratch when no cache stream is available.
    pub const ZERO: Self = Self {
        off1: [0; BLOCK_PIXELS],
        off2: [0; BLOCK_PIXELS],
        change: [0; BLOCK_PIXELS],
    };
}

/// `pitch * rows` with the product saturated into `i32`.
///
/// A wrapped offset would address arbitrary memory; a saturated one stays
/// within the guard-margin contract of the frame allocator.
#[inline(always)]
fn pitch_mul(pitch: i32, rows: i32) -> i32 {
    (pitch as i64 * rows as i64).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Resolves one block of info records into byte offsets.
///
/// `infos` must hold [`BLOCK_PIXELS`] records. The caller picks
/// `SAMPLE_MODE` once per plane; see [`crate::SampleMode`] for the shapes.
#[inline]
pub fn resolve_block<const SAMPLE_MODE: u8>(
    infos: &[PixelDitherInfo],
    params: &PlaneParams,
    out: &mut OffsetBlock,
) {
    debug_assert_eq!(infos.len(), BLOCK_PIXELS);

    let pitch = params.src_pitch;
    let w_sub = params.width_subsampling;
    let h_sub = params.height_subsampling;
    let step_shift = params.input_mode.pixel_step_shift();

    for (i, info) in infos.iter().enumerate().take(BLOCK_PIXELS) {
        let ref1 = info.ref1 as i32;
        let ref2 = info.ref2 as i32;

        match SAMPLE_MODE {
            0 => {
                // Vertical reference with the subsampling shift applied to
                // the magnitude, preserving the sign.
                let rows = (ref1.abs() >> h_sub) * ref1.signum();
                out.off1[i] = pitch_mul(pitch, rows);
            }
            1 => {
                // ref1 is guaranteed non-negative by the seeding stage; the
                // mirrored reference is the negation, derived at gather time.
                out.off1[i] = pitch_mul(pitch, ref1 >> h_sub);
            }
            2 => {
                // Two diagonals: (ref1, ref2) and its quarter rotation.
                let horiz1 = (ref1 >> w_sub) << step_shift;
                let horiz2 = (ref2 >> w_sub) << step_shift;
                out.off1[i] = pitch_mul(pitch, ref2 >> h_sub).saturating_add(horiz1);
                out.off2[i] = horiz2.saturating_sub(pitch_mul(pitch, ref1 >> h_sub));
            }
            _ => unreachable!("invalid sample mode"),
        }

        out.change[i] = info.change;
    }
}
