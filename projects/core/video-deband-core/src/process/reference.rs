//! Sample gathering: source pixels and resolved reference pixels.
//!
//! All reads go through [`read_sample`], which understands the three input
//! layouts. High-path samples are upsampled to the internal 16-bit range by
//! `16 - input_depth`; the 8-bit low path reads bytes as-is.
//!
//! Edge blocks and out-of-plane reference offsets may read guard bytes
//! outside the logical plane. That is by contract: frame buffers carry a
//! guard margin, and garbage sample values only feed the threshold test.

use super::offsets::OffsetBlock;
use super::{IM_INTERLEAVED, IM_LOW, IM_STACKED};
use crate::plane::BLOCK_PIXELS;

/// Reads one raw sample at `base + offset`.
///
/// `stacked_lsb` is the byte distance from the MSB plane to the LSB plane
/// (`src_pitch * height`), only used for stacked input.
///
/// # Safety
///
/// `base + offset` (and the paired LSB/second byte for 16-bit layouts) must
/// stay within the allocated buffer, guard margins included.
#[inline(always)]
pub(crate) unsafe fn read_sample<const INPUT_MODE: u8>(
    base: *const u8,
    offset: isize,
    stacked_lsb: isize,
) -> u16 {
    let ptr = base.offset(offset);
    match INPUT_MODE {
        IM_LOW => *ptr as u16,
        IM_STACKED => ((*ptr as u16) << 8) | (*ptr.offset(stacked_lsb) as u16),
        IM_INTERLEAVED => u16::from_le_bytes([*ptr, *ptr.offset(1)]),
        _ => unreachable!("invalid input mode"),
    }
}

#[inline(always)]
const fn pixel_step_bytes(input_mode: u8) -> isize {
    if input_mode == IM_INTERLEAVED {
        2
    } else {
        1
    }
}

/// Reads the 16 source pixels of a block, upsampled to 16 bits.
///
/// # Safety
///
/// `block_src` must be readable for one block in the given layout (guard
/// bytes may satisfy the tail of a partial block).
#[inline]
pub(crate) unsafe fn read_src_high<const INPUT_MODE: u8>(
    block_src: *const u8,
    stacked_lsb: isize,
    upsample_shift: u32,
    out: &mut [u16; BLOCK_PIXELS],
) {
    let step = pixel_step_bytes(INPUT_MODE);
    for (i, value) in out.iter_mut().enumerate() {
        *value = read_sample::<INPUT_MODE>(block_src, i as isize * step, stacked_lsb)
            << upsample_shift;
    }
}

/// Reads the 16 source bytes of a block (8-bit pipeline).
///
/// # Safety
///
/// `block_src` must be readable for [`BLOCK_PIXELS`] bytes.
#[inline]
pub(crate) unsafe fn read_src_low(block_src: *const u8, out: &mut [u8; BLOCK_PIXELS]) {
    core::ptr::copy_nonoverlapping(block_src, out.as_mut_ptr(), BLOCK_PIXELS);
}

/// Gathers reference pixels for a block, upsampled to 16 bits.
///
/// Reference order matches the blend pairing: `refs[0]`/`refs[1]` form the
/// first averaged pair, `refs[2]`/`refs[3]` (diagonal cross only) are their
/// mirrors. In symmetric-pair mode the second reference is the negated
/// first offset.
///
/// # Safety
///
/// Every `block_src + pixel + offset` address must stay within the
/// allocated buffer, guard margins included.
#[inline]
pub(crate) unsafe fn gather_refs_high<const SAMPLE_MODE: u8, const INPUT_MODE: u8>(
    block_src: *const u8,
    block: &OffsetBlock,
    stacked_lsb: isize,
    upsample_shift: u32,
    refs: &mut [[u16; BLOCK_PIXELS]; 4],
) {
    let step = pixel_step_bytes(INPUT_MODE);
    for i in 0..BLOCK_PIXELS {
        let pos = i as isize * step;
        let off1 = block.off1[i] as isize;

        refs[0][i] =
            read_sample::<INPUT_MODE>(block_src, pos + off1, stacked_lsb) << upsample_shift;

        if SAMPLE_MODE == 1 {
            refs[1][i] =
                read_sample::<INPUT_MODE>(block_src, pos - off1, stacked_lsb) << upsample_shift;
        } else if SAMPLE_MODE == 2 {
            let off2 = block.off2[i] as isize;
            refs[1][i] =
                read_sample::<INPUT_MODE>(block_src, pos + off2, stacked_lsb) << upsample_shift;
            refs[2][i] =
                read_sample::<INPUT_MODE>(block_src, pos - off1, stacked_lsb) << upsample_shift;
            refs[3][i] =
                read_sample::<INPUT_MODE>(block_src, pos - off2, stacked_lsb) << upsample_shift;
        }
    }
}

/// Gathers reference bytes for a block (8-bit pipeline, low bit depth input).
///
/// # Safety
///
/// Same addressing contract as [`gather_refs_high`].
#[inline]
pub(crate) unsafe fn gather_refs_low<const SAMPLE_MODE: u8>(
    block_src: *const u8,
    block: &OffsetBlock,
    refs: &mut [[u8; BLOCK_PIXELS]; 4],
) {
    for i in 0..BLOCK_PIXELS {
        let pos = i as isize;
        let off1 = block.off1[i] as isize;

        refs[0][i] = *block_src.offset(pos + off1);

        if SAMPLE_MODE == 1 {
            refs[1][i] = *block_src.offset(pos - off1);
        } else if SAMPLE_MODE == 2 {
            let off2 = block.off2[i] as isize;
            refs[1][i] = *block_src.offset(pos + off2);
            refs[2][i] = *block_src.offset(pos - off1);
            refs[3][i] = *block_src.offset(pos - off2);
        }
    }
}
