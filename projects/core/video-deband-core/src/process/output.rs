//! Precision conversion and destination stores.
//!
//! The blend pipeline produces 16-bit internal values; this module converts
//! them to the configured output storage. All 8-bit outputs share one
//! truncating `>> 8` conversion — the dithering transforms adjust the value
//! beforehand so the shift itself never branches on the mode.

use super::blend_high;
use super::{PM_HIGH_FLOYD_STEINBERG, PM_HIGH_ORDERED};
use crate::dither::{ordered, ErrorDiffusion};
use crate::plane::BLOCK_PIXELS;

/// Stores one block of 8-bit pipeline output.
///
/// # Safety
///
/// `dst` must be writable for [`BLOCK_PIXELS`] bytes (guard bytes may take
/// the tail of a partial block).
#[inline]
pub(crate) unsafe fn store_block_low(values: &[u8; BLOCK_PIXELS], dst: *mut u8) {
    core::ptr::copy_nonoverlapping(values.as_ptr(), dst, BLOCK_PIXELS);
}

/// Converts one block of 16-bit values to 8-bit output, applying the
/// dithering transform selected by `PRECISION`.
///
/// # Safety
///
/// `dst` must be writable for [`BLOCK_PIXELS`] bytes.
#[inline]
pub(crate) unsafe fn store_block_high_to_8bit<const PRECISION: u8>(
    values: &[u16; BLOCK_PIXELS],
    dst: *mut u8,
    row: usize,
    column: usize,
    diffusion: &mut ErrorDiffusion,
    clamp: Option<(u8, u8)>,
) {
    for (i, &value) in values.iter().enumerate() {
        let adjusted = match PRECISION {
            PM_HIGH_ORDERED => ordered::adjust(value, row, column + i),
            PM_HIGH_FLOYD_STEINBERG => diffusion.apply(value, column + i),
            _ => value,
        };

        let mut out = (adjusted >> 8) as u8;
        if let Some((lo, hi)) = clamp {
            out = out.clamp(lo, hi);
        }
        *dst.add(i) = out;
    }
}

/// Stores one block as stacked 16-bit output: MSB bytes into the primary
/// plane, LSB bytes into the plane `lsb_plane_offset` bytes below.
///
/// # Safety
///
/// `dst` and `dst + lsb_plane_offset` must each be writable for
/// [`BLOCK_PIXELS`] bytes.
#[inline]
pub(crate) unsafe fn store_block_stacked(
    values: &[u16; BLOCK_PIXELS],
    dst: *mut u8,
    lsb_plane_offset: isize,
    clamp: Option<(u16, u16)>,
) {
    for (i, &value) in values.iter().enumerate() {
        let value = match clamp {
            Some((lo, hi)) => blend_high::clamp_pixel(value, lo, hi),
            None => value,
        };
        *dst.add(i) = (value >> 8) as u8;
        *dst.add(i).offset(lsb_plane_offset) = (value & 0xff) as u8;
    }
}

/// Stores one block as interleaved little-endian 16-bit output
/// (32 destination bytes).
///
/// # Safety
///
/// `dst` must be writable for `2 * BLOCK_PIXELS` bytes.
#[inline]
pub(crate) unsafe fn store_block_interleaved(
    values: &[u16; BLOCK_PIXELS],
    dst: *mut u8,
    clamp: Option<(u16, u16)>,
) {
    for (i, &value) in values.iter().enumerate() {
        let value = match clamp {
            Some((lo, hi)) => blend_high::clamp_pixel(value, lo, hi),
            None => value,
        };
        let bytes = value.to_le_bytes();
        *dst.add(i * 2) = bytes[0];
        *dst.add(i * 2 + 1) = bytes[1];
    }
}
