//! Common test imports and utilities for the kernel tests
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.

// External crates commonly used in tests
pub use rstest::rstest;

// Core functionality from this crate
pub use crate::allocate::allocate_align_64;
pub use crate::context::ProcessContext;
pub use crate::pixel_info::PixelDitherInfo;
pub use crate::plane::{InputMode, PlaneParams, PrecisionMode, SampleMode, BLOCK_PIXELS};
pub use crate::process::process_plane;

pub use alloc::vec::Vec;
pub use safe_allocator_api::RawAlloc;

/// Guard rows above and below every test plane. Reference offsets in tests
/// stay well inside this margin.
pub(crate) const GUARD_ROWS: usize = 8;

/// A plane buffer with guard margins and room for a stacked LSB plane
/// (2x the logical height), matching the frame allocator contract the
/// kernel relies on.
pub(crate) struct TestPlane {
    alloc: RawAlloc,
    pub(crate) pitch: usize,
}

impl TestPlane {
    pub(crate) fn filled(pitch: usize, height: usize, fill: u8) -> Self {
        let rows = height * 2 + GUARD_ROWS * 2;
        let mut alloc = allocate_align_64(pitch * rows).unwrap();
        unsafe { core::ptr::write_bytes(alloc.as_mut_ptr(), fill, pitch * rows) };
        Self { alloc, pitch }
    }

    /// Top-left pixel of the logical plane.
    pub(crate) fn origin(&self) -> *const u8 {
        unsafe { self.alloc.as_ptr().add(GUARD_ROWS * self.pitch) }
    }

    pub(crate) fn origin_mut(&mut self) -> *mut u8 {
        unsafe { self.alloc.as_mut_ptr().add(GUARD_ROWS * self.pitch) }
    }

    pub(crate) fn get(&self, row: usize, col: usize) -> u8 {
        unsafe { *self.origin().add(row * self.pitch + col) }
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: u8) {
        unsafe { *self.origin_mut().add(row * self.pitch + col) = value }
    }

    /// Copies the logical `width x height` region out for comparisons.
    pub(crate) fn logical(&self, width: usize, height: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                out.push(self.get(row, col));
            }
        }
        out
    }
}

/// Fills the logical region with a deterministic per-position pattern so
/// planes of different pitch hold identical logical content.
pub(crate) fn fill_logical_pattern(plane: &mut TestPlane, width: usize, height: usize, seed: u32) {
    for row in 0..height {
        for col in 0..width {
            let mixed = (row as u32)
                .wrapping_mul(31)
                .wrapping_add(col as u32)
                .wrapping_mul(2654435761)
                .wrapping_add(seed);
            plane.set(row, col, (mixed >> 24) as u8);
        }
    }
}

/// An info table with the same record at every pixel position.
pub(crate) fn uniform_info(
    stride: usize,
    rows: usize,
    ref1: i8,
    ref2: i8,
    change: i16,
) -> Vec<PixelDitherInfo> {
    alloc::vec![PixelDitherInfo { ref1, ref2, change }; stride * rows]
}

/// A deterministic pseudo-random info table. `ref1` stays non-negative and
/// within `max_ref` (required by symmetric-pair mode).
pub(crate) fn varied_info(
    stride: usize,
    rows: usize,
    seed: u32,
    max_ref: i8,
) -> Vec<PixelDitherInfo> {
    let mut state = seed | 1;
    let mut next = move || {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        state >> 16
    };
    (0..stride * rows)
        .map(|_| {
            let span = max_ref as u32 + 1;
            PixelDitherInfo {
                ref1: (next() % span) as i8,
                ref2: (next() % span) as i8 - max_ref / 2,
                change: (next() % 129) as i16 - 64,
            }
        })
        .collect()
}

/// Params with sane defaults for an 8-bit plane; tests override what they
/// exercise.
pub(crate) fn params_for(
    src: &TestPlane,
    dst: &mut TestPlane,
    width: i32,
    height: i32,
    info: &[PixelDitherInfo],
    info_stride: i32,
) -> PlaneParams {
    PlaneParams {
        src_ptr: src.origin(),
        dst_ptr: dst.origin_mut(),
        src_pitch: src.pitch as i32,
        dst_pitch: dst.pitch as i32,
        width,
        height,
        width_subsampling: 0,
        height_subsampling: 0,
        input_mode: InputMode::LowBitDepth,
        input_depth: 8,
        threshold: 10,
        pixel_min: 0,
        pixel_max: 0xffff,
        info_ptr: info.as_ptr(),
        info_stride,
    }
}

/// Geometry-only params (null buffers) for tests that never dereference.
pub(crate) fn flat_plane_params(width: i32, height: i32, pitch: i32) -> PlaneParams {
    PlaneParams {
        src_ptr: core::ptr::null(),
        dst_ptr: core::ptr::null_mut(),
        src_pitch: pitch,
        dst_pitch: pitch,
        width,
        height,
        width_subsampling: 0,
        height_subsampling: 0,
        input_mode: InputMode::LowBitDepth,
        input_depth: 8,
        threshold: 10,
        pixel_min: 0,
        pixel_max: 0xffff,
        info_ptr: core::ptr::null(),
        info_stride: ((width as u32).div_ceil(BLOCK_PIXELS as u32) * BLOCK_PIXELS as u32) as i32,
    }
}
