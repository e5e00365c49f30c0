//! Benchmark functions re-exported for external benchmarks.
//!
//! This module re-exposes internal kernel stages that are `pub(crate)` in
//! normal builds so that external benchmarks can measure them in isolation
//! when the `bench` feature is enabled.
#![allow(clippy::missing_safety_doc)]
#![cfg(not(tarpaulin_include))]

pub use crate::process::offsets::{resolve_block, OffsetBlock};

pub mod blend {
    //! Per-pixel blend stage wrappers.

    pub fn low_mode0(src: u8, reference: u8, threshold: u8) -> u8 {
        crate::process::blend_low::process_pixel_mode0(src, reference, threshold)
    }

    pub fn low_mode2(src: u8, threshold: u8, change: i8, refs: &[u8; 4]) -> u8 {
        crate::process::blend_low::process_pixel_mode12::<2, false>(
            src, threshold, change, refs, None,
        )
    }

    pub fn high_mode2(src: u16, threshold: u16, change: i16, refs: &[u16; 4]) -> u16 {
        crate::process::blend_high::process_pixel_mode12::<2, false>(src, threshold, change, refs)
    }
}
