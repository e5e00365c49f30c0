//! The debanding kernel: per-plane entry point and mode dispatch.
//!
//! The hot loop must never branch per pixel on the call-time mode flags, so
//! [`process_plane`] resolves `(sample mode, blur-first, precision)` exactly
//! once into a fully monomorphized instantiation of
//! [`plane_loop::process_plane_impl`]. The input storage layout is the only
//! flag resolved later (per block), since it is plane-data dependent and
//! cheap to test at that granularity.

pub(crate) mod blend_high;
pub(crate) mod blend_low;
pub mod offsets;
pub(crate) mod output;
pub(crate) mod plane_loop;
pub(crate) mod reference;

use crate::allocate::AllocateError;
use crate::context::ProcessContext;
use crate::plane::{InputMode, PlaneParams, PrecisionMode, SampleMode};
use plane_loop::process_plane_impl;

// Mode discriminants used as const-generic parameters. Keeping them as
// plain `u8` lets one generic implementation cover every combination
// without a trait per axis.
pub(crate) const IM_LOW: u8 = InputMode::LowBitDepth as u8;
pub(crate) const IM_STACKED: u8 = InputMode::HighBitDepthStacked as u8;
pub(crate) const IM_INTERLEAVED: u8 = InputMode::HighBitDepthInterleaved as u8;

pub(crate) const PM_LOW: u8 = PrecisionMode::Low as u8;
pub(crate) const PM_HIGH_NO_DITHERING: u8 = PrecisionMode::HighNoDithering as u8;
pub(crate) const PM_HIGH_ORDERED: u8 = PrecisionMode::HighOrderedDithering as u8;
pub(crate) const PM_HIGH_FLOYD_STEINBERG: u8 = PrecisionMode::HighFloydSteinberg as u8;
pub(crate) const PM_STACKED16: u8 = PrecisionMode::Stacked16 as u8;
pub(crate) const PM_INTERLEAVED16: u8 = PrecisionMode::Interleaved16 as u8;

/// Debands one plane.
///
/// Runs the full pipeline for every pixel: resolve (or load cached)
/// reference offsets, gather references, threshold/blend, apply grain,
/// convert to the output precision and store. Deterministic: identical
/// inputs produce byte-identical output whether or not the context cache
/// is warm.
///
/// `Err` is only returned when allocating the derived-offset cache failed;
/// the plane has still been fully processed (uncached) in that case, so
/// callers may treat the error as a performance warning.
///
/// # Safety
///
/// - `params.src_ptr`/`params.dst_ptr` must point to plane buffers of at
///   least `pitch * height` bytes (`pitch * height * 2` for stacked
///   layouts), surrounded by guard margins large enough to absorb every
///   resolved reference offset and the tail of a partial final block.
/// - `params.info_ptr` must hold `info_stride * height` records.
/// - Source and destination must not overlap.
/// - A context must only be reused across calls with identical plane
///   dimensions and subsampling; pitch may vary.
pub unsafe fn process_plane(
    params: &PlaneParams,
    sample_mode: SampleMode,
    blur_first: bool,
    precision_mode: PrecisionMode,
    context: &ProcessContext,
) -> Result<(), AllocateError> {
    macro_rules! with_precision {
        ($sample_mode:literal, $blur_first:literal) => {
            match precision_mode {
                PrecisionMode::Low => {
                    process_plane_impl::<$sample_mode, $blur_first, PM_LOW>(params, context)
                }
                PrecisionMode::HighNoDithering => process_plane_impl::<
                    $sample_mode,
                    $blur_first,
                    PM_HIGH_NO_DITHERING,
                >(params, context),
                PrecisionMode::HighOrderedDithering => {
                    process_plane_impl::<$sample_mode, $blur_first, PM_HIGH_ORDERED>(
                        params, context,
                    )
                }
                PrecisionMode::HighFloydSteinberg => process_plane_impl::<
                    $sample_mode,
                    $blur_first,
                    PM_HIGH_FLOYD_STEINBERG,
                >(params, context),
                PrecisionMode::Stacked16 => {
                    process_plane_impl::<$sample_mode, $blur_first, PM_STACKED16>(params, context)
                }
                PrecisionMode::Interleaved16 => {
                    process_plane_impl::<$sample_mode, $blur_first, PM_INTERLEAVED16>(
                        params, context,
                    )
                }
            }
        };
    }

    // Vertical mode has a single reference; blur-first is meaningless there
    // and collapses to one instantiation.
    match (sample_mode, blur_first) {
        (SampleMode::Vertical, _) => with_precision!(0, false),
        (SampleMode::SymmetricPair, false) => with_precision!(1, false),
        (SampleMode::SymmetricPair, true) => with_precision!(1, true),
        (SampleMode::DiagonalCross, false) => with_precision!(2, false),
        (SampleMode::DiagonalCross, true) => with_precision!(2, true),
    }
}
