//! The per-plane outer loop.
//!
//! Walks the plane row-major in 16-pixel blocks. Per block: load (or
//! resolve) the offset record, gather source and reference samples, run the
//! blend pipeline, convert and store. The walk order is load-bearing:
//! error-diffusion dithering is sequential, so rows advance top to bottom
//! and blocks left to right, and a single dithered plane call is never
//! internally parallel.
//!
//! Cache lifecycle per call: a warm context with matching pitch feeds the
//! hot path; an empty context gets a candidate stream built alongside the
//! first pass and installed at plane end; a warm context with a *different*
//! pitch is bypassed for the call (pitch that changed once is likely to
//! change again — rebuilding would thrash).

use super::blend_high;
use super::blend_low;
use super::offsets::{resolve_block, OffsetBlock};
use super::output;
use super::reference;
use super::{
    IM_INTERLEAVED, IM_LOW, IM_STACKED, PM_HIGH_FLOYD_STEINBERG, PM_INTERLEAVED16, PM_LOW,
    PM_STACKED16,
};
use crate::allocate::{allocate_align_64, AllocateError};
use crate::context::{OffsetCache, ProcessContext};
use crate::dither::ErrorDiffusion;
use crate::plane::{InputMode, PlaneParams, BLOCK_PIXELS};
use alloc::boxed::Box;
use likely_stable::likely;

/// Derived per-call constants, computed once before the loop.
struct Derived {
    threshold: u16,
    clamp8: Option<(u8, u8)>,
    clamp16: Option<(u16, u16)>,
    upsample_shift: u32,
    /// MSB -> LSB plane distance in the source (stacked input).
    src_lsb_offset: isize,
    /// MSB -> LSB plane distance in the destination (stacked output).
    dst_lsb_offset: isize,
}

/// Fully specialized plane processor; one instantiation exists per
/// `(sample mode, blur-first, precision)` combination so the per-pixel code
/// never branches on those flags.
///
/// # Safety
///
/// See [`process_plane`](super::process_plane); this function additionally
/// assumes the mode constants have already been validated by the dispatch.
pub(crate) unsafe fn process_plane_impl<
    const SAMPLE_MODE: u8,
    const BLUR_FIRST: bool,
    const PRECISION: u8,
>(
    params: &PlaneParams,
    context: &ProcessContext,
) -> Result<(), AllocateError> {
    if params.width <= 0 || params.height <= 0 {
        return Ok(());
    }

    debug_assert!(params.info_stride >= params.width);
    debug_assert!((params.info_stride as usize).is_multiple_of(BLOCK_PIXELS));
    debug_assert!((8..=16).contains(&params.input_depth));
    if PRECISION == PM_LOW {
        // The 8-bit pipeline never upsamples.
        debug_assert_eq!(params.input_mode, InputMode::LowBitDepth);
        debug_assert_eq!(params.input_depth, 8);
    }

    let height = params.height as usize;
    let blocks_per_row = params.blocks_per_row();
    let padded_width = blocks_per_row * BLOCK_PIXELS;
    let total_blocks = blocks_per_row * height;

    // Cache bookkeeping. Exactly one of the three states is active for the
    // whole call: read from the installed stream, build a candidate stream,
    // or resolve into stack scratch.
    let mut use_cache = false;
    let mut read_ptr: *const OffsetBlock = core::ptr::null();
    let mut build_ptr: *mut OffsetBlock = core::ptr::null_mut();
    let mut building = None;
    let mut alloc_failure = None;

    if let Some(cache) = context.cached() {
        if cache.pitch == params.src_pitch {
            use_cache = true;
            read_ptr = cache.blocks();
        }
    } else {
        match allocate_align_64(total_blocks * core::mem::size_of::<OffsetBlock>()) {
            Ok(mut stream) => {
                build_ptr = stream.as_mut_ptr() as *mut OffsetBlock;
                building = Some(stream);
            }
            // Recoverable: process uncached, report the failure at the end.
            Err(error) => alloc_failure = Some(error),
        }
    }

    let derived = Derived {
        threshold: params.threshold,
        clamp16: params
            .need_clamping()
            .then_some((params.pixel_min, params.pixel_max)),
        clamp8: params
            .need_clamping()
            .then_some(((params.pixel_min >> 8) as u8, (params.pixel_max >> 8) as u8)),
        upsample_shift: params.upsample_shift(),
        src_lsb_offset: params.src_pitch as isize * params.height as isize,
        dst_lsb_offset: params.dst_pitch as isize * params.height as isize,
    };

    let src_block_step = params.input_mode.pixel_step() as usize * BLOCK_PIXELS;
    let dst_block_step = match PRECISION {
        PM_INTERLEAVED16 => 2 * BLOCK_PIXELS,
        _ => BLOCK_PIXELS,
    };

    let mut diffusion = if PRECISION == PM_HIGH_FLOYD_STEINBERG {
        ErrorDiffusion::new(padded_width)
    } else {
        ErrorDiffusion::disabled()
    };

    let mut scratch = OffsetBlock::ZERO;

    for row in 0..height {
        let mut src_px = params.src_ptr.offset(params.src_pitch as isize * row as isize);
        let mut dst_px = params.dst_ptr.offset(params.dst_pitch as isize * row as isize);
        let info_row = params
            .info_ptr
            .offset(params.info_stride as isize * row as isize);

        for block_index in 0..blocks_per_row {
            let column = block_index * BLOCK_PIXELS;

            let block: &OffsetBlock = if likely(use_cache) {
                let cached = &*read_ptr;
                read_ptr = read_ptr.add(1);
                cached
            } else {
                let slot: &mut OffsetBlock = if !build_ptr.is_null() {
                    let slot = &mut *build_ptr;
                    build_ptr = build_ptr.add(1);
                    slot
                } else {
                    &mut scratch
                };
                let infos = core::slice::from_raw_parts(info_row.add(column), BLOCK_PIXELS);
                resolve_block::<SAMPLE_MODE>(infos, params, slot);
                slot
            };

            if PRECISION == PM_LOW {
                process_block_low::<SAMPLE_MODE, BLUR_FIRST>(src_px, dst_px, block, &derived);
            } else {
                process_block_high::<SAMPLE_MODE, BLUR_FIRST, PRECISION>(
                    params.input_mode,
                    src_px,
                    dst_px,
                    block,
                    &derived,
                    row,
                    column,
                    &mut diffusion,
                );
            }

            src_px = src_px.add(src_block_step);
            dst_px = dst_px.add(dst_block_step);
        }

        if PRECISION == PM_HIGH_FLOYD_STEINBERG {
            diffusion.advance_row();
        }
    }

    // Install after all data is processed so concurrent callers only ever
    // observe a complete stream. Losing the install race just drops our
    // candidate.
    if let Some(stream) = building {
        context.install(Box::new(OffsetCache::new(params.src_pitch, stream)));
    }

    match alloc_failure {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// One block through the 8-bit pipeline.
#[inline(always)]
unsafe fn process_block_low<const SAMPLE_MODE: u8, const BLUR_FIRST: bool>(
    src_px: *const u8,
    dst_px: *mut u8,
    block: &OffsetBlock,
    derived: &Derived,
) {
    let mut src = [0u8; BLOCK_PIXELS];
    reference::read_src_low(src_px, &mut src);

    let mut refs = [[0u8; BLOCK_PIXELS]; 4];
    reference::gather_refs_low::<SAMPLE_MODE>(src_px, block, &mut refs);

    let threshold = derived.threshold as u8;
    let mut out = [0u8; BLOCK_PIXELS];
    for i in 0..BLOCK_PIXELS {
        out[i] = if SAMPLE_MODE == 0 {
            blend_low::process_pixel_mode0(src[i], refs[0][i], threshold)
        } else {
            let pixel_refs = [refs[0][i], refs[1][i], refs[2][i], refs[3][i]];
            // The cache stream keeps full-width grain; this path saturates
            // it into the signed 8-bit domain.
            let change = block.change[i].clamp(i8::MIN as i16, i8::MAX as i16) as i8;
            blend_low::process_pixel_mode12::<SAMPLE_MODE, BLUR_FIRST>(
                src[i],
                threshold,
                change,
                &pixel_refs,
                derived.clamp8,
            )
        };
    }

    output::store_block_low(&out, dst_px);
}

/// One block through the 16-bit pipeline.
#[allow(clippy::too_many_arguments)]
#[inline(always)]
unsafe fn process_block_high<const SAMPLE_MODE: u8, const BLUR_FIRST: bool, const PRECISION: u8>(
    input_mode: InputMode,
    src_px: *const u8,
    dst_px: *mut u8,
    block: &OffsetBlock,
    derived: &Derived,
    row: usize,
    column: usize,
    diffusion: &mut ErrorDiffusion,
) {
    let mut src = [0u16; BLOCK_PIXELS];
    let mut refs = [[0u16; BLOCK_PIXELS]; 4];

    // The input layout is data-dependent (it can differ between planes of
    // one clip), so it is resolved per block rather than per call.
    match input_mode {
        InputMode::LowBitDepth => {
            reference::read_src_high::<IM_LOW>(
                src_px,
                derived.src_lsb_offset,
                derived.upsample_shift,
                &mut src,
            );
            reference::gather_refs_high::<SAMPLE_MODE, IM_LOW>(
                src_px,
                block,
                derived.src_lsb_offset,
                derived.upsample_shift,
                &mut refs,
            );
        }
        InputMode::HighBitDepthStacked => {
            reference::read_src_high::<IM_STACKED>(
                src_px,
                derived.src_lsb_offset,
                derived.upsample_shift,
                &mut src,
            );
            reference::gather_refs_high::<SAMPLE_MODE, IM_STACKED>(
                src_px,
                block,
                derived.src_lsb_offset,
                derived.upsample_shift,
                &mut refs,
            );
        }
        InputMode::HighBitDepthInterleaved => {
            reference::read_src_high::<IM_INTERLEAVED>(
                src_px,
                derived.src_lsb_offset,
                derived.upsample_shift,
                &mut src,
            );
            reference::gather_refs_high::<SAMPLE_MODE, IM_INTERLEAVED>(
                src_px,
                block,
                derived.src_lsb_offset,
                derived.upsample_shift,
                &mut refs,
            );
        }
    }

    let mut out = [0u16; BLOCK_PIXELS];
    for i in 0..BLOCK_PIXELS {
        out[i] = if SAMPLE_MODE == 0 {
            blend_high::process_pixel_mode0(src[i], refs[0][i], derived.threshold)
        } else {
            let pixel_refs = [refs[0][i], refs[1][i], refs[2][i], refs[3][i]];
            blend_high::process_pixel_mode12::<SAMPLE_MODE, BLUR_FIRST>(
                src[i],
                derived.threshold,
                block.change[i],
                &pixel_refs,
            )
        };
    }

    match PRECISION {
        PM_STACKED16 => {
            output::store_block_stacked(&out, dst_px, derived.dst_lsb_offset, derived.clamp16)
        }
        PM_INTERLEAVED16 => output::store_block_interleaved(&out, dst_px, derived.clamp16),
        _ => output::store_block_high_to_8bit::<PRECISION>(
            &out,
            dst_px,
            row,
            column,
            diffusion,
            derived.clamp8,
        ),
    }
}
