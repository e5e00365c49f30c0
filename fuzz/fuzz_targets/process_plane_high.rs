#![no_main]

// Fuzzes the 16-bit pipeline across input layouts and output precisions.
// Checks determinism and cold/warm offset cache equivalence; the dithered
// outputs are sequential state machines, so byte equality across runs is the
// strongest cheap oracle available.

use libfuzzer_sys::{arbitrary, fuzz_target};
use video_deband_core::{
    process_plane, InputMode, PixelDitherInfo, PlaneParams, PrecisionMode, ProcessContext,
    SampleMode,
};

const GUARD_ROWS: usize = 16;
const BLOCK: usize = 16;
const MAX_REF: u32 = 8;

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct PlaneCase {
    pub width: u8,
    pub height: u8,
    pub sample_mode: u8,
    pub blur_first: bool,
    pub input_mode: u8,
    pub depth_bits: u8,
    pub precision: u8,
    pub threshold: u16,
    pub content_seed: u32,
    pub info_seed: u32,
}

fn lcg(state: &mut u32) -> u32 {
    *state = state.wrapping_mul(1103515245).wrapping_add(12345);
    *state >> 16
}

fuzz_target!(|case: PlaneCase| {
    let width = 1 + (case.width as usize % 48);
    let height = 1 + (case.height as usize % 12);
    let padded = width.div_ceil(BLOCK) * BLOCK;
    // One pitch serves every layout: interleaved needs two bytes per pixel,
    // the others just get slack columns.
    let pitch = padded * 2;
    // Stacked layouts put a second plane `height` rows below the first.
    let rows = height * 2 + GUARD_ROWS * 2;

    let sample_mode = match case.sample_mode % 3 {
        0 => SampleMode::Vertical,
        1 => SampleMode::SymmetricPair,
        _ => SampleMode::DiagonalCross,
    };
    let input_mode = match case.input_mode % 3 {
        0 => InputMode::LowBitDepth,
        1 => InputMode::HighBitDepthStacked,
        _ => InputMode::HighBitDepthInterleaved,
    };
    let input_depth = match input_mode {
        InputMode::LowBitDepth => 8,
        _ => 9 + (case.depth_bits as u32 % 8),
    };
    let precision = match case.precision % 5 {
        0 => PrecisionMode::HighNoDithering,
        1 => PrecisionMode::HighOrderedDithering,
        2 => PrecisionMode::HighFloydSteinberg,
        3 => PrecisionMode::Stacked16,
        _ => PrecisionMode::Interleaved16,
    };

    let mut content_state = case.content_seed | 1;
    let mut src = vec![0u8; pitch * rows];
    for byte in src.iter_mut() {
        *byte = lcg(&mut content_state) as u8;
    }

    let mut info_state = case.info_seed | 1;
    let info: Vec<PixelDitherInfo> = (0..padded * height)
        .map(|_| PixelDitherInfo {
            ref1: (lcg(&mut info_state) % (MAX_REF + 1)) as i8,
            ref2: (lcg(&mut info_state) % (MAX_REF + 1)) as i8 - (MAX_REF / 2) as i8,
            change: (lcg(&mut info_state) % 1025) as i16 - 512,
        })
        .collect();

    let mut run = |context: &ProcessContext| -> Vec<u8> {
        let mut dst = vec![0u8; pitch * rows];
        let params = PlaneParams {
            src_ptr: unsafe { src.as_ptr().add(GUARD_ROWS * pitch) },
            dst_ptr: unsafe { dst.as_mut_ptr().add(GUARD_ROWS * pitch) },
            src_pitch: pitch as i32,
            dst_pitch: pitch as i32,
            width: width as i32,
            height: height as i32,
            width_subsampling: 0,
            height_subsampling: 0,
            input_mode,
            input_depth,
            threshold: case.threshold,
            pixel_min: 0,
            pixel_max: 0xffff,
            info_ptr: info.as_ptr(),
            info_stride: padded as i32,
        };
        unsafe {
            process_plane(&params, sample_mode, case.blur_first, precision, context).unwrap();
        }
        dst
    };

    let context = ProcessContext::new();
    let cold = run(&context);
    let warm = run(&context);
    let fresh = run(&ProcessContext::new());

    assert_eq!(cold, warm, "warm cache changed the output");
    assert_eq!(cold, fresh, "independent contexts disagree");
});
