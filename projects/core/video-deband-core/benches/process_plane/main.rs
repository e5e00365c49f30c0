use core::alloc::Layout;
use criterion::{criterion_group, criterion_main, Criterion};
use safe_allocator_api::RawAlloc;
use video_deband_core::{
    process_plane, PixelDitherInfo, PlaneParams, PrecisionMode, ProcessContext, SampleMode,
};

pub(crate) fn allocate_align_64(num_bytes: usize) -> RawAlloc {
    let layout = Layout::from_size_align(num_bytes, 64).unwrap();
    RawAlloc::new(layout).unwrap()
}

const WIDTH: usize = 1920;
const HEIGHT: usize = 1080;
const PITCH: usize = 2048;
const GUARD_ROWS: usize = 16;
const INFO_STRIDE: usize = 1920;

struct Fixture {
    src: RawAlloc,
    dst: RawAlloc,
    info: Vec<PixelDitherInfo>,
}

impl Fixture {
    fn new() -> Self {
        // Stacked layouts need a second plane below the first; allocate 2x
        // height plus guard margins so every mode can reuse one buffer.
        let plane_bytes = PITCH * (HEIGHT * 2 + GUARD_ROWS * 2);
        let mut src = allocate_align_64(plane_bytes);
        let dst = allocate_align_64(plane_bytes * 2);

        unsafe {
            let base = src.as_mut_ptr();
            for i in 0..plane_bytes {
                // Smooth horizontal gradient, the content debanding exists for.
                *base.add(i) = ((i % PITCH) / 16) as u8;
            }
        }

        let mut state = 0x2545f491u32;
        let info = (0..INFO_STRIDE * HEIGHT)
            .map(|_| {
                state = state.wrapping_mul(1103515245).wrapping_add(12345);
                PixelDitherInfo {
                    ref1: ((state >> 16) % 16) as i8,
                    ref2: ((state >> 20) % 16) as i8,
                    change: ((state >> 8) % 65) as i16 - 32,
                }
            })
            .collect();

        Self { src, dst, info }
    }

    fn params(&mut self) -> PlaneParams {
        PlaneParams {
            src_ptr: unsafe { self.src.as_ptr().add(GUARD_ROWS * PITCH) },
            dst_ptr: unsafe { self.dst.as_mut_ptr().add(GUARD_ROWS * PITCH) },
            src_pitch: PITCH as i32,
            dst_pitch: PITCH as i32,
            width: WIDTH as i32,
            height: HEIGHT as i32,
            width_subsampling: 0,
            height_subsampling: 0,
            input_mode: video_deband_core::InputMode::LowBitDepth,
            input_depth: 8,
            threshold: 10,
            pixel_min: 0,
            pixel_max: 0xffff,
            info_ptr: self.info.as_ptr(),
            info_stride: INFO_STRIDE as i32,
        }
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Deband 1080p plane");
    group.throughput(criterion::Throughput::Bytes((WIDTH * HEIGHT) as u64));

    let mut fixture = Fixture::new();

    for (name, sample_mode) in [
        ("mode1_low", SampleMode::SymmetricPair),
        ("mode2_low", SampleMode::DiagonalCross),
    ] {
        let params = fixture.params();
        // Warm the cache outside the measurement; repeat calls on one
        // plane geometry are the production-shaped workload.
        let context = ProcessContext::new();
        unsafe {
            process_plane(&params, sample_mode, false, PrecisionMode::Low, &context).unwrap()
        };

        group.bench_function(name, |b| {
            b.iter(|| unsafe {
                process_plane(&params, sample_mode, false, PrecisionMode::Low, &context).unwrap()
            })
        });
    }

    // Cold path: offset resolution dominates when the cache is empty.
    {
        let params = fixture.params();
        group.bench_function("mode2_low_cold_cache", |b| {
            b.iter(|| unsafe {
                let context = ProcessContext::new();
                process_plane(
                    &params,
                    SampleMode::DiagonalCross,
                    false,
                    PrecisionMode::Low,
                    &context,
                )
                .unwrap()
            })
        });
    }

    for (name, precision) in [
        ("mode2_high_no_dither", PrecisionMode::HighNoDithering),
        ("mode2_high_ordered", PrecisionMode::HighOrderedDithering),
        ("mode2_high_floyd_steinberg", PrecisionMode::HighFloydSteinberg),
        ("mode2_high_stacked16", PrecisionMode::Stacked16),
    ] {
        let mut params = fixture.params();
        params.threshold = 10 << 8;
        let context = ProcessContext::new();
        unsafe {
            process_plane(
                &params,
                SampleMode::DiagonalCross,
                false,
                precision,
                &context,
            )
            .unwrap()
        };

        group.bench_function(name, |b| {
            b.iter(|| unsafe {
                process_plane(
                    &params,
                    SampleMode::DiagonalCross,
                    false,
                    precision,
                    &context,
                )
                .unwrap()
            })
        });
    }

    // Isolated offset resolution, the cold-cache hot spot.
    {
        use video_deband_core::bench::{resolve_block, OffsetBlock};
        let params = fixture.params();
        let infos = &fixture.info[..16];
        let mut out = OffsetBlock::ZERO;
        group.bench_function("resolve_block_mode2", |b| {
            b.iter(|| {
                resolve_block::<2>(infos, &params, &mut out);
                out.off1[0]
            })
        });
    }

    // Isolated per-pixel blend stages.
    {
        use video_deband_core::bench::blend;
        group.bench_function("blend_pixel_mode0_low", |b| {
            b.iter(|| blend::low_mode0(100, 104, 10))
        });
        group.bench_function("blend_pixel_mode2_low", |b| {
            b.iter(|| blend::low_mode2(100, 10, 3, &[98, 102, 101, 99]))
        });
        group.bench_function("blend_pixel_mode2_high", |b| {
            b.iter(|| blend::high_mode2(100 << 8, 10 << 8, 300, &[98 << 8, 102 << 8, 101 << 8, 99 << 8]))
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}

criterion_main!(benches);
