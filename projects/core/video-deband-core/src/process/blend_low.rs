//! Threshold/blend decision, 8-bit pipeline.
//!
//! Polarity note: this path computes "out of threshold" masks and combines
//! them with OR — if *any* reference differs from the source by at least the
//! threshold, the original pixel is kept. The 16-bit path in
//! [`blend_high`](super::blend_high) computes the inverted "within
//! threshold" mask and combines with AND. The two are logical duals and both
//! correct for their representation; do not "unify" them without flipping
//! one polarity.

use likely_stable::unlikely;

/// `min(|a - b|, limit)`.
///
/// Clamping lets the threshold test become an equality test: a difference at
/// or above the threshold clamps to exactly the threshold.
#[inline(always)]
fn clamped_absolute_difference(a: u8, b: u8, limit: u8) -> u8 {
    a.abs_diff(b).min(limit)
}

/// Rounding average, matching `PAVGB` semantics: `(a + b + 1) >> 1`.
#[inline(always)]
fn avg_round(a: u8, b: u8) -> u8 {
    ((a as u16 + b as u16 + 1) >> 1) as u8
}

/// Adds the grain value in the signed 8-bit domain with saturation.
#[inline(always)]
fn add_change_saturating(value: u8, change: i8) -> u8 {
    // Bias to signed, saturating add, bias back.
    let biased = (value ^ 0x80) as i8;
    (biased.saturating_add(change) as u8) ^ 0x80
}

/// Output clamp: `min(max(v, lo), hi)`. Idempotent.
#[inline(always)]
pub(crate) fn clamp_pixel(value: u8, lo: u8, hi: u8) -> u8 {
    value.clamp(lo, hi)
}

/// Vertical mode (mode 0): one reference, no grain, no clamp.
///
/// Keeps the source when `|src - ref| >= threshold`, otherwise takes the
/// reference outright.
#[inline(always)]
pub(crate) fn process_pixel_mode0(src: u8, reference: u8, threshold: u8) -> u8 {
    let difference = clamped_absolute_difference(src, reference, threshold);
    if unlikely(difference == threshold) {
        src
    } else {
        reference
    }
}

/// Symmetric-pair / diagonal-cross blend (modes 1 and 2).
///
/// `refs[0..reference_count]` must be populated per the gather ordering.
#[inline(always)]
pub(crate) fn process_pixel_mode12<const SAMPLE_MODE: u8, const BLUR_FIRST: bool>(
    src: u8,
    threshold: u8,
    change: i8,
    refs: &[u8; 4],
    clamp: Option<(u8, u8)>,
) -> u8 {
    #[inline(always)]
    fn out_of_threshold(src: u8, reference: u8, threshold: u8) -> bool {
        clamped_absolute_difference(src, reference, threshold) == threshold
    }

    let mut keep_original = false;
    if !BLUR_FIRST {
        keep_original = out_of_threshold(src, refs[0], threshold)
            || out_of_threshold(src, refs[1], threshold);
    }

    let mut avg = avg_round(refs[0], refs[1]);

    if SAMPLE_MODE == 2 {
        if !BLUR_FIRST {
            keep_original = keep_original
                || out_of_threshold(src, refs[2], threshold)
                || out_of_threshold(src, refs[3], threshold);
        }
        // The rounding average adds 1 before shifting; subtract 1 from the
        // larger pair average to stay consistent with the scalar reference.
        let avg2_tmp = avg_round(refs[2], refs[3]);
        let avg2 = avg.min(avg2_tmp);
        let avg_hi = avg.max(avg2_tmp).saturating_sub(1);
        avg = avg_round(avg_hi, avg2);
    }

    if BLUR_FIRST {
        keep_original = out_of_threshold(src, avg, threshold);
    }

    let selected = if keep_original { src } else { avg };
    let changed = add_change_saturating(selected, change);

    match clamp {
        Some((lo, hi)) => clamp_pixel(changed, lo, hi),
        None => changed,
    }
}
