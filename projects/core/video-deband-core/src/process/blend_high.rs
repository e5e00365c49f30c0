//! Threshold/blend decision, 16-bit pipeline.
//!
//! Polarity note: masks here mean "within threshold, blend toward the
//! average" and combine with AND — *all* references must sit within the
//! threshold for the pixel to blend. This is the inverse of the 8-bit path,
//! which ORs "out of threshold, keep the original" masks. The duality is
//! deliberate (the representations differ in how cheaply each comparison
//! can be formed); keep the polarities separate.

/// Absolute difference without a signed widening: saturating subtraction in
/// both directions, OR-combined (one side is always zero).
#[inline(always)]
fn absolute_difference(a: u16, b: u16) -> u16 {
    a.saturating_sub(b) | b.saturating_sub(a)
}

/// Within-threshold test: strictly `threshold > |a - b|`.
#[inline(always)]
fn within_threshold(a: u16, b: u16, threshold: u16) -> bool {
    threshold > absolute_difference(a, b)
}

/// Rounding average, matching `PAVGW` semantics: `(a + b + 1) >> 1`.
#[inline(always)]
fn avg_round(a: u16, b: u16) -> u16 {
    ((a as u32 + b as u32 + 1) >> 1) as u16
}

/// Adds the grain value in the signed 16-bit domain with saturation.
#[inline(always)]
fn add_change_saturating(value: u16, change: i16) -> u16 {
    let biased = (value ^ 0x8000) as i16;
    (biased.saturating_add(change) as u16) ^ 0x8000
}

/// Output clamp: `min(max(v, lo), hi)`. Idempotent.
#[inline(always)]
pub(crate) fn clamp_pixel(value: u16, lo: u16, hi: u16) -> u16 {
    value.clamp(lo, hi)
}

/// Vertical mode (mode 0) on 16-bit values: one reference, no grain.
///
/// Within the threshold the reference replaces the source, otherwise the
/// source is kept — the same decision the 8-bit path makes, expressed in
/// this path's polarity.
#[inline(always)]
pub(crate) fn process_pixel_mode0(src: u16, reference: u16, threshold: u16) -> u16 {
    if within_threshold(src, reference, threshold) {
        reference
    } else {
        src
    }
}

/// Symmetric-pair / diagonal-cross blend (modes 1 and 2) on 16-bit values.
#[inline(always)]
pub(crate) fn process_pixel_mode12<const SAMPLE_MODE: u8, const BLUR_FIRST: bool>(
    src: u16,
    threshold: u16,
    change: i16,
    refs: &[u16; 4],
) -> u16 {
    let mut blend = true;
    if !BLUR_FIRST {
        blend = within_threshold(src, refs[0], threshold)
            && within_threshold(src, refs[1], threshold);
    }

    let mut avg = avg_round(refs[0], refs[1]);

    if SAMPLE_MODE == 2 {
        if !BLUR_FIRST {
            blend = blend
                && within_threshold(src, refs[2], threshold)
                && within_threshold(src, refs[3], threshold);
        }
        avg = avg.saturating_sub(1);
        avg = avg_round(avg, avg_round(refs[2], refs[3]));
    }

    if BLUR_FIRST {
        blend = within_threshold(src, avg, threshold);
    }

    let selected = if blend { avg } else { src };
    add_change_saturating(selected, change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(110 << 8, 100 << 8, 10 << 8, 110 << 8)] // diff == threshold: keep
    #[case(110 << 8, 100 << 8, (10 << 8) + 1, 100 << 8)] // within: take reference
    fn mode0_threshold_boundary(
        #[case] src: u16,
        #[case] reference: u16,
        #[case] threshold: u16,
        #[case] expected: u16,
    ) {
        assert_eq!(process_pixel_mode0(src, reference, threshold), expected);
    }

    #[test]
    fn all_references_must_be_within_threshold_to_blend() {
        let src = 100 << 8;
        // Second reference far away: AND of within-masks fails, source kept.
        let refs = [src + 10, src + 5000, 0, 0];
        let out = process_pixel_mode12::<1, false>(src, 256, 0, &refs);
        assert_eq!(out, src);

        // Both close: blends to the rounding average.
        let refs = [src + 10, src - 10, 0, 0];
        let out = process_pixel_mode12::<1, false>(src, 256, 0, &refs);
        assert_eq!(out, src); // avg of src±10 rounds back to src
    }

    #[test]
    fn polarity_matches_low_path_outcome() {
        // Same scenario as the low path's "any far reference keeps source":
        // the AND-of-within formulation must reach the identical decision.
        let src = 100 << 8;
        let refs = [(101 << 8), (200 << 8), 0, 0];
        let out = process_pixel_mode12::<1, false>(src, 10 << 8, 0, &refs);
        assert_eq!(out, src);
    }

    #[test]
    fn mode2_average_subtracts_rounding_bias_once() {
        let refs = [10 << 8, 20 << 8, 30 << 8, 40 << 8];
        // blur_first with a huge threshold always blends.
        let out = process_pixel_mode12::<2, true>(0, u16::MAX, 0, &refs);
        let first = avg_round(10 << 8, 20 << 8).saturating_sub(1);
        let expected = avg_round(first, avg_round(30 << 8, 40 << 8));
        assert_eq!(out, expected);
    }

    #[rstest]
    #[case(0xff00, 0x7fff, 0xffff)] // saturates at the top of the range
    #[case(0x0100, -0x7fff, 0x0000)] // saturates at the bottom
    #[case(0x8000, 0x0100, 0x8100)]
    fn change_saturates(#[case] value: u16, #[case] change: i16, #[case] expected: u16) {
        let refs = [value, value, 0, 0];
        let out = process_pixel_mode12::<1, false>(value, u16::MAX, change, &refs);
        assert_eq!(out, expected);
    }

    #[test]
    fn clamp_is_idempotent() {
        for v in (0..=0xffffu16).step_by(257) {
            let once = clamp_pixel(v, 16 << 8, 235 << 8);
            assert_eq!(clamp_pixel(once, 16 << 8, 235 << 8), once);
        }
    }
}
