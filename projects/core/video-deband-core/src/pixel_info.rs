//! Per-pixel reference offset and grain metadata.
//!
//! One [`PixelDitherInfo`] record exists for every output pixel position.
//! The records are produced once per plane geometry by the embedding
//! filter's seeding stage (pseudo-random, out of scope here) and are
//! read-only to the kernel.

/// Pre-seeded reference offsets and grain value for one pixel position.
///
/// The meaning of `ref1`/`ref2` depends on the [`SampleMode`]:
///
/// - [`SampleMode::Vertical`]: `ref1` is a signed row offset, `ref2` unused.
/// - [`SampleMode::SymmetricPair`]: `ref1` is a non-negative row offset; the
///   second reference is its mirror.
/// - [`SampleMode::DiagonalCross`]: `ref1`/`ref2` are the signed column/row
///   components of the first diagonal; the remaining three references are
///   derived by rotation and mirroring.
///
/// `change` is the signed grain value added after blending. The low
/// precision path saturates it into the signed 8-bit range.
///
/// [`SampleMode`]: crate::SampleMode
/// [`SampleMode::Vertical`]: crate::SampleMode::Vertical
/// [`SampleMode::SymmetricPair`]: crate::SampleMode::SymmetricPair
/// [`SampleMode::DiagonalCross`]: crate::SampleMode::DiagonalCross
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelDitherInfo {
    /// First signed reference offset component.
    pub ref1: i8,
    /// Second signed reference offset component (diagonal cross mode only).
    pub ref2: i8,
    /// Signed grain value, applied after blending with saturation.
    pub change: i16,
}

const _: () = assert!(core::mem::size_of::<PixelDitherInfo>() == 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout_is_stable() {
        // The info table is shared with the external seeding stage as a flat
        // buffer, so field offsets are part of the contract.
        assert_eq!(core::mem::offset_of!(PixelDitherInfo, ref1), 0);
        assert_eq!(core::mem::offset_of!(PixelDitherInfo, ref2), 1);
        assert_eq!(core::mem::offset_of!(PixelDitherInfo, change), 2);
    }
}
