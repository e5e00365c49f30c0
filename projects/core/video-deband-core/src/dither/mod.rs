//! Dithering transforms for the 16-bit to 8-bit down-conversion.
//!
//! Both transforms adjust the 16-bit value *before* the `>> 8` down-shift,
//! so the conversion site stays a plain truncation regardless of the
//! selected mode.

pub(crate) mod error_diffusion;
pub(crate) mod ordered;

pub(crate) use error_diffusion::ErrorDiffusion;
