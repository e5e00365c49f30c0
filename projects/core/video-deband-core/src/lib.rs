#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "nightly", feature(allocator_api))]
#![warn(missing_docs)]

extern crate alloc;

pub mod allocate;
pub mod context;
pub mod pixel_info;
pub mod plane;

pub(crate) mod dither;
pub(crate) mod process;

#[cfg(feature = "bench")]
pub mod bench;

// Re-export the main types and the entry point at the crate root.
pub use allocate::AllocateError;
pub use context::ProcessContext;
pub use pixel_info::PixelDitherInfo;
pub use plane::{InputMode, PlaneParams, PrecisionMode, SampleMode};
pub use process::process_plane;

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
