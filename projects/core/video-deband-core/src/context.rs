//! Caller-owned processing context holding the derived-offset cache.
//!
//! The only cross-call mutable state of the kernel lives here: one slot that
//! memoizes the resolved per-pixel byte offsets for a plane geometry.
//! Multiple worker threads may process frames sharing one context; each
//! builds its candidate cache into private memory, and a single
//! compare-and-swap decides which copy gets installed. Losers drop their
//! redundant build, so the race is benign — it can waste work, never corrupt
//! data.

use crate::process::offsets::OffsetBlock;
use alloc::boxed::Box;
use core::ptr::null_mut;
use core::sync::atomic::{AtomicPtr, Ordering};
use safe_allocator_api::RawAlloc;

/// Installed cache payload: the flat offset/change stream and the pitch it
/// was resolved against. Offsets bake in the source pitch, so the stream is
/// only reusable while the pitch matches.
pub(crate) struct OffsetCache {
    pub(crate) pitch: i32,
    stream: RawAlloc,
}

impl OffsetCache {
    pub(crate) fn new(pitch: i32, stream: RawAlloc) -> Self {
        Self { pitch, stream }
    }

    /// First block record of the stream.
    pub(crate) fn blocks(&self) -> *const OffsetBlock {
        self.stream.as_ptr() as *const OffsetBlock
    }
}

/// Persistent per-geometry processing state, owned by the caller.
///
/// Create one context per distinct plane geometry and pass it to every
/// [`process_plane`] call on that geometry. Reusing a context across
/// different plane dimensions or subsampling is a contract violation;
/// a differing pitch alone is tolerated (the cache is bypassed for that
/// call, not corrupted).
///
/// [`process_plane`]: crate::process_plane
pub struct ProcessContext {
    slot: AtomicPtr<OffsetCache>,
}

impl ProcessContext {
    /// Creates an empty context. The first completed plane call populates it.
    pub fn new() -> Self {
        Self {
            slot: AtomicPtr::new(null_mut()),
        }
    }

    /// Whether a cache payload has been installed.
    pub fn is_warm(&self) -> bool {
        !self.slot.load(Ordering::Acquire).is_null()
    }

    /// Currently installed payload, if any.
    ///
    /// The payload is never replaced or freed while the context is alive, so
    /// the borrow is valid for the lifetime of `self`.
    pub(crate) fn cached(&self) -> Option<&OffsetCache> {
        let ptr = self.slot.load(Ordering::Acquire);
        if ptr.is_null() {
            None
        } else {
            Some(unsafe { &*ptr })
        }
    }

    /// Installs a freshly built payload if the slot is still empty.
    ///
    /// First writer wins; a losing candidate is dropped here. Returns whether
    /// this candidate was installed.
    pub(crate) fn install(&self, cache: Box<OffsetCache>) -> bool {
        let raw = Box::into_raw(cache);
        match self
            .slot
            .compare_exchange(null_mut(), raw, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => true,
            Err(_) => {
                // Another call completed first; discard our copy.
                drop(unsafe { Box::from_raw(raw) });
                false
            }
        }
    }
}

impl Default for ProcessContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProcessContext {
    fn drop(&mut self) {
        let ptr = self.slot.swap(null_mut(), Ordering::AcqRel);
        if !ptr.is_null() {
            drop(unsafe { Box::from_raw(ptr) });
        }
    }
}

// The slot itself is the synchronization point; the payload behind it is
// immutable once installed.
unsafe impl Send for ProcessContext {}
unsafe impl Sync for ProcessContext {}
