//! Scratch Buffer: the temporary staging area the Merge Engine stages the smaller run into.
//!
//! The buffer never holds more than `len / 2` elements for a sort of `len` elements, because
//! every merge stages the shorter of its two participants (see [`crate::merge`]). Growth is
//! geometric and monotonic for the lifetime of one `sort`/`merge` call; the buffer never shrinks
//! mid-call, only at the very end when it is dropped.

use std::ptr;

/// Growable staging area of raw, uninitialized value slots.
///
/// `ScratchBuffer` never constructs a `T` by value outside of the slice it stages from; it only
/// ever moves bytes in and out via `ptr::copy_nonoverlapping`. Its `Vec<T>` is used purely as a
/// capacity-tracked allocation -- its length is kept at `0` for the buffer's entire lifetime, so
/// the staged bytes are never considered live by `Vec`'s own destructor, and ordinary `Vec` drop
/// glue is enough to release the allocation with no risk of double-dropping an element the merge
/// loop already moved back out. Any elements left behind by a panicking comparator are the
/// responsibility of the in-flight `MergeHole` (see [`crate::util::MergeHole`]), not of this
/// buffer.
pub struct ScratchBuffer<T> {
    storage: Vec<T>,
}

impl<T> ScratchBuffer<T> {
    /// Create an empty buffer. No allocation happens until [`ScratchBuffer::reserve`] is called.
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
        }
    }

    /// Ensure capacity for at least `n` elements, growing geometrically (1.5x) if needed.
    ///
    /// Growth never shrinks existing capacity and is amortised across every merge performed
    /// within one `sort` call, since later merges in a Timsort run are often larger than earlier
    /// ones.
    pub fn reserve(&mut self, n: usize) {
        let cap = self.storage.capacity();
        if cap < n {
            let grown = cap + cap / 2;
            self.storage.reserve_exact(n.max(grown) - cap);
        }
    }

    /// Pointer to the first slot. Only valid to dereference within `0..capacity`.
    #[inline]
    pub fn start(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// Move `n` elements out of `src` into slots `0..n` of this buffer.
    ///
    /// # Safety
    /// `src` must be valid for reads of `n` elements of `T`, and the caller must not read from
    /// `src..src + n` again until those elements are moved back out (the source range is treated
    /// as logically uninitialized after this call, matching `ptr::read` semantics).
    pub unsafe fn stage(&mut self, src: *const T, n: usize) {
        self.reserve(n);
        ptr::copy_nonoverlapping(src, self.storage.as_mut_ptr(), n);
    }
}

impl<T> Default for ScratchBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
