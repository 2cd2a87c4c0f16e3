//! Small pointer helpers shared by the scanner, merge engine and run stack.

use std::cmp::Ordering;
use std::ptr;

/// A trait alias for the `less` predicate threaded through the whole sort.
///
/// Every public entry point (`sort_by`, `sort_by_key`, `merge_by`, ...) is reduced to this
/// shape before the core algorithm ever sees it, so the core only has to reason about one
/// kind of comparator.
pub trait Less<T>: FnMut(&T, &T) -> bool {}
impl<T, F: FnMut(&T, &T) -> bool> Less<T> for F {}

/// Build a `Less<T>` closure out of a `Compare`-style `Ordering` comparator.
#[inline]
pub fn less_from_compare<T, F>(mut compare: F) -> impl FnMut(&T, &T) -> bool
where
    F: FnMut(&T, &T) -> Ordering,
{
    move |a, b| compare(a, b) == Ordering::Less
}

/// Build a `Less<T>` closure out of a key-extraction function.
#[inline]
pub fn less_from_key<T, K, F>(mut f: F) -> impl FnMut(&T, &T) -> bool
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    move |a, b| f(a).lt(&f(b))
}

/// When dropped, copies the range `start..end` into `dest..`, element by element.
///
/// This is the panic-safety backbone of the merge engine: every in-progress merge keeps a
/// `MergeHole` alive so that if the user's comparator unwinds partway through, the still-moved
/// elements in the scratch buffer get written back into the slice instead of being leaked or
/// double-dropped. On the non-panicking path the hole is simply emptied by hand before it drops.
pub struct MergeHole<T> {
    pub start: *mut T,
    pub end: *mut T,
    pub dest: *mut T,
}

impl<T> Drop for MergeHole<T> {
    fn drop(&mut self) {
        unsafe {
            let len = self.end.offset_from(self.start) as usize;
            if len > 0 {
                ptr::copy_nonoverlapping(self.start, self.dest, len);
            }
        }
    }
}

/// Mirror image of [`MergeHole`] for merges that fill their destination back-to-front: `dest`
/// names the position one-past-the-end of where the remaining `start..end` range belongs, so the
/// copied range ends exactly at `dest` instead of starting there.
pub struct MergeHoleRev<T> {
    pub start: *mut T,
    pub end: *mut T,
    pub dest: *mut T,
}

impl<T> Drop for MergeHoleRev<T> {
    fn drop(&mut self) {
        unsafe {
            let len = self.end.offset_from(self.start) as usize;
            if len > 0 {
                ptr::copy_nonoverlapping(self.start, self.dest.sub(len), len);
            }
        }
    }
}

/// Increment a raw pointer and return its previous value.
#[inline]
pub unsafe fn get_and_increment<T>(ptr: &mut *mut T) -> *mut T {
    let old = *ptr;
    *ptr = ptr.add(1);
    old
}
