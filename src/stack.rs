//! Run Stack: tracks the pending runs produced by the scanner and decides when to merge them.
//!
//! The stack maintains two invariants over its lengths `A > B > C > ...` (top to bottom, where
//! `A` is the most recently pushed run):
//!
//! - `len(N-2) > len(N-1) + len(N)`
//! - `len(N-1) > len(N)`
//!
//! Whenever a push would break either invariant, the offending pair is merged immediately, and
//! this can cascade down the stack. Keeping both invariants alive is what bounds the stack depth
//! logarithmically in the input size and keeps the merge tree balanced.

use crate::buffer::ScratchBuffer;
use crate::merge;
use crate::util::Less;

/// One run known to the stack: `len` elements starting at `base`.
///
/// `base`/`len` are themselves always `Copy` (a raw pointer and a `usize`), but deriving
/// `Copy`/`Clone` here would saddle every method that touches a `Run<T>` with a spurious
/// `T: Copy` bound, since the derive macros add one for every generic parameter regardless of
/// whether it actually appears behind the impl. `merge_at` below is written to never need to
/// move a whole `Run<T>` out of the stack by value for exactly this reason.
struct Run<T> {
    base: *mut T,
    len: usize,
}

/// Pending-run stack plus the cross-merge `min_gallop` state threaded through every merge.
pub struct RunStack<T> {
    runs: Vec<Run<T>>,
    min_gallop: usize,
    buf: ScratchBuffer<T>,
}

impl<T> RunStack<T> {
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            min_gallop: crate::scan::MIN_GALLOP,
            buf: ScratchBuffer::new(),
        }
    }

    /// Push a freshly scanned run, then resolve any invariant violations it creates.
    pub fn push_run<F: Less<T>>(&mut self, base: *mut T, len: usize, less: &mut F) {
        self.runs.push(Run { base, len });
        self.merge_collapse(less);
    }

    /// Merge adjacent runs until both stack invariants hold again.
    ///
    /// Mirrors the reference `mergeCollapse`: at each step look at the three runs nearest the top
    /// (`n-2`, `n-1`, `n`, where `n` is the index of the second-to-last run) and merge the pair
    /// that keeps the stack as balanced as possible, preferring to merge the smaller of `n-1`/`n`
    /// when both candidate merges at `n` would violate the invariant.
    fn merge_collapse<F: Less<T>>(&mut self, less: &mut F) {
        while self.runs.len() > 1 {
            let mut n = self.runs.len() - 2;

            if (n > 0 && self.runs[n - 1].len <= self.runs[n].len + self.runs[n + 1].len)
                || (n > 1 && self.runs[n - 2].len <= self.runs[n - 1].len + self.runs[n].len)
            {
                if self.runs[n - 1].len < self.runs[n + 1].len {
                    n -= 1;
                }
                self.merge_at(n, less);
            } else if self.runs[n].len <= self.runs[n + 1].len {
                self.merge_at(n, less);
            } else {
                break;
            }
        }
    }

    /// Merge all remaining runs down to one, called once the input has been fully scanned.
    ///
    /// Unlike `merge_collapse`, this never stops early: every remaining run gets folded in,
    /// smallest-adjacent-pair-first, regardless of whether the stack invariants already hold.
    pub fn force_collapse<F: Less<T>>(&mut self, less: &mut F) {
        while self.runs.len() > 1 {
            let mut n = self.runs.len() - 2;
            if n > 0 && self.runs[n - 1].len < self.runs[n + 1].len {
                n -= 1;
            }
            self.merge_at(n, less);
        }
    }

    /// Merge the runs at stack indices `i` and `i + 1`, replacing both with their union.
    fn merge_at<F: Less<T>>(&mut self, i: usize, less: &mut F) {
        let stack_size = self.runs.len();
        debug_assert!(stack_size >= 2);
        debug_assert!(i == stack_size - 2 || i == stack_size - 3);

        let (base1, len1) = (self.runs[i].base, self.runs[i].len);
        let (base2, len2) = (self.runs[i + 1].base, self.runs[i + 1].len);

        self.runs[i].len = len1 + len2;
        // Dropping run `i + 1` (now folded into `i`'s length) without disturbing a possible
        // run at `i + 2` is exactly what removing index `i + 1` does: it shifts `i + 2` (and
        // nothing else, since `i` is always within 1 of the stack top) down into its place.
        // Falls back to a plain `pop` when there is no run past `i + 1` to preserve.
        if i == stack_size - 3 {
            self.runs.remove(i + 1);
        } else {
            self.runs.pop();
        }

        unsafe {
            merge::merge_runs(
                &mut self.buf,
                base1,
                len1,
                base2,
                len2,
                &mut self.min_gallop,
                less,
            );
        }
    }

    /// Number of runs currently pending. Exposed for the `audit`/`log` diagnostics.
    pub fn len(&self) -> usize {
        self.runs.len()
    }
}
