//! Merge Engine: stably merges two storage-adjacent sorted runs, with an adaptive switch between
//! one-at-a-time pairing and exponential-probe ("galloping") bulk copies.

use crate::buffer::ScratchBuffer;
use crate::scan::MIN_GALLOP;
use crate::util::{get_and_increment, Less, MergeHole, MergeHoleRev};

/// Lower-bound search: the number of elements of `base[0..len)` that are `less` than `key`.
///
/// Probes outward from `hint` with offsets `1, 3, 7, 15, ...` (doubling plus one) in the
/// direction indicated by the element at `hint`, clamping at the run boundary on overflow or
/// overshoot, then binary-searches the last bracket `(lastOfs, ofs]`. Postcondition:
/// `-1 <= lastOfs < ofs <= len` before the final binary search collapses them to one index.
pub unsafe fn gallop_left<T, F: Less<T>>(
    key: &T,
    base: *const T,
    len: usize,
    hint: usize,
    less: &mut F,
) -> usize {
    debug_assert!(len > 0 && hint < len);

    let mut last_ofs: isize = 0;
    let mut ofs: isize = 1;

    if less(&*base.add(hint), key) {
        // Key is to the right of the hint: search forward.
        let max_ofs = (len - hint) as isize;
        while ofs < max_ofs && less(&*base.add(hint + ofs as usize), key) {
            last_ofs = ofs;
            ofs = gallop_step(ofs, max_ofs);
        }
        if ofs > max_ofs {
            ofs = max_ofs;
        }
        last_ofs += hint as isize;
        ofs += hint as isize;
    } else {
        // Key is at or to the left of the hint: search backward.
        let max_ofs = (hint + 1) as isize;
        while ofs < max_ofs && !less(&*base.add(hint - ofs as usize), key) {
            last_ofs = ofs;
            ofs = gallop_step(ofs, max_ofs);
        }
        if ofs > max_ofs {
            ofs = max_ofs;
        }
        let tmp = last_ofs;
        last_ofs = hint as isize - ofs;
        ofs = hint as isize - tmp;
    }

    debug_assert!(-1 <= last_ofs && last_ofs < ofs && ofs <= len as isize);
    lower_bound_from(base, (last_ofs + 1) as usize, ofs as usize, key, less)
}

/// Upper-bound search: the number of elements of `base[0..len)` that are not strictly greater
/// than `key`, i.e. the insertion index that places `key` after all elements equal to it.
pub unsafe fn gallop_right<T, F: Less<T>>(
    key: &T,
    base: *const T,
    len: usize,
    hint: usize,
    less: &mut F,
) -> usize {
    debug_assert!(len > 0 && hint < len);

    let mut last_ofs: isize = 0;
    let mut ofs: isize = 1;

    if less(key, &*base.add(hint)) {
        let max_ofs = (hint + 1) as isize;
        while ofs < max_ofs && less(key, &*base.add(hint - ofs as usize)) {
            last_ofs = ofs;
            ofs = gallop_step(ofs, max_ofs);
        }
        if ofs > max_ofs {
            ofs = max_ofs;
        }
        let tmp = last_ofs;
        last_ofs = hint as isize - ofs;
        ofs = hint as isize - tmp;
    } else {
        let max_ofs = (len - hint) as isize;
        while ofs < max_ofs && !less(key, &*base.add(hint + ofs as usize)) {
            last_ofs = ofs;
            ofs = gallop_step(ofs, max_ofs);
        }
        if ofs > max_ofs {
            ofs = max_ofs;
        }
        last_ofs += hint as isize;
        ofs += hint as isize;
    }

    debug_assert!(-1 <= last_ofs && last_ofs < ofs && ofs <= len as isize);
    upper_bound_from(base, (last_ofs + 1) as usize, ofs as usize, key, less)
}

/// Double-plus-one the gallop step, clamping to `max_ofs` rather than wrapping on overflow.
#[inline]
fn gallop_step(ofs: isize, max_ofs: isize) -> isize {
    match ofs.checked_shl(1).and_then(|d| d.checked_add(1)) {
        Some(next) if next > 0 => next,
        _ => max_ofs,
    }
}

unsafe fn lower_bound_from<T, F: Less<T>>(
    base: *const T,
    mut lo: usize,
    mut hi: usize,
    key: &T,
    less: &mut F,
) -> usize {
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if less(&*base.add(mid), key) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

unsafe fn upper_bound_from<T, F: Less<T>>(
    base: *const T,
    mut lo: usize,
    mut hi: usize,
    key: &T,
    less: &mut F,
) -> usize {
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if less(key, &*base.add(mid)) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Move the single element at `first` down past the run of elements equal to it in
/// `first + 1..last`, preserving stability by landing at the upper-bound position.
unsafe fn rotate_left<T>(first: *mut T, last: *mut T) {
    let tmp = first.read();
    let mut p = first;
    while p.add(1) < last {
        p.write(p.add(1).read());
        p = p.add(1);
    }
    p.write(tmp);
}

/// Move the single element at `last - 1` up past the run of elements equal to it in
/// `first..last - 1`, preserving stability by landing at the lower-bound position.
unsafe fn rotate_right<T>(first: *mut T, last: *mut T) {
    let tmp = last.sub(1).read();
    let mut p = last.sub(1);
    while p > first {
        p.write(p.sub(1).read());
        p = p.sub(1);
    }
    p.write(tmp);
}

/// Pre-trim, then dispatch to [`merge_lo`] or [`merge_hi`] depending on which run is smaller.
///
/// `base1[0..len1)` and `base2[0..len2)` must be storage-adjacent (`base1.add(len1) == base2`)
/// and each individually sorted. `min_gallop` is per-sort state: every merge reads its current
/// value and writes back the value it leaves off with, so the threshold adapts across the whole
/// sort rather than resetting at each merge.
pub unsafe fn merge_runs<T, F: Less<T>>(
    buf: &mut ScratchBuffer<T>,
    base1: *mut T,
    mut len1: usize,
    base2: *mut T,
    mut len2: usize,
    min_gallop: &mut usize,
    less: &mut F,
) {
    debug_assert!(len1 > 0 && len2 > 0);
    debug_assert!(base1.add(len1) == base2);

    let k = gallop_right(&*base2, base1, len1, 0, less);
    let base1 = base1.add(k);
    len1 -= k;
    if len1 == 0 {
        return;
    }

    len2 = gallop_left(&*base1.add(len1 - 1), base2, len2, len2 - 1, less);
    if len2 == 0 {
        return;
    }

    if len1 <= len2 {
        merge_lo(buf, base1, len1, base2, len2, min_gallop, less);
    } else {
        merge_hi(buf, base1, len1, base2, len2, min_gallop, less);
    }
}

/// Merge runs of `len1 <= len2`: stage the left (shorter) run into scratch and fill forward.
///
/// `hole.start` doubles as the live cursor into the staged copy of `R1` and `hole.dest` as the
/// live output cursor; keeping them as the single source of truth (rather than shadow local
/// variables) is what lets `MergeHole`'s `Drop` always restore the right thing if `less` panics.
/// `cursor2` walks the untouched tail of `R2` directly -- safe without protection because the
/// output cursor never overtakes it.
unsafe fn merge_lo<T, F: Less<T>>(
    buf: &mut ScratchBuffer<T>,
    base1: *mut T,
    len1: usize,
    base2: *mut T,
    len2: usize,
    min_gallop: &mut usize,
    less: &mut F,
) {
    if len1 == 1 {
        return rotate_left(base1, base2.add(len2));
    }
    if len2 == 1 {
        return rotate_right(base1, base2.add(len2));
    }

    buf.stage(base1, len1);
    let tmp_start = buf.start();
    let mut hole = MergeHole {
        start: tmp_start,
        end: tmp_start.add(len1),
        dest: base1,
    };
    let mut cursor2 = base2;
    let mut len1 = len1;
    let mut len2 = len2;

    *hole.dest = get_and_increment(&mut cursor2).read();
    hole.dest = hole.dest.add(1);
    len2 -= 1;

    let mut gallop = *min_gallop;

    'outer: loop {
        let mut count1 = 0usize;
        let mut count2 = 0usize;

        loop {
            debug_assert!(len1 > 1 && len2 > 0);
            if less(&*cursor2, &*hole.start) {
                *hole.dest = get_and_increment(&mut cursor2).read();
                hole.dest = hole.dest.add(1);
                count2 += 1;
                count1 = 0;
                len2 -= 1;
                if len2 == 0 {
                    break 'outer;
                }
            } else {
                *hole.dest = get_and_increment(&mut hole.start).read();
                hole.dest = hole.dest.add(1);
                count1 += 1;
                count2 = 0;
                len1 -= 1;
                if len1 == 1 {
                    break 'outer;
                }
            }
            if (count1 | count2) >= gallop {
                break;
            }
        }

        loop {
            debug_assert!(len1 > 1 && len2 > 0);

            count1 = gallop_right(&*cursor2, hole.start, len1, 0, less);
            if count1 != 0 {
                std::ptr::copy_nonoverlapping(hole.start, hole.dest, count1);
                hole.dest = hole.dest.add(count1);
                hole.start = hole.start.add(count1);
                len1 -= count1;
                if len1 <= 1 {
                    break 'outer;
                }
            }
            *hole.dest = get_and_increment(&mut cursor2).read();
            hole.dest = hole.dest.add(1);
            len2 -= 1;
            if len2 == 0 {
                break 'outer;
            }

            count2 = gallop_left(&*hole.start, cursor2, len2, 0, less);
            if count2 != 0 {
                // `cursor2` and `hole.dest` both point into the caller's slice and can overlap
                // (the gap between them is `len1`, which `count2` is not bounded by).
                std::ptr::copy(cursor2, hole.dest, count2);
                hole.dest = hole.dest.add(count2);
                cursor2 = cursor2.add(count2);
                len2 -= count2;
                if len2 == 0 {
                    break 'outer;
                }
            }
            *hole.dest = get_and_increment(&mut hole.start).read();
            hole.dest = hole.dest.add(1);
            len1 -= 1;
            if len1 == 1 {
                break 'outer;
            }

            gallop = gallop.saturating_sub(1);
            if count1 < MIN_GALLOP && count2 < MIN_GALLOP {
                break;
            }
        }

        gallop += 2;
    }

    *min_gallop = gallop;

    // One side is exhausted. Copy whatever remains of the other directly (bypassing the hole
    // bookkeeping, since we're about to neutralise it below) and place the lone survivor.
    if len1 == 1 {
        debug_assert!(len2 > 0);
        // Same overlap hazard as above: the gap here is 1, not `len2`.
        std::ptr::copy(cursor2, hole.dest, len2);
        *hole.dest.add(len2) = hole.start.read();
    } else {
        debug_assert!(len2 == 0 && len1 > 1);
        std::ptr::copy_nonoverlapping(hole.start, hole.dest, len1);
    }
    // Nothing left in `tmp` to restore; make the hole's drop glue a no-op.
    hole.start = hole.end;
}

/// Merge runs of `len1 > len2`: stage the right (shorter) run into scratch and fill backward.
///
/// Mirror image of [`merge_lo`]: `hole.end` is the live cursor into the staged copy of `R2`
/// (shrinking downward from the top) and `hole.dest` the live output cursor (also descending),
/// kept in the [`MergeHoleRev`] so a panicking `less` still restores the untouched remainder.
/// `cursor1` walks the untouched head of `R1` directly, unprotected for the same reason `cursor2`
/// is safe in `merge_lo`.
unsafe fn merge_hi<T, F: Less<T>>(
    buf: &mut ScratchBuffer<T>,
    base1: *mut T,
    len1: usize,
    base2: *mut T,
    len2: usize,
    min_gallop: &mut usize,
    less: &mut F,
) {
    if len1 == 1 {
        return rotate_left(base1, base2.add(len2));
    }
    if len2 == 1 {
        return rotate_right(base1, base2.add(len2));
    }

    buf.stage(base2, len2);
    let tmp_start = buf.start();
    let mut hole = MergeHoleRev {
        start: tmp_start,
        end: tmp_start.add(len2),
        dest: base2.add(len2),
    };
    let mut cursor1 = base1.add(len1);
    let mut len1 = len1;
    let mut len2 = len2;

    cursor1 = cursor1.sub(1);
    hole.dest = hole.dest.sub(1);
    *hole.dest = cursor1.read();
    len1 -= 1;

    let mut gallop = *min_gallop;

    'outer: loop {
        let mut count1 = 0usize;
        let mut count2 = 0usize;

        cursor1 = cursor1.sub(1);
        loop {
            debug_assert!(len1 > 0 && len2 > 1);

            hole.end = hole.end.sub(1);
            if less(&*hole.end, &*cursor1) {
                hole.dest = hole.dest.sub(1);
                *hole.dest = cursor1.read();
                count1 += 1;
                count2 = 0;
                len1 -= 1;
                if len1 == 0 {
                    hole.end = hole.end.add(1);
                    break 'outer;
                }
                cursor1 = cursor1.sub(1);
            } else {
                hole.dest = hole.dest.sub(1);
                *hole.dest = hole.end.read();
                count2 += 1;
                count1 = 0;
                len2 -= 1;
                if len2 == 1 {
                    cursor1 = cursor1.add(1);
                    break 'outer;
                }
            }
            if (count1 | count2) >= gallop {
                break;
            }
        }
        cursor1 = cursor1.add(1);

        loop {
            debug_assert!(len1 > 0 && len2 > 1);

            count1 = len1 - gallop_right(&*hole.end.sub(1), base1, len1, len1 - 1, less);
            if count1 != 0 {
                hole.dest = hole.dest.sub(count1);
                cursor1 = cursor1.sub(count1);
                len1 -= count1;
                std::ptr::copy(cursor1, hole.dest, count1);
                if len1 == 0 {
                    break 'outer;
                }
            }
            hole.end = hole.end.sub(1);
            hole.dest = hole.dest.sub(1);
            *hole.dest = hole.end.read();
            len2 -= 1;
            if len2 == 1 {
                break 'outer;
            }

            count2 = len2 - gallop_left(&*cursor1.sub(1), hole.start, len2, len2 - 1, less);
            if count2 != 0 {
                hole.dest = hole.dest.sub(count2);
                hole.end = hole.end.sub(count2);
                len2 -= count2;
                std::ptr::copy_nonoverlapping(hole.end, hole.dest, count2);
                if len2 <= 1 {
                    break 'outer;
                }
            }
            cursor1 = cursor1.sub(1);
            hole.dest = hole.dest.sub(1);
            *hole.dest = cursor1.read();
            len1 -= 1;
            if len1 == 0 {
                break 'outer;
            }

            gallop = gallop.saturating_sub(1);
            if count1 < MIN_GALLOP && count2 < MIN_GALLOP {
                break;
            }
        }

        gallop += 2;
    }

    *min_gallop = gallop;

    if len2 == 1 {
        debug_assert!(len1 > 0);
        hole.dest = hole.dest.sub(len1);
        std::ptr::copy(cursor1.sub(len1), hole.dest, len1);
        *hole.dest.sub(1) = hole.end.sub(1).read();
    } else {
        debug_assert!(len1 == 0 && len2 > 1);
        std::ptr::copy_nonoverlapping(hole.start, hole.dest.sub(len2), len2);
    }
    hole.start = hole.end;
}
