//! Sequence mutation: push/pop at both ends, interior insert and erase,
//! resize and assign.
//!
//! Operations that add several elements append them at the nearer end and
//! rotate them into place. A [`PendingInsert`] guard removes the appended
//! elements again if the source iterator panics or growth fails, so the
//! sequence is restored.

#![allow(unsafe_code)]

use std::iter;
use std::ops::{Bound, RangeBounds};
use std::ptr::{self, NonNull};

use devec_core::{Allocator, DevecError};

use crate::devector::Devector;
use crate::raw;

impl<T, A: Allocator> Devector<T, A> {
    // ── ends ────────────────────────────────────────────────────────

    /// Append `value`, growing the back if it has no slack.
    pub fn push_back(&mut self, value: T) -> Result<(), DevecError> {
        self.emplace_back(|| value).map(|_| ())
    }

    /// Prepend `value`, growing the front if it has no slack.
    pub fn push_front(&mut self, value: T) -> Result<(), DevecError> {
        self.emplace_front(|| value).map(|_| ())
    }

    /// Append the value produced by `make`.
    ///
    /// The slot is secured before `make` runs; if `make` panics the
    /// devector keeps its length (a growth that already happened stays).
    pub fn emplace_back<F>(&mut self, make: F) -> Result<&mut T, DevecError>
    where
        F: FnOnce() -> T,
    {
        if self.back_free_capacity() == 0 {
            self.grow_back(1)?;
        }
        let value = make();
        // SAFETY: there is at least one free slot after the live window.
        unsafe {
            let slot = self.live_ptr().add(self.len);
            self.alloc.construct(NonNull::new_unchecked(slot), value);
            self.len += 1;
            Ok(&mut *slot)
        }
    }

    /// Prepend the value produced by `make`.
    pub fn emplace_front<F>(&mut self, make: F) -> Result<&mut T, DevecError>
    where
        F: FnOnce() -> T,
    {
        if self.front_free == 0 {
            self.grow_front(1)?;
        }
        let value = make();
        // SAFETY: there is at least one free slot before the live window.
        unsafe {
            let slot = self.ptr.as_ptr().add(self.front_free - 1);
            self.alloc.construct(NonNull::new_unchecked(slot), value);
            self.front_free -= 1;
            self.len += 1;
            Ok(&mut *slot)
        }
    }

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was live and is now outside the window.
        Some(unsafe { ptr::read(self.live_ptr().add(self.len)) })
    }

    /// Remove and return the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let first = self.live_ptr();
        self.front_free += 1;
        self.len -= 1;
        // SAFETY: the slot was live and is now outside the window.
        Some(unsafe { ptr::read(first) })
    }

    // ── interior insert ─────────────────────────────────────────────

    /// Insert the value produced by `make` before position `index`.
    ///
    /// Returns the index of the new element. The suffix moves one slot
    /// back when there is back slack, otherwise the prefix moves one slot
    /// toward the front.
    pub fn emplace<F>(&mut self, index: usize, make: F) -> Result<usize, DevecError>
    where
        F: FnOnce() -> T,
    {
        let len = self.len;
        if index > len {
            return Err(DevecError::OutOfRange { index, len });
        }
        if index == 0 {
            self.emplace_front(make)?;
            return Ok(0);
        }
        if index == len {
            self.emplace_back(make)?;
            return Ok(len);
        }
        if self.front_free == 0 && self.back_free_capacity() == 0 {
            self.grow_back(1)?;
        }
        let value = make();
        // SAFETY: one free slot exists on the side we shift toward; the
        // gap at `index` is written before the window is extended.
        unsafe {
            if self.back_free_capacity() > 0 {
                let at = self.live_ptr().add(index);
                ptr::copy(at, at.add(1), len - index);
                self.alloc.construct(NonNull::new_unchecked(at), value);
            } else {
                let first = self.live_ptr();
                ptr::copy(first, first.sub(1), index);
                self.front_free -= 1;
                let at = self.live_ptr().add(index);
                self.alloc.construct(NonNull::new_unchecked(at), value);
            }
        }
        self.len += 1;
        Ok(index)
    }

    /// Insert `value` before position `index`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize, DevecError> {
        self.emplace(index, || value)
    }

    /// Insert `count` clones of `value` before position `index`.
    pub fn insert_n(&mut self, index: usize, count: usize, value: T) -> Result<usize, DevecError>
    where
        T: Clone,
    {
        self.insert_iter(index, iter::repeat_n(value, count))
    }

    /// Insert every item of `items` before position `index`, in order.
    ///
    /// Linear in `len() + items`. On error or panic the devector holds its
    /// previous elements again.
    ///
    /// ```
    /// let mut v: devec::Devector<i32> = devec::devector![1, 2, 5, 6];
    /// v.insert_iter(2, [3, 4]).unwrap();
    /// assert_eq!(v, [1, 2, 3, 4, 5, 6]);
    /// ```
    pub fn insert_iter<I>(&mut self, index: usize, items: I) -> Result<usize, DevecError>
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len;
        if index > len {
            return Err(DevecError::OutOfRange { index, len });
        }
        let at_back = len - index <= index;
        let added = self.append_iter(items, at_back)?;
        if at_back {
            self.as_mut_slice()[index..].rotate_right(added);
        } else {
            self.as_mut_slice()[..added + index].rotate_left(added);
        }
        Ok(index)
    }

    /// Push every item at one end, keeping their order, and return how
    /// many were added. All-or-nothing.
    pub(crate) fn append_iter<I>(&mut self, items: I, at_back: bool) -> Result<usize, DevecError>
    where
        I: IntoIterator<Item = T>,
    {
        let items = items.into_iter();
        let (lower, upper) = items.size_hint();
        if upper == Some(lower) && lower > 0 {
            let target = self.len.checked_add(lower).ok_or(DevecError::LengthError {
                requested: usize::MAX,
                max: self.max_size(),
            })?;
            if at_back {
                self.reserve_back(target)?;
            } else {
                self.reserve_front(target)?;
            }
        }

        let mut pending = PendingInsert {
            devector: &mut *self,
            added: 0,
            at_back,
        };
        for item in items {
            if at_back {
                pending.devector.push_back(item)?;
            } else {
                pending.devector.push_front(item)?;
            }
            pending.added += 1;
        }
        let added = pending.commit();
        if !at_back {
            self.as_mut_slice()[..added].reverse();
        }
        Ok(added)
    }

    // ── removal ─────────────────────────────────────────────────────

    /// Drop the element at `index`; returns `index`, the position of the
    /// element that followed it.
    pub fn erase(&mut self, index: usize) -> Result<usize, DevecError> {
        let len = self.len;
        if index >= len {
            return Err(DevecError::OutOfRange { index, len });
        }
        self.erase_range(index..index + 1)
    }

    /// Remove and return the element at `index`. The suffix moves left.
    pub fn remove(&mut self, index: usize) -> Result<T, DevecError> {
        let len = self.len;
        if index >= len {
            return Err(DevecError::OutOfRange { index, len });
        }
        // SAFETY: `index` is live; the suffix is shifted over its slot
        // before the window shrinks.
        unsafe {
            let at = self.live_ptr().add(index);
            let value = ptr::read(at);
            ptr::copy(at.add(1), at, len - index - 1);
            self.len -= 1;
            Ok(value)
        }
    }

    /// Drop the elements in `range` and close the gap. Returns the start
    /// of the range.
    ///
    /// If a destructor panics, the rest of the range is still dropped and
    /// the suffix still moves into the gap.
    pub fn erase_range<R>(&mut self, range: R) -> Result<usize, DevecError>
    where
        R: RangeBounds<usize>,
    {
        let len = self.len;
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.checked_add(1).ok_or(DevecError::OutOfRange { index: s, len })?,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.checked_add(1).ok_or(DevecError::OutOfRange { index: e, len })?,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        if end > len {
            return Err(DevecError::OutOfRange { index: end, len });
        }
        if start > end {
            return Err(DevecError::OutOfRange { index: start, len });
        }
        if start == end {
            return Ok(start);
        }

        self.len = start;
        let gap = CloseGap {
            devector: &mut *self,
            start,
            end,
            tail: len - end,
        };
        // SAFETY: `[start, end)` is live and already outside the window.
        unsafe {
            let first = gap.devector.live_ptr().add(start);
            raw::destroy_slots(&gap.devector.alloc, first, end - start);
        }
        Ok(start)
    }

    /// Drop every element. Capacity and front slack are unchanged.
    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;
        // SAFETY: the old window is live and now outside `len`.
        unsafe { raw::destroy_slots(&self.alloc, self.live_ptr(), len) }
    }

    /// Keep only the first `n` elements.
    pub fn truncate_back(&mut self, n: usize) {
        if n >= self.len {
            return;
        }
        let excess = self.len - n;
        self.len = n;
        // SAFETY: the dropped tail is live and now outside the window.
        unsafe { raw::destroy_slots(&self.alloc, self.live_ptr().add(n), excess) }
    }

    /// Keep only the last `n` elements.
    pub fn truncate_front(&mut self, n: usize) {
        if n >= self.len {
            return;
        }
        let excess = self.len - n;
        let first = self.live_ptr();
        self.front_free += excess;
        self.len = n;
        // SAFETY: the dropped head is live and now outside the window.
        unsafe { raw::destroy_slots(&self.alloc, first, excess) }
    }

    // ── resize / assign ─────────────────────────────────────────────

    /// Same as [`resize_back`](Self::resize_back).
    pub fn resize(&mut self, n: usize, value: T) -> Result<(), DevecError>
    where
        T: Clone,
    {
        self.resize_back(n, value)
    }

    /// Set the length to `n`, dropping or appending clones of `value` at
    /// the back.
    pub fn resize_back(&mut self, n: usize, value: T) -> Result<(), DevecError>
    where
        T: Clone,
    {
        if n <= self.len {
            self.truncate_back(n);
            return Ok(());
        }
        let extra = n - self.len;
        self.append_iter(iter::repeat_n(value, extra), true).map(|_| ())
    }

    /// Set the length to `n`, dropping or prepending clones of `value` at
    /// the front.
    pub fn resize_front(&mut self, n: usize, value: T) -> Result<(), DevecError>
    where
        T: Clone,
    {
        if n <= self.len {
            self.truncate_front(n);
            return Ok(());
        }
        let extra = n - self.len;
        self.append_iter(iter::repeat_n(value, extra), false).map(|_| ())
    }

    /// Set the length to `n`, appending default values at the back.
    pub fn resize_back_default(&mut self, n: usize) -> Result<(), DevecError>
    where
        T: Default,
    {
        if n <= self.len {
            self.truncate_back(n);
            return Ok(());
        }
        let extra = n - self.len;
        self.append_iter(iter::repeat_with(T::default).take(extra), true)
            .map(|_| ())
    }

    /// Set the length to `n`, prepending default values at the front.
    pub fn resize_front_default(&mut self, n: usize) -> Result<(), DevecError>
    where
        T: Default,
    {
        if n <= self.len {
            self.truncate_front(n);
            return Ok(());
        }
        let extra = n - self.len;
        self.append_iter(iter::repeat_with(T::default).take(extra), false)
            .map(|_| ())
    }

    /// Replace the contents with the items of `items`.
    ///
    /// The existing block is reused when it is large enough. On error the
    /// devector is left empty.
    pub fn assign_iter<I>(&mut self, items: I) -> Result<(), DevecError>
    where
        I: IntoIterator<Item = T>,
    {
        let items = items.into_iter();
        self.clear();
        if self.back_free_capacity() < items.size_hint().0 {
            self.front_free = 0;
        }
        self.append_iter(items, true).map(|_| ())
    }

    /// Replace the contents with `n` clones of `value`.
    pub fn assign_n(&mut self, n: usize, value: T) -> Result<(), DevecError>
    where
        T: Clone,
    {
        self.assign_iter(iter::repeat_n(value, n))
    }
}

// ── guards ──────────────────────────────────────────────────────────

/// Elements pushed at one end that are not yet part of the result.
/// Dropping the guard pops them again.
struct PendingInsert<'a, T, A: Allocator> {
    devector: &'a mut Devector<T, A>,
    added: usize,
    at_back: bool,
}

impl<T, A: Allocator> PendingInsert<'_, T, A> {
    fn commit(mut self) -> usize {
        std::mem::replace(&mut self.added, 0)
    }
}

impl<T, A: Allocator> Drop for PendingInsert<'_, T, A> {
    fn drop(&mut self) {
        let n = self.added;
        if self.at_back {
            self.devector.truncate_back(self.devector.len - n);
        } else {
            self.devector.truncate_front(self.devector.len - n);
        }
    }
}

/// Moves the suffix of an erased range into the gap, also on unwind.
struct CloseGap<'a, T, A: Allocator> {
    devector: &'a mut Devector<T, A>,
    start: usize,
    end: usize,
    tail: usize,
}

impl<T, A: Allocator> Drop for CloseGap<'_, T, A> {
    fn drop(&mut self) {
        // SAFETY: `[end, end + tail)` is live; the destination is the gap
        // left by the destroyed range.
        unsafe {
            let base = self.devector.live_ptr();
            ptr::copy(base.add(self.end), base.add(self.start), self.tail);
        }
        self.devector.len = self.start + self.tail;
    }
}
