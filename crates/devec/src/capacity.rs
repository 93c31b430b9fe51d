//! Capacity management: reserving side capacity, growth and shrinking.
//!
//! All reallocations go through [`Devector::reallocate`], which builds the
//! new block in a [`ScratchBlock`] and installs it only once the live
//! elements have been relocated. Relocation is a bitwise move, so once
//! the allocation succeeds nothing else can fail.

#![allow(unsafe_code)]

use std::ptr;

use devec_core::{Allocator, DevecError};

use crate::devector::Devector;
use crate::raw;
use crate::scratch::ScratchBlock;

impl<T, A: Allocator> Devector<T, A> {
    /// Same as [`reserve_back`](Self::reserve_back).
    pub fn reserve(&mut self, n: usize) -> Result<(), DevecError> {
        self.reserve_back(n)
    }

    /// Make room so that `front_free_capacity() + len() >= n`.
    ///
    /// If the block is already large enough the live elements are shifted
    /// to the back of it in place; otherwise a block of
    /// `n + back_free_capacity()` slots is allocated. On error the devector
    /// is unchanged.
    ///
    /// ```
    /// let mut v = devec::Devector::<u8>::new();
    /// v.reserve_front(8).unwrap();
    /// assert_eq!(v.front_free_capacity(), 8);
    /// ```
    pub fn reserve_front(&mut self, n: usize) -> Result<(), DevecError> {
        self.check_max_size(n)?;
        if self.front_free + self.len >= n {
            return Ok(());
        }
        if self.capacity >= n {
            self.shift_live_to(self.capacity - self.len);
            return Ok(());
        }
        let back_free = self.back_free_capacity();
        let capacity = self.checked_capacity(n, back_free)?;
        self.reallocate(capacity, n - self.len)
    }

    /// Make room so that `len() + back_free_capacity() >= n`.
    ///
    /// Mirror image of [`reserve_front`](Self::reserve_front): the front
    /// slack is kept when a new block is needed.
    pub fn reserve_back(&mut self, n: usize) -> Result<(), DevecError> {
        self.check_max_size(n)?;
        if self.len + self.back_free_capacity() >= n {
            return Ok(());
        }
        if self.capacity >= n {
            self.shift_live_to(0);
            return Ok(());
        }
        let capacity = self.checked_capacity(self.front_free, n)?;
        self.reallocate(capacity, self.front_free)
    }

    /// Drop all slack. An empty devector releases its block entirely.
    pub fn shrink_to_fit(&mut self) -> Result<(), DevecError> {
        if self.capacity == self.len {
            return Ok(());
        }
        if self.len == 0 {
            let old_capacity = self.capacity;
            let block = self.take_block();
            // SAFETY: nothing is live; the block came from `self.alloc`.
            unsafe { raw::deallocate_slots(&self.alloc, block.ptr, block.capacity) };
            tracing::trace!(old_capacity, new_capacity = 0, len = 0, "devector released block");
            return Ok(());
        }
        self.reallocate(self.len, 0)
    }

    // ── growth ──────────────────────────────────────────────────────

    /// Grow so that at least `additional` slots are free at the back,
    /// keeping the front slack.
    pub(crate) fn grow_back(&mut self, additional: usize) -> Result<(), DevecError> {
        let required = self
            .front_free
            .checked_add(self.len)
            .and_then(|n| n.checked_add(additional))
            .ok_or_else(|| self.overflow())?;
        let target = self.growth_target(required)?;
        self.reallocate(target, self.front_free)
    }

    /// Grow so that at least `additional` slots are free at the front,
    /// keeping the back slack.
    pub(crate) fn grow_front(&mut self, additional: usize) -> Result<(), DevecError> {
        let back_free = self.back_free_capacity();
        let required = additional
            .checked_add(self.len)
            .and_then(|n| n.checked_add(back_free))
            .ok_or_else(|| self.overflow())?;
        let target = self.growth_target(required)?;
        self.reallocate(target, target - self.len - back_free)
    }

    fn growth_target(&self, required: usize) -> Result<usize, DevecError> {
        self.check_max_size(required)?;
        Ok(self
            .growth
            .next_capacity(self.capacity, required)
            .min(self.max_size()))
    }

    // ── relocation ──────────────────────────────────────────────────

    /// Move the live elements into a fresh block of `new_capacity` slots,
    /// starting at slot `new_front`, and free the old block.
    pub(crate) fn reallocate(&mut self, new_capacity: usize, new_front: usize) -> Result<(), DevecError> {
        debug_assert!(new_front + self.len <= new_capacity);
        let mut scratch = ScratchBlock::<T, _>::allocate(&self.alloc, new_capacity, new_front)?;
        // SAFETY: the live window is marked moved-out below by detaching
        // the old block without destroying it.
        unsafe { scratch.relocate_from(self.live_ptr(), self.len) };
        let block = scratch.commit();

        let old = self.take_block();
        // SAFETY: every value of the old block was relocated.
        unsafe { raw::deallocate_slots(&self.alloc, old.ptr, old.capacity) };
        self.install(block);
        tracing::trace!(
            old_capacity = old.capacity,
            new_capacity,
            len = self.len,
            "devector reallocated"
        );
        Ok(())
    }

    /// Slide the live window so it starts at slot `new_front`.
    fn shift_live_to(&mut self, new_front: usize) {
        debug_assert!(new_front + self.len <= self.capacity);
        // SAFETY: both windows lie inside the block; `ptr::copy` handles
        // the overlap.
        unsafe {
            let dst = self.ptr.as_ptr().add(new_front);
            ptr::copy(self.live_ptr(), dst, self.len);
        }
        self.front_free = new_front;
    }

    // ── bounds ──────────────────────────────────────────────────────

    fn check_max_size(&self, requested: usize) -> Result<(), DevecError> {
        let max = self.max_size();
        if requested > max {
            return Err(DevecError::LengthError { requested, max });
        }
        Ok(())
    }

    fn checked_capacity(&self, a: usize, b: usize) -> Result<usize, DevecError> {
        let capacity = a.checked_add(b).ok_or_else(|| self.overflow())?;
        self.check_max_size(capacity)?;
        Ok(capacity)
    }

    fn overflow(&self) -> DevecError {
        DevecError::LengthError {
            requested: usize::MAX,
            max: self.max_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devec_core::GrowthPolicy;

    #[test]
    fn reserve_front_shifts_in_place_when_block_is_large_enough() {
        let mut v = crate::Devector::with_capacity(8).unwrap();
        v.push_back(1).unwrap();
        v.push_back(2).unwrap();
        let block = v.as_ptr() as usize - v.front_free_capacity() * std::mem::size_of::<i32>();
        v.reserve_front(8).unwrap();
        assert_eq!(v.capacity(), 8);
        assert_eq!(v.front_free_capacity(), 6);
        assert_eq!(v.back_free_capacity(), 0);
        assert_eq!(v, [1, 2]);
        assert_eq!(v.as_ptr() as usize, block + 6 * std::mem::size_of::<i32>());
    }

    #[test]
    fn reserve_front_keeps_back_slack_when_reallocating() {
        let mut v = crate::Devector::with_free_capacity(0, 3).unwrap();
        v.push_back(1).unwrap();
        v.reserve_front(10).unwrap();
        assert_eq!(v.front_free_capacity() + v.len(), 10);
        assert_eq!(v.back_free_capacity(), 2);
        assert_eq!(v.capacity(), 12);
        assert_eq!(v, [1]);
    }

    #[test]
    fn reserve_back_keeps_front_slack_when_reallocating() {
        let mut v = crate::Devector::with_free_capacity(4, 0).unwrap();
        v.push_front(9).unwrap();
        v.reserve_back(6).unwrap();
        assert_eq!(v.front_free_capacity(), 3);
        assert_eq!(v.len() + v.back_free_capacity(), 6);
        assert_eq!(v, [9]);
    }

    #[test]
    fn reserve_satisfied_is_noop() {
        let mut v = crate::Devector::<u8>::with_free_capacity(2, 5).unwrap();
        v.reserve_back(5).unwrap();
        v.reserve_front(2).unwrap();
        assert_eq!(v.front_free_capacity(), 2);
        assert_eq!(v.back_free_capacity(), 5);
    }

    #[test]
    fn reserve_beyond_max_size_is_length_error() {
        let mut v = crate::Devector::<u64>::new();
        let too_big = v.max_size() + 1;
        assert!(matches!(
            v.reserve_back(too_big),
            Err(DevecError::LengthError { .. })
        ));
        assert!(matches!(
            v.reserve_front(too_big),
            Err(DevecError::LengthError { .. })
        ));
        assert_eq!(v.capacity(), 0);
    }

    #[test]
    fn shrink_to_fit_drops_slack() {
        let mut v = crate::Devector::with_free_capacity(4, 4).unwrap();
        v.push_back(1).unwrap();
        v.push_front(0).unwrap();
        v.shrink_to_fit().unwrap();
        assert_eq!(v.capacity(), 2);
        assert_eq!(v.front_free_capacity(), 0);
        assert_eq!(v, [0, 1]);
    }

    #[test]
    fn shrink_to_fit_on_empty_releases_block() {
        let mut v = crate::Devector::<u32>::with_capacity(16).unwrap();
        v.shrink_to_fit().unwrap();
        assert_eq!(v.capacity(), 0);
        v.push_back(1).unwrap();
        assert_eq!(v, [1]);
    }

    #[test]
    fn growth_follows_policy() {
        let mut v = crate::Devector::new();
        let mut seen = Vec::new();
        for i in 0..8 {
            v.push_back(i).unwrap();
            seen.push(v.capacity());
        }
        assert_eq!(seen, vec![1, 3, 3, 7, 7, 7, 7, 15]);
    }

    #[test]
    fn custom_growth_policy() {
        let mut v = crate::Devector::new()
            .with_growth(GrowthPolicy::new(1, 4))
            .unwrap();
        for i in 0..5 {
            v.push_back(i).unwrap();
        }
        assert_eq!(v.capacity(), 8);
    }

    #[test]
    fn front_growth_keeps_back_slack() {
        let mut v = crate::Devector::with_free_capacity(0, 2).unwrap();
        v.push_front(1).unwrap();
        assert_eq!(v.back_free_capacity(), 2);
        assert_eq!(v.front_free_capacity(), 2);
        assert_eq!(v.capacity(), 5);
        assert_eq!(v, [1]);
    }
}
