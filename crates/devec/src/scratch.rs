//! Replacement storage built in isolation.
//!
//! A [`ScratchBlock`] owns a freshly allocated block while it is being
//! filled. Values are placed one after another starting at a chosen slot;
//! if anything goes wrong before [`commit`](ScratchBlock::commit) (a panic
//! in `Clone`, an early return), dropping the scratch block destroys the
//! values placed so far and frees the block. The devector being rebuilt is
//! not touched until the commit.

#![allow(unsafe_code)]

use std::mem;
use std::ptr::{self, NonNull};

use devec_core::{Allocator, DevecError};

use crate::raw::{self, Block};

/// A block under construction.
pub(crate) struct ScratchBlock<'a, T, A: Allocator> {
    alloc: &'a A,
    ptr: NonNull<T>,
    capacity: usize,
    /// Slot index of the first placed value.
    start: usize,
    /// Values placed so far, contiguous from `start`.
    built: usize,
}

impl<'a, T, A: Allocator> ScratchBlock<'a, T, A> {
    /// Allocate `capacity` slots; values will be placed from slot `start`.
    pub(crate) fn allocate(alloc: &'a A, capacity: usize, start: usize) -> Result<Self, DevecError> {
        debug_assert!(start <= capacity);
        let ptr = raw::allocate_slots::<T, A>(alloc, capacity)?;
        Ok(Self {
            alloc,
            ptr,
            capacity,
            start,
            built: 0,
        })
    }

    /// Free slots left after the placed values.
    pub(crate) fn remaining(&self) -> usize {
        self.capacity - self.start - self.built
    }

    /// Construct `value` in the next slot.
    ///
    /// # Panics
    ///
    /// Panics if the block is full.
    pub(crate) fn push(&mut self, value: T) {
        assert!(self.remaining() > 0, "scratch block overflow");
        // SAFETY: the slot lies inside the block and is not yet initialised.
        unsafe {
            let slot = self.ptr.as_ptr().add(self.start + self.built);
            self.alloc.construct(NonNull::new_unchecked(slot), value);
        }
        self.built += 1;
    }

    /// Clone every element of `src` into the block, in order.
    pub(crate) fn extend_cloned(&mut self, src: &[T])
    where
        T: Clone,
    {
        for item in src {
            self.push(item.clone());
        }
    }

    /// Bitwise-move `len` values from `src` into the next slots.
    ///
    /// # Safety
    ///
    /// `src` must point to `len` live values that the caller treats as
    /// moved-out afterwards, outside this block, and `len` must not exceed
    /// [`remaining`](Self::remaining).
    pub(crate) unsafe fn relocate_from(&mut self, src: *const T, len: usize) {
        debug_assert!(len <= self.remaining());
        // SAFETY: distinct allocations; caller guarantees bounds.
        unsafe {
            let dst = self.ptr.as_ptr().add(self.start + self.built);
            ptr::copy_nonoverlapping(src, dst, len);
        }
        self.built += len;
    }

    /// Hand the finished block over. The scratch guard is disarmed.
    pub(crate) fn commit(self) -> Block<T> {
        let block = Block {
            ptr: self.ptr,
            capacity: self.capacity,
            front_free: self.start,
            len: self.built,
        };
        mem::forget(self);
        block
    }
}

impl<T, A: Allocator> Drop for ScratchBlock<'_, T, A> {
    fn drop(&mut self) {
        let block = Block {
            ptr: self.ptr,
            capacity: self.capacity,
            front_free: self.start,
            len: self.built,
        };
        // SAFETY: we own the block; exactly `built` values live from `start`.
        unsafe { raw::retire_block(self.alloc, block) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devec_core::Global;
    use std::rc::Rc;

    #[test]
    fn commit_keeps_values() {
        let mut scratch = ScratchBlock::<u32, _>::allocate(&Global, 4, 1).unwrap();
        scratch.push(7);
        scratch.push(8);
        assert_eq!(scratch.remaining(), 1);
        let block = scratch.commit();
        assert_eq!(block.front_free, 1);
        assert_eq!(block.len, 2);
        unsafe {
            assert_eq!(*block.ptr.as_ptr().add(1), 7);
            assert_eq!(*block.ptr.as_ptr().add(2), 8);
            raw::retire_block(&Global, block);
        }
    }

    #[test]
    fn dropping_uncommitted_block_destroys_placed_values() {
        let shared = Rc::new(());
        {
            let mut scratch = ScratchBlock::allocate(&Global, 3, 0).unwrap();
            scratch.push(Rc::clone(&shared));
            scratch.push(Rc::clone(&shared));
            assert_eq!(Rc::strong_count(&shared), 3);
        }
        assert_eq!(Rc::strong_count(&shared), 1);
    }

    #[test]
    fn clone_panic_rolls_back() {
        #[derive(Debug)]
        struct Fragile(Rc<()>, bool);

        impl Clone for Fragile {
            fn clone(&self) -> Self {
                assert!(!self.1, "fragile clone");
                Fragile(Rc::clone(&self.0), self.1)
            }
        }

        let shared = Rc::new(());
        let src = vec![
            Fragile(Rc::clone(&shared), false),
            Fragile(Rc::clone(&shared), false),
            Fragile(Rc::clone(&shared), true),
        ];
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut scratch = ScratchBlock::allocate(&Global, src.len(), 0).unwrap();
            scratch.extend_cloned(&src);
            scratch.commit()
        }));
        assert!(result.is_err());
        // Only the three source elements still hold the Rc.
        assert_eq!(Rc::strong_count(&shared), 4);
    }

    #[test]
    #[should_panic(expected = "scratch block overflow")]
    fn push_past_capacity_panics() {
        let mut scratch = ScratchBlock::<u8, _>::allocate(&Global, 1, 0).unwrap();
        scratch.push(1);
        scratch.push(2);
    }
}
