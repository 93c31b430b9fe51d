//! Copy, move and swap between devectors, honouring the allocator's
//! [`AllocPolicy`](devec_core::AllocPolicy).
//!
//! Whenever a transfer needs a new block it is filled in a
//! [`ScratchBlock`] first; the destination's old block is retired only
//! after the new one is installed.

#![allow(unsafe_code)]

use std::mem;
use std::ptr;

use devec_core::{Allocator, DevecError};

use crate::devector::Devector;
use crate::raw;
use crate::scratch::ScratchBlock;

impl<T, A: Allocator> Devector<T, A> {
    /// Move the contents out, leaving `self` empty with zero capacity.
    ///
    /// The returned devector gets a clone of the allocator and the same
    /// growth policy. O(1).
    pub fn take(&mut self) -> Self {
        let block = self.take_block();
        Self::from_block(block, self.alloc.clone(), self.growth)
    }

    /// Move `source`'s contents into a devector using `alloc`.
    ///
    /// Steals the block in O(1) when `alloc` equals the source allocator.
    /// Otherwise allocates exactly `source.len()` slots from `alloc` and
    /// relocates the elements; `source` is left empty with zero capacity.
    /// On allocation failure `source` is untouched.
    pub fn move_in(source: &mut Self, alloc: A) -> Result<Self, DevecError> {
        if alloc.equals(&source.alloc) {
            let block = source.take_block();
            return Ok(Self::from_block(block, alloc, source.growth));
        }
        let block = {
            let mut scratch = ScratchBlock::<T, _>::allocate(&alloc, source.len, 0)?;
            // SAFETY: the source block is detached below without
            // destroying its values.
            unsafe { scratch.relocate_from(source.live_ptr(), source.len) };
            scratch.commit()
        };
        let old = source.take_block();
        // SAFETY: every value was relocated out of the source block.
        unsafe { raw::deallocate_slots(&source.alloc, old.ptr, old.capacity) };
        tracing::trace!(
            old_capacity = old.capacity,
            new_capacity = block.capacity,
            len = block.len,
            "devector moved across allocators"
        );
        Ok(Self::from_block(block, alloc, source.growth))
    }

    /// Replace the contents of `self` with those of `source`, leaving
    /// `source` empty with zero capacity.
    ///
    /// With a move-propagating or equal allocator the source block is
    /// stolen in O(1). Otherwise the elements are relocated into `self`'s
    /// block (reusing it when large enough). On allocation failure both
    /// devectors are unchanged.
    pub fn assign_from(&mut self, source: &mut Self) -> Result<(), DevecError> {
        if A::POLICY.propagate_on_move || self.alloc.equals(&source.alloc) {
            let old = self.take_block();
            let stolen = source.take_block();
            let old_alloc = if A::POLICY.propagate_on_move {
                mem::replace(&mut self.alloc, source.alloc.clone())
            } else {
                self.alloc.clone()
            };
            self.install(stolen);
            // SAFETY: `old` was allocated by `old_alloc` (or an equal one).
            unsafe { raw::retire_block(&old_alloc, old) };
            return Ok(());
        }

        let count = source.len;
        if self.capacity >= count {
            self.clear();
            if self.back_free_capacity() < count {
                self.front_free = 0;
            }
            // SAFETY: the destination window is free and inside our block;
            // the source block is detached below without destroying.
            unsafe { ptr::copy_nonoverlapping(source.live_ptr(), self.live_ptr(), count) };
            self.len = count;
        } else {
            let block = {
                let mut scratch = ScratchBlock::<T, _>::allocate(&self.alloc, count, 0)?;
                // SAFETY: as above.
                unsafe { scratch.relocate_from(source.live_ptr(), count) };
                scratch.commit()
            };
            let old = self.take_block();
            self.install(block);
            tracing::trace!(
                old_capacity = old.capacity,
                new_capacity = count,
                len = count,
                "devector reallocated for move assignment"
            );
            // Detach the source before running any destructor of ours.
            let moved = source.take_block();
            // SAFETY: every value was relocated out of the source block.
            unsafe { raw::deallocate_slots(&source.alloc, moved.ptr, moved.capacity) };
            // SAFETY: `old` is our previous block.
            unsafe { raw::retire_block(&self.alloc, old) };
            return Ok(());
        }
        let moved = source.take_block();
        // SAFETY: every value was relocated out of the source block.
        unsafe { raw::deallocate_slots(&source.alloc, moved.ptr, moved.capacity) };
        Ok(())
    }

    /// Make `self` a copy of `src`.
    ///
    /// Without copy propagation and with enough capacity, the existing
    /// block is reused (a panicking `clone` then leaves `self` holding
    /// the elements cloned so far). Otherwise the copy is built in a new
    /// block of exactly `src.len()` slots and `self` is untouched unless
    /// every clone succeeds.
    pub fn try_clone_from(&mut self, src: &Self) -> Result<(), DevecError>
    where
        T: Clone,
    {
        if !A::POLICY.propagate_on_copy && self.capacity >= src.len {
            self.clear();
            if self.back_free_capacity() < src.len {
                self.front_free = 0;
            }
            for item in src.iter() {
                self.push_back(item.clone())?;
            }
            return Ok(());
        }

        let new_alloc = if A::POLICY.propagate_on_copy {
            src.alloc.clone()
        } else {
            self.alloc.clone()
        };
        let block = {
            let mut scratch = ScratchBlock::<T, _>::allocate(&new_alloc, src.len, 0)?;
            scratch.extend_cloned(src);
            scratch.commit()
        };
        let old = self.take_block();
        let old_alloc = mem::replace(&mut self.alloc, new_alloc);
        self.install(block);
        tracing::trace!(
            old_capacity = old.capacity,
            new_capacity = self.capacity,
            len = self.len,
            "devector reallocated for copy assignment"
        );
        // SAFETY: `old` was allocated by `old_alloc`.
        unsafe { raw::retire_block(&old_alloc, old) };
        Ok(())
    }

    /// Clone into a block of exactly `len()` slots using a clone of the
    /// stored allocator.
    pub fn try_clone(&self) -> Result<Self, DevecError>
    where
        T: Clone,
    {
        self.clone_in(self.alloc.clone())
    }

    /// Clone into a block of exactly `len()` slots from `alloc`.
    pub fn clone_in<B: Allocator>(&self, alloc: B) -> Result<Devector<T, B>, DevecError>
    where
        T: Clone,
    {
        let block = {
            let mut scratch = ScratchBlock::<T, _>::allocate(&alloc, self.len, 0)?;
            scratch.extend_cloned(self);
            scratch.commit()
        };
        Ok(Devector::from_block(block, alloc, self.growth))
    }

    /// Exchange contents and growth policies with `other`.
    ///
    /// With swap propagation the allocators travel with their blocks.
    /// Otherwise the allocators must compare equal, else
    /// [`DevecError::IncompatibleAllocators`] is returned and nothing
    /// changes.
    pub fn try_swap(&mut self, other: &mut Self) -> Result<(), DevecError> {
        if A::POLICY.propagate_on_swap {
            mem::swap(&mut self.alloc, &mut other.alloc);
        } else if !self.alloc.equals(&other.alloc) {
            return Err(DevecError::IncompatibleAllocators);
        }
        self.swap_storage(other);
        mem::swap(&mut self.growth, &mut other.growth);
        Ok(())
    }
}

impl<T: Clone, A: Allocator> Clone for Devector<T, A> {
    /// # Panics
    ///
    /// Panics if the allocator fails.
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| raw::allocation_panic(err))
    }

    fn clone_from(&mut self, source: &Self) {
        self.try_clone_from(source)
            .unwrap_or_else(|err| raw::allocation_panic(err));
    }
}
