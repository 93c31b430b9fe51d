//! Low-level slot primitives.
//!
//! Everything here works on raw blocks of `T` slots described by a
//! [`Block`]. Only the window `[front_free, front_free + len)` of a block
//! holds live values; the helpers never read outside it.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::mem;
use std::ptr::NonNull;

use devec_core::{Allocator, DevecError};

/// A storage block and the live window inside it.
pub(crate) struct Block<T> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) capacity: usize,
    pub(crate) front_free: usize,
    pub(crate) len: usize,
}

impl<T> Block<T> {
    /// No storage, nothing live.
    pub(crate) const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            front_free: 0,
            len: 0,
        }
    }
}

/// Layout of a block of `capacity` slots, bounded by the allocator's
/// `max_size`.
pub(crate) fn slots_layout<T, A: Allocator>(alloc: &A, capacity: usize) -> Result<Layout, DevecError> {
    let max = alloc.max_size::<T>();
    if capacity > max {
        return Err(DevecError::LengthError {
            requested: capacity,
            max,
        });
    }
    Layout::array::<T>(capacity).map_err(|_| DevecError::LengthError {
        requested: capacity,
        max,
    })
}

/// Allocate `capacity` uninitialised slots.
///
/// Zero-byte blocks (empty or zero-sized `T`) never reach the allocator.
pub(crate) fn allocate_slots<T, A: Allocator>(
    alloc: &A,
    capacity: usize,
) -> Result<NonNull<T>, DevecError> {
    let layout = slots_layout::<T, A>(alloc, capacity)?;
    if layout.size() == 0 {
        return Ok(NonNull::dangling());
    }
    alloc.allocate(layout).map(NonNull::cast).map_err(|_| {
        tracing::debug!(
            bytes = layout.size(),
            align = layout.align(),
            "devector allocation failed"
        );
        DevecError::AllocFailed {
            bytes: layout.size(),
            align: layout.align(),
        }
    })
}

/// Return a block to the allocator without touching its slots.
///
/// # Safety
///
/// `ptr` must come from [`allocate_slots`] with the same `capacity` and an
/// allocator equal to `alloc`. No live values may remain in the block.
pub(crate) unsafe fn deallocate_slots<T, A: Allocator>(alloc: &A, ptr: NonNull<T>, capacity: usize) {
    let bytes = mem::size_of::<T>() * capacity;
    if bytes == 0 {
        return;
    }
    // SAFETY: the same size/align pair produced a valid layout at allocation.
    let layout = unsafe { Layout::from_size_align_unchecked(bytes, mem::align_of::<T>()) };
    // SAFETY: forwarded caller contract.
    unsafe { alloc.deallocate(ptr.cast(), layout) }
}

/// Destroy `len` consecutive live values starting at `first`.
///
/// If one destructor panics, the remaining values are still destroyed
/// while unwinding; a second panic aborts, as for slices.
///
/// # Safety
///
/// `[first, first + len)` must hold live values that are not used again.
pub(crate) unsafe fn destroy_slots<T, A: Allocator>(alloc: &A, first: *mut T, len: usize) {
    struct Remaining<'a, T, A: Allocator> {
        alloc: &'a A,
        next: *mut T,
        left: usize,
    }

    impl<T, A: Allocator> Remaining<'_, T, A> {
        fn destroy_next(&mut self) {
            let slot = self.next;
            self.left -= 1;
            // SAFETY: `left` counts live slots from `next` onwards.
            unsafe {
                self.next = slot.add(1);
                self.alloc.destroy(NonNull::new_unchecked(slot));
            }
        }
    }

    impl<T, A: Allocator> Drop for Remaining<'_, T, A> {
        fn drop(&mut self) {
            // Only non-empty when a destructor panicked.
            while self.left > 0 {
                self.destroy_next();
            }
        }
    }

    let mut rest = Remaining {
        alloc,
        next: first,
        left: len,
    };
    while rest.left > 0 {
        rest.destroy_next();
    }
}

/// Destroy the live window of `block`, then free it.
///
/// The block is freed even if a destructor panics.
///
/// # Safety
///
/// `block` must describe storage owned by the caller, allocated by an
/// allocator equal to `alloc`, with a live window matching its fields.
pub(crate) unsafe fn retire_block<T, A: Allocator>(alloc: &A, block: Block<T>) {
    struct Release<'a, T, A: Allocator> {
        alloc: &'a A,
        ptr: NonNull<T>,
        capacity: usize,
    }

    impl<T, A: Allocator> Drop for Release<'_, T, A> {
        fn drop(&mut self) {
            // SAFETY: the block came from this allocator; its values are gone.
            unsafe { deallocate_slots(self.alloc, self.ptr, self.capacity) }
        }
    }

    let release = Release {
        alloc,
        ptr: block.ptr,
        capacity: block.capacity,
    };
    // SAFETY: the live window lies inside the block.
    unsafe {
        let first = release.ptr.as_ptr().add(block.front_free);
        destroy_slots(alloc, first, block.len);
    }
}

/// Panic for infallible trait entry points (`Clone`, `FromIterator`,
/// `Extend`, `devector!`) whose signatures cannot return [`DevecError`].
#[cold]
#[inline(never)]
pub fn allocation_panic(err: DevecError) -> ! {
    panic!("devector allocation failed: {err}")
}
