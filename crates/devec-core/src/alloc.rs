//! The allocator facade.
//!
//! A devector never talks to the global heap directly. It asks its
//! [`Allocator`] for raw blocks, places and drops values through the
//! allocator's [`construct`](Allocator::construct) /
//! [`destroy`](Allocator::destroy) hooks, and consults the allocator's
//! [`AllocPolicy`] whenever two containers exchange storage.
//!
//! # Policy record
//!
//! ```text
//!                      copy-assign   move-assign   swap
//! propagate_on_*  →    adopt src     adopt src     swap allocators
//! !propagate      →    keep own      keep own*     require equal
//!
//! * move-assign without propagation still steals in O(1) when the two
//!   allocators compare equal (or the type is always_equal).
//! ```

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::{self, NonNull};

use crate::error::AllocError;

/// Compile-time propagation and equality policy of an allocator type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AllocPolicy {
    /// Copy assignment replaces the destination's allocator with the source's.
    pub propagate_on_copy: bool,
    /// Move assignment adopts the source's allocator together with its block.
    pub propagate_on_move: bool,
    /// Swap exchanges allocator instances together with the storage.
    pub propagate_on_swap: bool,
    /// Any two instances can free each other's blocks.
    pub always_equal: bool,
}

impl AllocPolicy {
    /// Stateless heap allocator: instances are interchangeable.
    pub const STATELESS: Self = Self {
        propagate_on_copy: false,
        propagate_on_move: true,
        propagate_on_swap: false,
        always_equal: true,
    };

    /// Stateful allocator that stays with its container in every operation.
    pub const PINNED: Self = Self {
        propagate_on_copy: false,
        propagate_on_move: false,
        propagate_on_swap: false,
        always_equal: false,
    };

    /// Stateful allocator that always travels with the storage it produced.
    pub const PROPAGATING: Self = Self {
        propagate_on_copy: true,
        propagate_on_move: true,
        propagate_on_swap: true,
        always_equal: false,
    };
}

/// Source of raw storage for a devector.
///
/// Implementations may be stateless (like [`Global`](crate::Global)) or
/// carry instance identity (an arena handle, a tracking counter). Two
/// instances that compare equal must be able to free each other's blocks.
///
/// # Contract
///
/// - [`allocate`](Self::allocate) returns a block valid for `layout` or
///   [`AllocError`]; it is never called with a zero-sized layout by the
///   container.
/// - [`deallocate`](Self::deallocate) receives exactly the layout used to
///   allocate the block.
pub trait Allocator: Clone + PartialEq {
    /// Propagation and equality policy for this allocator type.
    const POLICY: AllocPolicy;

    /// Allocate a block for `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a block previously returned by [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must have been allocated by this allocator (or one equal to it)
    /// with the same `layout`, and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Place `value` into an uninitialized slot.
    ///
    /// # Safety
    ///
    /// `slot` must be valid for writes and must not hold a live value.
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        // SAFETY: forwarded caller contract.
        unsafe { ptr::write(slot.as_ptr(), value) }
    }

    /// Drop the value held in `slot`, leaving it uninitialized.
    ///
    /// # Safety
    ///
    /// `slot` must hold a live value that is not dropped again.
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // SAFETY: forwarded caller contract.
        unsafe { ptr::drop_in_place(slot.as_ptr()) }
    }

    /// Largest slot count of `T` a single block may hold.
    fn max_size<T>(&self) -> usize {
        match std::mem::size_of::<T>() {
            0 => usize::MAX,
            size => isize::MAX as usize / size,
        }
    }

    /// Whether blocks from `self` and `other` are interchangeable.
    fn equals(&self, other: &Self) -> bool {
        Self::POLICY.always_equal || self == other
    }
}
