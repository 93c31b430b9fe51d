//! The [`Devector`] type: layout, element access and trait plumbing.
//!
//! Construction lives in `construct.rs`, capacity management in
//! `capacity.rs`, sequence mutation in `mutate.rs`, and copy/move/swap
//! with allocator propagation in `transfer.rs`.

#![allow(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::slice;

use devec_core::{Allocator, DevecError, Global, GrowthPolicy};

use crate::raw::{self, Block};

/// A contiguous growable array with amortized O(1) push and pop at both
/// ends.
///
/// ```text
/// | front_free | live elements (len) | back_free |
/// └──────────────────── capacity ─────────────────┘
/// ```
///
/// The allocator `A` is held by value. Storage is allocated lazily: an
/// empty devector owns no block until the first growth.
///
/// # Example
///
/// ```
/// use devec::Devector;
///
/// let mut v = Devector::new();
/// v.push_back(1).unwrap();
/// v.push_back(2).unwrap();
/// v.push_front(0).unwrap();
/// assert_eq!(v, [0, 1, 2]);
/// ```
pub struct Devector<T, A: Allocator = Global> {
    /// Start of the block (dangling when nothing is allocated).
    pub(crate) ptr: NonNull<T>,
    pub(crate) capacity: usize,
    /// Uninitialised slots before the first live element.
    pub(crate) front_free: usize,
    pub(crate) len: usize,
    pub(crate) alloc: A,
    pub(crate) growth: GrowthPolicy,
    _marker: PhantomData<T>,
}

// SAFETY: the devector owns its elements and allocator exclusively.
unsafe impl<T: Send, A: Allocator + Send> Send for Devector<T, A> {}
// SAFETY: shared access only hands out `&T` and `&A`.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for Devector<T, A> {}

impl<T, A: Allocator> Devector<T, A> {
    /// Create an empty devector using `alloc`. Does not allocate.
    pub const fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            front_free: 0,
            len: 0,
            alloc,
            growth: GrowthPolicy::new(GrowthPolicy::DEFAULT_FACTOR, GrowthPolicy::DEFAULT_INCREMENT),
            _marker: PhantomData,
        }
    }

    /// Replace the growth policy after validating it.
    pub fn with_growth(mut self, growth: GrowthPolicy) -> Result<Self, DevecError> {
        growth.validate()?;
        self.growth = growth;
        Ok(self)
    }

    /// The growth policy used when an end runs out of slack.
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.growth
    }

    /// The stored allocator.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slots in the current block.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Uninitialised slots before the first element.
    pub fn front_free_capacity(&self) -> usize {
        self.front_free
    }

    /// Uninitialised slots after the last element.
    pub fn back_free_capacity(&self) -> usize {
        self.capacity - self.front_free - self.len
    }

    /// Largest capacity the allocator can provide for `T`.
    pub fn max_size(&self) -> usize {
        self.alloc.max_size::<T>()
    }

    /// Bounds-checked access.
    pub fn at(&self, index: usize) -> Result<&T, DevecError> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(DevecError::OutOfRange { index, len })
    }

    /// Bounds-checked mutable access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, DevecError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(DevecError::OutOfRange { index, len })
    }

    /// First element, if any.
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Mutable first element, if any.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// Last element, if any.
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Mutable last element, if any.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Pointer to the first live element, `None` when empty.
    pub fn data(&self) -> Option<NonNull<T>> {
        if self.len == 0 {
            None
        } else {
            NonNull::new(self.live_ptr())
        }
    }

    /// Raw pointer to the first live slot.
    ///
    /// Dangling but well-aligned when nothing is allocated.
    pub fn as_ptr(&self) -> *const T {
        self.live_ptr()
    }

    /// Mutable raw pointer to the first live slot.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.live_ptr()
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the live window holds `len` initialised values.
        unsafe { slice::from_raw_parts(self.live_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: the live window holds `len` values and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.live_ptr(), self.len) }
    }

    // ── internal layout helpers ─────────────────────────────────────

    /// Pointer to slot `front_free`.
    pub(crate) fn live_ptr(&self) -> *mut T {
        // SAFETY: front_free <= capacity, so the offset stays in (or one
        // past) the block; for an empty block it is zero.
        unsafe { self.ptr.as_ptr().add(self.front_free) }
    }

    /// Detach the current block, leaving the devector empty with zero
    /// capacity. The caller becomes responsible for the block.
    pub(crate) fn take_block(&mut self) -> Block<T> {
        let block = Block {
            ptr: self.ptr,
            capacity: self.capacity,
            front_free: self.front_free,
            len: self.len,
        };
        self.install(Block::empty());
        block
    }

    /// Point the devector at `block` without releasing anything.
    ///
    /// The previous block must already have been detached or retired.
    pub(crate) fn install(&mut self, block: Block<T>) {
        debug_assert!(block.front_free + block.len <= block.capacity);
        self.ptr = block.ptr;
        self.capacity = block.capacity;
        self.front_free = block.front_free;
        self.len = block.len;
    }

    /// Wrap a detached block.
    pub(crate) fn from_block(block: Block<T>, alloc: A, growth: GrowthPolicy) -> Self {
        let mut devector = Self::new_in(alloc);
        devector.growth = growth;
        devector.install(block);
        devector
    }

    /// Swap storage fields (not allocators, not growth policy).
    pub(crate) fn swap_storage(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.ptr, &mut other.ptr);
        std::mem::swap(&mut self.capacity, &mut other.capacity);
        std::mem::swap(&mut self.front_free, &mut other.front_free);
        std::mem::swap(&mut self.len, &mut other.len);
    }
}

impl<T> Devector<T> {
    /// Create an empty devector on the global heap. Does not allocate.
    pub const fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<T, A: Allocator> Drop for Devector<T, A> {
    fn drop(&mut self) {
        let block = self.take_block();
        // SAFETY: the block is ours and was allocated by `self.alloc`.
        unsafe { raw::retire_block(&self.alloc, block) }
    }
}

impl<T, A: Allocator + Default> Default for Devector<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: Allocator> Deref for Devector<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for Devector<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator> AsRef<[T]> for Devector<T, A> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator> AsMut<[T]> for Devector<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Devector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: Allocator, B: Allocator> PartialEq<Devector<T, B>> for Devector<T, A> {
    fn eq(&self, other: &Devector<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for Devector<T, A> {}

impl<T: PartialEq, A: Allocator> PartialEq<[T]> for Devector<T, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, A: Allocator, const N: usize> PartialEq<[T; N]> for Devector<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq, A: Allocator> PartialEq<Vec<T>> for Devector<T, A> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialOrd, A: Allocator> PartialOrd for Devector<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: Allocator> Ord for Devector<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: Allocator> Hash for Devector<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}
