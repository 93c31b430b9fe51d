//! Tracking allocator.
//!
//! Every [`TrackingAlloc`] handle carries an `id` (equality compares ids
//! only) and a shared [`AllocStats`] record. Handles created with
//! [`TrackingAlloc::sibling`] share the record with their origin, so one
//! test can watch several differently-identified allocators at once.

use std::alloc::Layout;
use std::cell::RefCell;
use std::ptr::{self, NonNull};
use std::rc::Rc;

use devec_core::{AllocError, AllocPolicy, Allocator, Global};

/// Counters shared by a family of [`TrackingAlloc`] handles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    pub allocations: usize,
    pub deallocations: usize,
    pub live_bytes: usize,
    pub constructs: usize,
    pub destroys: usize,
    /// Remaining successful allocations before every request fails.
    /// `None` means unlimited.
    pub fail_after: Option<usize>,
}

impl AllocStats {
    /// Blocks allocated and not yet freed.
    pub fn live_blocks(&self) -> usize {
        self.allocations - self.deallocations
    }
}

/// Stateful allocator over the global heap.
///
/// `COPY`, `MOVE` and `SWAP` select the `propagate_on_*` flags; instances
/// are never `always_equal`.
#[derive(Clone, Debug)]
pub struct TrackingAlloc<const COPY: bool, const MOVE: bool, const SWAP: bool> {
    id: u32,
    stats: Rc<RefCell<AllocStats>>,
}

/// Allocator that stays with its container.
pub type PinnedAlloc = TrackingAlloc<false, false, false>;

/// Allocator that travels with its storage on copy, move and swap.
pub type PropagatingAlloc = TrackingAlloc<true, true, true>;

impl<const COPY: bool, const MOVE: bool, const SWAP: bool> TrackingAlloc<COPY, MOVE, SWAP> {
    /// Fresh allocator with its own stats record.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            stats: Rc::new(RefCell::new(AllocStats::default())),
        }
    }

    /// A differently-identified allocator sharing this one's stats.
    pub fn sibling(&self, id: u32) -> Self {
        Self {
            id,
            stats: Rc::clone(&self.stats),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Snapshot of the shared counters.
    pub fn stats(&self) -> AllocStats {
        *self.stats.borrow()
    }

    /// Let the next `n` allocations succeed, then fail every request.
    pub fn fail_after(&self, n: usize) {
        self.stats.borrow_mut().fail_after = Some(n);
    }

    /// Remove any failure budget.
    pub fn never_fail(&self) {
        self.stats.borrow_mut().fail_after = None;
    }
}

impl<const COPY: bool, const MOVE: bool, const SWAP: bool> PartialEq for TrackingAlloc<COPY, MOVE, SWAP> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[allow(unsafe_code)]
impl<const COPY: bool, const MOVE: bool, const SWAP: bool> Allocator for TrackingAlloc<COPY, MOVE, SWAP> {
    const POLICY: AllocPolicy = AllocPolicy {
        propagate_on_copy: COPY,
        propagate_on_move: MOVE,
        propagate_on_swap: SWAP,
        always_equal: false,
    };

    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        {
            let mut stats = self.stats.borrow_mut();
            match stats.fail_after {
                Some(0) => return Err(AllocError),
                Some(ref mut left) => *left -= 1,
                None => {}
            }
        }
        let ptr = Global.allocate(layout)?;
        let mut stats = self.stats.borrow_mut();
        stats.allocations += 1;
        stats.live_bytes += layout.size();
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        {
            let mut stats = self.stats.borrow_mut();
            stats.deallocations += 1;
            stats.live_bytes -= layout.size();
        }
        // SAFETY: every block handed out came from `Global`.
        unsafe { Global.deallocate(ptr, layout) }
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        self.stats.borrow_mut().constructs += 1;
        // SAFETY: forwarded caller contract.
        unsafe { ptr::write(slot.as_ptr(), value) }
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // The borrow must end before the destructor runs: it may free
        // storage through a handle of this same family.
        self.stats.borrow_mut().destroys += 1;
        // SAFETY: forwarded caller contract.
        unsafe { ptr::drop_in_place(slot.as_ptr()) }
    }
}
