//! The default allocator, backed by the process-wide heap.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

use crate::alloc::{AllocPolicy, Allocator};
use crate::error::AllocError;

/// Stateless allocator over `std::alloc`.
///
/// All instances are equal, so storage moves freely between containers.
/// Zero-sized layouts are answered with a dangling, well-aligned pointer
/// and never reach the heap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

impl Allocator for Global {
    const POLICY: AllocPolicy = AllocPolicy::STATELESS;

    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return NonNull::new(ptr::without_provenance_mut(layout.align())).ok_or(AllocError);
        }
        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw).ok_or(AllocError)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            // SAFETY: caller guarantees ptr came from allocate(layout).
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_respects_alignment() {
        let layout = Layout::from_size_align(64, 32).unwrap();
        let block = Global.allocate(layout).unwrap();
        assert_eq!(block.as_ptr() as usize % 32, 0);
        unsafe { Global.deallocate(block, layout) };
    }

    #[test]
    fn zero_sized_layout_is_dangling() {
        let layout = Layout::from_size_align(0, 16).unwrap();
        let block = Global.allocate(layout).unwrap();
        assert_eq!(block.as_ptr() as usize, 16);
        unsafe { Global.deallocate(block, layout) };
    }
}
