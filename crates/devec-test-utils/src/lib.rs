//! Test utilities for devec development.
//!
//! - [`TrackingAlloc`]: a stateful heap allocator with instance identity
//!   and shared [`AllocStats`], parameterised over its propagation policy.
//! - [`Tripwire`]: an element whose `clone` panics once a shared budget
//!   runs out.
//! - [`DropCounter`]: an element that counts its drops.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod alloc;
pub mod fixtures;

pub use alloc::{AllocStats, PinnedAlloc, PropagatingAlloc, TrackingAlloc};
pub use fixtures::{DropCounter, Tripwire};
