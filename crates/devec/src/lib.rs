//! Double-ended contiguous vector with pluggable allocators.
//!
//! A [`Devector`] is a single contiguous buffer with free capacity tracked
//! independently at both ends, so pushing to the front is as cheap as
//! pushing to the back without deque-style chunking or ring wrap-around.
//! The live elements always form one slice.
//!
//! # Architecture
//!
//! ```text
//! Devector<T, A>
//! ├── ptr ──► | front_free | live elements (len) | back_free |
//! │           └──────────────── capacity ─────────────────────┘
//! ├── alloc: A          (Allocator facade, held by value)
//! └── growth: GrowthPolicy
//!
//! raw      → slot allocation, destruction and block retirement
//! scratch  → ScratchBlock: replacement storage built in isolation,
//!            committed only when complete (dropped on failure)
//! ```
//!
//! # Failure safety
//!
//! Every reallocating operation builds its replacement in a scratch
//! block and swaps it in only after it is complete. An
//! allocator failure is returned as [`DevecError`] with the devector left
//! exactly as before; a panicking `Clone`/`Default`/constructor closure
//! unwinds through drop guards that destroy what was built and free the
//! scratch block. Relocating elements is a bitwise move and cannot fail.
//!
//! # Unsafe code
//!
//! This crate manages uninitialised storage directly. Every `unsafe` block
//! carries a `// SAFETY:` comment naming the invariant it relies on.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

mod capacity;
mod construct;
pub mod devector;
pub mod iter;
mod macros;
mod mutate;
mod raw;
mod scratch;
mod transfer;

pub use devec_core::{AllocError, AllocPolicy, Allocator, DevecError, Global, GrowthPolicy};
pub use devector::Devector;
pub use iter::IntoIter;

#[doc(hidden)]
pub use raw::allocation_panic as __allocation_panic;
