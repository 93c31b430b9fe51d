//! Core types and traits for the devec workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the allocator facade consumed by [`Devector`](../devec/struct.Devector.html),
//! the per-allocator propagation policy record, the default [`Global`]
//! allocator, growth configuration, and the shared error types.
//!
//! The allocator facade is the only place outside the container itself
//! that touches raw memory; [`alloc`] and [`global`] are the two modules
//! that may contain `unsafe` code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod alloc;
pub mod config;
pub mod error;
pub mod global;

pub use alloc::{AllocPolicy, Allocator};
pub use config::GrowthPolicy;
pub use error::{AllocError, DevecError};
pub use global::Global;
