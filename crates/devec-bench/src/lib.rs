//! Benchmark workloads for the devec container.
//!
//! - [`alternating_fill`]: a devector built by alternating front and back
//!   pushes, the shape that exercises both slack regions.
//! - [`stride_positions`]: deterministic interior insert positions that
//!   sweep the whole sequence without a random number generator.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use devec::Devector;

/// Element count used by the standard benchmark profiles.
pub const PROFILE_LEN: usize = 10_000;

/// Build a devector of `n` elements, pushing even values at the back and
/// odd values at the front.
///
/// # Panics
///
/// Panics if the global allocator fails.
pub fn alternating_fill(n: usize) -> Devector<u64> {
    let mut v = Devector::new();
    for i in 0..n as u64 {
        if i % 2 == 0 {
            v.push_back(i).expect("bench workload allocation");
        } else {
            v.push_front(i).expect("bench workload allocation");
        }
    }
    v
}

/// `count` insert positions for a sequence that starts at `len` elements
/// and grows by one per insert. Positions advance by a fixed prime stride
/// modulo the current length.
pub fn stride_positions(len: usize, count: usize) -> Vec<usize> {
    const STRIDE: usize = 7_919;
    let mut at = 0usize;
    (0..count)
        .map(|k| {
            at = (at + STRIDE) % (len + k + 1);
            at
        })
        .collect()
}
