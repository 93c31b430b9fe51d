//! Error types for the devec workspace.
//!
//! Allocators report failure with the opaque [`AllocError`]; the container
//! wraps it (and its own contract violations) in [`DevecError`].
//! Element-level failures (`Clone`, `Default`, `Drop`) are panics and never
//! appear here.

use std::error::Error;
use std::fmt;

/// The allocator could not satisfy a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "memory allocation failed")
    }
}

impl Error for AllocError {}

/// Errors returned by fallible devector operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DevecError {
    /// A position or range does not lie within the live elements.
    OutOfRange {
        /// The offending index (range end for range operations).
        index: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },
    /// A requested capacity exceeds what the allocator can provide,
    /// or overflows while being computed.
    LengthError {
        /// Requested slot count (saturated on overflow).
        requested: usize,
        /// The allocator's `max_size` for the element type.
        max: usize,
    },
    /// The allocator returned [`AllocError`].
    AllocFailed {
        /// Size in bytes of the failed request.
        bytes: usize,
        /// Alignment of the failed request.
        align: usize,
    },
    /// `try_swap` between devectors whose allocators neither propagate on
    /// swap nor compare equal.
    IncompatibleAllocators,
    /// A [`GrowthPolicy`](crate::GrowthPolicy) failed validation.
    InvalidConfig {
        /// Description of the rejected setting.
        reason: String,
    },
}

impl fmt::Display for DevecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::LengthError { requested, max } => {
                write!(
                    f,
                    "requested capacity {requested} exceeds allocator max_size {max}"
                )
            }
            Self::AllocFailed { bytes, align } => {
                write!(f, "allocation of {bytes} bytes (align {align}) failed")
            }
            Self::IncompatibleAllocators => {
                write!(f, "cannot swap storage between unequal, non-propagating allocators")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid growth policy: {reason}"),
        }
    }
}

impl Error for DevecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AllocFailed { .. } => Some(&AllocError),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_names_index_and_len() {
        let err = DevecError::OutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 out of range for length 3");
    }

    #[test]
    fn length_error_display() {
        let err = DevecError::LengthError {
            requested: 10,
            max: 4,
        };
        assert!(err.to_string().contains("max_size 4"));
    }

    #[test]
    fn errors_are_std_errors() {
        fn assert_error<E: Error + Send + Sync + 'static>() {}
        assert_error::<DevecError>();
        assert_error::<AllocError>();
    }

    #[test]
    fn alloc_failure_has_source() {
        let err = DevecError::AllocFailed { bytes: 8, align: 8 };
        assert!(err.source().is_some());
        assert!(DevecError::IncompatibleAllocators.source().is_none());
    }
}
