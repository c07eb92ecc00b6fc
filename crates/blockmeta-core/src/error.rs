//! Error types for length bookkeeping and block construction.
//!
//! None of these are faults: every variant is an "operation did not
//! apply" signal that the caller resolves by reallocating or retrying.

use std::error::Error;
use std::fmt;

use crate::class::SizeClass;

/// A length update that was not applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LengthError {
    /// The new length plus the class overhead does not fit in the block.
    ///
    /// Also reported when that sum overflows `usize`. The caller must
    /// obtain a larger block and restart its growth sequence.
    CapacityExceeded {
        /// Logical length that was requested.
        requested: usize,
        /// Largest logical length the block can hold.
        capacity: usize,
        /// Class of the block the write was attempted against.
        class: SizeClass,
    },
    /// The stored length no longer matched the caller's snapshot.
    ///
    /// Another writer got there first. Memory was not modified; the
    /// caller must re-read the block and retry.
    LostRace {
        /// Length the caller expected to replace.
        expected: usize,
        /// Length actually found in the block.
        found: usize,
    },
}

impl LengthError {
    /// Whether retrying against the same block could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LostRace { .. })
    }
}

impl fmt::Display for LengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                capacity,
                class,
            } => {
                write!(
                    f,
                    "length {requested} does not fit in {class} block (capacity {capacity})"
                )
            }
            Self::LostRace { expected, found } => {
                write!(f, "length changed concurrently: expected {expected}, found {found}")
            }
        }
    }
}

impl Error for LengthError {}

/// A memory region that cannot be used as a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockError {
    /// A block must span at least one granule.
    ZeroSize,
    /// The base address is not aligned to `BLOCK_ALIGN`.
    Misaligned {
        /// The offending base address.
        addr: usize,
        /// Required alignment in bytes.
        align: usize,
    },
    /// The size is not a multiple of the block granule.
    UnevenSize {
        /// The offending size in bytes.
        size: usize,
        /// Required granule in bytes.
        granule: usize,
    },
    /// The global allocator could not provide the memory.
    AllocationFailed {
        /// Number of bytes requested.
        size: usize,
    },
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize => write!(f, "block size must be non-zero"),
            Self::Misaligned { addr, align } => {
                write!(f, "block base {addr:#x} is not {align}-byte aligned")
            }
            Self::UnevenSize { size, granule } => {
                write!(f, "block size {size} is not a multiple of {granule}")
            }
            Self::AllocationFailed { size } => {
                write!(f, "failed to allocate a {size}-byte block")
            }
        }
    }
}

impl Error for BlockError {}
