//! Test utilities and mock types for blockmeta development.
//!
//! Provides a mock [`TypeDescriptor`] with a small type-kind model and an
//! FNV-1a [`checksum`] for asserting that a block's bytes were left
//! untouched.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use blockmeta_core::TypeDescriptor;

/// The kinds of element type a runtime might describe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeKind {
    /// A plain value of the given byte width.
    Scalar { size: usize },
    /// A reference to another object.
    Pointer,
    /// A composite type, optionally with a destructor.
    Record { destructor: bool },
}

/// Mock implementation of [`TypeDescriptor`].
///
/// Reports a destructor only for `Record { destructor: true }`, matching
/// how a real runtime answers the question. Counts how often it is asked
/// so tests can check the codec re-queries on every call.
#[derive(Debug)]
pub struct MockDescriptor {
    pub kind: TypeKind,
    queries: std::cell::Cell<usize>,
}

impl MockDescriptor {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            queries: std::cell::Cell::new(0),
        }
    }

    pub fn scalar(size: usize) -> Self {
        Self::new(TypeKind::Scalar { size })
    }

    pub fn pointer() -> Self {
        Self::new(TypeKind::Pointer)
    }

    /// A record without a destructor.
    pub fn record() -> Self {
        Self::new(TypeKind::Record { destructor: false })
    }

    /// A record whose elements must be destroyed.
    pub fn record_with_dtor() -> Self {
        Self::new(TypeKind::Record { destructor: true })
    }

    /// How many times `has_destructor` has been called.
    pub fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl TypeDescriptor for MockDescriptor {
    fn has_destructor(&self) -> bool {
        self.queries.set(self.queries.get() + 1);
        matches!(self.kind, TypeKind::Record { destructor: true })
    }
}

/// Thread-safe descriptor for tests that share one across threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticDescriptor {
    pub destructor: bool,
}

impl TypeDescriptor for StaticDescriptor {
    fn has_destructor(&self) -> bool {
        self.destructor
    }
}

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// FNV-1a hash over a block's bytes.
///
/// Not cryptographic; only used to compare before/after snapshots.
pub fn checksum(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |hash, &b| (hash ^ b as u64).wrapping_mul(FNV_PRIME))
}
