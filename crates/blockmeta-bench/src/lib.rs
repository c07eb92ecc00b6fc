//! Benchmark profiles for blockmeta.
//!
//! - [`PROFILE_SIZES`]: one representative block size per size class.
//! - [`prepared_block`]: a buffer with its length already established.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use blockmeta_core::{BlockAttr, SizeClass, TypeDescriptor};
use blockmeta_layout::{capacity, write_initial_length, BlockBuf};

/// One block size per class: Small, Medium, Large.
pub const PROFILE_SIZES: [(SizeClass, usize); 3] = [
    (SizeClass::Small, 64),
    (SizeClass::Medium, 1024),
    (SizeClass::Large, 8192),
];

/// Allocate a block of `size` bytes holding half its capacity.
///
/// # Panics
///
/// Panics if `size` is not a valid block size.
pub fn prepared_block(
    size: usize,
    attrs: BlockAttr,
    descriptor: Option<&dyn TypeDescriptor>,
) -> BlockBuf {
    let buf = BlockBuf::new(size, attrs).unwrap();
    let half = capacity(&buf.block(), descriptor) / 2;
    write_initial_length(&buf.block(), half, descriptor).unwrap();
    buf
}
