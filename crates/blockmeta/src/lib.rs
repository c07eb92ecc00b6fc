//! blockmeta: in-block length bookkeeping for garbage-collected dynamic arrays.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the blockmeta sub-crates. For most users, adding `blockmeta` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use blockmeta::prelude::*;
//!
//! // Size a block for 100 bytes of elements with no destructor.
//! let size = blockmeta::layout::required_block_size(100, false).unwrap();
//! let buf = BlockBuf::new(size, BlockAttr::APPENDABLE).unwrap();
//! let block = buf.block();
//!
//! write_initial_length(&block, 100, None).unwrap();
//! compare_and_set_length(&block, 100, 102, block.is_shared(), None).unwrap();
//! assert_eq!(read_length(&block, None), 102);
//!
//! // A stale snapshot loses and must re-read.
//! let err = compare_and_set_length(&block, 100, 101, false, None).unwrap_err();
//! assert!(err.is_retryable());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `blockmeta-core` | Size classes, attributes, descriptor trait, errors |
//! | [`layout`] | `blockmeta-layout` | Blocks, padding, finalizer slot, length codec |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and constants (`blockmeta-core`).
///
/// Contains [`types::SizeClass`], [`types::BlockAttr`],
/// [`types::TypeDescriptor`], and the error types.
pub use blockmeta_core as types;

/// Block views and the length codec (`blockmeta-layout`).
///
/// Most users only need the functions re-exported in the [`prelude`].
pub use blockmeta_layout as layout;

/// Common imports for typical blockmeta usage.
///
/// ```rust
/// use blockmeta::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use blockmeta_core::{
        classify, BlockAttr, BlockError, LayoutConfig, LengthError, SizeClass, TypeDescriptor,
    };

    // Blocks
    pub use blockmeta_layout::{Block, BlockBuf};

    // Sizing
    pub use blockmeta_layout::{array_start, capacity, overhead};

    // Codec
    pub use blockmeta_layout::{
        compare_and_set_length, read_length, stored_descriptor, write_initial_length,
    };
}
