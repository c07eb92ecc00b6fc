//! Core types and traits for in-block array length bookkeeping.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the layout codec and its callers: the
//! size-class table, block attribute flags, the type-descriptor
//! capability, layout constants, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attr;
pub mod class;
pub mod config;
pub mod error;
pub mod traits;

pub use attr::BlockAttr;
pub use class::{classify, ClassGeometry, SizeClass};
pub use config::LayoutConfig;
pub use error::{BlockError, LengthError};
pub use traits::TypeDescriptor;
