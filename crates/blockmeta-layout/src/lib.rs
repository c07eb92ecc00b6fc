//! Size-classed length encoding for garbage-collected array blocks.
//!
//! Given a block handed out by the allocator, this crate stores, reads,
//! and atomically updates the array's logical length inside the block
//! itself, and optionally embeds a reference to the element type's
//! descriptor so the collector can finalize elements later. This crate
//! is the only one in the workspace that contains `unsafe` code.
//!
//! # Layout
//!
//! The encoding is chosen by block size alone; no tag is stored:
//!
//! ```text
//! Small  (size <= 256)          [ elements ... | len:u8  | slot? ]
//! Medium (256 < size < 4096)    [ elements ... | len:u16 | slot? ]
//! Large  (size >= 4096)         [ len:usize | slot? | pad ][ elements ... | sentinel ]
//!                               \_______ 16 bytes _______/
//! ```
//!
//! `slot` is one word holding the descriptor address and is present only
//! when the element type has a destructor.
//!
//! # Concurrency
//!
//! Every metadata access goes through an atomic cell. Unshared updates use
//! relaxed loads and stores; shared updates use a single compare-and-swap
//! and never retry.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod block;
pub mod codec;
pub mod finalizer;
pub mod padding;
mod raw;

// Public re-exports for the primary API surface.
pub use block::{Block, BlockBuf};
pub use codec::{compare_and_set_length, read_length, write_initial_length};
pub use finalizer::{needs_slot, slot_offset, stored_descriptor};
pub use padding::{array_start, capacity, class_overhead, overhead, required_block_size};
