//! Reading and updating the logical length stored in a block.
//!
//! Three operations, one per phase of an array's life:
//!
//! - [`write_initial_length`] establishes the length of a fresh block.
//! - [`compare_and_set_length`] moves it from a known value to a new one,
//!   atomically when the block is shared.
//! - [`read_length`] reads it back.
//!
//! Each call re-derives the field's location from the block size and the
//! element type; nothing is cached between calls.

use blockmeta_core::{classify, LayoutConfig, LengthError, SizeClass, TypeDescriptor};

use crate::block::Block;
use crate::finalizer::{self, needs_slot};
use crate::padding::class_overhead;
use crate::raw::LengthCell;

/// Where the length field and descriptor slot sit in one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FieldPlacement {
    class: SizeClass,
    length_offset: usize,
    slot_offset: Option<usize>,
}

impl FieldPlacement {
    /// `None` if a block of `block_size` cannot hold its own metadata.
    fn locate(block_size: usize, has_slot: bool) -> Option<Self> {
        let class = classify(block_size);
        let slot_offset = if has_slot {
            Some(finalizer::slot_offset(block_size)?)
        } else {
            None
        };
        let length_offset = match class {
            SizeClass::Small | SizeClass::Medium => {
                let slot = if has_slot { LayoutConfig::WORD } else { 0 };
                block_size
                    .checked_sub(slot)?
                    .checked_sub(class.geometry().length_width)?
            }
            SizeClass::Large => 0,
        };
        Some(Self {
            class,
            length_offset,
            slot_offset,
        })
    }

    fn cell<'a>(&self, block: &Block<'a>) -> LengthCell<'a> {
        LengthCell::at(block, self.class, self.length_offset)
    }

    fn refresh_slot(&self, block: &Block<'_>, descriptor: Option<&dyn TypeDescriptor>) {
        if let (Some(offset), Some(descriptor)) = (self.slot_offset, descriptor) {
            finalizer::write_slot(block, offset, descriptor);
        }
    }
}

/// Check that `new_length` plus the class overhead fits, and locate the field.
fn fit(block: &Block<'_>, new_length: usize, has_slot: bool) -> Result<FieldPlacement, LengthError> {
    let class = block.class();
    let pad = class_overhead(class, has_slot);
    let fits = new_length
        .checked_add(pad)
        .is_some_and(|total| total <= block.size());
    let placement = fits
        .then(|| FieldPlacement::locate(block.size(), has_slot))
        .flatten();
    placement.ok_or_else(|| {
        let capacity = block.size().saturating_sub(pad);
        tracing::trace!(
            size = block.size(),
            %class,
            requested = new_length,
            capacity,
            "length does not fit block"
        );
        LengthError::CapacityExceeded {
            requested: new_length,
            capacity,
            class,
        }
    })
}

/// Read the logical length stored in `block`.
///
/// Unsynchronised: callers sharing the block across threads provide their
/// own ordering.
///
/// # Panics
///
/// Panics if the block is too small to hold the metadata its class and
/// `descriptor` call for. Blocks sized with
/// [`overhead`](crate::padding::overhead) never are.
pub fn read_length(block: &Block<'_>, descriptor: Option<&dyn TypeDescriptor>) -> usize {
    let Some(placement) = FieldPlacement::locate(block.size(), needs_slot(descriptor)) else {
        panic!(
            "{}-byte {} block cannot hold a length field",
            block.size(),
            block.class()
        );
    };
    placement.cell(block).load()
}

/// Establish the length of a freshly obtained block.
///
/// No previous length exists to race against, so the value is stored
/// unconditionally. If the element type has a destructor its descriptor
/// is written into the adjacent slot as well.
pub fn write_initial_length(
    block: &Block<'_>,
    new_length: usize,
    descriptor: Option<&dyn TypeDescriptor>,
) -> Result<(), LengthError> {
    let placement = fit(block, new_length, needs_slot(descriptor))?;
    placement.cell(block).store(new_length);
    placement.refresh_slot(block, descriptor);
    Ok(())
}

/// Move the stored length from `old_length` to `new_length`.
///
/// With `is_shared` the update is a single compare-and-swap; otherwise it
/// is a plain read, compare, and write, valid only while one thread owns
/// the block. Either way a mismatch leaves memory untouched and returns
/// [`LengthError::LostRace`]; the caller re-reads and retries. On success
/// the descriptor slot, when present, is rewritten.
pub fn compare_and_set_length(
    block: &Block<'_>,
    old_length: usize,
    new_length: usize,
    is_shared: bool,
    descriptor: Option<&dyn TypeDescriptor>,
) -> Result<(), LengthError> {
    let placement = fit(block, new_length, needs_slot(descriptor))?;
    let cell = placement.cell(block);

    let outcome = if old_length > placement.class.max_encodable() {
        // Narrowing would alias a different stored value.
        Err(cell.load())
    } else if is_shared {
        cell.compare_exchange(old_length, new_length)
    } else {
        let found = cell.load();
        if found == old_length {
            cell.store(new_length);
            Ok(())
        } else {
            Err(found)
        }
    };

    if let Err(found) = outcome {
        tracing::trace!(
            size = block.size(),
            expected = old_length,
            found,
            is_shared,
            "length update lost race"
        );
        return Err(LengthError::LostRace {
            expected: old_length,
            found,
        });
    }

    placement.refresh_slot(block, descriptor);
    Ok(())
}
