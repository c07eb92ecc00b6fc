//! Per-class overhead and sizing arithmetic.
//!
//! Callers add [`overhead`] to the capacity they want before asking the
//! allocator for a block. All arithmetic is checked; a request that
//! would overflow is reported as `None` rather than wrapping.

use blockmeta_core::{classify, LayoutConfig, SizeClass, TypeDescriptor};

use crate::block::Block;
use crate::finalizer::needs_slot;

/// Metadata bytes a block of `class` reserves.
///
/// Small and Medium pay for the length field plus, when needed, the
/// descriptor slot. Large always pays the 16-byte prefix and the trailing
/// sentinel; its slot lives inside the prefix.
pub const fn class_overhead(class: SizeClass, has_finalizer: bool) -> usize {
    let slot = if has_finalizer { LayoutConfig::WORD } else { 0 };
    match class {
        SizeClass::Small => 1 + slot,
        SizeClass::Medium => 2 + slot,
        SizeClass::Large => LayoutConfig::LARGE_PAD,
    }
}

/// Overhead to add to `requested_capacity` before allocating.
///
/// The class is chosen by classifying `requested_capacity` itself. The
/// caller must then obtain a block whose own class matches; see
/// [`required_block_size`] for a size that always does. Returns `None`
/// when `requested_capacity + overhead` is not representable.
pub fn overhead(requested_capacity: usize, has_finalizer: bool) -> Option<usize> {
    let pad = class_overhead(classify(requested_capacity), has_finalizer);
    requested_capacity.checked_add(pad)?;
    Some(pad)
}

/// Smallest granule-rounded block size that holds `capacity` bytes of
/// elements under its own class's overhead.
///
/// Padding a request can push it over a class threshold (255 bytes plus a
/// slot no longer fits a Small block). The class is re-derived from the
/// padded size until it is stable; classes only ever grow, so this
/// settles in at most three rounds.
pub fn required_block_size(capacity: usize, has_finalizer: bool) -> Option<usize> {
    let mut class = classify(capacity);
    loop {
        let padded = capacity.checked_add(class_overhead(class, has_finalizer))?;
        let size = round_up(padded, LayoutConfig::GRANULE)?;
        let actual = classify(size);
        if actual == class {
            return Some(size);
        }
        class = actual;
    }
}

fn round_up(value: usize, granule: usize) -> Option<usize> {
    let rem = value % granule;
    if rem == 0 {
        Some(value)
    } else {
        value.checked_add(granule - rem)
    }
}

/// Largest logical length `block` can record for this element type.
///
/// Zero for a block too small to hold its own metadata.
pub fn capacity(block: &Block<'_>, descriptor: Option<&dyn TypeDescriptor>) -> usize {
    block
        .size()
        .saturating_sub(class_overhead(block.class(), needs_slot(descriptor)))
}

/// Byte offset of element 0 within `block`.
pub fn array_start(block: &Block<'_>) -> usize {
    block.class().geometry().prefix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockBuf;
    use blockmeta_core::BlockAttr;
    use blockmeta_test_utils::MockDescriptor;

    const W: usize = LayoutConfig::WORD;

    #[test]
    fn small_overhead() {
        assert_eq!(overhead(64, false), Some(1));
        assert_eq!(overhead(64, true), Some(1 + W));
        assert_eq!(overhead(256, false), Some(1));
    }

    #[test]
    fn medium_overhead() {
        assert_eq!(overhead(257, false), Some(2));
        assert_eq!(overhead(4095, true), Some(2 + W));
    }

    #[test]
    fn large_overhead_ignores_finalizer() {
        assert_eq!(overhead(4096, false), Some(17));
        assert_eq!(overhead(4096, true), Some(17));
        assert_eq!(overhead(1 << 30, true), Some(17));
    }

    #[test]
    fn overflow_is_too_large() {
        assert_eq!(overhead(usize::MAX, false), None);
        assert_eq!(overhead(usize::MAX - 16, false), None);
        assert_eq!(overhead(usize::MAX - 17, false), Some(17));
    }

    #[test]
    fn required_size_stays_in_class() {
        assert_eq!(required_block_size(63, false), Some(64));
        assert_eq!(required_block_size(255, false), Some(256));
        // 256 + 1 crosses into Medium, which needs 2.
        assert_eq!(required_block_size(256, false), round_up(258, W));
        // Medium padding lands on the page boundary, which is Large.
        assert_eq!(required_block_size(4094, false), round_up(4094 + 17, W));
        assert_eq!(required_block_size(usize::MAX - 4, false), None);
    }

    #[test]
    fn required_size_respects_own_overhead() {
        for capacity in [0, 1, 100, 247, 248, 255, 256, 1000, 4078, 4079, 4080, 10_000] {
            for fin in [false, true] {
                let size = required_block_size(capacity, fin).unwrap();
                let pad = class_overhead(classify(size), fin);
                assert!(capacity + pad <= size, "capacity {capacity} fin {fin} size {size}");
                assert_eq!(size % LayoutConfig::GRANULE, 0);
            }
        }
    }

    #[test]
    fn capacity_and_array_start() {
        let small = BlockBuf::new(64, BlockAttr::empty()).unwrap();
        let large = BlockBuf::new(4096, BlockAttr::empty()).unwrap();
        let td = MockDescriptor::record_with_dtor();

        assert_eq!(capacity(&small.block(), None), 63);
        assert_eq!(capacity(&small.block(), Some(&td)), 63 - W);
        assert_eq!(capacity(&large.block(), Some(&td)), 4096 - 17);
        assert_eq!(array_start(&small.block()), 0);
        assert_eq!(array_start(&large.block()), 16);
    }

    #[test]
    fn capacity_saturates_for_tiny_blocks() {
        let tiny = BlockBuf::new(W, BlockAttr::empty()).unwrap();
        let td = MockDescriptor::record_with_dtor();
        assert_eq!(capacity(&tiny.block(), Some(&td)), 0);
    }
}
