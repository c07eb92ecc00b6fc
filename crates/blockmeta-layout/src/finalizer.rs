//! The optional descriptor slot next to the length field.
//!
//! When the element type has a destructor, one word holding the address
//! of its [`TypeDescriptor`] is embedded in the block so the collector
//! can finalize elements without keeping the type anywhere else. The slot
//! sits on the side of the length field away from the elements: the last
//! word of a Small or Medium block, or the second word of a Large block's
//! prefix.

use std::ptr::NonNull;
use std::sync::atomic::Ordering;

use blockmeta_core::{classify, LayoutConfig, SizeClass, TypeDescriptor};

use crate::block::Block;
use crate::raw;

/// Whether a block holding elements of this type carries a descriptor slot.
///
/// An absent descriptor never needs one.
pub fn needs_slot(descriptor: Option<&dyn TypeDescriptor>) -> bool {
    descriptor.is_some_and(|d| d.has_destructor())
}

/// Byte offset of the descriptor slot in a block of `block_size` bytes.
///
/// `None` if a tail-class block is too small to hold a word.
pub fn slot_offset(block_size: usize) -> Option<usize> {
    match classify(block_size) {
        SizeClass::Large => Some(LayoutConfig::WORD),
        SizeClass::Small | SizeClass::Medium => block_size.checked_sub(LayoutConfig::WORD),
    }
}

/// Address stored in the slot for `descriptor`.
fn descriptor_addr(descriptor: &dyn TypeDescriptor) -> usize {
    std::ptr::from_ref(descriptor).cast::<()>() as usize
}

/// Write the descriptor reference into the slot at `offset`.
pub(crate) fn write_slot(block: &Block<'_>, offset: usize, descriptor: &dyn TypeDescriptor) {
    raw::word(block, offset).store(descriptor_addr(descriptor), Ordering::Relaxed);
}

/// Read back the descriptor reference embedded in a block.
///
/// Consulted at deallocation time. Returns `None` unless the allocator
/// flagged the block `STRUCT_FINAL`, or if no descriptor was ever
/// written. The pointer is the descriptor's data address; the caller
/// owns the knowledge of its concrete type.
pub fn stored_descriptor(block: &Block<'_>) -> Option<NonNull<()>> {
    if !block.attrs().has_finalizer_slot() {
        return None;
    }
    let offset = slot_offset(block.size())?;
    let addr = raw::word(block, offset).load(Ordering::Relaxed);
    NonNull::new(addr as *mut ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockBuf;
    use blockmeta_core::BlockAttr;
    use blockmeta_test_utils::MockDescriptor;

    #[test]
    fn absent_descriptor_needs_no_slot() {
        assert!(!needs_slot(None));
    }

    #[test]
    fn only_records_with_destructors_need_a_slot() {
        assert!(needs_slot(Some(&MockDescriptor::record_with_dtor())));
        assert!(!needs_slot(Some(&MockDescriptor::record())));
        assert!(!needs_slot(Some(&MockDescriptor::scalar(4))));
        assert!(!needs_slot(Some(&MockDescriptor::pointer())));
    }

    #[test]
    fn slot_offsets_per_class() {
        let w = LayoutConfig::WORD;
        assert_eq!(slot_offset(64), Some(64 - w));
        assert_eq!(slot_offset(1024), Some(1024 - w));
        assert_eq!(slot_offset(4096), Some(w));
        assert_eq!(slot_offset(w - 1), None);
    }

    #[test]
    fn stored_descriptor_requires_struct_final() {
        let td = MockDescriptor::record_with_dtor();
        let buf = BlockBuf::new(64, BlockAttr::APPENDABLE).unwrap();
        let block = buf.block();
        write_slot(&block, slot_offset(64).unwrap(), &td);

        assert_eq!(stored_descriptor(&block), None);
        let flagged = block.with_attrs(BlockAttr::APPENDABLE | BlockAttr::STRUCT_FINAL);
        let expected = NonNull::from(&td).cast::<()>();
        assert_eq!(stored_descriptor(&flagged), Some(expected));
    }

    #[test]
    fn unwritten_slot_reads_as_none() {
        let buf = BlockBuf::new(4096, BlockAttr::STRUCT_FINAL).unwrap();
        assert_eq!(stored_descriptor(&buf.block()), None);
    }
}
