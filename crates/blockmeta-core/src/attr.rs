//! Block attribute flags reported by the allocator.

use bitflags::bitflags;

bitflags! {
    /// Attribute bits attached to an allocated block.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct BlockAttr: u32 {
        /// The block has a finalizer the collector must run.
        const FINALIZE     = 0b0000_0001;
        /// The block holds no pointers and need not be scanned.
        const NO_SCAN      = 0b0000_0010;
        /// The block backs an appendable array and carries a length.
        const APPENDABLE   = 0b0000_1000;
        /// Elements have destructors; a descriptor slot is embedded.
        const STRUCT_FINAL = 0b0010_0000;
        /// The block may be reached from more than one thread.
        const SHARED       = 0b1000_0000;
    }
}

impl BlockAttr {
    /// Whether length updates must use the atomic path.
    pub fn is_shared(self) -> bool {
        self.contains(Self::SHARED)
    }

    /// Whether the block carries an embedded descriptor slot.
    pub fn has_finalizer_slot(self) -> bool {
        self.contains(Self::STRUCT_FINAL)
    }
}
