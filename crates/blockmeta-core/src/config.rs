//! Layout constants shared by every block encoding.

/// Fixed geometry of the in-block metadata layout.
///
/// These values are part of the on-block format: a reader and a writer
/// must agree on all of them, so they are compile-time constants rather
/// than runtime knobs. Collected on one type so callers sizing
/// allocations can refer to them by name.
#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig;

impl LayoutConfig {
    /// Allocator page size. Blocks of at least this size are Large.
    pub const PAGE_SIZE: usize = 4096;

    /// Largest block size that is still Small.
    pub const SMALL_MAX: usize = 256;

    /// Bytes reserved at the front of a Large block before element 0.
    ///
    /// Holds the length word and, when present, the finalizer slot.
    /// Element 0 therefore starts 16-byte aligned.
    pub const LARGE_PREFIX: usize = 16;

    /// Bytes reserved at the very end of a Large block.
    ///
    /// Keeps a pointer one past the last element from landing on the
    /// first byte of the neighbouring block.
    pub const LARGE_SENTINEL: usize = 1;

    /// Width of a machine word, and of the finalizer slot.
    pub const WORD: usize = std::mem::size_of::<usize>();

    /// Required alignment of a block's base address.
    pub const BLOCK_ALIGN: usize = 16;

    /// Block sizes must be a multiple of this granule.
    ///
    /// Guarantees every metadata field lands on an offset aligned for
    /// its width.
    pub const GRANULE: usize = Self::WORD;

    /// Total overhead of a Large block, independent of the finalizer.
    pub const LARGE_PAD: usize = Self::LARGE_PREFIX + Self::LARGE_SENTINEL;
}
