//! Borrowed block views and an owned, aligned block buffer.
//!
//! A [`Block`] is what the codec operates on: a base address, a size, and
//! the allocator's attribute bits. It never owns memory. A [`BlockBuf`]
//! is a heap allocation with the alignment the layout requires, used
//! wherever a caller needs a block without a collector behind it.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::sync::atomic::Ordering;

use blockmeta_core::{classify, BlockAttr, BlockError, LayoutConfig, SizeClass};

use crate::raw;

/// A borrowed view of one allocator block.
///
/// Copyable and shareable across threads: every access the codec makes
/// through a `Block` is atomic, so copies racing on the same memory do
/// not constitute a data race.
#[derive(Clone, Copy)]
pub struct Block<'a> {
    base: NonNull<u8>,
    size: usize,
    attrs: BlockAttr,
    _memory: PhantomData<&'a [UnsafeCell<u8>]>,
}

// SAFETY: a Block only reaches its memory through atomic operations (see
// `raw`), and `from_raw_parts` requires that nothing else touches it
// non-atomically while the view is alive.
unsafe impl Send for Block<'_> {}
// SAFETY: as above.
unsafe impl Sync for Block<'_> {}

impl<'a> Block<'a> {
    /// Wrap allocator memory in a block view.
    ///
    /// Rejects a zero size, a base not aligned to
    /// [`LayoutConfig::BLOCK_ALIGN`], and a size that is not a multiple of
    /// [`LayoutConfig::GRANULE`].
    ///
    /// # Safety
    ///
    /// `base` must be valid for reads and writes of `size` bytes for the
    /// whole of `'a`, and during `'a` that memory must only be accessed
    /// through atomic operations (such as the ones this crate performs).
    pub unsafe fn from_raw_parts(
        base: NonNull<u8>,
        size: usize,
        attrs: BlockAttr,
    ) -> Result<Self, BlockError> {
        validate_size(size)?;
        let addr = base.as_ptr() as usize;
        if addr % LayoutConfig::BLOCK_ALIGN != 0 {
            return Err(BlockError::Misaligned {
                addr,
                align: LayoutConfig::BLOCK_ALIGN,
            });
        }
        Ok(Self {
            base,
            size,
            attrs,
            _memory: PhantomData,
        })
    }

    /// Base address of the block.
    pub fn base(&self) -> NonNull<u8> {
        self.base
    }

    /// Size of the block in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Allocator attribute bits.
    pub fn attrs(&self) -> BlockAttr {
        self.attrs
    }

    /// The same block with different attribute bits.
    pub fn with_attrs(self, attrs: BlockAttr) -> Self {
        Self { attrs, ..self }
    }

    /// Size class derived from [`Block::size`].
    pub fn class(&self) -> SizeClass {
        classify(self.size)
    }

    /// Whether the allocator marked this block as shared across threads.
    pub fn is_shared(&self) -> bool {
        self.attrs.is_shared()
    }
}

impl fmt::Debug for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("base", &self.base)
            .field("size", &self.size)
            .field("class", &self.class())
            .field("attrs", &self.attrs)
            .finish()
    }
}

fn validate_size(size: usize) -> Result<(), BlockError> {
    if size == 0 {
        return Err(BlockError::ZeroSize);
    }
    if size % LayoutConfig::GRANULE != 0 {
        return Err(BlockError::UnevenSize {
            size,
            granule: LayoutConfig::GRANULE,
        });
    }
    Ok(())
}

/// An owned, zero-initialised block with the layout's alignment.
///
/// The buffer hands out [`Block`] views tied to its own lifetime. Its
/// memory is never exposed as a plain slice while views may exist.
pub struct BlockBuf {
    ptr: NonNull<u8>,
    layout: Layout,
    attrs: BlockAttr,
}

// SAFETY: the buffer owns its allocation; shared access only happens via
// `Block` views, which are atomic-only.
unsafe impl Send for BlockBuf {}
// SAFETY: as above; `&self` methods never write non-atomically.
unsafe impl Sync for BlockBuf {}

impl BlockBuf {
    /// Allocate a zeroed block of `size` bytes.
    pub fn new(size: usize, attrs: BlockAttr) -> Result<Self, BlockError> {
        validate_size(size)?;
        let layout = Layout::from_size_align(size, LayoutConfig::BLOCK_ALIGN)
            .map_err(|_| BlockError::AllocationFailed { size })?;
        // SAFETY: `layout` has a non-zero size (checked above).
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            tracing::debug!(size, "block allocation failed");
            return Err(BlockError::AllocationFailed { size });
        };
        Ok(Self { ptr, layout, attrs })
    }

    /// A view of this buffer carrying its attribute bits.
    pub fn block(&self) -> Block<'_> {
        Block {
            base: self.ptr,
            size: self.layout.size(),
            attrs: self.attrs,
            _memory: PhantomData,
        }
    }

    /// Size of the buffer in bytes.
    pub fn size(&self) -> usize {
        self.layout.size()
    }

    /// Attribute bits given at construction.
    pub fn attrs(&self) -> BlockAttr {
        self.attrs
    }

    /// Copy out the current contents.
    ///
    /// Not a consistent snapshot if other threads are updating the block
    /// at the same time.
    pub fn snapshot(&self) -> Vec<u8> {
        let block = self.block();
        (0..block.size())
            .map(|offset| raw::byte(&block, offset).load(Ordering::Relaxed))
            .collect()
    }

    /// Overwrite every byte with `byte`.
    pub fn fill(&mut self, byte: u8) {
        // SAFETY: `&mut self` excludes live views; the allocation spans
        // exactly `layout.size()` bytes.
        unsafe { self.ptr.as_ptr().write_bytes(byte, self.layout.size()) };
    }
}

impl Drop for BlockBuf {
    fn drop(&mut self) {
        // SAFETY: allocated in `new` with this exact layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

impl fmt::Debug for BlockBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockBuf")
            .field("size", &self.size())
            .field("attrs", &self.attrs)
            .finish()
    }
}
