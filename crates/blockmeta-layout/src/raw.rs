//! Low-level atomic access to metadata fields inside a block.
//!
//! Every read or write of block memory in this crate goes through one of
//! the accessors below. Each one bounds-checks `offset + width` against
//! the block size and checks natural alignment before handing out an
//! atomic reference, so a bad offset panics instead of touching memory
//! outside the block.

#![allow(unsafe_code)]

use std::sync::atomic::{AtomicU16, AtomicU8, AtomicUsize, Ordering};

use blockmeta_core::SizeClass;

use crate::block::Block;

/// Pointer to `width` bytes at `offset`, after bounds and alignment checks.
fn field_ptr(block: &Block<'_>, offset: usize, width: usize) -> *mut u8 {
    let in_bounds = offset
        .checked_add(width)
        .is_some_and(|end| end <= block.size());
    assert!(
        in_bounds,
        "field [{offset}, +{width}) lies outside a {}-byte block",
        block.size()
    );
    let ptr = block.base().as_ptr().wrapping_add(offset);
    assert_eq!(
        ptr as usize % width,
        0,
        "field at offset {offset} is not {width}-byte aligned"
    );
    ptr
}

macro_rules! atomic_field {
    ($name:ident, $atomic:ty, $int:ty) => {
        pub(crate) fn $name<'a>(block: &Block<'a>, offset: usize) -> &'a $atomic {
            let ptr = field_ptr(block, offset, std::mem::size_of::<$int>());
            // SAFETY: `ptr` is in bounds and aligned (checked above), and
            // `Block` guarantees the memory lives for `'a` and is only
            // accessed atomically.
            unsafe { <$atomic>::from_ptr(ptr.cast::<$int>()) }
        }
    };
}

atomic_field!(byte, AtomicU8, u8);
atomic_field!(half, AtomicU16, u16);
atomic_field!(word, AtomicUsize, usize);

/// A length field viewed at the width its size class dictates.
#[derive(Clone, Copy)]
pub(crate) enum LengthCell<'a> {
    Byte(&'a AtomicU8),
    Half(&'a AtomicU16),
    Word(&'a AtomicUsize),
}

impl<'a> LengthCell<'a> {
    pub(crate) fn at(block: &Block<'a>, class: SizeClass, offset: usize) -> Self {
        match class {
            SizeClass::Small => Self::Byte(byte(block, offset)),
            SizeClass::Medium => Self::Half(half(block, offset)),
            SizeClass::Large => Self::Word(word(block, offset)),
        }
    }

    pub(crate) fn load(self) -> usize {
        match self {
            Self::Byte(a) => a.load(Ordering::Relaxed) as usize,
            Self::Half(a) => a.load(Ordering::Relaxed) as usize,
            Self::Word(a) => a.load(Ordering::Relaxed),
        }
    }

    /// Plain store. Callers have already checked `value` fits the width.
    pub(crate) fn store(self, value: usize) {
        match self {
            Self::Byte(a) => a.store(value as u8, Ordering::Relaxed),
            Self::Half(a) => a.store(value as u16, Ordering::Relaxed),
            Self::Word(a) => a.store(value, Ordering::Relaxed),
        }
    }

    /// Single compare-and-swap; returns the value found on failure.
    pub(crate) fn compare_exchange(self, current: usize, new: usize) -> Result<(), usize> {
        const SUCCESS: Ordering = Ordering::AcqRel;
        const FAILURE: Ordering = Ordering::Acquire;
        match self {
            Self::Byte(a) => a
                .compare_exchange(current as u8, new as u8, SUCCESS, FAILURE)
                .map(drop)
                .map_err(usize::from),
            Self::Half(a) => a
                .compare_exchange(current as u16, new as u16, SUCCESS, FAILURE)
                .map(drop)
                .map_err(usize::from),
            Self::Word(a) => a
                .compare_exchange(current, new, SUCCESS, FAILURE)
                .map(drop),
        }
    }
}
