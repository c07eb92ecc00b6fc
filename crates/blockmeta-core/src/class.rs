//! Size classes and their metadata geometry.
//!
//! The encoding of a block's length is never tagged: it is inferred from
//! the block size alone, so [`classify`] must return the same answer for
//! every read and write against a given block.

use std::fmt;

use crate::config::LayoutConfig;

/// Which of the three metadata encodings a block uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizeClass {
    /// `size <= 256`: one length byte at the tail.
    Small,
    /// `256 < size < PAGE_SIZE`: a two-byte length at the tail.
    Medium,
    /// `size >= PAGE_SIZE`: a word-wide length at the head.
    Large,
}

/// Per-class constants describing where metadata lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassGeometry {
    /// Width in bytes of the length field.
    pub length_width: usize,
    /// Bytes reserved at the front of the block (before element 0).
    pub prefix: usize,
    /// Bytes reserved at the very end of the usable region.
    pub sentinel: usize,
}

impl SizeClass {
    /// Geometry constants for this class.
    pub const fn geometry(self) -> ClassGeometry {
        match self {
            Self::Small => ClassGeometry {
                length_width: 1,
                prefix: 0,
                sentinel: 0,
            },
            Self::Medium => ClassGeometry {
                length_width: 2,
                prefix: 0,
                sentinel: 0,
            },
            Self::Large => ClassGeometry {
                length_width: LayoutConfig::WORD,
                prefix: LayoutConfig::LARGE_PREFIX,
                sentinel: LayoutConfig::LARGE_SENTINEL,
            },
        }
    }

    /// Whether the length lives at the tail of the block.
    pub const fn is_tail(self) -> bool {
        !matches!(self, Self::Large)
    }

    /// Largest length value the field of this class can physically hold.
    pub const fn max_encodable(self) -> usize {
        match self {
            Self::Small => u8::MAX as usize,
            Self::Medium => u16::MAX as usize,
            Self::Large => usize::MAX,
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Small => write!(f, "small"),
            Self::Medium => write!(f, "medium"),
            Self::Large => write!(f, "large"),
        }
    }
}

/// Classify a block by its size in bytes.
///
/// Total and pure. A zero size is classified Small; whether such a block
/// can hold any metadata is the codec's concern, not this function's.
pub const fn classify(block_size: usize) -> SizeClass {
    if block_size <= LayoutConfig::SMALL_MAX {
        SizeClass::Small
    } else if block_size < LayoutConfig::PAGE_SIZE {
        SizeClass::Medium
    } else {
        SizeClass::Large
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds() {
        assert_eq!(classify(1), SizeClass::Small);
        assert_eq!(classify(256), SizeClass::Small);
        assert_eq!(classify(257), SizeClass::Medium);
        assert_eq!(classify(4095), SizeClass::Medium);
        assert_eq!(classify(4096), SizeClass::Large);
        assert_eq!(classify(usize::MAX), SizeClass::Large);
    }

    #[test]
    fn large_geometry_uses_word_and_prefix() {
        let g = SizeClass::Large.geometry();
        assert_eq!(g.length_width, std::mem::size_of::<usize>());
        assert_eq!(g.prefix, 16);
        assert_eq!(g.sentinel, 1);
    }

    #[test]
    fn tail_classes_have_no_prefix() {
        for class in [SizeClass::Small, SizeClass::Medium] {
            assert!(class.is_tail());
            assert_eq!(class.geometry().prefix, 0);
            assert_eq!(class.geometry().sentinel, 0);
        }
        assert!(!SizeClass::Large.is_tail());
    }

    #[test]
    fn tail_fields_can_hold_any_fitting_length() {
        assert!(SizeClass::Small.max_encodable() >= LayoutConfig::SMALL_MAX - 1);
        assert!(SizeClass::Medium.max_encodable() >= LayoutConfig::PAGE_SIZE - 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn small_range(size in 1usize..=256) {
                prop_assert_eq!(classify(size), SizeClass::Small);
            }

            #[test]
            fn medium_range(size in 257usize..4096) {
                prop_assert_eq!(classify(size), SizeClass::Medium);
            }

            #[test]
            fn large_range(size in 4096usize..=usize::MAX) {
                prop_assert_eq!(classify(size), SizeClass::Large);
            }

            #[test]
            fn monotonic(a in any::<usize>(), b in any::<usize>()) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(classify(lo) <= classify(hi));
            }
        }
    }
}
