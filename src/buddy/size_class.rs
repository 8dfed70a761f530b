//! Size classes
//!
//! Maps byte counts onto the power-of-two classes that index the segregated
//! free lists.

use crate::{AllocError, AllocResult, DWORD_SIZE, FREE_LIST_NUMS, MAX_BLOCK_SIZE, MIN_BLOCK_SIZE};

#[cfg(feature = "log")]
use log::warn;

const MIN_BLOCK_SHIFT: u32 = MIN_BLOCK_SIZE.trailing_zeros();

/// Index of a segregated free list. Class `i` holds blocks of `16 << i` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SizeClass(usize);

impl SizeClass {
    /// The class of the smallest blocks.
    pub const MIN: SizeClass = SizeClass(0);
    /// The class of the largest blocks.
    pub const MAX: SizeClass = SizeClass(FREE_LIST_NUMS - 1);

    /// Smallest class whose block size is at least `max(16, raw_size)`.
    ///
    /// Classes past [`SizeClass::MAX`] are clamped to it.
    pub fn for_size(raw_size: usize) -> Self {
        if raw_size <= MIN_BLOCK_SIZE {
            return Self::MIN;
        }
        let index = match raw_size.checked_next_power_of_two() {
            Some(size) => (size.trailing_zeros() - MIN_BLOCK_SHIFT) as usize,
            None => Self::MAX.0,
        };
        SizeClass(index.min(Self::MAX.0))
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index < FREE_LIST_NUMS {
            Some(SizeClass(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0
    }

    /// Block size held by this class.
    pub const fn block_size(self) -> BlockSize {
        BlockSize(MIN_BLOCK_SIZE << self.0)
    }

    /// All classes, smallest first.
    pub fn all() -> impl DoubleEndedIterator<Item = SizeClass> {
        (0..FREE_LIST_NUMS).map(SizeClass)
    }

    /// This class and every larger one, smallest first.
    pub fn and_larger(self) -> impl Iterator<Item = SizeClass> {
        (self.0..FREE_LIST_NUMS).map(SizeClass)
    }
}

/// A block size: a power of two in `[MIN_BLOCK_SIZE, MAX_BLOCK_SIZE]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockSize(usize);

impl BlockSize {
    pub const MIN: BlockSize = BlockSize(MIN_BLOCK_SIZE);
    pub const MAX: BlockSize = BlockSize(MAX_BLOCK_SIZE);

    /// Accepts only powers of two within the supported range.
    pub const fn new(bytes: usize) -> Option<Self> {
        if bytes.is_power_of_two() && bytes >= MIN_BLOCK_SIZE && bytes <= MAX_BLOCK_SIZE {
            Some(BlockSize(bytes))
        } else {
            None
        }
    }

    /// Block size needed to serve a `request`-byte payload: the smallest
    /// power of two holding `request` plus the double-word overhead.
    pub fn for_request(request: usize) -> AllocResult<Self> {
        if request == 0 {
            return Err(AllocError::ZeroSizeRequest);
        }
        match request.checked_add(DWORD_SIZE) {
            Some(raw_size) if raw_size <= MAX_BLOCK_SIZE => {
                Ok(SizeClass::for_size(raw_size).block_size())
            }
            _ => {
                warn!(
                    "request of {} bytes exceeds max block size {:#x}",
                    request, MAX_BLOCK_SIZE
                );
                Err(AllocError::RequestTooLarge)
            }
        }
    }

    pub const fn bytes(self) -> usize {
        self.0
    }

    /// Payload bytes usable by the caller.
    pub const fn payload(self) -> usize {
        self.0 - DWORD_SIZE
    }

    pub const fn class(self) -> SizeClass {
        SizeClass((self.0.trailing_zeros() - MIN_BLOCK_SHIFT) as usize)
    }

    /// Half this size, or `None` below the minimum.
    pub const fn halve(self) -> Option<Self> {
        Self::new(self.0 >> 1)
    }

    /// Twice this size, or `None` above the maximum.
    pub const fn double(self) -> Option<Self> {
        Self::new(self.0 << 1)
    }
}
