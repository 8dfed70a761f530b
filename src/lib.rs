//! Buddy Segregated-List Heap Allocator
//!
//! A `malloc`-style allocator over a single heap that only ever grows,
//! featuring:
//! - Power-of-two block sizes with one header word per block
//! - One doubly-linked free list per size class, links kept inside free payloads
//! - Buddy merging by address arithmetic, no side metadata
//! - A pluggable heap-growth primitive ([`HeapGrower`])

#![no_std]

extern crate alloc;

use core::fmt;

// Logging support - conditionally import log crate
#[cfg(feature = "log")]
extern crate log;

// Stub macros when log is disabled - these become no-ops
#[cfg(not(feature = "log"))]
#[allow(unused_macros)]
macro_rules! error {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
#[allow(unused_macros)]
macro_rules! warn {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
#[allow(unused_macros)]
macro_rules! info {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}
#[cfg(not(feature = "log"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Word size in bytes; headers are one word.
pub const WORD_SIZE: usize = 4;

/// Double-word size in bytes, the payload alignment and the per-block overhead.
pub const DWORD_SIZE: usize = 8;

/// Size of a block header in bytes.
pub const HEADER_SIZE: usize = WORD_SIZE;

/// Smallest block the allocator hands out.
pub const MIN_BLOCK_SIZE: usize = 16;

/// Number of segregated free lists (one per power-of-two size class).
pub const FREE_LIST_NUMS: usize = 20;

/// Largest supported block size: `2^(FREE_LIST_NUMS + 3)`.
pub const MAX_BLOCK_SIZE: usize = MIN_BLOCK_SIZE << (FREE_LIST_NUMS - 1);

/// Default number of bytes the heap grows by when it runs out of free blocks.
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 12;

/// Highest address a heap may reach. Free-list links are stored as 32-bit
/// addresses.
pub const MAX_HEAP_ADDR: usize = u32::MAX as usize;

/// Default capacity of [`MemHeap`].
pub const DEFAULT_MAX_HEAP: usize = 20 * (1 << 20);

/// The error type used for allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// A zero-byte allocation was requested.
    ZeroSizeRequest,
    /// The request does not fit in the largest size class.
    RequestTooLarge,
    /// The growth primitive could not extend the heap.
    HeapExhausted,
    /// The heap has not been initialized yet.
    Uninitialized,
    /// `init` was called on an already initialized heap.
    AlreadyInitialized,
    /// The consistency checker found a broken invariant.
    Corrupted,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            AllocError::ZeroSizeRequest => "zero-size allocation request",
            AllocError::RequestTooLarge => "request exceeds the largest size class",
            AllocError::HeapExhausted => "heap cannot grow any further",
            AllocError::Uninitialized => "heap is not initialized",
            AllocError::AlreadyInitialized => "heap is already initialized",
            AllocError::Corrupted => "heap consistency check failed",
        };
        f.write_str(msg)
    }
}

/// A [`Result`] type with [`AllocError`] as the error type.
pub type AllocResult<T = ()> = Result<T, AllocError>;

/// The `malloc`-family contract shared by heap allocators.
///
/// Pointers passed to [`free`](HeapAllocator::free) and
/// [`reallocate`](HeapAllocator::reallocate) must come from this allocator
/// and must not have been freed already. This is not checked.
pub trait HeapAllocator {
    /// Lay out the heap and perform the first extension.
    fn init(&mut self) -> AllocResult;

    /// Allocate a block with at least `size` usable bytes.
    ///
    /// Returns `None` for `size == 0` or when the heap cannot grow.
    fn allocate(&mut self, size: usize) -> Option<BlockPtr>;

    /// Return a block to the allocator.
    fn free(&mut self, ptr: BlockPtr);

    /// Move a block's contents into a new block of `new_size` bytes.
    ///
    /// On failure the old block is left untouched and still owned by the caller.
    fn reallocate(&mut self, ptr: BlockPtr, new_size: usize) -> Option<BlockPtr>;
}

#[inline]
const fn align_up(pos: usize, align: usize) -> usize {
    (pos + align - 1) & !(align - 1)
}

/// Checks whether the address has the demanded alignment.
///
/// Equivalent to `addr % align == 0`, but the alignment must be a power of two.
#[inline]
const fn is_aligned(base_addr: usize, align: usize) -> bool {
    base_addr & (align - 1) == 0
}

pub mod buddy;
pub use buddy::{
    BlockInfo, BlockPtr, BlockSize, BuddyHeap, FreeLists, HeapStats, SizeClass,
};

pub mod heap_grower;
pub use heap_grower::{HeapGrower, MemHeap};
