//! Heap growth primitive
//!
//! The allocator never owns address space itself; it asks a [`HeapGrower`]
//! to extend the managed region, `sbrk`-style, and addresses everything as a
//! byte offset into that region.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(feature = "log")]
use log::warn;

use crate::{DEFAULT_MAX_HEAP, MAX_HEAP_ADDR};

/// The host-side primitive that backs a heap.
///
/// Addresses are byte offsets into [`memory`](HeapGrower::memory). The region
/// must grow monotonically: a successful `grow_heap` returns the previous
/// end of the region and never moves bytes that were already handed out.
///
/// A heap never grows past [`MAX_HEAP_ADDR`] (4 GiB); requests that would
/// cross it fail before `grow_heap` is called.
pub trait HeapGrower {
    /// Extend the region by `byte_count` bytes and return the base address
    /// of the new bytes, or `None` if the region cannot grow.
    fn grow_heap(&mut self, byte_count: usize) -> Option<usize>;

    /// The whole managed region, from address 0 to the current break.
    fn memory(&self) -> &[u8];

    /// Mutable view of the whole managed region.
    fn memory_mut(&mut self) -> &mut [u8];
}

/// A bounded in-memory heap, modelled on a simulated `sbrk`.
///
/// New bytes are zero-filled. Addresses are offsets, so the backing vector
/// may reallocate without invalidating anything handed out earlier.
#[derive(Debug)]
pub struct MemHeap {
    bytes: Vec<u8>,
    max_size: usize,
    grow_calls: usize,
}

impl MemHeap {
    /// Create an empty heap that refuses to grow past `max_size` bytes.
    ///
    /// The capacity is capped at [`MAX_HEAP_ADDR`].
    pub fn new(max_size: usize) -> Self {
        Self {
            bytes: Vec::new(),
            max_size: max_size.min(MAX_HEAP_ADDR),
            grow_calls: 0,
        }
    }

    /// Maximum number of bytes this heap can hold.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Current break, i.e. the number of bytes handed out so far.
    pub fn heap_size(&self) -> usize {
        self.bytes.len()
    }

    /// Number of successful `grow_heap` calls.
    pub fn grow_calls(&self) -> usize {
        self.grow_calls
    }
}

impl Default for MemHeap {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEAP)
    }
}

impl HeapGrower for MemHeap {
    fn grow_heap(&mut self, byte_count: usize) -> Option<usize> {
        let old_brk = self.bytes.len();
        let new_brk = match old_brk.checked_add(byte_count) {
            Some(end) if end <= self.max_size => end,
            _ => {
                warn!(
                    "mem heap: ran out of memory: brk={:#x} incr={:#x} max={:#x}",
                    old_brk, byte_count, self.max_size
                );
                return None;
            }
        };
        self.bytes.resize(new_brk, 0);
        self.grow_calls += 1;
        Some(old_brk)
    }

    fn memory(&self) -> &[u8] {
        &self.bytes
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}
