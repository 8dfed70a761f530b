//! Tests for heap exhaustion and the growth primitive contract

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use buddy_seglist_allocator::{
    AllocError, BuddyHeap, HeapAllocator, HeapGrower, MemHeap, DEFAULT_CHUNK_SIZE,
};

/// Small enough that a few large requests exhaust it.
const SMALL_HEAP: usize = 64 * 1024;

fn small_heap() -> BuddyHeap<MemHeap> {
    let mut heap = BuddyHeap::new(MemHeap::new(SMALL_HEAP));
    heap.init().unwrap();
    heap
}

/// A grower that fails every call after the first `budget` ones.
struct CountingGrower {
    inner: MemHeap,
    budget: usize,
}

impl HeapGrower for CountingGrower {
    fn grow_heap(&mut self, byte_count: usize) -> Option<usize> {
        if self.budget == 0 {
            return None;
        }
        self.budget -= 1;
        self.inner.grow_heap(byte_count)
    }

    fn memory(&self) -> &[u8] {
        self.inner.memory()
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        self.inner.memory_mut()
    }
}

#[test]
fn test_init_fails_without_memory() {
    let mut heap = BuddyHeap::<MemHeap>::new(MemHeap::new(0));
    assert_eq!(heap.init(), Err(AllocError::HeapExhausted));
    assert!(!heap.is_initialized());
    assert_eq!(heap.try_allocate(8), Err(AllocError::Uninitialized));
}

#[test]
fn test_init_fails_on_first_extension() {
    let mut heap = BuddyHeap::<_>::new(CountingGrower {
        inner: MemHeap::default(),
        budget: 1,
    });
    assert_eq!(heap.init(), Err(AllocError::HeapExhausted));
    assert!(!heap.is_initialized());
}

#[test]
fn test_failed_init_keeps_prologue() {
    let mut heap = BuddyHeap::<MemHeap>::new(MemHeap::new(DEFAULT_CHUNK_SIZE));
    assert_eq!(heap.init(), Err(AllocError::HeapExhausted));
    // The prologue stayed in place; only the extension is missing.
    assert_eq!(heap.brk(), 16);
    assert_eq!(heap.allocate(1), None);
}

#[test]
fn test_exhaustion_returns_none() {
    let mut heap = small_heap();
    assert_eq!(heap.allocate(SMALL_HEAP), None);
    assert_eq!(heap.try_allocate(SMALL_HEAP), Err(AllocError::HeapExhausted));
    heap.check_heap().unwrap();

    // Smaller requests still succeed afterwards.
    let ptr = heap.allocate(1000).unwrap();
    heap.free(ptr);
    heap.check_heap().unwrap();
}

#[test]
fn test_exhaustion_keeps_existing_blocks() {
    let mut heap = small_heap();
    let mut ptrs = Vec::new();
    while let Some(ptr) = heap.allocate(3000) {
        heap.payload_mut(ptr)[0] = ptrs.len() as u8;
        ptrs.push(ptr);
    }
    assert!(!ptrs.is_empty());
    assert!(heap.brk() <= SMALL_HEAP);
    heap.check_heap().unwrap();

    for (i, ptr) in ptrs.iter().enumerate() {
        assert_eq!(heap.payload(*ptr)[0], i as u8);
    }
    for ptr in ptrs {
        heap.free(ptr);
    }
    heap.check_heap().unwrap();
    assert_eq!(heap.stats().used_bytes, 0);
}

#[test]
fn test_failed_reallocate_keeps_old_block() {
    let mut heap = small_heap();
    let ptr = heap.allocate(200).unwrap();
    for (i, byte) in heap.payload_mut(ptr).iter_mut().enumerate() {
        *byte = i as u8;
    }

    assert_eq!(heap.reallocate(ptr, SMALL_HEAP), None);
    assert_eq!(
        heap.try_reallocate(ptr, SMALL_HEAP),
        Err(AllocError::HeapExhausted)
    );
    assert!(heap
        .payload(ptr)
        .iter()
        .enumerate()
        .all(|(i, &byte)| byte == i as u8));

    heap.free(ptr);
    heap.check_heap().unwrap();
}

#[test]
fn test_growth_failure_is_not_retried() {
    let mut heap = BuddyHeap::<_>::new(CountingGrower {
        inner: MemHeap::default(),
        budget: 2,
    });
    heap.init().unwrap();
    assert_eq!(heap.allocate(DEFAULT_CHUNK_SIZE), None);
    assert_eq!(heap.grower().budget, 0);

    let ptr = heap.allocate(64).unwrap();
    heap.free(ptr);
    heap.check_heap().unwrap();
}

#[test]
fn test_request_too_large() {
    let mut heap = small_heap();
    assert_eq!(heap.try_allocate(usize::MAX), Err(AllocError::RequestTooLarge));
    assert_eq!(heap.allocate(usize::MAX - 4), None);
}
