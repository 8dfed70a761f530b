//! Buddy heap allocator module
//!
//! This module provides a complete buddy system implementation with:
//! - Power-of-two size classes and one header word per block
//! - Segregated free lists linked through free payloads
//! - Buddy merging by address arithmetic
//! - Heap statistics and a consistency checker

pub mod buddy_block;
pub mod buddy_heap;
mod check;
pub mod free_lists;
pub mod size_class;
pub mod stats;

pub use buddy_block::{BlockInfo, BlockIter, BlockPtr, Header};
pub use buddy_heap::BuddyHeap;
pub use free_lists::{FreeListIter, FreeLists};
pub use size_class::{BlockSize, SizeClass};
pub use stats::{HeapStats, MemoryStatsReporter};
