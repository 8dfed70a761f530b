//! Statistics and debugging for the buddy heap
//!
//! Provides heap-walk statistics and failure reporting.

use super::buddy_block::BlockInfo;
use super::size_class::{BlockSize, SizeClass};
use crate::FREE_LIST_NUMS;

#[cfg(feature = "log")]
use log::info;

/// Buddy heap statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    /// Bytes covered by blocks (prologue and epilogue excluded).
    pub heap_bytes: usize,
    pub free_bytes: usize,
    pub used_bytes: usize,
    pub free_blocks: usize,
    pub allocated_blocks: usize,
    pub free_blocks_by_class: [usize; FREE_LIST_NUMS],
}

impl Default for HeapStats {
    fn default() -> Self {
        Self::new()
    }
}

impl HeapStats {
    pub const fn new() -> Self {
        Self {
            heap_bytes: 0,
            free_bytes: 0,
            used_bytes: 0,
            free_blocks: 0,
            allocated_blocks: 0,
            free_blocks_by_class: [0; FREE_LIST_NUMS],
        }
    }

    /// Account for one block of a heap walk.
    pub fn record(&mut self, block: &BlockInfo) {
        self.heap_bytes += block.size;
        if block.allocated {
            self.used_bytes += block.size;
            self.allocated_blocks += 1;
        } else {
            self.free_bytes += block.size;
            self.free_blocks += 1;
            if let Some(size) = BlockSize::new(block.size) {
                self.free_blocks_by_class[size.class().index()] += 1;
            }
        }
    }

    /// Largest free block, if any.
    pub fn largest_free_block(&self) -> Option<usize> {
        SizeClass::all()
            .rev()
            .find(|class| self.free_blocks_by_class[class.index()] > 0)
            .map(|class| class.block_size().bytes())
    }
}

/// Detailed memory statistics reporter
pub struct MemoryStatsReporter;

impl MemoryStatsReporter {
    /// Print detailed allocation failure statistics
    #[cfg(feature = "tracking")]
    #[allow(unused_variables)]
    pub fn print_alloc_failure_stats(stats: &HeapStats, request: usize, brk: usize) {
        #[cfg(feature = "log")]
        use log::error;
        error!("========================================");
        error!("Request: {} bytes", request);
        error!("Heap break: {:#x}", brk);
        error!(
            "  Heap bytes: {} ({} KB)",
            stats.heap_bytes,
            stats.heap_bytes / 1024
        );
        error!(
            "  Free bytes: {} in {} blocks",
            stats.free_bytes, stats.free_blocks
        );
        error!(
            "  Used bytes: {} in {} blocks",
            stats.used_bytes, stats.allocated_blocks
        );
        error!("  Free blocks by class:");
        for class in SizeClass::all().rev() {
            let count = stats.free_blocks_by_class[class.index()];
            if count > 0 {
                error!(
                    "    {} bytes: {} blocks",
                    class.block_size().bytes(),
                    count
                );
            }
        }
        error!("========================================");
    }

    /// Print how many free blocks each class holds
    #[allow(unused_variables)]
    pub fn print_block_distribution(stats: &HeapStats) {
        info!("========== Buddy Heap Free Lists ==========");
        info!(
            "Heap bytes: {:#x}, free {:#x}, used {:#x}",
            stats.heap_bytes, stats.free_bytes, stats.used_bytes
        );
        for class in SizeClass::all() {
            let count = stats.free_blocks_by_class[class.index()];
            if count > 0 {
                let block_size = class.block_size().bytes();
                info!(
                    "  Class {}: {} blocks (size {} bytes each, total {:#x})",
                    class.index(),
                    count,
                    block_size,
                    count * block_size
                );
            }
        }
        info!("===========================================");
    }
}
