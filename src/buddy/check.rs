//! Heap consistency checker
//!
//! Walks the block sequence and every free list and reports the first
//! broken invariant. Meant for tests and debugging; it is O(heap size).

use super::buddy_block::{header, next_block, read_word, BlockPtr, Header};
use super::buddy_heap::BuddyHeap;
use super::free_lists::{next_link, prev_link};
use super::size_class::SizeClass;
use crate::heap_grower::HeapGrower;
use crate::{is_aligned, AllocError, AllocResult, DWORD_SIZE, HEADER_SIZE, WORD_SIZE};

#[cfg(feature = "log")]
use log::error;

macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            error!($($arg)+);
            return Err(AllocError::Corrupted);
        }
    };
}

impl<G: HeapGrower, const CHUNK_SIZE: usize> BuddyHeap<G, CHUNK_SIZE> {
    /// Verify the heap's invariants:
    ///
    /// - the prologue is intact and the epilogue (size 0, allocated) is the
    ///   last header;
    /// - every block size is a power of two in range and the block is
    ///   aligned to its own size relative to the root;
    /// - every payload is double-word aligned;
    /// - no free block has a free buddy of the same size;
    /// - free blocks sit on exactly the list of their class, allocated ones
    ///   on none, and list back-links agree with forward links.
    pub fn check_heap(&self) -> AllocResult {
        if !self.is_initialized() {
            return Err(AllocError::Uninitialized);
        }
        let mem = self.memory();
        let root = self.root;
        let brk = mem.len();

        let prologue = Header::pack(2 * WORD_SIZE, true).raw();
        ensure!(
            read_word(mem, root.addr() - 3 * WORD_SIZE) == prologue
                && read_word(mem, root.addr() - 2 * WORD_SIZE) == prologue,
            "heap check: prologue damaged"
        );

        let mut free_blocks = 0;
        let mut block = root;
        loop {
            ensure!(
                block.addr() <= brk,
                "heap check: walk ran past brk at {:#x}",
                block.addr()
            );
            let hdr = header(mem, block);
            if hdr.size() == 0 {
                ensure!(
                    hdr.is_allocated() && block.addr() == brk,
                    "heap check: bad epilogue at {:#x} (brk {:#x})",
                    block.addr(),
                    brk
                );
                break;
            }

            let Some(size) = hdr.block_size() else {
                error!(
                    "heap check: block {:#x} has invalid size {:#x}",
                    block.addr(),
                    hdr.size()
                );
                return Err(AllocError::Corrupted);
            };
            let offset = block.addr() - root.addr();
            ensure!(
                is_aligned(offset, size.bytes()),
                "heap check: block {:#x} of {:#x} bytes is not size-aligned",
                block.addr(),
                size.bytes()
            );
            ensure!(
                is_aligned(block.addr(), DWORD_SIZE),
                "heap check: payload {:#x} is not double-word aligned",
                block.addr()
            );
            ensure!(
                block.addr() + size.bytes() <= brk,
                "heap check: block {:#x} runs past brk",
                block.addr()
            );

            if hdr.is_free() {
                free_blocks += 1;
                ensure!(
                    self.free_blocks(size.class()).any(|b| b == block),
                    "heap check: free block {:#x} missing from its list",
                    block.addr()
                );
                // Buddies of the largest class never merge.
                if size.double().is_some() && offset & size.bytes() == 0 {
                    let buddy = header(mem, block.add(size.bytes()));
                    ensure!(
                        !(buddy.is_free() && buddy.size() == size.bytes()),
                        "heap check: free buddies {:#x} and {:#x} not merged",
                        block.addr(),
                        block.addr() + size.bytes()
                    );
                }
            }
            block = next_block(mem, block);
        }

        let mut listed = 0;
        for class in SizeClass::all() {
            let mut prev: Option<BlockPtr> = None;
            for node in self.free_blocks(class) {
                listed += 1;
                ensure!(
                    listed <= free_blocks,
                    "heap check: free lists hold more nodes than free blocks"
                );
                ensure!(
                    node.addr() >= root.addr() && node.addr() + HEADER_SIZE <= brk,
                    "heap check: list node {:#x} outside the heap",
                    node.addr()
                );
                let hdr = header(mem, node);
                ensure!(
                    hdr.is_free(),
                    "heap check: allocated block {:#x} on free list",
                    node.addr()
                );
                ensure!(
                    hdr.size() == class.block_size().bytes(),
                    "heap check: block {:#x} of {:#x} bytes on class {} list",
                    node.addr(),
                    hdr.size(),
                    class.index()
                );
                ensure!(
                    prev_link(mem, node) == prev,
                    "heap check: bad back-link at {:#x}",
                    node.addr()
                );
                prev = Some(node);
            }
            if let Some(tail) = prev {
                ensure!(
                    next_link(mem, tail).is_none(),
                    "heap check: tail {:#x} has a forward link",
                    tail.addr()
                );
            }
        }
        ensure!(
            listed == free_blocks,
            "heap check: {} free blocks but {} list nodes",
            free_blocks,
            listed
        );
        Ok(())
    }
}
