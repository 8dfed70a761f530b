//! Buddy heap allocator
//!
//! Implements `init` / `allocate` / `free` / `reallocate` over a heap that
//! only grows. Blocks are powers of two, naturally aligned relative to the
//! first payload address (the root), so a block's buddy is found by flipping
//! one bit of its offset.
//!
//! Heap layout:
//!
//! ```text
//! | pad | prologue hdr | prologue ftr | hdr | block ... | hdr | block ... | epilogue |
//! 0     4              8              12    16 (root)
//! ```

use super::buddy_block::{
    header, set_header, write_word, BlockInfo, BlockIter, BlockPtr, Header,
};
use super::free_lists::{FreeListIter, FreeLists};
use super::size_class::{BlockSize, SizeClass};
use super::stats::HeapStats;
use crate::heap_grower::HeapGrower;
use crate::{
    align_up, AllocError, AllocResult, HeapAllocator, DEFAULT_CHUNK_SIZE, DWORD_SIZE, HEADER_SIZE,
    MAX_BLOCK_SIZE, MAX_HEAP_ADDR, MIN_BLOCK_SIZE, WORD_SIZE,
};

#[cfg(feature = "log")]
use log::{debug, error, trace, warn};

/// Padding word, prologue header, prologue footer and the first epilogue.
const PROLOGUE_SIZE: usize = 4 * WORD_SIZE;

/// Size recorded in the prologue's header and footer.
const PROLOGUE_BLOCK_SIZE: usize = 2 * WORD_SIZE;

/// Root of a heap whose first growth starts at address 0.
const DEFAULT_ROOT: BlockPtr = match BlockPtr::new(PROLOGUE_SIZE) {
    Some(root) => root,
    None => panic!("prologue must be non-empty"),
};

/// Whether growing a heap ending at `brk` by `bytes` keeps every address
/// within `limit`.
fn link_addressable(brk: usize, bytes: usize, limit: usize) -> bool {
    brk.checked_add(bytes).is_some_and(|end| end <= limit)
}

/// Largest naturally aligned block that starts at `offset` and fits in
/// `remaining` bytes.
fn carve_size(offset: usize, remaining: usize) -> BlockSize {
    let align_limit = if offset == 0 {
        MAX_BLOCK_SIZE
    } else {
        1 << offset.trailing_zeros()
    };
    let fit_limit = 1 << (usize::BITS - 1 - remaining.leading_zeros());
    let size = align_limit.min(fit_limit).min(MAX_BLOCK_SIZE);
    BlockSize::new(size).unwrap_or(BlockSize::MIN)
}

/// A buddy-system heap with one free list per size class.
///
/// `CHUNK_SIZE` is the minimum number of bytes the heap grows by when no
/// free block can serve a request.
pub struct BuddyHeap<G: HeapGrower, const CHUNK_SIZE: usize = DEFAULT_CHUNK_SIZE> {
    grower: G,
    pub(super) free_lists: FreeLists,
    /// Payload address of the first block; buddy offsets are measured from here.
    pub(super) root: BlockPtr,
    /// Highest break the heap may grow to; free-list links are 32-bit.
    addr_limit: usize,
    laid_out: bool,
    initialized: bool,
}

impl<G: HeapGrower, const CHUNK_SIZE: usize> BuddyHeap<G, CHUNK_SIZE> {
    const VALID_CHUNK: () = assert!(
        CHUNK_SIZE >= MIN_BLOCK_SIZE && CHUNK_SIZE % MIN_BLOCK_SIZE == 0,
        "CHUNK_SIZE must be a non-zero multiple of the minimum block size"
    );

    /// Create a heap on top of `grower`. Nothing is requested until [`init`](Self::init).
    pub fn new(grower: G) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CHUNK;
        Self {
            grower,
            free_lists: FreeLists::new(),
            root: DEFAULT_ROOT,
            addr_limit: MAX_HEAP_ADDR,
            laid_out: false,
            initialized: false,
        }
    }

    /// Lay out the prologue and epilogue, then grow by one chunk.
    pub fn init(&mut self) -> AllocResult {
        if self.initialized {
            warn!("buddy heap: init called twice");
            return Err(AllocError::AlreadyInitialized);
        }

        // A failed first extension leaves the prologue in place; a retry
        // only needs to grow.
        if !self.laid_out {
            self.lay_out_prologue()?;
        }
        self.free_lists.clear();
        self.extend_heap(CHUNK_SIZE / WORD_SIZE)?;
        self.initialized = true;

        debug!(
            "buddy heap: initialized, root={:#x} brk={:#x}",
            self.root.addr(),
            self.brk()
        );
        Ok(())
    }

    fn lay_out_prologue(&mut self) -> AllocResult {
        let brk = self.brk();
        let pad = align_up(brk, DWORD_SIZE) - brk;
        let start = self.grow(pad + PROLOGUE_SIZE)? + pad;

        let mem = self.grower.memory_mut();
        write_word(mem, start, 0);
        write_word(
            mem,
            start + WORD_SIZE,
            Header::pack(PROLOGUE_BLOCK_SIZE, true).raw(),
        );
        write_word(
            mem,
            start + 2 * WORD_SIZE,
            Header::pack(PROLOGUE_BLOCK_SIZE, true).raw(),
        );
        write_word(mem, start + 3 * WORD_SIZE, Header::EPILOGUE.raw());

        self.root = DEFAULT_ROOT.add(start);
        self.laid_out = true;
        Ok(())
    }

    fn grow(&mut self, bytes: usize) -> AllocResult<usize> {
        let brk = self.brk();
        if !link_addressable(brk, bytes, self.addr_limit) {
            warn!(
                "buddy heap: growth of {:#x} bytes at brk={:#x} passes the address limit {:#x}",
                bytes, brk, self.addr_limit
            );
            return Err(AllocError::HeapExhausted);
        }
        self.grower.grow_heap(bytes).ok_or_else(|| {
            warn!(
                "buddy heap: growth of {:#x} bytes failed at brk={:#x}",
                bytes,
                self.grower.memory().len()
            );
            AllocError::HeapExhausted
        })
    }

    /// Grow the heap by `words` words, rounded up to an even count, and hand
    /// the new space to the coalescer.
    ///
    /// The new region starts where the old epilogue was. It is carved into
    /// naturally aligned power-of-two blocks so every block keeps the buddy
    /// address invariant.
    fn extend_heap(&mut self, words: usize) -> AllocResult {
        let words = if words % 2 == 0 { words } else { words + 1 };
        let bytes = align_up(words * WORD_SIZE, MIN_BLOCK_SIZE);
        let old_brk = self.brk();
        let base = self.grow(bytes)?;
        debug_assert_eq!(base, old_brk, "growth primitive is not contiguous");

        let start = base - self.root.addr();
        let end = start + bytes;
        debug!(
            "buddy heap: extend {:#x} bytes, offsets [{:#x}, {:#x})",
            bytes, start, end
        );

        // Mark every piece allocated first so the coalescer never sees a
        // piece that is not yet on a free list.
        let mem = self.grower.memory_mut();
        let mut offset = start;
        while offset < end {
            let size = carve_size(offset, end - offset);
            set_header(mem, self.root.add(offset), size.bytes(), true);
            offset += size.bytes();
        }
        write_word(mem, self.root.addr() + end - HEADER_SIZE, Header::EPILOGUE.raw());

        let mut offset = start;
        while offset < end {
            let block = self.root.add(offset);
            let size = carve_size(offset, end - offset);
            set_header(self.grower.memory_mut(), block, size.bytes(), false);
            self.coalesce(block, size);
            offset += size.bytes();
        }
        Ok(())
    }

    /// Put a free block on its list, then merge it with its buddy for as long
    /// as both halves are free and the same size. Returns the block it ended
    /// up in.
    fn coalesce(&mut self, block: BlockPtr, size: BlockSize) -> BlockPtr {
        let root = self.root;
        let mem = self.grower.memory_mut();
        self.free_lists.insert(mem, block, size.class());

        let mut block = block;
        let mut size = size;
        while let Some(merged) = size.double() {
            let offset = block.addr() - root.addr();
            let (left, right) = if offset & size.bytes() != 0 {
                (root.add(offset - size.bytes()), block)
            } else {
                (block, block.add(size.bytes()))
            };

            let left_hdr = header(mem, left);
            let right_hdr = header(mem, right);
            if !(left_hdr.is_free() && right_hdr.is_free() && left_hdr.size() == right_hdr.size())
            {
                break;
            }

            self.free_lists.remove(mem, left, size.class());
            self.free_lists.remove(mem, right, size.class());
            set_header(mem, left, merged.bytes(), false);
            self.free_lists.insert(mem, left, merged.class());
            trace!(
                "buddy heap: merged {:#x} + {:#x} into {:#x} bytes",
                left.addr(),
                right.addr(),
                merged.bytes()
            );

            block = left;
            size = merged;
        }
        block
    }

    /// First free block able to hold `size`, smallest class first.
    fn find_fit(&self, size: BlockSize) -> Option<(BlockPtr, BlockSize)> {
        size.class()
            .and_larger()
            .find_map(|class| self.free_lists.head(class).map(|b| (b, class.block_size())))
    }

    /// Take `block` (of `block_size`) off its list, split it down to `size`
    /// and mark it allocated. Upper halves go back on the smaller lists.
    fn place(&mut self, block: BlockPtr, block_size: BlockSize, size: BlockSize) {
        let mem = self.grower.memory_mut();
        self.free_lists.remove(mem, block, block_size.class());

        let mut current = block_size;
        while current > size {
            let Some(half) = current.halve() else {
                break;
            };
            let upper = block.add(half.bytes());
            set_header(mem, upper, half.bytes(), false);
            self.free_lists.insert(mem, upper, half.class());
            trace!(
                "buddy heap: split {:#x} off as free {:#x} bytes",
                upper.addr(),
                half.bytes()
            );
            current = half;
        }
        set_header(mem, block, current.bytes(), true);
    }

    /// Words to request so the heap ends with an aligned free block of `size`.
    fn extension_words(&self, size: BlockSize) -> usize {
        let end = self.brk() - self.root.addr();
        let padding = align_up(end, size.bytes()) - end;
        (padding + size.bytes().max(CHUNK_SIZE)) / WORD_SIZE
    }

    /// Allocate a block with at least `size` usable bytes.
    pub fn try_allocate(&mut self, size: usize) -> AllocResult<BlockPtr> {
        if !self.initialized {
            return Err(AllocError::Uninitialized);
        }
        let block_size = BlockSize::for_request(size)?;

        if let Some((block, found)) = self.find_fit(block_size) {
            self.place(block, found, block_size);
            return Ok(block);
        }

        let words = self.extension_words(block_size);
        if let Err(err) = self.extend_heap(words) {
            warn!(
                "buddy heap: allocation failure: {} bytes (block {:#x})",
                size,
                block_size.bytes()
            );
            self.print_alloc_failure_stats(size);
            return Err(err);
        }

        let Some((block, found)) = self.find_fit(block_size) else {
            error!(
                "buddy heap: no fit for {:#x} bytes right after extension",
                block_size.bytes()
            );
            return Err(AllocError::HeapExhausted);
        };
        self.place(block, found, block_size);
        Ok(block)
    }

    /// Return `ptr` to the heap and merge it with its free buddies.
    ///
    /// `ptr` must have come from this heap and must not already be free.
    /// Only debug builds check this.
    pub fn free(&mut self, ptr: BlockPtr) {
        let hdr = header(self.grower.memory(), ptr);
        debug_assert!(
            hdr.is_allocated() && hdr.block_size().is_some(),
            "free of invalid block {:#x} (header {:#x})",
            ptr.addr(),
            hdr.raw()
        );
        let Some(size) = hdr.block_size() else {
            error!(
                "buddy heap: free of {:#x} with bad header {:#x}",
                ptr.addr(),
                hdr.raw()
            );
            return;
        };

        set_header(self.grower.memory_mut(), ptr, size.bytes(), false);
        self.coalesce(ptr, size);
    }

    /// Move `ptr`'s payload into a fresh block of `new_size` bytes and free
    /// `ptr`. On failure `ptr` stays allocated and untouched.
    pub fn try_reallocate(&mut self, ptr: BlockPtr, new_size: usize) -> AllocResult<BlockPtr> {
        let new_ptr = self.try_allocate(new_size)?;

        let mem = self.grower.memory_mut();
        let old_payload = header(mem, ptr).block_size().map_or(0, BlockSize::payload);
        let len = new_size.min(old_payload);
        mem.copy_within(ptr.addr()..ptr.addr() + len, new_ptr.addr());

        self.free(ptr);
        Ok(new_ptr)
    }

    /// Internal block size of an allocated block.
    pub fn block_size(&self, ptr: BlockPtr) -> usize {
        header(self.grower.memory(), ptr).size()
    }

    /// Payload bytes the caller may use in an allocated block.
    pub fn usable_size(&self, ptr: BlockPtr) -> usize {
        self.block_size(ptr).saturating_sub(DWORD_SIZE)
    }

    /// The usable payload of an allocated block.
    pub fn payload(&self, ptr: BlockPtr) -> &[u8] {
        let len = self.usable_size(ptr);
        &self.grower.memory()[ptr.addr()..ptr.addr() + len]
    }

    /// The usable payload of an allocated block, mutably.
    pub fn payload_mut(&mut self, ptr: BlockPtr) -> &mut [u8] {
        let len = self.usable_size(ptr);
        &mut self.grower.memory_mut()[ptr.addr()..ptr.addr() + len]
    }

    /// Whether [`init`](Self::init) has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Payload address of the first block.
    pub fn root(&self) -> BlockPtr {
        self.root
    }

    /// Current end of the heap.
    pub fn brk(&self) -> usize {
        self.grower.memory().len()
    }

    /// The growth primitive backing this heap.
    pub fn grower(&self) -> &G {
        &self.grower
    }

    /// The segregated free-list heads.
    pub fn free_lists(&self) -> &FreeLists {
        &self.free_lists
    }

    pub(super) fn memory(&self) -> &[u8] {
        self.grower.memory()
    }

    #[cfg(test)]
    pub(super) fn memory_mut(&mut self) -> &mut [u8] {
        self.grower.memory_mut()
    }

    /// Every block in address order, prologue and epilogue excluded.
    pub fn blocks(&self) -> BlockIter<'_> {
        let first = if self.laid_out { Some(self.root) } else { None };
        BlockIter::new(self.grower.memory(), first)
    }

    /// Blocks on the free list of `class`, head first.
    pub fn free_blocks(&self, class: SizeClass) -> FreeListIter<'_> {
        self.free_lists.iter(self.grower.memory(), class)
    }

    /// Walk the heap and tally its blocks.
    pub fn stats(&self) -> HeapStats {
        let mut stats = HeapStats::new();
        self.blocks().for_each(|block: BlockInfo| stats.record(&block));
        stats
    }

    #[cfg(feature = "tracking")]
    fn print_alloc_failure_stats(&self, request: usize) {
        super::stats::MemoryStatsReporter::print_alloc_failure_stats(
            &self.stats(),
            request,
            self.brk(),
        );
    }

    #[cfg(not(feature = "tracking"))]
    fn print_alloc_failure_stats(&self, _request: usize) {
        // No-op when tracking is disabled
    }

    /// Print the free-list occupancy of every class.
    pub fn print_block_distribution(&self) {
        super::stats::MemoryStatsReporter::print_block_distribution(&self.stats());
    }
}

impl<G: HeapGrower + Default, const CHUNK_SIZE: usize> Default for BuddyHeap<G, CHUNK_SIZE> {
    fn default() -> Self {
        Self::new(G::default())
    }
}

impl<G: HeapGrower, const CHUNK_SIZE: usize> HeapAllocator for BuddyHeap<G, CHUNK_SIZE> {
    fn init(&mut self) -> AllocResult {
        BuddyHeap::init(self)
    }

    fn allocate(&mut self, size: usize) -> Option<BlockPtr> {
        self.try_allocate(size).ok()
    }

    fn free(&mut self, ptr: BlockPtr) {
        BuddyHeap::free(self, ptr)
    }

    fn reallocate(&mut self, ptr: BlockPtr, new_size: usize) -> Option<BlockPtr> {
        self.try_reallocate(ptr, new_size).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap_grower::MemHeap;
    use crate::DEFAULT_MAX_HEAP;
    use alloc::vec::Vec;

    fn new_heap() -> BuddyHeap<MemHeap> {
        let mut heap = BuddyHeap::new(MemHeap::default());
        heap.init().unwrap();
        heap
    }

    fn class_of(bytes: usize) -> SizeClass {
        BlockSize::new(bytes).unwrap().class()
    }

    /// A grower whose region does not start double-word aligned.
    struct Offset(MemHeap);

    impl Offset {
        fn new(max_size: usize) -> Self {
            let mut inner = MemHeap::new(max_size);
            inner.grow_heap(4).unwrap();
            Offset(inner)
        }
    }

    impl HeapGrower for Offset {
        fn grow_heap(&mut self, byte_count: usize) -> Option<usize> {
            self.0.grow_heap(byte_count)
        }
        fn memory(&self) -> &[u8] {
            self.0.memory()
        }
        fn memory_mut(&mut self) -> &mut [u8] {
            self.0.memory_mut()
        }
    }

    #[test]
    fn test_carve_size() {
        assert_eq!(carve_size(0, 4096).bytes(), 4096);
        assert_eq!(carve_size(0, 4096 + 16).bytes(), 4096);
        assert_eq!(carve_size(4096, 12288).bytes(), 4096);
        assert_eq!(carve_size(8192, 8192).bytes(), 8192);
        assert_eq!(carve_size(48, 4096).bytes(), 16);
        assert_eq!(carve_size(0, MAX_BLOCK_SIZE * 2).bytes(), MAX_BLOCK_SIZE);
    }

    #[test]
    fn test_init_layout() {
        let heap = new_heap();
        assert_eq!(heap.root().addr(), PROLOGUE_SIZE);
        assert_eq!(heap.brk(), PROLOGUE_SIZE + DEFAULT_CHUNK_SIZE);

        let blocks: Vec<_> = heap.blocks().collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].size, DEFAULT_CHUNK_SIZE);
        assert!(!blocks[0].allocated);
        assert_eq!(
            heap.free_lists().head(class_of(DEFAULT_CHUNK_SIZE)),
            Some(heap.root())
        );
        assert!(heap.check_heap().is_ok());
    }

    #[test]
    fn test_init_twice() {
        let mut heap = new_heap();
        assert_eq!(heap.init(), Err(AllocError::AlreadyInitialized));
    }

    #[test]
    fn test_allocate_before_init() {
        let mut heap = BuddyHeap::<MemHeap>::new(MemHeap::default());
        assert_eq!(heap.try_allocate(8), Err(AllocError::Uninitialized));
        assert_eq!(heap.blocks().count(), 0);
    }

    #[test]
    fn test_split_leaves_one_free_block_per_class() {
        let mut heap = new_heap();
        let ptr = heap.try_allocate(1).unwrap();
        assert_eq!(ptr, heap.root());
        assert_eq!(heap.block_size(ptr), 16);

        // 4096 split down to 16 leaves one free block of each size 16..2048.
        let mut size = 16;
        while size < DEFAULT_CHUNK_SIZE {
            let free: Vec<_> = heap.free_blocks(class_of(size)).collect();
            assert_eq!(free, [heap.root().add(size)]);
            size <<= 1;
        }
        assert!(heap.free_lists().is_empty(class_of(DEFAULT_CHUNK_SIZE)));
        assert!(heap.check_heap().is_ok());
    }

    #[test]
    fn test_free_merges_back_to_chunk() {
        let mut heap = new_heap();
        let a = heap.try_allocate(1).unwrap();
        let b = heap.try_allocate(100).unwrap();
        let c = heap.try_allocate(500).unwrap();
        heap.free(b);
        heap.free(a);
        heap.free(c);

        let blocks: Vec<_> = heap.blocks().collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].size, DEFAULT_CHUNK_SIZE);
        for class in SizeClass::all() {
            let expected = usize::from(class == class_of(DEFAULT_CHUNK_SIZE));
            assert_eq!(heap.free_blocks(class).count(), expected);
        }
        assert!(heap.check_heap().is_ok());
    }

    #[test]
    fn test_extension_keeps_blocks_aligned() {
        let mut heap = new_heap();
        let small = heap.try_allocate(1).unwrap();
        // 8192-byte block does not fit in the first chunk.
        let big = heap.try_allocate(5000).unwrap();
        assert_eq!(heap.block_size(big), 8192);
        assert_eq!((big.addr() - heap.root().addr()) % 8192, 0);
        assert!(heap.check_heap().is_ok());

        heap.free(big);
        heap.free(small);
        assert!(heap.check_heap().is_ok());
        assert_eq!(heap.stats().used_bytes, 0);
    }

    #[test]
    fn test_largest_class() {
        let mut heap = new_heap();
        let ptr = heap.try_allocate(MAX_BLOCK_SIZE - DWORD_SIZE).unwrap();
        assert_eq!(heap.block_size(ptr), MAX_BLOCK_SIZE);
        assert_eq!(
            heap.try_allocate(MAX_BLOCK_SIZE),
            Err(AllocError::RequestTooLarge)
        );
        heap.free(ptr);
        assert!(heap.check_heap().is_ok());
        assert!(!heap.free_lists().is_empty(SizeClass::MAX));
    }

    #[test]
    fn test_unaligned_growth_base() {
        let mut heap = BuddyHeap::<_>::new(Offset::new(DEFAULT_MAX_HEAP));
        heap.init().unwrap();
        assert_eq!(heap.root().addr() % DWORD_SIZE, 0);
        // Pad and prologue come from a single growth call.
        assert_eq!(heap.grower().0.grow_calls(), 3);

        let ptr = heap.try_allocate(24).unwrap();
        assert_eq!(ptr.addr() % DWORD_SIZE, 0);
        assert!(heap.check_heap().is_ok());
    }

    #[test]
    fn test_custom_chunk_size() {
        let mut heap = BuddyHeap::<MemHeap, 256>::new(MemHeap::default());
        heap.init().unwrap();
        assert_eq!(heap.stats().heap_bytes, 256);

        let ptr = heap.try_allocate(200).unwrap();
        assert_eq!(heap.block_size(ptr), 256);
        assert_eq!(heap.grower().grow_calls(), 2);

        let next = heap.try_allocate(1).unwrap();
        assert_eq!(heap.grower().grow_calls(), 3);
        assert_eq!(next.addr(), ptr.addr() + 256);
        assert!(heap.check_heap().is_ok());
    }

    #[test]
    fn test_failed_prologue_growth_leaks_nothing() {
        // Room for the pad but not for the pad plus the prologue.
        let mut heap = BuddyHeap::<_>::new(Offset::new(4 + 4 + PROLOGUE_SIZE - 2));
        assert_eq!(heap.init(), Err(AllocError::HeapExhausted));
        assert_eq!(heap.brk(), 4);
        assert_eq!(heap.blocks().count(), 0);
    }

    #[test]
    fn test_link_addressable() {
        assert!(link_addressable(0, 4096, MAX_HEAP_ADDR));
        assert!(link_addressable(MAX_HEAP_ADDR - 4096, 4096, MAX_HEAP_ADDR));
        assert!(!link_addressable(MAX_HEAP_ADDR - 4096, 4112, MAX_HEAP_ADDR));
        assert!(!link_addressable(usize::MAX, 16, usize::MAX));
        assert!(link_addressable(64, 64, 128));
        assert!(!link_addressable(64, 80, 128));
    }

    #[test]
    fn test_growth_past_address_limit_is_refused() {
        let mut heap = BuddyHeap::<MemHeap>::new(MemHeap::default());
        heap.addr_limit = PROLOGUE_SIZE + DEFAULT_CHUNK_SIZE - 1;
        assert_eq!(heap.init(), Err(AllocError::HeapExhausted));
        assert_eq!(heap.brk(), PROLOGUE_SIZE);
        assert_eq!(heap.grower().grow_calls(), 1);

        let mut heap = BuddyHeap::<MemHeap>::new(MemHeap::default());
        heap.addr_limit = PROLOGUE_SIZE + DEFAULT_CHUNK_SIZE;
        heap.init().unwrap();
        let ptr = heap.try_allocate(2000).unwrap();
        let calls = heap.grower().grow_calls();
        // Needs a whole 4096-byte block, so the heap has to grow.
        assert_eq!(heap.try_allocate(3000), Err(AllocError::HeapExhausted));
        assert_eq!(heap.grower().grow_calls(), calls);
        assert_eq!(heap.brk(), PROLOGUE_SIZE + DEFAULT_CHUNK_SIZE);
        assert_eq!(heap.block_size(ptr), 2048);
        assert!(heap.check_heap().is_ok());
    }
}
