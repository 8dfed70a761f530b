//! Buddy block metadata
//!
//! One header word per block packs the block size with the allocated bit.
//! Everything here is plain arithmetic over the heap's byte buffer.

use core::num::NonZeroUsize;

use super::size_class::BlockSize;
use crate::{HEADER_SIZE, WORD_SIZE};

const ALLOC_BIT: u32 = 0x1;
const SIZE_MASK: u32 = !0x7;

/// Payload address of a block: a byte offset into the heap.
///
/// Address 0 always belongs to the prologue, so a payload address is never 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockPtr(NonZeroUsize);

impl BlockPtr {
    pub const fn new(addr: usize) -> Option<Self> {
        match NonZeroUsize::new(addr) {
            Some(addr) => Some(BlockPtr(addr)),
            None => None,
        }
    }

    pub const fn addr(self) -> usize {
        self.0.get()
    }

    /// Address of this block's header word.
    pub const fn header_addr(self) -> usize {
        self.0.get() - HEADER_SIZE
    }

    /// Payload address of the block `bytes` further into the heap.
    pub const fn add(self, bytes: usize) -> Self {
        BlockPtr(self.0.saturating_add(bytes))
    }
}

/// A decoded header word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header(u32);

impl Header {
    /// The epilogue: size 0, allocated.
    pub const EPILOGUE: Header = Header::pack(0, true);

    pub const fn pack(size: usize, allocated: bool) -> Self {
        Header(size as u32 | if allocated { ALLOC_BIT } else { 0 })
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn size(self) -> usize {
        (self.0 & SIZE_MASK) as usize
    }

    /// The size as a [`BlockSize`], if it is a valid one.
    pub const fn block_size(self) -> Option<BlockSize> {
        BlockSize::new(self.size())
    }

    pub const fn is_allocated(self) -> bool {
        self.0 & ALLOC_BIT != 0
    }

    pub const fn is_free(self) -> bool {
        !self.is_allocated()
    }
}

/// Read the word at `addr`.
#[inline]
pub(crate) fn read_word(mem: &[u8], addr: usize) -> u32 {
    let mut word = [0u8; WORD_SIZE];
    word.copy_from_slice(&mem[addr..addr + WORD_SIZE]);
    u32::from_ne_bytes(word)
}

/// Write `value` to the word at `addr`.
#[inline]
pub(crate) fn write_word(mem: &mut [u8], addr: usize, value: u32) {
    mem[addr..addr + WORD_SIZE].copy_from_slice(&value.to_ne_bytes());
}

#[inline]
pub(crate) fn header(mem: &[u8], block: BlockPtr) -> Header {
    Header(read_word(mem, block.header_addr()))
}

#[inline]
pub(crate) fn set_header(mem: &mut [u8], block: BlockPtr, size: usize, allocated: bool) {
    write_word(mem, block.header_addr(), Header::pack(size, allocated).raw());
}

/// The block that structurally follows `block`.
#[inline]
pub(crate) fn next_block(mem: &[u8], block: BlockPtr) -> BlockPtr {
    block.add(header(mem, block).size())
}

/// A block as seen by a heap walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub ptr: BlockPtr,
    pub size: usize,
    pub allocated: bool,
}

/// Walks blocks in address order until the epilogue.
pub struct BlockIter<'a> {
    mem: &'a [u8],
    current: Option<BlockPtr>,
}

impl<'a> BlockIter<'a> {
    pub(crate) fn new(mem: &'a [u8], first: Option<BlockPtr>) -> Self {
        Self {
            mem,
            current: first,
        }
    }
}

impl Iterator for BlockIter<'_> {
    type Item = BlockInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.current.take()?;
        if block.addr() > self.mem.len() {
            return None;
        }
        let hdr = header(self.mem, block);
        if hdr.size() == 0 {
            return None;
        }
        self.current = Some(block.add(hdr.size()));
        Some(BlockInfo {
            ptr: block,
            size: hdr.size(),
            allocated: hdr.is_allocated(),
        })
    }
}
