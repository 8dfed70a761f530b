//! Segregated free lists
//!
//! One doubly-linked list per size class. Only the heads live here; the
//! `next`/`prev` links are stored inside each free block's payload, so a
//! free block costs no memory beyond its own bytes.

use super::buddy_block::{read_word, write_word, BlockPtr};
use super::size_class::SizeClass;
use crate::{FREE_LIST_NUMS, WORD_SIZE};

/// Value stored in a link word that points nowhere.
const NIL: u32 = 0;

#[inline]
fn decode(word: u32) -> Option<BlockPtr> {
    BlockPtr::new(word as usize)
}

#[inline]
fn encode(link: Option<BlockPtr>) -> u32 {
    link.map_or(NIL, |block| block.addr() as u32)
}

#[inline]
pub(crate) fn next_link(mem: &[u8], block: BlockPtr) -> Option<BlockPtr> {
    decode(read_word(mem, block.addr()))
}

#[inline]
pub(crate) fn prev_link(mem: &[u8], block: BlockPtr) -> Option<BlockPtr> {
    decode(read_word(mem, block.addr() + WORD_SIZE))
}

#[inline]
fn set_next(mem: &mut [u8], block: BlockPtr, next: Option<BlockPtr>) {
    write_word(mem, block.addr(), encode(next));
}

#[inline]
fn set_prev(mem: &mut [u8], block: BlockPtr, prev: Option<BlockPtr>) {
    write_word(mem, block.addr() + WORD_SIZE, encode(prev));
}

/// Heads of the per-class free lists.
#[derive(Debug, Clone)]
pub struct FreeLists {
    heads: [Option<BlockPtr>; FREE_LIST_NUMS],
}

impl FreeLists {
    pub const fn new() -> Self {
        Self {
            heads: [None; FREE_LIST_NUMS],
        }
    }

    /// Forget every list. Blocks are not touched.
    pub fn clear(&mut self) {
        self.heads = [None; FREE_LIST_NUMS];
    }

    pub fn head(&self, class: SizeClass) -> Option<BlockPtr> {
        self.heads[class.index()]
    }

    pub fn is_empty(&self, class: SizeClass) -> bool {
        self.heads[class.index()].is_none()
    }

    /// Push `block` at the head of `class`'s list.
    pub(crate) fn insert(&mut self, mem: &mut [u8], block: BlockPtr, class: SizeClass) {
        let head = self.heads[class.index()];
        if let Some(head) = head {
            set_prev(mem, head, Some(block));
        }
        set_next(mem, block, head);
        set_prev(mem, block, None);
        self.heads[class.index()] = Some(block);
    }

    /// Unlink `block` from `class`'s list and clear its links.
    ///
    /// `block` must currently be on that list.
    pub(crate) fn remove(&mut self, mem: &mut [u8], block: BlockPtr, class: SizeClass) {
        let next = next_link(mem, block);
        let prev = prev_link(mem, block);

        if self.heads[class.index()] == Some(block) {
            if let Some(next) = next {
                set_prev(mem, next, None);
            }
            self.heads[class.index()] = next;
        } else if let Some(next) = next {
            set_prev(mem, next, prev);
            if let Some(prev) = prev {
                set_next(mem, prev, Some(next));
            }
        } else if let Some(prev) = prev {
            set_next(mem, prev, None);
        }

        set_next(mem, block, None);
        set_prev(mem, block, None);
    }

    /// Iterate over `class`'s list, head first.
    pub fn iter<'a>(&self, mem: &'a [u8], class: SizeClass) -> FreeListIter<'a> {
        FreeListIter {
            mem,
            current: self.heads[class.index()],
        }
    }
}

impl Default for FreeLists {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over one free list.
pub struct FreeListIter<'a> {
    mem: &'a [u8],
    current: Option<BlockPtr>,
}

impl Iterator for FreeListIter<'_> {
    type Item = BlockPtr;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.current?;
        self.current = next_link(self.mem, block);
        Some(block)
    }
}
