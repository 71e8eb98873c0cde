use std::mem::{align_of, size_of};

use bytemuck::Pod;

/// Strictest alignment of any block type placed in the arena.
pub const ARENA_ALIGN: usize = 8;

/// Returned when a push does not fit in the remaining capacity.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("scratch arena exhausted")]
pub struct ArenaExhausted;

/// Something that can hand out typed blocks in push order.
///
/// [`ScratchLayout`] and [`Arena`] both implement it, so the size reported
/// by the counting pass comes from running the exact push sequence the
/// materializing pass later performs.
pub trait BumpAllocator {
    type Block<T: Pod>;

    fn push<T: Pod>(&mut self, count: usize) -> Result<Self::Block<T>, ArenaExhausted>;
}

#[inline]
fn align_up(offset: usize, align: usize) -> Option<usize> {
    offset.checked_add(align - 1).map(|v| v & !(align - 1))
}

/// Size-only twin of [`Arena`]: tracks the offset pushes would reach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScratchLayout {
    offset: usize,
}

impl ScratchLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes consumed assuming an `ARENA_ALIGN`-aligned base.
    pub fn used(&self) -> usize {
        self.offset
    }

    /// Bytes a caller must provide so that any base address fits.
    pub fn required(&self) -> usize {
        self.used() + (ARENA_ALIGN - 1)
    }
}

impl BumpAllocator for ScratchLayout {
    type Block<T: Pod> = ();

    fn push<T: Pod>(&mut self, count: usize) -> Result<(), ArenaExhausted> {
        debug_assert!(align_of::<T>() <= ARENA_ALIGN);
        let start = align_up(self.offset, align_of::<T>()).ok_or(ArenaExhausted)?;
        let bytes = size_of::<T>().checked_mul(count).ok_or(ArenaExhausted)?;
        self.offset = start.checked_add(bytes).ok_or(ArenaExhausted)?;
        Ok(())
    }
}

/// Index-addressed bump allocator over a borrowed byte buffer.
///
/// Blocks are zeroed before they are handed out. Nothing is ever freed;
/// the caller reclaims the whole buffer when the borrow ends.
#[derive(Debug)]
pub struct Arena<'a> {
    rest: &'a mut [u8],
    offset: usize,
    capacity: usize,
}

impl<'a> Arena<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        let capacity = buf.len();
        let pad = buf.as_ptr().align_offset(ARENA_ALIGN).min(capacity);
        let (_, rest) = buf.split_at_mut(pad);
        Self {
            rest,
            offset: pad,
            capacity,
        }
    }

    /// Bytes consumed so far, including base alignment padding.
    pub fn used(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.offset
    }
}

impl<'a> BumpAllocator for Arena<'a> {
    type Block<T: Pod> = &'a mut [T];

    fn push<T: Pod>(&mut self, count: usize) -> Result<&'a mut [T], ArenaExhausted> {
        let pad = self.rest.as_ptr().align_offset(align_of::<T>());
        let bytes = size_of::<T>().checked_mul(count).ok_or(ArenaExhausted)?;
        let needed = pad.checked_add(bytes).ok_or(ArenaExhausted)?;
        if needed > self.rest.len() {
            return Err(ArenaExhausted);
        }

        let rest = std::mem::take(&mut self.rest);
        let (block, tail) = rest.split_at_mut(needed);
        self.rest = tail;
        self.offset += needed;

        let block = &mut block[pad..];
        block.fill(0);
        bytemuck::try_cast_slice_mut(block).map_err(|_| ArenaExhausted)
    }
}
