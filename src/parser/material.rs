use bytemuck::{Pod, Zeroable};
use tracing::trace;

use crate::error::ParseErrorKind;

/// Unique materials per file, including the implicit default slot.
pub const MAX_MATERIALS: usize = 256;

/// Capacity of the buffer a material name is copied into before it is
/// handed to a delegate, including one byte of headroom.
pub const MAX_MATERIAL_NAME: usize = 256;

/// Name reported for faces that precede the first `usemtl`.
pub const DEFAULT_MATERIAL_NAME: &str = "mtl.default";

/// Slot of the implicit default material.
pub const DEFAULT_MATERIAL: usize = 0;

/// Material table built during the counting pass.
///
/// Lives on the stack; names borrow from the source buffer and are not
/// delimited, so they must go through [`MaterialName`] before leaving the
/// parser.
#[derive(Debug)]
pub struct MaterialTable<'a> {
    names: [&'a [u8]; MAX_MATERIALS],
    /// Byte offset of each name in the source buffer.
    offsets: [usize; MAX_MATERIALS],
    triangles: [usize; MAX_MATERIALS],
    len: usize,
}

impl Default for MaterialTable<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> MaterialTable<'a> {
    /// A table holding only the default material.
    pub fn new() -> Self {
        Self {
            names: [b"".as_slice(); MAX_MATERIALS],
            offsets: [0; MAX_MATERIALS],
            triangles: [0; MAX_MATERIALS],
            len: 1,
        }
    }

    /// Number of slots, default included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: the default slot is present from construction.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot of a previously interned name. Never matches the default slot.
    pub fn find(&self, name: &[u8]) -> Option<usize> {
        (1..self.len).find(|&slot| self.names[slot] == name)
    }

    /// Slot for `name`, found `offset` bytes into the source, appending a
    /// new entry on first sight.
    pub fn intern(&mut self, name: &'a [u8], offset: usize) -> Result<usize, ParseErrorKind> {
        if let Some(slot) = self.find(name) {
            return Ok(slot);
        }
        if self.len == MAX_MATERIALS {
            return Err(ParseErrorKind::TooManyMaterials {
                limit: MAX_MATERIALS,
            });
        }
        let slot = self.len;
        self.names[slot] = name;
        self.offsets[slot] = offset;
        self.len += 1;
        trace!(slot, name = MaterialName::new(name).as_str(), "Interned material");
        Ok(slot)
    }

    /// Tally `count` triangles against `slot`.
    pub fn record_triangles(&mut self, slot: usize, count: usize) {
        self.triangles[slot] += count;
    }

    /// Raw name bytes; empty for the default slot.
    pub fn name(&self, slot: usize) -> &'a [u8] {
        self.names[slot]
    }

    /// Source offset of the first occurrence of a name; 0 for the default slot.
    pub fn name_offset(&self, slot: usize) -> usize {
        self.offsets[slot]
    }

    pub fn triangle_count(&self, slot: usize) -> usize {
        self.triangles[slot]
    }

    /// Sum of triangles over every slot.
    pub fn total_triangles(&self) -> usize {
        self.triangles[..self.len].iter().sum()
    }
}

/// Pass-2 material entry stored in the scratch arena.
///
/// `first_triangle` and `capacity` locate the material's range inside the
/// arena triangle storage; `len` grows as triangles are written.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct MaterialRecord {
    pub name_offset: u64,
    pub name_len: u64,
    pub first_triangle: u64,
    pub capacity: u64,
    pub len: u64,
}

impl MaterialRecord {
    /// Range of this material's written triangles in the arena storage.
    pub fn triangles(&self) -> std::ops::Range<usize> {
        let start = self.first_triangle as usize;
        start..start + self.len as usize
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// Name bytes inside `source`, or `None` for the default slot.
    pub fn name_in<'s>(&self, source: &'s [u8]) -> Option<&'s [u8]> {
        if self.name_len == 0 {
            return None;
        }
        let start = self.name_offset as usize;
        source.get(start..start + self.name_len as usize)
    }
}

/// Bounded, independently owned copy of a material name.
///
/// Names longer than `MAX_MATERIAL_NAME - 1` bytes are truncated, and the
/// exposed string stops at the last complete UTF-8 character.
pub struct MaterialName {
    buf: [u8; MAX_MATERIAL_NAME],
    len: usize,
}

impl MaterialName {
    pub fn new(name: &[u8]) -> Self {
        let mut buf = [0u8; MAX_MATERIAL_NAME];
        let len = name.len().min(MAX_MATERIAL_NAME - 1);
        buf[..len].copy_from_slice(&name[..len]);
        Self { buf, len }
    }

    pub fn as_str(&self) -> &str {
        let bytes = &self.buf[..self.len];
        match std::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
        }
    }
}
