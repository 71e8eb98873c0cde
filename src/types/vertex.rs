use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// A fully dereferenced triangle corner, as handed to delegates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TriangleVert {
    pub pos: [f32; 3],
    pub texcoord: [f32; 2],
    pub normal: [f32; 3],
}

/// One face corner as 0-based indices into the position, texcoord and
/// normal lists. An omitted texcoord or normal is stored as 0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct IndexedVert {
    pub pos: u32,
    pub texcoord: u32,
    pub normal: u32,
}

impl IndexedVert {
    pub const fn new(pos: u32, texcoord: u32, normal: u32) -> Self {
        Self {
            pos,
            texcoord,
            normal,
        }
    }
}

/// A triangle of indexed corners, stored inside the scratch arena.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct IndexedTriangle {
    pub a: IndexedVert,
    pub b: IndexedVert,
    pub c: IndexedVert,
}

impl IndexedTriangle {
    pub const fn new(a: IndexedVert, b: IndexedVert, c: IndexedVert) -> Self {
        Self { a, b, c }
    }

    /// Position indices of the three corners.
    pub fn positions(&self) -> [u32; 3] {
        [self.a.pos, self.b.pos, self.c.pos]
    }
}

/// Per-file counters reported by every parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ObjStats {
    pub num_verts: usize,
    pub num_norms: usize,
    pub num_texcoords: usize,
    pub num_faces: usize,
    pub num_triangles: usize,
    /// Materials including the implicit default slot.
    pub num_materials: usize,
}
