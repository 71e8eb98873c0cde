use bytemuck::{Pod, Zeroable};

use super::material::MaterialRecord;
use crate::types::{IndexedTriangle, IndexedVert, TriangleVert};

/// Default texcoord synthesized when a file declares none.
pub const DEFAULT_TEXCOORD: [f32; 2] = [0.0, 0.0];

/// Default normal synthesized when a file declares none.
pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// First block of the arena: list lengths of the materialized geometry.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct GeometryHeader {
    pub num_positions: u64,
    pub num_normals: u64,
    pub num_texcoords: u64,
    pub num_materials: u64,
}

/// Read-only view of everything the materializing pass wrote.
///
/// Every slice borrows from the caller's scratch buffer, except `source`,
/// which is the OBJ text material names point into.
#[derive(Debug, Clone, Copy)]
pub struct Geometry<'a> {
    pub header: &'a GeometryHeader,
    /// `[x, y, z, ...]`
    pub positions: &'a [f32],
    /// `[nx, ny, nz, ...]`, never empty.
    pub normals: &'a [f32],
    /// `[s, t, ...]`, never empty.
    pub texcoords: &'a [f32],
    pub materials: &'a [MaterialRecord],
    pub triangles: &'a [IndexedTriangle],
    pub(crate) source: &'a [u8],
}

impl<'a> Geometry<'a> {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.materials.iter().map(|m| m.len as usize).sum()
    }

    /// Triangles written for one material.
    pub fn material_triangles(&self, record: &MaterialRecord) -> &'a [IndexedTriangle] {
        &self.triangles[record.triangles()]
    }

    /// Raw name bytes of a material, `None` for the default slot.
    pub fn material_name(&self, record: &MaterialRecord) -> Option<&'a [u8]> {
        record.name_in(self.source)
    }

    /// Dereference one indexed corner. Indices were range-checked when the
    /// triangle was written.
    pub fn resolve_vert(&self, v: IndexedVert) -> TriangleVert {
        let p = v.pos as usize * 3;
        let t = v.texcoord as usize * 2;
        let n = v.normal as usize * 3;
        TriangleVert {
            pos: [self.positions[p], self.positions[p + 1], self.positions[p + 2]],
            texcoord: [self.texcoords[t], self.texcoords[t + 1]],
            normal: [self.normals[n], self.normals[n + 1], self.normals[n + 2]],
        }
    }

    pub fn resolve(&self, tri: &IndexedTriangle) -> [TriangleVert; 3] {
        [
            self.resolve_vert(tri.a),
            self.resolve_vert(tri.b),
            self.resolve_vert(tri.c),
        ]
    }
}
