use serde::Serialize;

use super::TriangleVert;

/// Owned triangles for one material, in emission order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterialGroup {
    pub name: String,
    pub triangles: Vec<[TriangleVert; 3]>,
}

impl MaterialGroup {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            triangles: Vec::with_capacity(capacity),
        }
    }

    /// Number of triangles collected so far.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the group holds no geometry.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Per-material triangle count, as reported by the inspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialUsage {
    pub name: String,
    pub triangles: usize,
}
