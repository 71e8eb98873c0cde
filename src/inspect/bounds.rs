use tracing::debug;

use crate::delegate::{Capabilities, ObjDelegate};
use crate::error::ParseError;
use crate::types::{BoundingBox, MaterialGroup, MaterialUsage, TriangleVert};

/// Delegate that accumulates scene bounds and per-material triangle
/// counts, optionally keeping every resolved triangle.
#[derive(Debug, Default)]
pub struct BoundsDelegate {
    pub bounds: BoundingBox,
    pub materials: Vec<MaterialUsage>,
    groups: Option<Vec<MaterialGroup>>,
}

impl BoundsDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also copy triangles into owned [`MaterialGroup`]s.
    pub fn keeping_groups() -> Self {
        Self {
            groups: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Collected groups; empty unless built with [`keeping_groups`](Self::keeping_groups).
    pub fn into_groups(self) -> Vec<MaterialGroup> {
        self.groups.unwrap_or_default()
    }
}

impl ObjDelegate for BoundsDelegate {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            material: true,
            triangle: true,
            ..Capabilities::NONE
        }
    }

    fn error(&mut self, error: &ParseError) {
        debug!(line = error.line, %error, "OBJ parse failed");
    }

    fn material(&mut self, name: &str, triangle_count: usize) {
        self.materials.push(MaterialUsage {
            name: name.to_owned(),
            triangles: triangle_count,
        });
        if let Some(groups) = self.groups.as_mut() {
            groups.push(MaterialGroup::new(name, triangle_count));
        }
    }

    fn triangle(&mut self, a: TriangleVert, b: TriangleVert, c: TriangleVert) {
        self.bounds.grow(a.pos);
        self.bounds.grow(b.pos);
        self.bounds.grow(c.pos);
        if let Some(group) = self.groups.as_mut().and_then(|g| g.last_mut()) {
            group.triangles.push([a, b, c]);
        }
    }
}
