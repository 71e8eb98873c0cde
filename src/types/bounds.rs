use glam::Vec3;
use serde::Serialize;

/// Axis-aligned bounding box accumulated from triangle corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    /// The inverted box; growing it by any point yields that point.
    pub const EMPTY: BoundingBox = BoundingBox {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Whether no point has been added yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Extend the box to contain `p`.
    pub fn grow(&mut self, p: [f32; 3]) {
        let p = Vec3::from_array(p);
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Centre point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each axis.
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Length of the space diagonal.
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    /// Return the smallest box that contains both `self` and `other`.
    pub fn merge(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Serializable `[min, max]` pair, `None` for an empty box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundsSummary {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    pub fn summary(&self) -> Option<BoundsSummary> {
        (!self.is_empty()).then(|| BoundsSummary {
            min: self.min.to_array(),
            max: self.max.to_array(),
        })
    }
}
