pub mod bounds;
pub mod material;
pub mod vertex;

pub use bounds::{BoundingBox, BoundsSummary};
pub use material::{MaterialGroup, MaterialUsage};
pub use vertex::{IndexedTriangle, IndexedVert, ObjStats, TriangleVert};
