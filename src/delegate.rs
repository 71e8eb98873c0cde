use crate::error::ParseError;
use crate::parser::Geometry;
use crate::types::{IndexedTriangle, TriangleVert};

/// Which output callbacks a delegate wants.
///
/// The parser checks these before each kind of callback, and skips the
/// emission walk entirely when none is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub geometry: bool,
    pub material: bool,
    pub material_triangles: bool,
    pub triangle: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        geometry: false,
        material: false,
        material_triangles: false,
        triangle: false,
    };

    pub const ALL: Capabilities = Capabilities {
        geometry: true,
        material: true,
        material_triangles: true,
        triangle: true,
    };

    /// Whether any per-material callback is wanted.
    pub fn per_material(&self) -> bool {
        self.material || self.material_triangles || self.triangle
    }

    pub fn any(&self) -> bool {
        self.geometry || self.per_material()
    }
}

/// Receiver for parser output. Every method is optional.
///
/// Callbacks run synchronously inside [`parse_obj`](crate::parse_obj) and
/// must not call back into the parser with the same delegate.
pub trait ObjDelegate {
    /// Output callbacks this delegate implements. Defaults to all of them.
    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    /// A fatal error; the parse call returns the same error afterwards.
    fn error(&mut self, _error: &ParseError) {}

    /// The materialized vertex lists and indexed triangles, delivered once
    /// before any per-material callback.
    fn geometry(&mut self, _geometry: &Geometry<'_>) {}

    /// Start of a material group with `triangle_count` triangles.
    fn material(&mut self, _name: &str, _triangle_count: usize) {}

    /// The whole indexed triangle array of a material group.
    fn material_triangles(&mut self, _name: &str, _triangles: &[IndexedTriangle]) {}

    /// One dereferenced triangle of the current material group.
    fn triangle(&mut self, _a: TriangleVert, _b: TriangleVert, _c: TriangleVert) {}
}

/// Delegate for sizing-only or validation-only calls.
impl ObjDelegate for () {
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }
}

impl<D: ObjDelegate + ?Sized> ObjDelegate for &mut D {
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn error(&mut self, error: &ParseError) {
        (**self).error(error);
    }

    fn geometry(&mut self, geometry: &Geometry<'_>) {
        (**self).geometry(geometry);
    }

    fn material(&mut self, name: &str, triangle_count: usize) {
        (**self).material(name, triangle_count);
    }

    fn material_triangles(&mut self, name: &str, triangles: &[IndexedTriangle]) {
        (**self).material_triangles(name, triangles);
    }

    fn triangle(&mut self, a: TriangleVert, b: TriangleVert, c: TriangleVert) {
        (**self).triangle(a, b, c);
    }
}
