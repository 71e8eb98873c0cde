use super::geometry::Geometry;
use super::material::{DEFAULT_MATERIAL_NAME, MaterialName};
use crate::delegate::ObjDelegate;

/// Walk materials in declaration order and fire the callbacks the
/// delegate asked for. Materials without triangles are skipped.
pub(crate) fn emit<D: ObjDelegate + ?Sized>(geometry: &Geometry<'_>, delegate: &mut D) {
    let caps = delegate.capabilities();
    if !caps.any() {
        return;
    }
    if caps.geometry {
        delegate.geometry(geometry);
    }
    if !caps.per_material() {
        return;
    }

    for record in geometry.materials.iter().filter(|r| r.len > 0) {
        let name = MaterialName::new(
            geometry
                .material_name(record)
                .unwrap_or(DEFAULT_MATERIAL_NAME.as_bytes()),
        );
        let triangles = geometry.material_triangles(record);

        if caps.material {
            delegate.material(name.as_str(), triangles.len());
        }
        if caps.material_triangles {
            delegate.material_triangles(name.as_str(), triangles);
        }
        if caps.triangle {
            for tri in triangles {
                let [a, b, c] = geometry.resolve(tri);
                delegate.triangle(a, b, c);
            }
        }
    }
}
