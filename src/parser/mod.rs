pub mod arena;
pub mod decode;
mod driver;
mod emit;
pub mod geometry;
pub mod material;
pub mod scanner;

pub use geometry::{DEFAULT_NORMAL, DEFAULT_TEXCOORD, Geometry, GeometryHeader};
pub use material::{DEFAULT_MATERIAL_NAME, MAX_MATERIAL_NAME, MAX_MATERIALS, MaterialRecord};

use crate::delegate::ObjDelegate;
use crate::error::ParseError;
use crate::types::ObjStats;

/// Outcome of a successful [`parse_obj`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseReport {
    /// Scratch bytes a materializing call needs.
    pub required_scratch: usize,
    /// Counts as declared by the file. A file without `vt` or `vn` lines
    /// reports `num_texcoords` or `num_norms` as zero, even though the
    /// materialized geometry holds one default entry for each (see
    /// [`GeometryHeader`], whose counts include that padding).
    pub stats: ObjStats,
    /// Lines in the input.
    pub lines: usize,
    /// Whether the second pass ran and callbacks fired.
    pub materialized: bool,
}

/// Parse OBJ text.
///
/// Call once with `scratch = None` to learn
/// [`ParseReport::required_scratch`], then again with a buffer of at least
/// that many bytes to fill it and drive the delegate's output callbacks.
/// The parser allocates nothing itself.
///
/// Any error is passed to [`ObjDelegate::error`] and returned; no output
/// callback fires for a failed call.
///
/// ```
/// use obj_scratch::{parse_obj, ObjDelegate, TriangleVert};
///
/// #[derive(Default)]
/// struct Count(usize);
///
/// impl ObjDelegate for Count {
///     fn triangle(&mut self, _a: TriangleVert, _b: TriangleVert, _c: TriangleVert) {
///         self.0 += 1;
///     }
/// }
///
/// let obj = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 4 3\n";
/// let mut count = Count::default();
/// let sizing = parse_obj(obj, None, &mut count).unwrap();
/// let mut scratch = vec![0u8; sizing.required_scratch];
/// parse_obj(obj, Some(&mut scratch), &mut count).unwrap();
/// assert_eq!(count.0, 2);
/// ```
pub fn parse_obj<D: ObjDelegate + ?Sized>(
    source: &[u8],
    scratch: Option<&mut [u8]>,
    delegate: &mut D,
) -> Result<ParseReport, ParseError> {
    let result = driver::run(source, scratch, delegate);
    if let Err(ref e) = result {
        delegate.error(e);
    }
    result
}

/// Scratch bytes needed to materialize `source`, from a counting pass
/// alone. Also validates the input.
pub fn required_scratch_size(source: &[u8]) -> Result<usize, ParseError> {
    parse_obj(source, None, &mut ()).map(|report| report.required_scratch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::Capabilities;
    use crate::error::ParseErrorKind;
    use crate::types::{IndexedTriangle, IndexedVert, TriangleVert};

    #[derive(Default)]
    struct Recorder {
        errors: Vec<ParseError>,
        materials: Vec<(String, usize)>,
        indexed: Vec<(String, Vec<IndexedTriangle>)>,
        triangles: Vec<[TriangleVert; 3]>,
        vertex_count: Option<usize>,
        header: Option<GeometryHeader>,
    }

    impl ObjDelegate for Recorder {
        fn error(&mut self, error: &ParseError) {
            self.errors.push(*error);
        }

        fn geometry(&mut self, geometry: &Geometry<'_>) {
            self.vertex_count = Some(geometry.vertex_count());
            self.header = Some(*geometry.header);
        }

        fn material(&mut self, name: &str, triangle_count: usize) {
            self.materials.push((name.to_owned(), triangle_count));
        }

        fn material_triangles(&mut self, name: &str, triangles: &[IndexedTriangle]) {
            self.indexed.push((name.to_owned(), triangles.to_vec()));
        }

        fn triangle(&mut self, a: TriangleVert, b: TriangleVert, c: TriangleVert) {
            self.triangles.push([a, b, c]);
        }
    }

    fn parse(source: &str) -> (Recorder, ParseReport) {
        let mut recorder = Recorder::default();
        let sizing = parse_obj(source.as_bytes(), None, &mut recorder).unwrap();
        assert!(!sizing.materialized);
        assert!(recorder.triangles.is_empty());

        let mut scratch = vec![0u8; sizing.required_scratch];
        let report = parse_obj(source.as_bytes(), Some(&mut scratch), &mut recorder).unwrap();
        assert!(report.materialized);
        assert_eq!(report.stats, sizing.stats);
        assert_eq!(report.required_scratch, sizing.required_scratch);
        (recorder, report)
    }

    fn positions(tri: &IndexedTriangle) -> [u32; 3] {
        tri.positions()
    }

    #[test]
    fn single_triangle_end_to_end() {
        let (rec, report) = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        assert_eq!(report.stats.num_verts, 3);
        assert_eq!(report.stats.num_faces, 1);
        assert_eq!(report.stats.num_triangles, 1);
        assert_eq!(report.stats.num_materials, 1);
        assert_eq!(rec.materials, vec![(DEFAULT_MATERIAL_NAME.to_owned(), 1)]);
        assert_eq!(rec.triangles.len(), 1);
        let [a, b, c] = rec.triangles[0];
        assert_eq!(a.pos, [0.0, 0.0, 0.0]);
        assert_eq!(b.pos, [1.0, 0.0, 0.0]);
        assert_eq!(c.pos, [0.0, 1.0, 0.0]);
        assert!(rec.errors.is_empty());
        assert_eq!(rec.vertex_count, Some(3));
    }

    #[test]
    fn quad_is_fan_triangulated() {
        let (rec, _) = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n");
        let tris = &rec.indexed[0].1;
        assert_eq!(tris.len(), 2);
        assert_eq!(positions(&tris[0]), [0, 1, 2]);
        assert_eq!(positions(&tris[1]), [0, 2, 3]);
    }

    #[test]
    fn pentagon_fans_from_first_vertex() {
        let mut src = String::new();
        for i in 0..5 {
            src.push_str(&format!("v {i} 0 0\n"));
        }
        src.push_str("f 1 2 3 4 5\n");
        let (rec, report) = parse(&src);
        assert_eq!(report.stats.num_triangles, 3);
        let got: Vec<_> = rec.indexed[0].1.iter().map(positions).collect();
        assert_eq!(got, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
    }

    #[test]
    fn minus_one_is_latest_vertex() {
        let (rec, _) = parse("v 0 0 0\nv 1 0 0\nv 2 0 0\nv 3 0 0\nv 4 0 0\nf -1 -2 -3\n");
        let tri = rec.indexed[0].1[0];
        assert_eq!(tri.a.pos, 4);
        assert_eq!(rec.triangles[0][0].pos, [4.0, 0.0, 0.0]);
    }

    #[test]
    fn relative_indices_count_from_current_line() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n\
                   v 0 0 5\nv 1 0 5\nv 0 1 5\nf -3 -2 -1\n";
        let (rec, _) = parse(src);
        let tris = &rec.indexed[0].1;
        assert_eq!(positions(&tris[0]), [0, 1, 2]);
        assert_eq!(positions(&tris[1]), [3, 4, 5]);
        assert_eq!(rec.triangles[1][0].pos, [0.0, 0.0, 5.0]);
    }

    #[test]
    fn relative_texcoords_and_normals() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvn 0 0 1\n\
                   f -3/-2/-1 -2/-1/-1 -1/-1/-1\nvn 1 0 0\nf 1//-1 2//-1 3//-1\n";
        let (rec, _) = parse(src);
        let tris = &rec.indexed[0].1;
        assert_eq!(tris[0].a, IndexedVert::new(0, 0, 0));
        assert_eq!(tris[0].b, IndexedVert::new(1, 1, 0));
        assert_eq!(tris[1].a.normal, 1);
        assert_eq!(rec.triangles[1][0].normal, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn materials_in_first_declaration_order() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
                   usemtl A\nf 1 2 3\nf 1 2 3\n\
                   usemtl B\nf 1 2 3\n\
                   usemtl A\nf 1 2 3\n";
        let (rec, report) = parse(src);
        assert_eq!(
            rec.materials,
            vec![("A".to_owned(), 3), ("B".to_owned(), 1)]
        );
        assert_eq!(report.stats.num_materials, 3);
        assert_eq!(rec.indexed[0].0, "A");
        assert_eq!(rec.indexed[0].1.len(), 3);
        assert_eq!(rec.triangles.len(), 4);
    }

    #[test]
    fn faces_before_usemtl_use_default_material() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nusemtl stone\nf 3 2 1\n";
        let (rec, _) = parse(src);
        assert_eq!(
            rec.materials,
            vec![
                (DEFAULT_MATERIAL_NAME.to_owned(), 1),
                ("stone".to_owned(), 1)
            ]
        );
    }

    #[test]
    fn named_default_material_is_distinct() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nusemtl mtl.default\nf 1 2 3\n";
        let (rec, _) = parse(src);
        assert_eq!(rec.materials.len(), 2);
        assert_eq!(rec.materials[0].0, rec.materials[1].0);
    }

    #[test]
    fn full_records_resolve_verbatim() {
        let src = "v 1.5 -2 3.25\nv 4 5 6\nv 7 8 9\n\
                   vt 0.125 0.75\nvt 0.5 0.5\nvt 1 1\n\
                   vn 0 0 1\nvn 0 1 0\nvn 1 0 0\n\
                   f 1/1/1 2/2/2 3/3/3\n";
        let (rec, report) = parse(src);
        let a = rec.triangles[0][0];
        assert_eq!(a.pos, [1.5, -2.0, 3.25]);
        assert_eq!(a.texcoord, [0.125, 0.75]);
        assert_eq!(a.normal, [0.0, 0.0, 1.0]);
        assert_eq!(rec.triangles[0][2].normal, [1.0, 0.0, 0.0]);
        assert_eq!(report.stats.num_texcoords, 3);
        assert_eq!(report.stats.num_norms, 3);
    }

    #[test]
    fn missing_texcoords_and_normals_get_defaults() {
        let (rec, report) = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        assert_eq!(report.stats.num_texcoords, 0);
        assert_eq!(report.stats.num_norms, 0);
        let header = rec.header.unwrap();
        assert_eq!(header.num_texcoords, 1);
        assert_eq!(header.num_normals, 1);
        assert_eq!(header.num_positions, 3);
        for v in rec.triangles[0] {
            assert_eq!(v.texcoord, DEFAULT_TEXCOORD);
            assert_eq!(v.normal, DEFAULT_NORMAL);
        }
    }

    #[test]
    fn reported_size_is_exact() {
        let src = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl a\nf 1 2 3\n";
        let required = required_scratch_size(src).unwrap();

        let mut rec = Recorder::default();
        let mut scratch = vec![0u8; required - 1];
        let err = parse_obj(src, Some(&mut scratch), &mut rec).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::InsufficientScratchMemory {
                required,
                provided: required - 1
            }
        );
        assert_eq!(err.line, 5);
        assert_eq!(rec.errors, vec![err]);
        assert!(rec.materials.is_empty());
        assert!(rec.triangles.is_empty());
    }

    #[test]
    fn unaligned_scratch_is_accepted() {
        let src = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let required = required_scratch_size(src).unwrap();
        let mut backing = vec![0u8; required + 8];
        for shift in 0..8 {
            let mut rec = Recorder::default();
            let scratch = &mut backing[shift..shift + required];
            parse_obj(src, Some(scratch), &mut rec).unwrap();
            assert_eq!(rec.triangles.len(), 1);
        }
    }

    #[test]
    fn larger_scratch_is_fine() {
        let src = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mut scratch = vec![0xFFu8; 4096];
        let mut rec = Recorder::default();
        parse_obj(src, Some(&mut scratch), &mut rec).unwrap();
        assert_eq!(rec.triangles.len(), 1);
    }

    #[test]
    fn malformed_float_aborts_with_line() {
        let mut rec = Recorder::default();
        let err = parse_obj(b"v 0 0 0\n\nv 1 zero 0\n", None, &mut rec).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(matches!(err.kind, ParseErrorKind::MalformedFloat(_)));
        assert_eq!(rec.errors.len(), 1);
    }

    #[test]
    fn malformed_face_aborts_before_any_output() {
        let src = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nf 1 2 3/x\n";
        let mut rec = Recorder::default();
        let mut scratch = vec![0u8; 4096];
        let err = parse_obj(src, Some(&mut scratch), &mut rec).unwrap_err();
        assert_eq!(err.line, 5);
        assert!(matches!(err.kind, ParseErrorKind::MalformedFaceIndex(_)));
        assert!(rec.triangles.is_empty());
        assert!(rec.materials.is_empty());
    }

    #[test]
    fn out_of_range_index_is_rejected_when_sizing() {
        let mut rec = Recorder::default();
        let err = parse_obj(b"v 0 0 0\nf 1 2 3\n", None, &mut rec).unwrap_err();
        assert_eq!(err.line, 2);
        assert!(matches!(err.kind, ParseErrorKind::MalformedFaceIndex(_)));
    }

    #[test]
    fn face_without_vertices_is_rejected() {
        assert!(required_scratch_size(b"f 1 2 3\n").is_err());
    }

    #[test]
    fn no_callbacks_is_legal() {
        let src = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let required = required_scratch_size(src).unwrap();
        let mut scratch = vec![0u8; required];
        let report = parse_obj(src, Some(&mut scratch), &mut ()).unwrap();
        assert!(report.materialized);
        assert_eq!(report.stats.num_triangles, 1);
    }

    #[test]
    fn declared_capabilities_gate_callbacks() {
        struct Silent(Recorder);

        impl ObjDelegate for Silent {
            fn capabilities(&self) -> Capabilities {
                Capabilities::NONE
            }

            fn geometry(&mut self, geometry: &Geometry<'_>) {
                self.0.geometry(geometry);
            }

            fn material(&mut self, name: &str, triangle_count: usize) {
                self.0.material(name, triangle_count);
            }

            fn triangle(&mut self, a: TriangleVert, b: TriangleVert, c: TriangleVert) {
                self.0.triangle(a, b, c);
            }
        }

        let src = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mut scratch = vec![0u8; required_scratch_size(src).unwrap()];
        let mut silent = Silent(Recorder::default());
        parse_obj(src, Some(&mut scratch), &mut silent).unwrap();
        assert!(silent.0.vertex_count.is_none());
        assert!(silent.0.materials.is_empty());
        assert!(silent.0.triangles.is_empty());
    }

    #[test]
    fn empty_input() {
        let (rec, report) = parse("");
        assert_eq!(report.lines, 0);
        assert_eq!(report.stats.num_verts, 0);
        assert!(report.required_scratch > 0);
        assert!(rec.materials.is_empty());
        assert_eq!(rec.vertex_count, Some(0));
    }

    #[test]
    fn undersized_scratch_for_empty_input_reports_line_one() {
        let mut rec = Recorder::default();
        let mut scratch = [0u8; 1];
        let err = parse_obj(b"", Some(&mut scratch), &mut rec).unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::InsufficientScratchMemory { provided: 1, .. }
        ));
        assert_eq!(err.line, 1);
        assert_eq!(rec.errors, vec![err]);
    }

    #[test]
    fn comments_and_crlf() {
        let src = "# header\r\nv 0 0 0\r\nv 1 0 0 # right\r\nv 0 1 0\r\n\r\nf 1 2 3\r\n";
        let (rec, report) = parse(src);
        assert_eq!(report.lines, 6);
        assert_eq!(rec.triangles.len(), 1);
    }

    #[test]
    fn long_material_names_are_truncated() {
        let name = "m".repeat(MAX_MATERIAL_NAME + 10);
        let src = format!("v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl {name}\nf 1 2 3\n");
        let (rec, _) = parse(&src);
        assert_eq!(rec.materials[0].0.len(), MAX_MATERIAL_NAME - 1);
    }

    #[test]
    fn too_many_materials() {
        let mut src = String::from("v 0 0 0\nv 1 0 0\nv 0 1 0\n");
        for i in 0..MAX_MATERIALS {
            src.push_str(&format!("usemtl m{i}\nf 1 2 3\n"));
        }
        let err = required_scratch_size(src.as_bytes()).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::TooManyMaterials {
                limit: MAX_MATERIALS
            }
        );
    }
}
