use tracing::{debug, warn};

use super::ParseReport;
use super::arena::{Arena, ArenaExhausted, BumpAllocator, ScratchLayout};
use super::decode::{ListLengths, expect_float, parse_face_index_group};
use super::emit::emit;
use super::geometry::{DEFAULT_NORMAL, DEFAULT_TEXCOORD, Geometry, GeometryHeader};
use super::material::{DEFAULT_MATERIAL, MAX_MATERIALS, MaterialRecord, MaterialTable};
use super::scanner::{Line, Lines};
use crate::delegate::ObjDelegate;
use crate::error::{ParseError, ParseErrorKind};
use crate::types::{IndexedTriangle, IndexedVert, ObjStats};

/// What a pass does with each decoded element.
///
/// The counting pass tallies, the materializing pass writes into the
/// arena; both are driven by the same [`walk`].
pub(crate) trait PassSink<'src> {
    /// List lengths accumulated so far, for relative index resolution.
    fn lengths(&self) -> ListLengths;

    fn position(&mut self, p: [f32; 3]);

    fn normal(&mut self, n: [f32; 3]);

    fn texcoord(&mut self, t: [f32; 2]);

    /// `name` starts `offset` bytes into the source.
    fn use_material(&mut self, name: &'src [u8], offset: usize) -> Result<usize, ParseErrorKind>;

    /// Called for every decoded face corner before it is used.
    fn vertex_ref(&mut self, line: usize, v: IndexedVert) -> Result<(), ParseErrorKind>;

    fn triangle(&mut self, material: usize, tri: IndexedTriangle);

    /// End of an `f` line with `corners` vertices.
    fn face(&mut self, line: usize, corners: usize);
}

fn read_floats<const N: usize>(line: &mut Line<'_>) -> Result<[f32; N], ParseErrorKind> {
    let mut out = [0.0; N];
    for slot in &mut out {
        *slot = expect_float(line.next_token())?;
    }
    Ok(out)
}

/// Fan-triangulate one `f` line: `(v0,v1,v2), (v0,v2,v3), ...`.
fn face<'src, S: PassSink<'src>>(
    line: &mut Line<'src>,
    material: usize,
    sink: &mut S,
) -> Result<(), ParseErrorKind> {
    let lengths = sink.lengths();
    let mut first = IndexedVert::default();
    let mut prev = IndexedVert::default();
    let mut corners = 0usize;

    while let Some(token) = line.next_token() {
        let vert = parse_face_index_group(token, &lengths)?;
        sink.vertex_ref(line.number, vert)?;
        match corners {
            0 => first = vert,
            1 => {}
            _ => sink.triangle(material, IndexedTriangle::new(first, prev, vert)),
        }
        prev = vert;
        corners += 1;
    }

    sink.face(line.number, corners);
    Ok(())
}

/// Walk every line of `source`, feeding `sink`. Returns the number of
/// lines seen.
pub(crate) fn walk<'src, S: PassSink<'src>>(
    source: &'src [u8],
    sink: &mut S,
) -> Result<usize, ParseError> {
    let mut lines = Lines::new(source);
    let mut material = DEFAULT_MATERIAL;

    for mut line in lines.by_ref() {
        let number = line.number;
        let at = |kind| ParseError::new(number, kind);
        let Some(keyword) = line.next_token() else {
            continue;
        };

        match keyword {
            b"v" => sink.position(read_floats(&mut line).map_err(at)?),
            b"vn" => sink.normal(read_floats(&mut line).map_err(at)?),
            b"vt" => sink.texcoord(read_floats(&mut line).map_err(at)?),
            b"usemtl" => {
                let (offset, name) = line
                    .next_token_at()
                    .ok_or(at(ParseErrorKind::MissingMaterialName))?;
                material = sink.use_material(name, offset).map_err(at)?;
            }
            b"f" => face(&mut line, material, sink).map_err(at)?,
            _ => {}
        }
    }

    Ok(lines.line_number())
}

/// Largest index referenced into one list, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HighWater {
    index: u32,
    line: usize,
}

fn raise(mark: &mut Option<HighWater>, index: u32, line: usize) {
    if mark.is_none_or(|m| index > m.index) {
        *mark = Some(HighWater { index, line });
    }
}

fn check(mark: Option<HighWater>, len: usize) -> Result<(), ParseError> {
    match mark {
        Some(m) if m.index as usize >= len => Err(ParseError::new(
            m.line,
            ParseErrorKind::MalformedFaceIndex("index out of range"),
        )),
        _ => Ok(()),
    }
}

/// Pass 1: tallies counts and builds the material table.
#[derive(Debug, Default)]
pub(crate) struct CountingPass<'src> {
    pub table: MaterialTable<'src>,
    pub stats: ObjStats,
    max_pos: Option<HighWater>,
    max_texcoord: Option<HighWater>,
    max_normal: Option<HighWater>,
}

impl<'src> CountingPass<'src> {
    /// List lengths the arena reserves: texcoords and normals get a
    /// default slot when the file declares none.
    pub fn padded_lengths(&self) -> ListLengths {
        ListLengths {
            positions: self.stats.num_verts,
            texcoords: self.stats.num_texcoords.max(1),
            normals: self.stats.num_norms.max(1),
        }
    }

    /// Fail if any face referenced past the end of a list.
    pub fn check_references(&self, totals: &ListLengths) -> Result<(), ParseError> {
        check(self.max_pos, totals.positions)?;
        check(self.max_texcoord, totals.texcoords)?;
        check(self.max_normal, totals.normals)
    }
}

impl<'src> PassSink<'src> for CountingPass<'src> {
    fn lengths(&self) -> ListLengths {
        ListLengths {
            positions: self.stats.num_verts,
            texcoords: self.stats.num_texcoords,
            normals: self.stats.num_norms,
        }
    }

    fn position(&mut self, _p: [f32; 3]) {
        self.stats.num_verts += 1;
    }

    fn normal(&mut self, _n: [f32; 3]) {
        self.stats.num_norms += 1;
    }

    fn texcoord(&mut self, _t: [f32; 2]) {
        self.stats.num_texcoords += 1;
    }

    fn use_material(&mut self, name: &'src [u8], offset: usize) -> Result<usize, ParseErrorKind> {
        self.table.intern(name, offset)
    }

    fn vertex_ref(&mut self, line: usize, v: IndexedVert) -> Result<(), ParseErrorKind> {
        raise(&mut self.max_pos, v.pos, line);
        raise(&mut self.max_texcoord, v.texcoord, line);
        raise(&mut self.max_normal, v.normal, line);
        Ok(())
    }

    fn triangle(&mut self, material: usize, _tri: IndexedTriangle) {
        self.table.record_triangles(material, 1);
        self.stats.num_triangles += 1;
    }

    fn face(&mut self, line: usize, corners: usize) {
        if corners >= 3 {
            self.stats.num_faces += 1;
        } else {
            warn!(line, corners, "Skipping face with fewer than 3 vertices");
        }
    }
}

/// Arena blocks in push order. Instantiated with [`ScratchLayout`] to
/// size the arena and with [`Arena`] to carve it.
pub(crate) struct Regions<A: BumpAllocator> {
    pub header: A::Block<GeometryHeader>,
    pub positions: A::Block<f32>,
    pub normals: A::Block<f32>,
    pub texcoords: A::Block<f32>,
    pub materials: A::Block<MaterialRecord>,
    pub triangles: A::Block<IndexedTriangle>,
}

fn components(count: usize, width: usize) -> Result<usize, ArenaExhausted> {
    count.checked_mul(width).ok_or(ArenaExhausted)
}

pub(crate) fn allocate<A: BumpAllocator>(
    alloc: &mut A,
    totals: &ListLengths,
    table: &MaterialTable<'_>,
) -> Result<Regions<A>, ArenaExhausted> {
    let header = alloc.push::<GeometryHeader>(1)?;
    let positions = alloc.push::<f32>(components(totals.positions, 3)?)?;
    let normals = alloc.push::<f32>(components(totals.normals, 3)?)?;
    let texcoords = alloc.push::<f32>(components(totals.texcoords, 2)?)?;
    let materials = alloc.push::<MaterialRecord>(table.len())?;
    // Per-material triangle arrays are laid out back to back, so a single
    // push covers all of them.
    let triangles = alloc.push::<IndexedTriangle>(table.total_triangles())?;
    Ok(Regions {
        header,
        positions,
        normals,
        texcoords,
        materials,
        triangles,
    })
}

/// Pass 2: writes vertices and triangles into the arena.
pub(crate) struct MaterializingPass<'src, 'a> {
    source: &'src [u8],
    table: &'a MaterialTable<'src>,
    totals: ListLengths,
    written: ListLengths,
    regions: Regions<Arena<'a>>,
    stats: ObjStats,
}

impl<'src, 'a> MaterializingPass<'src, 'a> {
    pub fn new(
        source: &'src [u8],
        table: &'a MaterialTable<'src>,
        totals: ListLengths,
        mut regions: Regions<Arena<'a>>,
    ) -> Self {
        let mut first_triangle = 0u64;
        for (slot, record) in regions.materials.iter_mut().enumerate() {
            let capacity = table.triangle_count(slot) as u64;
            *record = MaterialRecord {
                name_offset: table.name_offset(slot) as u64,
                name_len: table.name(slot).len() as u64,
                first_triangle,
                capacity,
                len: 0,
            };
            first_triangle += capacity;
        }

        Self {
            source,
            table,
            totals,
            written: ListLengths::default(),
            regions,
            stats: ObjStats::default(),
        }
    }

    /// Pad empty texcoord/normal lists, fill the header and hand out the
    /// finished geometry.
    pub fn finish(self) -> (Geometry<'a>, ObjStats)
    where
        'src: 'a,
    {
        let Regions {
            header,
            positions,
            normals,
            texcoords,
            materials,
            triangles,
        } = self.regions;

        if self.written.texcoords == 0 {
            texcoords[..2].copy_from_slice(&DEFAULT_TEXCOORD);
        }
        if self.written.normals == 0 {
            normals[..3].copy_from_slice(&DEFAULT_NORMAL);
        }

        header[0] = GeometryHeader {
            num_positions: self.totals.positions as u64,
            num_normals: self.totals.normals as u64,
            num_texcoords: self.totals.texcoords as u64,
            num_materials: materials.len() as u64,
        };

        let mut stats = self.stats;
        stats.num_verts = self.written.positions;
        stats.num_norms = self.written.normals;
        stats.num_texcoords = self.written.texcoords;
        stats.num_materials = materials.len();

        let geometry = Geometry {
            header: &header[0],
            positions,
            normals,
            texcoords,
            materials,
            triangles,
            source: self.source,
        };
        (geometry, stats)
    }

    fn index_in_range(&self, v: IndexedVert) -> bool {
        (v.pos as usize) < self.totals.positions
            && (v.texcoord as usize) < self.totals.texcoords
            && (v.normal as usize) < self.totals.normals
    }
}

fn write<const N: usize>(dst: &mut [f32], count: &mut usize, value: [f32; N]) {
    let start = *count * N;
    if let Some(slot) = dst.get_mut(start..start + N) {
        slot.copy_from_slice(&value);
    }
    *count += 1;
}

impl<'src, 'a> PassSink<'src> for MaterializingPass<'src, 'a> {
    fn lengths(&self) -> ListLengths {
        self.written
    }

    fn position(&mut self, p: [f32; 3]) {
        write(self.regions.positions, &mut self.written.positions, p);
    }

    fn normal(&mut self, n: [f32; 3]) {
        write(self.regions.normals, &mut self.written.normals, n);
    }

    fn texcoord(&mut self, t: [f32; 2]) {
        write(self.regions.texcoords, &mut self.written.texcoords, t);
    }

    fn use_material(&mut self, name: &'src [u8], _offset: usize) -> Result<usize, ParseErrorKind> {
        // Every name was interned by the counting pass.
        self.table
            .find(name)
            .ok_or(ParseErrorKind::TooManyMaterials {
                limit: MAX_MATERIALS,
            })
    }

    fn vertex_ref(&mut self, _line: usize, v: IndexedVert) -> Result<(), ParseErrorKind> {
        if self.index_in_range(v) {
            Ok(())
        } else {
            Err(ParseErrorKind::MalformedFaceIndex("index out of range"))
        }
    }

    fn triangle(&mut self, material: usize, tri: IndexedTriangle) {
        let record = &mut self.regions.materials[material];
        debug_assert!(!record.is_full(), "triangle count changed between passes");
        if !record.is_full() {
            let at = (record.first_triangle + record.len) as usize;
            self.regions.triangles[at] = tri;
            record.len += 1;
        }
        self.stats.num_triangles += 1;
    }

    fn face(&mut self, _line: usize, corners: usize) {
        if corners >= 3 {
            self.stats.num_faces += 1;
        }
    }
}

/// Run both passes over `source`.
///
/// Without `scratch` only the counting pass runs and the report carries
/// the required scratch size. With it, the arena is filled and the
/// delegate's output callbacks fire. Errors are returned, not reported;
/// [`parse_obj`](super::parse_obj) forwards them to the delegate.
pub(crate) fn run<D: ObjDelegate + ?Sized>(
    source: &[u8],
    scratch: Option<&mut [u8]>,
    delegate: &mut D,
) -> Result<ParseReport, ParseError> {
    let mut counting = CountingPass::default();
    let lines = walk(source, &mut counting)?;
    let totals = counting.padded_lengths();
    counting.check_references(&totals)?;

    let mut stats = counting.stats;
    stats.num_materials = counting.table.len();

    let provided = scratch.as_deref().map_or(0, <[u8]>::len);
    // Line numbers are 1-based even for an empty input.
    let last_line = lines.max(1);
    let out_of_memory = |required| {
        ParseError::new(
            last_line,
            ParseErrorKind::InsufficientScratchMemory { required, provided },
        )
    };

    let mut layout = ScratchLayout::new();
    allocate(&mut layout, &totals, &counting.table).map_err(|_| out_of_memory(usize::MAX))?;
    let required = layout.required();
    debug!(
        lines,
        verts = stats.num_verts,
        faces = stats.num_faces,
        triangles = stats.num_triangles,
        materials = stats.num_materials,
        used = layout.used(),
        required,
        "Counting pass complete"
    );

    let Some(scratch) = scratch else {
        return Ok(ParseReport {
            required_scratch: required,
            stats,
            lines,
            materialized: false,
        });
    };
    if provided < required {
        return Err(out_of_memory(required));
    }

    let mut arena = Arena::new(scratch);
    let regions =
        allocate(&mut arena, &totals, &counting.table).map_err(|_| out_of_memory(required))?;
    debug!(
        used = arena.used(),
        spare = arena.remaining(),
        provided,
        "Scratch arena carved"
    );
    let mut pass = MaterializingPass::new(source, &counting.table, totals, regions);
    walk(source, &mut pass)?;
    let (geometry, written) = pass.finish();
    debug_assert_eq!(written, stats, "counting and materializing passes disagree");
    debug!(
        triangles = geometry.triangle_count(),
        "Materializing pass complete"
    );

    emit(&geometry, delegate);

    Ok(ParseReport {
        required_scratch: required,
        stats,
        lines,
        materialized: true,
    })
}
