pub mod bounds;

pub use bounds::BoundsDelegate;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::InspectConfig;
use crate::delegate::ObjDelegate;
use crate::error::{ObjScanError, Result};
use crate::parser::{ParseReport, parse_obj};
use crate::types::{BoundingBox, BoundsSummary, MaterialGroup, MaterialUsage, ObjStats};

/// Everything the inspector learns about one OBJ buffer.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub lines: usize,
    pub scratch_bytes: usize,
    pub stats: ObjStats,
    /// `None` when the file has no triangles.
    pub extent: Option<BoundsSummary>,
    #[serde(skip)]
    pub bounds: BoundingBox,
    pub materials: Vec<MaterialUsage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<MaterialGroup>,
}

/// Read a whole OBJ file into memory.
pub fn load_source(path: &Path) -> Result<Vec<u8>> {
    let is_obj = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("obj"));
    if !is_obj {
        warn!(path = %path.display(), "Input does not have an .obj extension");
    }

    let data = std::fs::read(path)
        .map_err(|e| ObjScanError::Input(format!("Failed to read {}: {e}", path.display())))?;
    debug!(path = %path.display(), bytes = data.len(), "Loaded OBJ source");
    Ok(data)
}

/// Size the scratch buffer with a counting call, then materialize into it.
pub fn parse_two_pass<D: ObjDelegate + ?Sized>(
    data: &[u8],
    delegate: &mut D,
) -> Result<ParseReport> {
    let sizing = parse_obj(data, None, delegate)?;
    let mut scratch = vec![0u8; sizing.required_scratch];
    let report = parse_obj(data, Some(&mut scratch), delegate)?;
    Ok(report)
}

/// Parse `data` and summarize its counts, bounds and material groups.
pub fn inspect_bytes(data: &[u8], config: &InspectConfig) -> Result<InspectReport> {
    let mut delegate = if config.dump_triangles {
        BoundsDelegate::keeping_groups()
    } else {
        BoundsDelegate::new()
    };

    let report = parse_two_pass(data, &mut delegate)?;
    let bounds = delegate.bounds;
    let materials = std::mem::take(&mut delegate.materials);

    Ok(InspectReport {
        lines: report.lines,
        scratch_bytes: report.required_scratch,
        stats: report.stats,
        extent: bounds.summary(),
        bounds,
        materials,
        groups: delegate.into_groups(),
    })
}

/// Load and inspect one file.
pub fn inspect_file(path: &Path, config: &InspectConfig) -> Result<InspectReport> {
    let data = load_source(path)?;
    inspect_bytes(&data, config)
}

/// Parse `data` into owned triangle lists, one per material in
/// first-declaration order.
pub fn collect_groups(data: &[u8]) -> Result<Vec<MaterialGroup>> {
    let mut delegate = BoundsDelegate::keeping_groups();
    parse_two_pass(data, &mut delegate)?;
    Ok(delegate.into_groups())
}
