use std::path::PathBuf;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::{InspectConfig, OutputFormat};
use crate::error::Result;
use crate::inspect::{self, InspectReport};
use crate::types::BoundingBox;

/// Summary of a completed inspector run.
#[derive(Debug)]
pub struct RunSummary {
    pub file_count: usize,
    pub triangle_count: usize,
    /// Bounds over every inspected file.
    pub extent: BoundingBox,
    pub duration: Duration,
}

/// Inspection result for one input file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub report: InspectReport,
}

/// Inspector orchestrator -- scans every input and prints the reports.
pub struct Pipeline;

impl Pipeline {
    /// Inspect all inputs and print the reports in input order.
    pub fn run(config: &InspectConfig) -> Result<RunSummary> {
        let start = Instant::now();
        let reports = Self::inspect_all(config)?;

        match config.format {
            OutputFormat::Text => {
                for file in &reports {
                    print_text_report(file, config.dump_triangles);
                }
            }
            OutputFormat::Json => println!("{}", render_json(&reports)?),
        }

        let triangle_count = reports.iter().map(|f| f.report.stats.num_triangles).sum();
        let extent = reports
            .iter()
            .fold(BoundingBox::EMPTY, |acc, f| acc.merge(&f.report.bounds));
        let duration = start.elapsed();
        info!(
            files = reports.len(),
            triangles = triangle_count,
            diagonal = extent.diagonal(),
            elapsed = ?duration,
            "Inspection complete"
        );

        Ok(RunSummary {
            file_count: reports.len(),
            triangle_count,
            extent,
            duration,
        })
    }

    /// Inspect every input in parallel; the first failure aborts the run.
    pub fn inspect_all(config: &InspectConfig) -> Result<Vec<FileReport>> {
        info!(inputs = config.inputs.len(), "Starting inspection");

        config
            .inputs
            .par_iter()
            .map(|path| -> Result<FileReport> {
                let report = inspect::inspect_file(path, config)?;
                info!(
                    path = %path.display(),
                    vertices = report.stats.num_verts,
                    triangles = report.stats.num_triangles,
                    materials = report.materials.len(),
                    "Scanned"
                );
                Ok(FileReport {
                    path: path.clone(),
                    report,
                })
            })
            .collect()
    }
}

/// Pretty JSON array of file reports.
pub fn render_json(reports: &[FileReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

fn print_text_report(file: &FileReport, dump_triangles: bool) {
    let report = &file.report;
    let stats = &report.stats;
    println!("=== {} ===", file.path.display());
    println!("  Lines:     {}", report.lines);
    println!("  Vertices:  {}", stats.num_verts);
    println!("  Normals:   {}", stats.num_norms);
    println!("  Texcoords: {}", stats.num_texcoords);
    println!("  Faces:     {}", stats.num_faces);
    println!("  Triangles: {}", stats.num_triangles);
    println!("  Scratch:   {} bytes", report.scratch_bytes);

    match report.extent {
        Some(bb) => {
            println!(
                "  Bounding box: ({:.3}, {:.3}, {:.3}) → ({:.3}, {:.3}, {:.3})",
                bb.min[0], bb.min[1], bb.min[2], bb.max[0], bb.max[1], bb.max[2]
            );
            let c = report.bounds.center();
            println!("  Center:       ({:.3}, {:.3}, {:.3})", c.x, c.y, c.z);
            println!("  Diagonal:     {:.3}", report.bounds.diagonal());
        }
        None => println!("  Bounding box: empty"),
    }

    println!("  Materials: {}", report.materials.len());
    for material in &report.materials {
        println!("    {:<24} {} triangles", material.name, material.triangles);
    }

    if dump_triangles {
        for group in &report.groups {
            println!("  [{}]", group.name);
            for [a, b, c] in &group.triangles {
                println!(
                    "    ({:.3}, {:.3}, {:.3}) ({:.3}, {:.3}, {:.3}) ({:.3}, {:.3}, {:.3})",
                    a.pos[0], a.pos[1], a.pos[2], b.pos[0], b.pos[1], b.pos[2], c.pos[0], c.pos[1],
                    c.pos[2]
                );
            }
        }
    }
}
