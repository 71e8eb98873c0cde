use std::path::PathBuf;

use clap::Parser;

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Fully resolved inspector configuration (constructed from CLI args).
#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub inputs: Vec<PathBuf>,
    pub format: OutputFormat,
    /// Print every resolved triangle, grouped by material.
    pub dump_triangles: bool,
    pub verbose: bool,
    pub threads: Option<usize>,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            format: OutputFormat::Text,
            dump_triangles: false,
            verbose: false,
            threads: None,
        }
    }
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "objscan",
    about = "Scan Wavefront OBJ files and report counts, bounds and material groups",
    version
)]
pub struct CliArgs {
    /// OBJ files to scan
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Report format: text or json
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print every triangle, grouped by material
    #[arg(long)]
    pub dump_triangles: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Worker thread count (default: all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

impl From<CliArgs> for InspectConfig {
    fn from(args: CliArgs) -> Self {
        InspectConfig {
            inputs: args.inputs,
            format: args.format,
            dump_triangles: args.dump_triangles,
            verbose: args.verbose,
            threads: args.threads,
        }
    }
}
