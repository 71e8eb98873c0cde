use std::io;

/// What went wrong while parsing OBJ text.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("malformed float: {0}")]
    MalformedFloat(&'static str),
    #[error("malformed face index: {0}")]
    MalformedFaceIndex(&'static str),
    #[error("usemtl without a material name")]
    MissingMaterialName,
    #[error("not enough scratch memory: {required} bytes required, {provided} provided")]
    InsufficientScratchMemory { required: usize, provided: usize },
    #[error("too many unique materials (limit {limit})")]
    TooManyMaterials { limit: usize },
}

/// A fatal parse error, tagged with the 1-based source line.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// All error types for the obj-scratch crate and its inspector.
#[derive(thiserror::Error, Debug)]
pub enum ObjScanError {
    #[error("Input error: {0}")]
    Input(String),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ObjScanError>;
