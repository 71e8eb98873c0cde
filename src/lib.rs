pub mod config;
pub mod delegate;
pub mod error;
pub mod inspect;
pub mod parser;
pub mod pipeline;
pub mod types;

pub use config::{InspectConfig, OutputFormat};
pub use delegate::{Capabilities, ObjDelegate};
pub use error::{ObjScanError, ParseError, ParseErrorKind};
pub use parser::{Geometry, ParseReport, parse_obj, required_scratch_size};
pub use pipeline::Pipeline;
pub use types::{IndexedTriangle, IndexedVert, ObjStats, TriangleVert};
