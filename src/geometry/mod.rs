/// Vector path geometry
///
/// - `path.rs` - points, path commands and the shape builders used by the drawing tools
/// - `measure.rs` - arc-length measurement and fixed-step sampling

pub mod measure;
pub mod path;

pub use measure::PathMeasure;
pub use path::{Path, PathCommand, Point};
