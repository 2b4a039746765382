/// Drawing serialization
///
/// - `points.rs` - lossy path ⇄ JSON point list conversion
/// - `payload.rs` - drawing payload files (array of serialized path entries)

pub mod payload;
pub mod points;

pub use payload::{decode_drawing, decode_entries, encode_drawing, SerializedPathEntry};

/// Arc-length distance between samples when encoding a path.
///
/// Finer steps make payloads larger; coarser steps visibly cut corners on
/// small strokes.
pub const DEFAULT_SAMPLE_STEP: f32 = 0.1;
