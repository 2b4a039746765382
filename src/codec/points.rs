//! Path ⇄ JSON point list
//!
//! `encode` samples a path at a fixed arc-length step and writes the samples as
//! `[[x,y],[x,y],...]`. `decode` rebuilds a polyline from such a list. The
//! transform is lossy: detail finer than the step is lost, and closed shapes
//! come back as open polylines that stop one step short of their start.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Path, PathMeasure, Point};

/// One sampled point as written by current and legacy clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum WirePoint {
    Pair([f32; 2]),
    /// Older payloads wrote each point as `{"first": x, "second": y}`
    Legacy { first: f32, second: f32 },
}

impl From<WirePoint> for Point {
    fn from(p: WirePoint) -> Self {
        match p {
            WirePoint::Pair([x, y]) => Point::new(x, y),
            WirePoint::Legacy { first, second } => Point::new(first, second),
        }
    }
}

/// Sample `path` every `step` units of arc length.
pub fn sample(path: &Path, step: f32) -> Vec<Point> {
    PathMeasure::new(path).sample(step)
}

/// Encode a path as a JSON point list. A zero-length path encodes to `"[]"`.
pub fn encode(path: &Path, step: f32) -> Result<String> {
    let pairs: Vec<[f32; 2]> = sample(path, step).into_iter().map(|p| [p.x, p.y]).collect();
    serde_json::to_string(&pairs).map_err(|e| Error::decode("point list", e))
}

/// Parse a JSON point list into points, without building a path.
pub fn decode_points(json: &str) -> Result<Vec<Point>> {
    let points: Vec<WirePoint> =
        serde_json::from_str(json).map_err(|e| Error::decode("point list", e))?;
    Ok(points.into_iter().map(Point::from).collect())
}

/// Rebuild a path: move to the first point, then a line to each later one.
pub fn decode(json: &str) -> Result<Path> {
    Ok(polyline(&decode_points(json)?))
}

pub fn polyline(points: &[Point]) -> Path {
    let mut path = Path::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(first.x, first.y);
        for p in rest {
            path.line_to(p.x, p.y);
        }
    }
    path
}
