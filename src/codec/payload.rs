//! Drawing payload: the JSON document written to disk and uploaded as a blob.
//!
//! A payload is an array of `{"path": ..., "color": ..., "size": ...}`
//! objects, every field a string. `path` is itself a JSON point list (see
//! `points.rs`), `color` a signed decimal ARGB word and `size` a decimal float.

use serde::{Deserialize, Serialize};

use super::points;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::state::data::{Drawing, PathEntry};

/// The on-disk / on-wire form of a `PathEntry`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedPathEntry {
    pub path: String,
    pub color: String,
    pub size: String,
}

impl SerializedPathEntry {
    pub fn from_entry(entry: &PathEntry, step: f32) -> Result<Self> {
        Ok(Self {
            path: points::encode(&entry.path, step)?,
            color: entry.color.to_string(),
            // `{:?}` keeps the fractional part ("5.0"), matching older files
            size: format!("{:?}", entry.size),
        })
    }

    pub fn to_entry(&self) -> Result<PathEntry> {
        let path = points::decode(&self.path)?;
        let color: Color = self.color.parse()?;
        let size: f32 = self
            .size
            .trim()
            .parse()
            .map_err(|e| Error::decode("stroke size", format!("{:?}: {e}", self.size)))?;
        if !size.is_finite() {
            return Err(Error::decode("stroke size", format!("{:?} is not finite", self.size)));
        }
        Ok(PathEntry::new(path, color, size))
    }
}

/// Serialize every path of `drawing`.
pub fn encode_drawing(drawing: &Drawing, step: f32) -> Result<String> {
    encode_entries(&drawing.paths, step)
}

pub fn encode_entries(entries: &[PathEntry], step: f32) -> Result<String> {
    let serialized = entries
        .iter()
        .map(|e| SerializedPathEntry::from_entry(e, step))
        .collect::<Result<Vec<_>>>()?;
    serde_json::to_string(&serialized).map_err(|e| Error::decode("drawing payload", e))
}

/// Parse a payload into path entries. Any malformed entry fails the whole payload.
pub fn decode_entries(json: &str) -> Result<Vec<PathEntry>> {
    let serialized: Vec<SerializedPathEntry> =
        serde_json::from_str(json).map_err(|e| Error::decode("drawing payload", e))?;
    serialized.iter().map(SerializedPathEntry::to_entry).collect()
}

/// Rebuild a drawing from its payload and catalog details.
pub fn decode_drawing(
    json: &str,
    id: Option<i64>,
    name: &str,
    author: &str,
) -> Result<Drawing> {
    let mut drawing = Drawing::new(name, author);
    drawing.id = id;
    drawing.paths = decode_entries(json)?;
    Ok(drawing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DEFAULT_SAMPLE_STEP;
    use crate::geometry::{Path, Point};

    fn stroke() -> PathEntry {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(2.0, 0.0);
        PathEntry::new(path, Color::BLACK, 5.0)
    }

    #[test]
    fn test_empty_drawing_payload() {
        let drawing = Drawing::new("A", "me");
        assert_eq!(encode_drawing(&drawing, DEFAULT_SAMPLE_STEP).unwrap(), "[]");
        assert!(decode_entries("[]").unwrap().is_empty());
    }

    #[test]
    fn test_fields_are_strings() {
        let json = encode_entries(&[stroke()], DEFAULT_SAMPLE_STEP).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entry = &value[0];
        assert_eq!(entry["color"], "-16777216");
        assert_eq!(entry["size"], "5.0");
        assert!(entry["path"].as_str().unwrap().starts_with("[[0.0,0.0]"));
    }

    #[test]
    fn test_decode_restores_paint_and_shape() {
        let json = encode_entries(&[stroke()], DEFAULT_SAMPLE_STEP).unwrap();
        let drawing = decode_drawing(&json, Some(3), "A", "me").unwrap();
        assert_eq!(drawing.id, Some(3));
        let entry = &drawing.paths[0];
        assert_eq!(entry.color, Color::BLACK);
        assert_eq!(entry.size, 5.0);
        assert_eq!(entry.path.commands()[0], crate::geometry::PathCommand::MoveTo(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_older_payload_shape_is_readable() {
        let json = r#"[{"path":"[{\"first\":1.0,\"second\":1.0}]","color":"-1","size":"12.5"}]"#;
        let entries = decode_entries(json).unwrap();
        assert_eq!(entries[0].color, Color::WHITE);
        assert_eq!(entries[0].size, 12.5);
    }

    #[test]
    fn test_bad_fields_are_rejected() {
        let cases = [
            "not json",
            r#"[{"path":"[]","color":"red","size":"1"}]"#,
            r#"[{"path":"[]","color":"1","size":"wide"}]"#,
            r#"[{"path":"[]","color":"1","size":"NaN"}]"#,
            r#"[{"path":"[[1,","color":"1","size":"1"}]"#,
            r#"[{"path":"[]","color":"1"}]"#,
        ];
        for json in cases {
            assert!(decode_entries(json).unwrap_err().is_corrupt_payload(), "{json}");
        }
    }
}
