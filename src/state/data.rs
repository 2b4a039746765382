/// Shared data structures for drawings
///
/// These structs represent the data model that flows between
/// the record store, the payload files and the session reducer.

use chrono::{DateTime, Utc};

use crate::color::Color;
use crate::geometry::Path;

/// Default stroke width for new brushes
pub const DEFAULT_STROKE_WIDTH: f32 = 5.0;

/// One stroke or shape outline with its paint
#[derive(Debug, Clone, PartialEq)]
pub struct PathEntry {
    pub path: Path,
    pub color: Color,
    /// Stroke width in view pixels
    pub size: f32,
}

impl PathEntry {
    pub fn new(path: Path, color: Color, size: f32) -> Self {
        Self { path, color, size }
    }
}

/// A user-created artwork
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    /// Store identifier; `None` until the drawing is saved for the first time
    pub id: Option<i64>,
    /// Display name shown in the gallery
    pub name: String,
    pub author: String,
    /// Paths in paint order (first entry is drawn first)
    pub paths: Vec<PathEntry>,
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new("NA", "NA")
    }
}

impl Drawing {
    /// Create an empty, unsaved drawing
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            author: author.into(),
            paths: Vec::new(),
        }
    }

    pub fn add_path(&mut self, entry: PathEntry) {
        self.paths.push(entry);
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

/// One row of the record store
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRecord {
    /// Unique, never reused; the first record gets 0
    pub id: i64,
    /// Payload file name inside the payload directory
    pub file_ref: String,
    pub name: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}
