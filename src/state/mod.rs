/// State management module
///
/// This module handles all drawing state, including:
/// - The SQLite record store (library.rs)
/// - Shared data structures (data.rs)
/// - Whole-drawing edits (edit.rs)
/// - Brush settings for new paths (brush.rs)

pub mod brush;
pub mod data;
pub mod edit;
pub mod library;

pub use brush::{Brush, Shape};
pub use data::{Drawing, PathEntry, StoreRecord};
pub use edit::Edit;
pub use library::{Library, RecordStore};
