//! Drawing persistence core
//!
//! Drawings are lists of stroked paths. This crate samples those paths into
//! JSON point lists, keeps a SQLite catalog of saved drawings with one payload
//! file each, guards saves against bulk loads so a load never sees a
//! half-written drawing, and syncs payloads with a cloud backend. The
//! [`app::Session`] reducer holds the editing state a UI drives.

pub mod app;
pub mod cloud;
pub mod codec;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod state;
pub mod ui;
pub mod vault;

pub use color::Color;
pub use config::StorageConfig;
pub use error::{Error, Result};
pub use geometry::{Path, Point};
pub use state::{Drawing, Library, PathEntry, RecordStore, StoreRecord};
pub use vault::DrawingVault;
