/// Drawing persistence
///
/// This module handles:
/// - Guarding saves against bulk loads (guard.rs)
/// - Writing and reading payload files (files.rs)

pub mod files;
pub mod guard;

pub use guard::{DrawingVault, LoadReport, SkippedDrawing, VerifyReport};
