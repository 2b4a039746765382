/// Toolkit-independent input handling for the drawing surface

pub mod canvas;

pub use canvas::{Canvas, PointerEvent, Status};
