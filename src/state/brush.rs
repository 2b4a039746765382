use crate::color::Color;
use super::data::DEFAULT_STROKE_WIDTH;

/// Tool that a new gesture produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    /// Freehand stroke following the pointer
    #[default]
    Path,
    Triangle,
    Rectangle,
    Circle,
}

/// Paint applied to the next path the user draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: Color,
    pub size: f32,
    pub shape: Shape,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: DEFAULT_STROKE_WIDTH,
            shape: Shape::Path,
        }
    }
}
