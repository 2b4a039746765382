use crate::geometry::{Path, Point};
use crate::state::brush::{Brush, Shape};
use crate::state::data::{Drawing, PathEntry};

/// Pointer input on the drawing surface, in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed(Point),
    Moved(Point),
    Released,
}

/// Whether the canvas consumed an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ignored,
    Captured,
}

/// State for drag interactions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub start: Point,
    pub last_position: Point,
    /// Shape chosen when the drag began; brush changes mid-drag don't apply
    pub shape: Shape,
}

/// Turns pointer drags into paths on a drawing.
///
/// Freehand strokes are added to the drawing on press and extended on every
/// move. Shapes are previewed while dragging and added on release.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    drag: Option<DragState>,
    /// Gallery thumbnails are read-only
    read_only: bool,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only() -> Self {
        Self {
            drag: None,
            read_only: true,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn update(&mut self, event: PointerEvent, brush: &Brush, drawing: &mut Drawing) -> Status {
        if self.read_only {
            return Status::Ignored;
        }
        if let PointerEvent::Pressed(p) | PointerEvent::Moved(p) = event {
            if !p.is_finite() {
                log::warn!("Ignoring pointer event at non-finite position {:?}", p);
                return Status::Ignored;
            }
        }

        match event {
            PointerEvent::Pressed(p) => {
                if brush.shape == Shape::Path {
                    let mut path = Path::new();
                    path.move_to(p.x, p.y);
                    drawing.add_path(PathEntry::new(path, brush.color, brush.size));
                }
                self.drag = Some(DragState {
                    start: p,
                    last_position: p,
                    shape: brush.shape,
                });
                Status::Captured
            }
            PointerEvent::Moved(p) => {
                let Some(drag) = self.drag.as_mut() else {
                    return Status::Ignored;
                };
                drag.last_position = p;
                if drag.shape == Shape::Path {
                    if let Some(entry) = drawing.paths.last_mut() {
                        entry.path.line_to(p.x, p.y);
                    }
                }
                Status::Captured
            }
            PointerEvent::Released => {
                let Some(drag) = self.drag.take() else {
                    return Status::Ignored;
                };
                if let Some(path) = shape_path(drag.shape, drag.start, drag.last_position) {
                    drawing.add_path(PathEntry::new(path, brush.color, brush.size));
                }
                Status::Captured
            }
        }
    }

    /// Outline of the shape being dragged, for a light gray preview.
    /// `None` for freehand strokes, which draw themselves.
    pub fn preview(&self) -> Option<Path> {
        let drag = self.drag?;
        shape_path(drag.shape, drag.start, drag.last_position)
    }
}

/// Closed outline for `shape` dragged from `start` to `end`
fn shape_path(shape: Shape, start: Point, end: Point) -> Option<Path> {
    match shape {
        Shape::Path => None,
        Shape::Rectangle => Some(Path::rectangle(start, end)),
        Shape::Triangle => Some(Path::triangle(start, end)),
        Shape::Circle => Some(Path::circle(start, start.distance(end))),
    }
}
