//! Drawing session state and its reducer
//!
//! The embedding UI turns gestures and button presses into [`Command`]s and
//! feeds them to [`Session::update`], which mutates the session and returns an
//! [`Effect`] for the UI to carry out: redraw the canvas, start an async
//! save, or flash a short message. Nothing here touches a toolkit or the disk.

use crate::color::Color;
use crate::geometry::Path;
use crate::state::brush::{Brush, Shape};
use crate::state::data::Drawing;
use crate::state::edit::Edit;
use crate::ui::canvas::{Canvas, PointerEvent, Status};

/// Application commands (events)
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Pointer input on the drawing surface
    Pointer(PointerEvent),
    SetBrushColor(Color),
    SetBrushSize(f32),
    SelectShape(Shape),
    /// Apply a whole-drawing edit
    Edit(Edit),
    SetName(String),
    SetAuthor(String),
    /// Make `drawing` the one being edited (opened from the gallery)
    Open(Drawing),
    /// Start over with a default brush and an empty drawing
    Reset,
    /// User pressed save
    Save,
    /// Background save finished with the store id
    SaveCompleted { tag: SaveTag, id: i64 },
    /// Background save failed; the message is shown to the user
    SaveFailed { tag: SaveTag, reason: String },
}

/// Identifies the drawing a save was started for.
///
/// Opening or resetting a drawing starts a new generation, so a result that
/// arrives afterwards no longer matches and is not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveTag(u64);

/// Work the UI must do after an update
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Redraw,
    /// Persist this snapshot, then send back `SaveCompleted` or `SaveFailed`
    /// carrying the same tag
    Persist { tag: SaveTag, drawing: Drawing },
    /// Show a transient message
    Notify(String),
}

/// Main session state
#[derive(Debug, Clone, Default)]
pub struct Session {
    brush: Brush,
    drawing: Drawing,
    canvas: Canvas,
    /// Bumped whenever a different drawing becomes current
    generation: SaveTag,
    /// Tag of the save in flight for the current drawing
    in_flight: Option<SaveTag>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for an existing drawing
    pub fn with_drawing(drawing: Drawing) -> Self {
        Self {
            drawing,
            ..Self::default()
        }
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    /// True while a save of the current drawing is in flight
    pub fn is_saving(&self) -> bool {
        self.in_flight == Some(self.generation)
    }

    fn replace_drawing(&mut self, drawing: Drawing) {
        self.drawing = drawing;
        self.canvas = Canvas::new();
        self.generation = SaveTag(self.generation.0 + 1);
        self.in_flight = None;
    }

    /// Outline of a shape being dragged, drawn in light gray over the drawing
    pub fn preview(&self) -> Option<(Path, Color, f32)> {
        self.canvas
            .preview()
            .map(|path| (path, Color::LIGHT_GRAY, self.brush.size))
    }

    /// Handle a command and update state
    pub fn update(&mut self, command: Command) -> Effect {
        match command {
            Command::Pointer(event) => {
                match self.canvas.update(event, &self.brush, &mut self.drawing) {
                    Status::Captured => Effect::Redraw,
                    Status::Ignored => Effect::None,
                }
            }
            Command::SetBrushColor(color) => {
                self.brush.color = color;
                Effect::None
            }
            Command::SetBrushSize(size) => {
                if size.is_finite() && size > 0.0 {
                    self.brush.size = size;
                }
                Effect::None
            }
            Command::SelectShape(shape) => {
                self.brush.shape = shape;
                Effect::None
            }
            Command::Edit(edit) => {
                edit.apply(&mut self.drawing);
                Effect::Redraw
            }
            Command::SetName(name) => {
                self.drawing.name = name;
                Effect::None
            }
            Command::SetAuthor(author) => {
                self.drawing.author = author;
                Effect::None
            }
            Command::Open(drawing) => {
                self.replace_drawing(drawing);
                Effect::Redraw
            }
            Command::Reset => {
                self.brush = Brush::default();
                self.replace_drawing(Drawing::default());
                Effect::Redraw
            }
            Command::Save => {
                if self.is_saving() {
                    return Effect::None;
                }
                let tag = self.generation;
                self.in_flight = Some(tag);
                Effect::Persist {
                    tag,
                    drawing: self.drawing.clone(),
                }
            }
            Command::SaveCompleted { tag, id } => {
                if tag != self.generation {
                    // The saved drawing is no longer open; its record is already correct
                    log::debug!("Drawing {} saved after it was closed", id);
                    return Effect::Notify("Drawing saved".to_string());
                }
                self.in_flight = None;
                self.drawing.id = Some(id);
                Effect::Notify("Drawing saved".to_string())
            }
            Command::SaveFailed { tag, reason } => {
                log::warn!("Save failed: {}", reason);
                // Keep the drawing as-is so the user can retry
                if tag == self.generation {
                    self.in_flight = None;
                }
                Effect::Notify(format!("Could not save drawing: {reason}"))
            }
        }
    }
}
