/// Whole-drawing edits
///
/// These operations touch every path of a drawing at once (the per-stroke
/// paint is otherwise fixed once a path is added). Geometry is never changed,
/// only color and stroke width.

use super::data::Drawing;
use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edit {
    /// Paint every path with one color
    Recolor(Color),
    /// Multiply every stroke width by a factor
    ScaleSizes(f32),
    /// Invert every path's RGB, keeping alpha
    InvertColors,
    /// Remove all paths
    Blank,
}

impl Edit {
    /// Apply this edit to `drawing` in place
    pub fn apply(self, drawing: &mut Drawing) {
        match self {
            Edit::Recolor(color) => {
                for entry in &mut drawing.paths {
                    entry.color = color;
                }
            }
            Edit::ScaleSizes(factor) => {
                // Negative or NaN widths can't be drawn
                if !(factor >= 0.0) || !factor.is_finite() {
                    log::warn!("Ignoring stroke scale factor {}", factor);
                    return;
                }
                for entry in &mut drawing.paths {
                    entry.size *= factor;
                }
            }
            Edit::InvertColors => {
                for entry in &mut drawing.paths {
                    entry.color = entry.color.inverted();
                }
            }
            Edit::Blank => drawing.paths.clear(),
        }
        log::debug!(
            "Applied {:?} to drawing {:?} ({} paths)",
            self,
            drawing.id,
            drawing.paths.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Path;
    use crate::state::data::PathEntry;

    fn drawing() -> Drawing {
        let mut d = Drawing::new("A", "me");
        d.add_path(PathEntry::new(Path::new(), Color::from_argb(0xFF, 0, 0x80, 0xFF), 2.0));
        d.add_path(PathEntry::new(Path::new(), Color::from_argb(0x40, 0xFF, 0, 0), 4.0));
        d
    }

    #[test]
    fn test_recolor() {
        let mut d = drawing();
        Edit::Recolor(Color::WHITE).apply(&mut d);
        assert!(d.paths.iter().all(|p| p.color == Color::WHITE));
    }

    #[test]
    fn test_scale_sizes() {
        let mut d = drawing();
        Edit::ScaleSizes(1.5).apply(&mut d);
        let sizes: Vec<f32> = d.paths.iter().map(|p| p.size).collect();
        assert_eq!(sizes, [3.0, 6.0]);
    }

    #[test]
    fn test_invalid_scale_is_ignored() {
        let mut d = drawing();
        Edit::ScaleSizes(-2.0).apply(&mut d);
        Edit::ScaleSizes(f32::NAN).apply(&mut d);
        assert_eq!(d, drawing());
    }

    #[test]
    fn test_invert_keeps_alpha() {
        let mut d = drawing();
        Edit::InvertColors.apply(&mut d);
        assert_eq!(d.paths[0].color, Color::from_argb(0xFF, 0xFF, 0x7F, 0x00));
        assert_eq!(d.paths[1].color, Color::from_argb(0x40, 0x00, 0xFF, 0xFF));
    }

    #[test]
    fn test_blank() {
        let mut d = drawing();
        Edit::Blank.apply(&mut d);
        assert!(d.paths.is_empty());
        assert_eq!(d.name, "A");
    }
}
