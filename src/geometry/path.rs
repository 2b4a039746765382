use serde::{Deserialize, Serialize};

/// A point on the canvas, in view pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// One command of a vector path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Close the current contour back to its starting point
    Close,
}

/// A vector path: one or more contours built from lines and cubic curves.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

/// Magic constant for approximating a quarter circle with a cubic Bézier
const KAPPA: f32 = 0.552_284_8;

impl Path {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    /// Line to a point. Starts a contour at the point if none is open.
    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        if self.commands.is_empty() {
            return self.move_to(x, y);
        }
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, end: Point) -> &mut Self {
        if self.commands.is_empty() {
            self.move_to(c1.x, c1.y);
        }
        self.commands.push(PathCommand::CubicTo {
            control1: c1,
            control2: c2,
            end,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if !self.commands.is_empty() {
            self.commands.push(PathCommand::Close);
        }
        self
    }

    /// Axis-aligned rectangle with opposite corners `a` and `b`, drawn from `a`
    /// horizontally first.
    pub fn rectangle(a: Point, b: Point) -> Self {
        let mut path = Path::new();
        path.move_to(a.x, a.y)
            .line_to(b.x, a.y)
            .line_to(b.x, b.y)
            .line_to(a.x, b.y)
            .close();
        path
    }

    /// Triangle inscribed in the box spanned by `a` and `b`: apex at the middle
    /// of `a`'s edge, base along `b`'s edge.
    pub fn triangle(a: Point, b: Point) -> Self {
        let apex_x = (a.x + b.x) / 2.0;
        let mut path = Path::new();
        path.move_to(apex_x, a.y)
            .line_to(a.x, b.y)
            .line_to(b.x, b.y)
            .close();
        path
    }

    /// Clockwise circle (in screen coordinates) starting at its rightmost point.
    pub fn circle(center: Point, radius: f32) -> Self {
        let (cx, cy, r) = (center.x, center.y, radius.abs());
        let k = r * KAPPA;
        let mut path = Path::new();
        path.move_to(cx + r, cy)
            .cubic_to(
                Point::new(cx + r, cy + k),
                Point::new(cx + k, cy + r),
                Point::new(cx, cy + r),
            )
            .cubic_to(
                Point::new(cx - k, cy + r),
                Point::new(cx - r, cy + k),
                Point::new(cx - r, cy),
            )
            .cubic_to(
                Point::new(cx - r, cy - k),
                Point::new(cx - k, cy - r),
                Point::new(cx, cy - r),
            )
            .cubic_to(
                Point::new(cx + k, cy - r),
                Point::new(cx + r, cy - k),
                Point::new(cx + r, cy),
            )
            .close();
        path
    }

    /// Last point of the path, if any.
    pub fn current_point(&self) -> Option<Point> {
        let mut start = None;
        let mut current = None;
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    start = Some(p);
                    current = Some(p);
                }
                PathCommand::LineTo(p) => current = Some(p),
                PathCommand::CubicTo { end, .. } => current = Some(end),
                PathCommand::Close => current = start,
            }
        }
        current
    }
}
