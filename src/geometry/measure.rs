use super::path::{Path, PathCommand, Point};

/// Chords per unit of control-polygon length when flattening cubics
const FLATTEN_DENSITY: f32 = 0.5;
const MIN_CUBIC_CHORDS: usize = 8;
const MAX_CUBIC_CHORDS: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Segment {
    from: Point,
    to: Point,
    /// Arc length at `from`
    offset: f32,
    length: f32,
}

/// Arc-length view of a path.
///
/// Curves are flattened into chords. Contours are measured back to back, so
/// distance `d` on a two-contour path may land in the second contour; the gap
/// between contours contributes no length. A closed contour includes its
/// closing segment.
#[derive(Debug, Clone, Default)]
pub struct PathMeasure {
    segments: Vec<Segment>,
    length: f32,
}

impl PathMeasure {
    pub fn new(path: &Path) -> Self {
        let mut measure = PathMeasure::default();
        let mut start = None;
        let mut current = None;

        for command in path.commands() {
            match *command {
                PathCommand::MoveTo(p) => {
                    start = Some(p);
                    current = Some(p);
                }
                PathCommand::LineTo(p) => {
                    if let Some(from) = current {
                        measure.push(from, p);
                    }
                    current = Some(p);
                }
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => {
                    if let Some(from) = current {
                        measure.push_cubic(from, control1, control2, end);
                    }
                    current = Some(end);
                }
                PathCommand::Close => {
                    if let (Some(from), Some(to)) = (current, start) {
                        measure.push(from, to);
                    }
                    current = start;
                }
            }
        }
        measure
    }

    /// Total arc length of every contour.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Position at arc length `distance`, clamped to the path's ends.
    /// `None` for a path with zero length.
    pub fn position_at(&self, distance: f32) -> Option<Point> {
        let last = self.segments.last()?;
        if distance >= self.length {
            return Some(last.to);
        }
        let distance = distance.max(0.0);
        let idx = self
            .segments
            .partition_point(|s| s.offset + s.length <= distance)
            .min(self.segments.len() - 1);
        Some(Self::point_on(&self.segments[idx], distance))
    }

    /// Positions at `0, step, 2*step, ...` strictly below the total length.
    ///
    /// Offsets are computed as `i * step` rather than accumulated, so long
    /// paths do not drift.
    pub fn sample(&self, step: f32) -> Vec<Point> {
        // A non-finite point makes the length inf or NaN; there is nothing to walk
        if !self.length.is_finite() || self.length <= 0.0 || !(step > 0.0) {
            return Vec::new();
        }
        let mut points = Vec::new();
        let mut idx = 0;
        let mut i: u32 = 0;
        loop {
            let distance = i as f32 * step;
            if distance >= self.length {
                break;
            }
            while idx + 1 < self.segments.len()
                && self.segments[idx].offset + self.segments[idx].length <= distance
            {
                idx += 1;
            }
            points.push(Self::point_on(&self.segments[idx], distance));
            i += 1;
        }
        points
    }

    fn point_on(segment: &Segment, distance: f32) -> Point {
        let t = ((distance - segment.offset) / segment.length).clamp(0.0, 1.0);
        segment.from.lerp(segment.to, t)
    }

    fn push(&mut self, from: Point, to: Point) {
        let length = from.distance(to);
        if length <= f32::EPSILON {
            return;
        }
        self.segments.push(Segment {
            from,
            to,
            offset: self.length,
            length,
        });
        self.length += length;
    }

    fn push_cubic(&mut self, p0: Point, p1: Point, p2: Point, p3: Point) {
        let hull = p0.distance(p1) + p1.distance(p2) + p2.distance(p3);
        let chords = ((hull * FLATTEN_DENSITY).ceil() as usize).clamp(MIN_CUBIC_CHORDS, MAX_CUBIC_CHORDS);
        let mut prev = p0;
        for n in 1..=chords {
            let t = n as f32 / chords as f32;
            let next = cubic_point(p0, p1, p2, p3, t);
            self.push(prev, next);
            prev = next;
        }
    }
}

fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn test_single_point_has_no_length() {
        let mut path = Path::new();
        path.move_to(5.0, 5.0);
        let measure = PathMeasure::new(&path);
        assert_eq!(measure.length(), 0.0);
        assert!(measure.position_at(0.0).is_none());
        assert!(measure.sample(0.1).is_empty());
    }

    #[test]
    fn test_rectangle_length_includes_close() {
        let path = Path::rectangle(Point::new(0.0, 0.0), Point::new(3.0, 2.0));
        assert!(approx(PathMeasure::new(&path).length(), 10.0, 1e-4));
    }

    #[test]
    fn test_position_along_polyline() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(10.0, 10.0);
        let measure = PathMeasure::new(&path);
        assert_eq!(measure.position_at(5.0), Some(Point::new(5.0, 0.0)));
        assert_eq!(measure.position_at(15.0), Some(Point::new(10.0, 5.0)));
        assert_eq!(measure.position_at(99.0), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_circle_circumference() {
        let path = Path::circle(Point::new(50.0, 50.0), 20.0);
        let expected = 2.0 * std::f32::consts::PI * 20.0;
        assert!(approx(PathMeasure::new(&path).length(), expected, 0.05));
    }

    #[test]
    fn test_sample_count_matches_length() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(1.0, 0.0);
        let points = PathMeasure::new(&path).sample(0.1);
        // 0.0, 0.1, ... 0.9 (1.0 itself is excluded)
        assert!(points.len() == 10 || points.len() == 11);
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert!(approx(points[5].x, 0.5, 1e-5));
    }

    #[test]
    fn test_contours_are_measured_back_to_back() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0)
            .line_to(2.0, 0.0)
            .move_to(100.0, 100.0)
            .line_to(100.0, 3.0);
        let measure = PathMeasure::new(&path);
        assert!(approx(measure.length(), 99.0, 1e-4));
        let p = measure.position_at(3.0).unwrap();
        assert!(approx(p.x, 100.0, 1e-4) && approx(p.y, 99.0, 1e-3));
    }

    #[test]
    fn test_non_finite_path_samples_nothing() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(f32::INFINITY, 0.0).line_to(1.0, 1.0);
        assert!(PathMeasure::new(&path).sample(0.1).is_empty());

        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(f32::NAN, 2.0);
        assert!(PathMeasure::new(&path).sample(0.1).is_empty());
    }
}
