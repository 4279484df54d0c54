use nalgebra::geometry::Point2;
use std::ops::Range;

/// Round to three decimal places, the precision used for both preview positions and emitted angles.
/// Rounds the exact binary value of `v`, so 0.0045 (stored just below the tie) goes down to 0.004 and an exact
/// tie such as 12.3125 goes to the even digit.
pub fn round3(v: f64) -> f64 {
    format!("{v:.3}").parse().unwrap_or(v)
}

/// A single drilling point on a hole circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HolePosition {
    pub index: u32,
    /// Angle in degrees, never normalized into [0, 360)
    pub angle_deg: f64,
    pub position: Point2<f64>,
}

impl HolePosition {
    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }
}

/// A pattern of `num_holes` points evenly spaced around a circle of `radius`, starting at `first_angle` degrees.
///
/// The pattern itself stores nothing but its parameters. Positions are recomputed every time `holes()` is
/// called, so the sequence can be walked as often as needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleCircle {
    num_holes: u32,
    first_angle: f64,
    radius: f64,
}

impl HoleCircle {
    /// `num_holes` must be non-zero for the pattern to be meaningful. A zero count yields no holes.
    pub fn new(num_holes: u32, first_angle: f64, radius: f64) -> Self {
        HoleCircle {
            num_holes,
            first_angle,
            radius,
        }
    }

    pub fn num_holes(&self) -> u32 {
        self.num_holes
    }

    pub fn first_angle(&self) -> f64 {
        self.first_angle
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The same pattern drawn at a different radius
    pub fn with_radius(&self, radius: f64) -> Self {
        HoleCircle { radius, ..*self }
    }

    /// Angular spacing between neighbouring holes, in degrees
    pub fn step(&self) -> f64 {
        360.0 / self.num_holes as f64
    }

    /// Angle of hole `i`, in degrees. Values past 360 (or below zero, for a negative first angle) are kept as-is.
    pub fn angle(&self, i: u32) -> f64 {
        self.step() * i as f64 + self.first_angle
    }

    /// Position of hole `i`. Y is negated so that increasing angles run counter-clockwise on a screen whose
    /// Y axis points down, matching the way the machine sees the part.
    pub fn hole(&self, i: u32) -> HolePosition {
        let angle_deg = self.angle(i);
        let theta = angle_deg.to_radians();
        let x = round3(self.radius * theta.cos());
        let y = -round3(self.radius * theta.sin());
        HolePosition {
            index: i,
            angle_deg,
            position: Point2::new(x, y),
        }
    }

    pub fn holes(&self) -> Holes {
        Holes {
            circle: *self,
            range: 0..self.num_holes,
        }
    }
}

impl IntoIterator for &HoleCircle {
    type Item = HolePosition;
    type IntoIter = Holes;

    fn into_iter(self) -> Holes {
        self.holes()
    }
}

/// Lazy iterator over the holes of a `HoleCircle`
#[derive(Debug, Clone)]
pub struct Holes {
    circle: HoleCircle,
    range: Range<u32>,
}

impl Iterator for Holes {
    type Item = HolePosition;

    fn next(&mut self) -> Option<HolePosition> {
        self.range.next().map(|i| self.circle.hole(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for Holes {}
