//! Pure 2D geometry: points, segments, and the distance/angle helpers that
//! the constraint catalogue and hit-testing are defined in terms of.
//!
//! Everything here is computed in full double precision. Rounding is a
//! caller-side policy (see [`Rounding`]) applied at the API boundary, never
//! inside the formulas.

use crate::EPSILON;

/// A 2D position. Identity inside a solver is by registration index, not by
/// value: two points at the same coordinates are two separate variables.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate. Grows downward, as on screen.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An ordered pair of points. The order defines the segment's direction,
/// which matters for [`angle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Start point.
    pub p1: Point,
    /// End point.
    pub p2: Point,
}

impl Segment {
    /// Create a new segment from `p1` to `p2`.
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// The same segment walked in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            p1: self.p2,
            p2: self.p1,
        }
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        p2p(self.p1, self.p2)
    }

    fn dx(&self) -> f64 {
        self.p2.x - self.p1.x
    }

    fn dy(&self) -> f64 {
        self.p2.y - self.p1.y
    }
}

/// Euclidean distance between two points. Symmetric and non-negative.
pub fn p2p(p1: Point, p2: Point) -> f64 {
    f64::hypot(p2.x - p1.x, p2.y - p1.y)
}

/// Perpendicular distance from `point` to the infinite line through
/// `segment`.
///
/// A zero-length segment has no direction, so the distance degenerates to
/// the distance to its endpoint.
pub fn p2l(point: Point, segment: Segment) -> f64 {
    let length = segment.length();
    if length <= 0.0 {
        return p2p(point, segment.p1);
    }
    // Determinant form of the line through (p1, p2); the sign (which side of
    // the line the point is on) is discarded.
    let det = segment.dy() * point.x - segment.dx() * point.y + segment.p2.x * segment.p1.y
        - segment.p2.y * segment.p1.x;
    det.abs() / length
}

/// Distance from `point` to the finite `segment`.
///
/// The point is projected onto the segment's supporting line; if the foot
/// falls beyond an endpoint, this is the distance to the nearest endpoint,
/// otherwise the perpendicular distance. Zero-length segments degenerate as
/// in [`p2l`].
pub fn p2s(point: Point, segment: Segment) -> f64 {
    let dx = segment.dx();
    let dy = segment.dy();
    let length_sq = dx * dx + dy * dy;
    if length_sq <= 0.0 {
        return p2p(point, segment.p1);
    }
    let t = ((point.x - segment.p1.x) * dx + (point.y - segment.p1.y) * dy) / length_sq;
    let t = t.clamp(0.0, 1.0);
    let foot = Point::new(segment.p1.x + t * dx, segment.p1.y + t * dy);
    p2p(point, foot)
}

/// Direction of a segment in degrees, `[0, 360)`, measured counter-clockwise
/// from the positive x axis in sketch coordinates (y grows downward).
fn direction(segment: Segment) -> f64 {
    let degrees = libm::atan2(-segment.dy(), segment.dx()).to_degrees();
    if degrees < 0.0 { degrees + 360.0 } else { degrees }
}

/// Angle from `s1` to `s2` in degrees, `[0, 360)`, counter-clockwise
/// positive in sketch coordinates.
///
/// `angle(s, s)` is 0 and `angle(s, s.reversed())` is 180.
pub fn angle(s1: Segment, s2: Segment) -> f64 {
    let delta = direction(s2) - direction(s1);
    if delta < 0.0 { delta + 360.0 } else { delta }
}

/// [`angle`] quantized to a whole degree.
///
/// Checks like "are these parallel" traditionally compare the whole-degree
/// angle against 0/180/360, so the quantized form is exposed alongside the
/// raw one.
pub fn angle_rounded(s1: Segment, s2: Segment) -> f64 {
    angle(s1, s2).round()
}

/// Does `point` lie on the infinite line through `segment`?
pub fn is_on_line(point: Point, segment: Segment) -> bool {
    p2l(point, segment) <= EPSILON
}

/// Does `point` lie on the closed segment?
pub fn is_on_segment(point: Point, segment: Segment) -> bool {
    p2s(point, segment) <= EPSILON
}

/// Decimal rounding policy applied at API boundaries: solved coordinates are
/// written back through it, and the `_rounded` distance helpers use it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rounding(
    /// Number of decimal digits kept.
    pub u32,
);

impl Rounding {
    /// Round `value` to this many decimal digits.
    pub fn round(self, value: f64) -> f64 {
        let scale = 10_f64.powi(self.0 as i32);
        (value * scale).round() / scale
    }
}

impl Default for Rounding {
    /// Two digits after the point.
    fn default() -> Self {
        Self(2)
    }
}

/// [`p2p`] rounded per the given policy.
pub fn p2p_rounded(p1: Point, p2: Point, rounding: Rounding) -> f64 {
    rounding.round(p2p(p1, p2))
}

/// [`p2l`] rounded per the given policy.
pub fn p2l_rounded(point: Point, segment: Segment, rounding: Rounding) -> f64 {
    rounding.round(p2l(point, segment))
}

/// [`p2s`] rounded per the given policy.
pub fn p2s_rounded(point: Point, segment: Segment, rounding: Rounding) -> f64 {
    rounding.round(p2s(point, segment))
}
