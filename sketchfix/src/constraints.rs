//! Each kind of geometric constraint we support, and its contribution to the
//! Lagrangian stationarity system the solver drives to zero.

use crate::error::Error;
use crate::solver::PointIx;

/// A geometric relation between registered points.
///
/// Every constraint is one scalar equation `g(x) = 0` over the point
/// coordinates, paired with one Lagrange multiplier in the solver's unknown
/// vector. Use the constructor functions (e.g. [`Constraint::length`]) to
/// get argument validation; the solver re-validates on registration either
/// way, so a bad payload never reaches assembly.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum Constraint {
    /// This point's X coordinate equals the value.
    FixX(PointIx, f64),
    /// This point's Y coordinate equals the value.
    FixY(PointIx, f64),
    /// The two points share an X coordinate.
    CoincidentX(PointIx, PointIx),
    /// The two points share a Y coordinate.
    CoincidentY(PointIx, PointIx),
    /// The segment from the first point to the second is vertical.
    /// Same equation as [`Constraint::CoincidentX`], kept distinct for intent.
    Vertical(PointIx, PointIx),
    /// The segment from the first point to the second is horizontal.
    Horizontal(PointIx, PointIx),
    /// The two points are this distance apart.
    Length(PointIx, PointIx, f64),
    /// Segment p1p2 is parallel to segment p3p4: their cross product
    /// vanishes. Smooth everywhere, unlike slope-based forms.
    Parallel(PointIx, PointIx, PointIx, PointIx),
    /// The angle between vectors (p1 - p2) and (p3 - p4) has this cosine.
    /// Encoded via cosine similarity rather than atan2 to avoid branch cuts.
    Angle(PointIx, PointIx, PointIx, PointIx, f64),
    /// Segment p1p2 is perpendicular to segment p3p4. An [`Constraint::Angle`]
    /// with cosine exactly zero; both share one gradient implementation.
    Perpendicular(PointIx, PointIx, PointIx, PointIx),
}

impl Constraint {
    /// Fix a point's X coordinate.
    pub fn fix_x(point: PointIx, value: f64) -> Result<Self, Error> {
        let c = Self::FixX(point, value);
        c.validate()?;
        Ok(c)
    }

    /// Fix a point's Y coordinate.
    pub fn fix_y(point: PointIx, value: f64) -> Result<Self, Error> {
        let c = Self::FixY(point, value);
        c.validate()?;
        Ok(c)
    }

    /// Make two points share an X coordinate.
    pub fn coincident_x(p1: PointIx, p2: PointIx) -> Self {
        Self::CoincidentX(p1, p2)
    }

    /// Make two points share a Y coordinate.
    pub fn coincident_y(p1: PointIx, p2: PointIx) -> Self {
        Self::CoincidentY(p1, p2)
    }

    /// Make the segment p1p2 vertical.
    pub fn vertical(p1: PointIx, p2: PointIx) -> Self {
        Self::Vertical(p1, p2)
    }

    /// Make the segment p1p2 horizontal.
    pub fn horizontal(p1: PointIx, p2: PointIx) -> Self {
        Self::Horizontal(p1, p2)
    }

    /// Keep two points a given distance apart. The distance must be finite
    /// and non-negative.
    pub fn length(p1: PointIx, p2: PointIx, length: f64) -> Result<Self, Error> {
        let c = Self::Length(p1, p2, length);
        c.validate()?;
        Ok(c)
    }

    /// Make segment p1p2 parallel to segment p3p4.
    pub fn parallel(p1: PointIx, p2: PointIx, p3: PointIx, p4: PointIx) -> Self {
        Self::Parallel(p1, p2, p3, p4)
    }

    /// Make the angle between vectors (p1 - p2) and (p3 - p4) equal this
    /// many degrees. The cosine of the target is what gets stored.
    pub fn angle(
        p1: PointIx,
        p2: PointIx,
        p3: PointIx,
        p4: PointIx,
        degrees: f64,
    ) -> Result<Self, Error> {
        if !degrees.is_finite() {
            return Err(Error::invalid_argument(format!(
                "angle must be finite, got {degrees}"
            )));
        }
        Ok(Self::Angle(p1, p2, p3, p4, libm::cos(degrees.to_radians())))
    }

    /// Make segment p1p2 perpendicular to segment p3p4.
    pub fn perpendicular(p1: PointIx, p2: PointIx, p3: PointIx, p4: PointIx) -> Self {
        Self::Perpendicular(p1, p2, p3, p4)
    }

    /// Check the payload for semantically impossible values.
    /// Runs in the constructors and again in `Solver::add_constraint`.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        match *self {
            Self::FixX(_, value) | Self::FixY(_, value) if !value.is_finite() => Err(
                Error::invalid_argument(format!("fixed coordinate must be finite, got {value}")),
            ),
            Self::Length(_, _, length) if !(length.is_finite() && length >= 0.0) => {
                Err(Error::invalid_argument(format!(
                    "length must be finite and non-negative, got {length}"
                )))
            }
            Self::Angle(_, _, _, _, cos_theta) if !cos_theta.is_finite() => Err(
                Error::invalid_argument("angle target must be finite".to_owned()),
            ),
            _ => Ok(()),
        }
    }

    /// Every point index the constraint references.
    pub(crate) fn point_indices(&self) -> Vec<PointIx> {
        match *self {
            Self::FixX(p, _) | Self::FixY(p, _) => vec![p],
            Self::CoincidentX(p1, p2)
            | Self::CoincidentY(p1, p2)
            | Self::Vertical(p1, p2)
            | Self::Horizontal(p1, p2)
            | Self::Length(p1, p2, _) => vec![p1, p2],
            Self::Parallel(p1, p2, p3, p4)
            | Self::Angle(p1, p2, p3, p4, _)
            | Self::Perpendicular(p1, p2, p3, p4) => vec![p1, p2, p3, p4],
        }
    }

    /// Human-readable constraint name, useful for debugging and warnings.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FixX(..) => "FixX",
            Self::FixY(..) => "FixY",
            Self::CoincidentX(..) => "CoincidentX",
            Self::CoincidentY(..) => "CoincidentY",
            Self::Vertical(..) => "Vertical",
            Self::Horizontal(..) => "Horizontal",
            Self::Length(..) => "Length",
            Self::Parallel(..) => "Parallel",
            Self::Angle(..) => "Angle",
            Self::Perpendicular(..) => "Perpendicular",
        }
    }

    /// Add this constraint's contribution to the Lagrangian residual.
    ///
    /// `x` is the current assignment (point coordinates, then one multiplier
    /// per constraint) and `y` the residual vector being assembled. `row` is
    /// this constraint's own residual row, which doubles as the index of its
    /// multiplier λ. Each coordinate the equation `g` touches receives
    /// `λ · ∂g/∂coordinate` added into its gradient row, and `y[row]` is set
    /// to `g(x)` itself.
    pub(crate) fn apply(&self, x: &[f64], y: &mut [f64], row: usize) {
        let lambda = x[row];
        match *self {
            Self::FixX(p, value) => {
                let i = 2 * p.0;
                y[i] += lambda;
                y[row] = x[i] - value;
            }
            Self::FixY(p, value) => {
                let i = 2 * p.0 + 1;
                y[i] += lambda;
                y[row] = x[i] - value;
            }
            Self::CoincidentX(p1, p2) | Self::Vertical(p1, p2) => {
                let i1 = 2 * p1.0;
                let i2 = 2 * p2.0;
                y[i2] += lambda;
                y[i1] -= lambda;
                y[row] = x[i2] - x[i1];
            }
            Self::CoincidentY(p1, p2) | Self::Horizontal(p1, p2) => {
                let i1 = 2 * p1.0 + 1;
                let i2 = 2 * p2.0 + 1;
                y[i2] += lambda;
                y[i1] -= lambda;
                y[row] = x[i2] - x[i1];
            }
            Self::Length(p1, p2, length) => {
                let i1 = 2 * p1.0;
                let i2 = 2 * p2.0;
                let dx = x[i2] - x[i1];
                let dy = x[i2 + 1] - x[i1 + 1];

                y[i2] += 2.0 * lambda * dx;
                y[i1] -= 2.0 * lambda * dx;
                y[i2 + 1] += 2.0 * lambda * dy;
                y[i1 + 1] -= 2.0 * lambda * dy;

                // Squared form: no square root, smooth at zero distance.
                y[row] = dx * dx + dy * dy - length * length;
            }
            Self::Parallel(p1, p2, p3, p4) => {
                let i1 = 2 * p1.0;
                let i2 = 2 * p2.0;
                let i3 = 2 * p3.0;
                let i4 = 2 * p4.0;

                let ax = x[i1] - x[i2];
                let ay = x[i1 + 1] - x[i2 + 1];
                let bx = x[i3] - x[i4];
                let by = x[i3 + 1] - x[i4 + 1];

                y[i1] += lambda * by;
                y[i2] -= lambda * by;
                y[i3] -= lambda * ay;
                y[i4] += lambda * ay;

                y[i1 + 1] -= lambda * bx;
                y[i2 + 1] += lambda * bx;
                y[i3 + 1] += lambda * ax;
                y[i4 + 1] -= lambda * ax;

                y[row] = ax * by - ay * bx;
            }
            Self::Angle(p1, p2, p3, p4, cos_theta) => {
                apply_angle(x, y, row, lambda, [p1, p2, p3, p4], cos_theta);
            }
            Self::Perpendicular(p1, p2, p3, p4) => {
                apply_angle(x, y, row, lambda, [p1, p2, p3, p4], 0.0);
            }
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

/// Cosine-similarity residual between vectors a = p1 - p2 and b = p3 - p4,
/// with the analytic gradient of the cosine. If either vector has zero
/// length the terms divide by zero and the non-finite values flow into the
/// residual, which the root finder then reports as a failed solve.
fn apply_angle(
    x: &[f64],
    y: &mut [f64],
    row: usize,
    lambda: f64,
    [p1, p2, p3, p4]: [PointIx; 4],
    cos_theta: f64,
) {
    let i1 = 2 * p1.0;
    let i2 = 2 * p2.0;
    let i3 = 2 * p3.0;
    let i4 = 2 * p4.0;

    let ax = x[i1] - x[i2];
    let ay = x[i1 + 1] - x[i2 + 1];
    let bx = x[i3] - x[i4];
    let by = x[i3 + 1] - x[i4 + 1];

    let l1 = f64::hypot(ax, ay);
    let l2 = f64::hypot(bx, by);
    let cross = ax * by - bx * ay;

    // Gradient of (a·b)/(‖a‖‖b‖); the 1/‖a‖³‖b‖ and 1/‖a‖‖b‖³ factors are
    // the usual ones from differentiating the cosine.
    let per_a = cross / (l1.powi(3) * l2);
    let per_b = cross / (l1 * l2.powi(3));

    y[i1] -= lambda * ay * per_a;
    y[i2] += lambda * ay * per_a;
    y[i3] += lambda * by * per_b;
    y[i4] -= lambda * by * per_b;

    y[i1 + 1] += lambda * ax * per_a;
    y[i2 + 1] -= lambda * ax * per_a;
    y[i3 + 1] -= lambda * bx * per_b;
    y[i4 + 1] += lambda * bx * per_b;

    y[row] = (ax * bx + ay * by) / (l1 * l2) - cos_theta;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn ix(i: usize) -> PointIx {
        PointIx(i)
    }

    #[test]
    fn negative_length_is_rejected() {
        let err = Constraint::length(ix(0), ix(1), -5.0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn nan_payloads_are_rejected() {
        assert!(Constraint::length(ix(0), ix(1), f64::NAN).is_err());
        assert!(Constraint::fix_x(ix(0), f64::NAN).is_err());
        assert!(Constraint::fix_y(ix(0), f64::INFINITY).is_err());
        assert!(Constraint::angle(ix(0), ix(1), ix(2), ix(3), f64::NAN).is_err());
    }

    #[test]
    fn zero_length_is_allowed() {
        assert!(Constraint::length(ix(0), ix(1), 0.0).is_ok());
    }

    #[test]
    fn angle_stores_cosine() {
        let Ok(Constraint::Angle(_, _, _, _, cos_theta)) =
            Constraint::angle(ix(0), ix(1), ix(2), ix(3), 60.0)
        else {
            panic!("expected an Angle constraint");
        };
        assert!((cos_theta - 0.5).abs() < 1e-12);
    }

    #[test]
    fn literal_payloads_are_validated_too() {
        // Building the variant directly skips the constructor, but
        // validate() still catches it (the solver calls it on registration).
        let c = Constraint::Length(ix(0), ix(1), -1.0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn fix_x_contribution() {
        // One point at index 0, one constraint. x = [px, py, λ].
        let c = Constraint::FixX(ix(0), 4.0);
        let x = [10.0, 20.0, 3.0];
        let mut y = [0.0; 3];
        c.apply(&x, &mut y, 2);
        // Gradient row gets +λ·∂g/∂px = 3, residual row gets g = 10 - 4.
        assert!((y[0] - 3.0).abs() < 1e-12);
        assert!(y[1].abs() < 1e-12);
        assert!((y[2] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn length_contribution() {
        // Two points, one constraint. x = [x1, y1, x2, y2, λ].
        let c = Constraint::Length(ix(0), ix(1), 5.0);
        let x = [0.0, 0.0, 3.0, 4.0, 1.0];
        let mut y = [0.0; 5];
        c.apply(&x, &mut y, 4);
        // g = 3² + 4² - 5² = 0: satisfied, but gradient terms still present.
        assert!(y[4].abs() < 1e-12);
        assert!((y[2] - 6.0).abs() < 1e-12);
        assert!((y[0] + 6.0).abs() < 1e-12);
        assert!((y[3] - 8.0).abs() < 1e-12);
        assert!((y[1] + 8.0).abs() < 1e-12);
    }

    #[test]
    fn parallel_contribution_vanishes_for_parallel_segments() {
        // Segments (0,0)->(2,0) and (0,1)->(4,1). x = [.., λ].
        let c = Constraint::Parallel(ix(0), ix(1), ix(2), ix(3));
        let x = [0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 4.0, 1.0, 7.0];
        let mut y = [0.0; 9];
        c.apply(&x, &mut y, 8);
        assert!(y[8].abs() < 1e-12);
    }

    #[test]
    fn perpendicular_contribution_vanishes_for_right_angle() {
        let c = Constraint::Perpendicular(ix(0), ix(1), ix(2), ix(3));
        // a = p1 - p2 = (2, 0); b = p3 - p4 = (0, 3).
        let x = [2.0, 0.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 1.0];
        let mut y = [0.0; 9];
        c.apply(&x, &mut y, 8);
        assert!(y[8].abs() < 1e-12);
    }

    #[test]
    fn coincident_points_under_angle_go_non_finite() {
        let c = Constraint::Angle(ix(0), ix(1), ix(2), ix(3), 0.5);
        // p1 == p2, so vector a is zero and the cosine is undefined.
        let x = [1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 2.0, 2.0, 0.0];
        let mut y = [0.0; 9];
        c.apply(&x, &mut y, 8);
        assert!(!y[8].is_finite());
    }
}
