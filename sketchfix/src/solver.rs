//! The solver: owns the points and constraints of one sketch, assembles the
//! Lagrangian stationarity system, and drives the root finder.

use newton_dense::{Options, find_root};

use crate::constraints::Constraint;
use crate::error::Error;
use crate::geometry::{Point, Rounding};
use crate::warnings::{self, Warning};

/// Stable index of a point registered with a [`Solver`].
///
/// Handed out by [`Solver::add_point`] and stored inside constraint
/// payloads, so correlating a constraint with its coordinates is index math
/// rather than a search. Indices from one solver mean nothing to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointIx(pub(crate) usize);

impl std::fmt::Display for PointIx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Tuning knobs for [`Solver::recount`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Budget of residual evaluations for the root finder.
    pub max_fev: usize,
    /// Root finder tolerance on the solution vector.
    pub x_tol: f64,
    /// Decimal precision of coordinates written back into the points.
    pub rounding: Rounding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_fev: 1000,
            x_tol: 1e-4,
            rounding: Rounding::default(),
        }
    }
}

/// A 2D sketch constraint solver.
///
/// Holds an ordered list of points and an ordered list of constraints, both
/// grow-only. [`Solver::recount`] computes new positions satisfying every
/// constraint while staying as close as possible to the current layout, and
/// writes them back into the points; on failure the points are untouched.
///
/// Stateless between calls: each `recount` re-reads the point positions, so
/// interleaving user edits with solves needs no extra bookkeeping. A single
/// instance must not be shared across threads mid-solve; independent solvers
/// are fully independent.
#[derive(Default)]
pub struct Solver {
    points: Vec<Point>,
    constraints: Vec<Constraint>,
    config: Config,
}

impl Solver {
    /// An empty solver with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty solver with a custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Register a point and get its index back. Points are never
    /// deduplicated: two points at the same coordinates are two variables.
    pub fn add_point(&mut self, point: Point) -> Result<PointIx, Error> {
        if !point.is_finite() {
            return Err(Error::invalid_argument(format!(
                "point coordinates must be finite, got {point}"
            )));
        }
        self.points.push(point);
        Ok(PointIx(self.points.len() - 1))
    }

    /// Register a constraint. Every point it references must already have
    /// been registered with this solver.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), Error> {
        constraint.validate()?;
        for ix in constraint.point_indices() {
            if ix.0 >= self.points.len() {
                return Err(Error::invalid_argument(format!(
                    "{} references {ix}, which is not registered with this solver",
                    constraint.kind()
                )));
            }
        }
        self.constraints.push(constraint);
        Ok(())
    }

    /// Current position of a registered point.
    pub fn point(&self, ix: PointIx) -> Point {
        self.points[ix.0]
    }

    /// All registered points, in registration order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// All registered constraints, in registration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of unknowns the solve works with: two coordinates per point
    /// plus one Lagrange multiplier per constraint.
    pub fn size(&self) -> usize {
        2 * self.points.len() + self.constraints.len()
    }

    /// Check the constraint set for suspicious-but-solvable constructs.
    pub fn lint(&self) -> Vec<Warning> {
        warnings::lint(&self.constraints)
    }

    /// Solve and write the solution back into the points.
    ///
    /// The unknown vector is seeded from the current point positions with
    /// fresh (zero) multipliers, so the solution stays as close to the
    /// user's layout as the constraints permit. On success the accepted
    /// coordinates are rounded per [`Config::rounding`], stored, and the
    /// full point list is returned. On failure the points are left exactly
    /// as they were and [`Error::SolutionNotFound`] is returned.
    pub fn recount(&mut self) -> Result<&[Point], Error> {
        let mut x = self.initial_guess();
        let opts = Options {
            max_fev: self.config.max_fev,
            x_tol: self.config.x_tol,
            ..Options::default()
        };
        let mut residual = |x: &[f64], y: &mut [f64]| self.assemble(x, y);
        let report = find_root(&mut residual, &mut x, opts);
        if !report.status.is_converged() {
            return Err(Error::solution_not_found(report));
        }

        let rounding = self.config.rounding;
        for (k, point) in self.points.iter_mut().enumerate() {
            point.x = rounding.round(x[2 * k]);
            point.y = rounding.round(x[2 * k + 1]);
        }
        // Multiplier rows are discarded.
        Ok(&self.points)
    }

    /// Pack current coordinates into the unknown vector. Multiplier slots
    /// start at zero on every solve.
    fn initial_guess(&self) -> Vec<f64> {
        let mut x = vec![0.0; self.size()];
        for (k, point) in self.points.iter().enumerate() {
            x[2 * k] = point.x;
            x[2 * k + 1] = point.y;
        }
        x
    }

    /// Assemble the Lagrangian stationarity residual `F(x)` into `y`.
    ///
    /// Rows `2k` and `2k+1` anchor point `k` to its current position (the
    /// gradient of the squared-displacement objective); each constraint then
    /// adds its `λ·∂g` terms into the coordinate rows it touches and writes
    /// its own equation into row `2P + m`. A root of `F` is a stationary
    /// point of "minimize displacement subject to all constraints".
    fn assemble(&self, x: &[f64], y: &mut [f64]) {
        y.fill(0.0);
        for (k, point) in self.points.iter().enumerate() {
            y[2 * k] = 2.0 * (x[2 * k] - point.x);
            y[2 * k + 1] = 2.0 * (x[2 * k + 1] - point.y);
        }
        let coords = 2 * self.points.len();
        for (m, constraint) in self.constraints.iter().enumerate() {
            constraint.apply(x, y, coords + m);
        }
    }
}
