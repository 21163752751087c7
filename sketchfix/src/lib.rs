#![doc = include_str!("../README.md")]

pub use crate::constraints::Constraint;
pub use crate::error::{Diagnostics, Error};
pub use crate::geometry::{
    Point, Rounding, Segment, angle, angle_rounded, is_on_line, is_on_segment, p2l, p2l_rounded,
    p2p, p2p_rounded, p2s, p2s_rounded,
};
pub use crate::solver::{Config, PointIx, Solver};
pub use crate::warnings::{Warning, WarningContent};

/// Each kind of constraint we support.
mod constraints;
mod error;
/// Geometric data (points, segments) and the distance/angle helpers.
pub mod geometry;
/// The solver: assembly of the residual system and the numeric driver.
mod solver;
/// Lints for suspicious constraint sets.
mod warnings;

/// Tolerance for "is this residual basically zero" judgements: satisfied
/// checks, hit-testing predicates, and lint comparisons.
pub(crate) const EPSILON: f64 = 1e-4;
