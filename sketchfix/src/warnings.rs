use crate::{Constraint, EPSILON};

/// A non-fatal observation about a constraint set: the system may still
/// solve, but the constraint in question is probably not what the user
/// meant, or there is a cheaper way to express it.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Warning {
    /// Index of the offending constraint in registration order.
    pub about_constraint: usize,
    /// What is suspicious about it.
    pub content: WarningContent,
}

/// The kinds of suspicious constraints the lint pass recognizes.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(PartialEq))]
#[non_exhaustive]
pub enum WarningContent {
    /// An angle target of 0, 180 or 360 degrees. `Parallel` expresses the
    /// same relation without normalizing the segment directions.
    ShouldBeParallel,
    /// An angle target of 90 or 270 degrees. `Perpendicular` is the exact
    /// form of the same relation.
    ShouldBePerpendicular,
    /// A length of zero. Coincidence constraints express this directly and
    /// keep the distance gradient well-defined.
    ZeroLength,
}

impl std::fmt::Display for WarningContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningContent::ShouldBeParallel => {
                write!(f, "instead of a 0 or 180 degree angle, constrain to Parallel")
            }
            WarningContent::ShouldBePerpendicular => {
                write!(f, "instead of a 90 degree angle, constrain to Perpendicular")
            }
            WarningContent::ZeroLength => {
                write!(
                    f,
                    "a zero length is better expressed as coincidence constraints"
                )
            }
        }
    }
}

pub(crate) fn lint(constraints: &[Constraint]) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for (id, constraint) in constraints.iter().enumerate() {
        match *constraint {
            // The canonical form stores the cosine of the target angle.
            Constraint::Angle(_, _, _, _, cos_theta) if (cos_theta.abs() - 1.0).abs() < EPSILON => {
                warnings.push(Warning {
                    about_constraint: id,
                    content: WarningContent::ShouldBeParallel,
                });
            }
            Constraint::Angle(_, _, _, _, cos_theta) if cos_theta.abs() < EPSILON => {
                warnings.push(Warning {
                    about_constraint: id,
                    content: WarningContent::ShouldBePerpendicular,
                });
            }
            Constraint::Length(_, _, length) if length.abs() < EPSILON => {
                warnings.push(Warning {
                    about_constraint: id,
                    content: WarningContent::ZeroLength,
                });
            }
            _ => {}
        }
    }
    warnings
}
