use newton_dense::{Report, Status};

/// All errors surfaced by this crate.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A constructor received a semantically impossible payload, e.g. a
    /// negative length or a NaN coordinate. Raised eagerly, before anything
    /// reaches the solver.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the payload.
        reason: String,
    },
    /// The root finder did not converge. The solver's points are exactly as
    /// they were before the call.
    #[error("no solution found: {message}")]
    SolutionNotFound {
        /// Human-readable description of how the solve ended.
        message: String,
        /// Structured diagnostics from the root finder. Opaque to callers:
        /// inspect it for logging, but don't branch on its contents.
        info: Diagnostics,
    },
}

impl Error {
    pub(crate) fn invalid_argument(reason: String) -> Self {
        Error::InvalidArgument { reason }
    }

    pub(crate) fn solution_not_found(report: Report) -> Self {
        Error::SolutionNotFound {
            message: report.status.to_string(),
            info: report.into(),
        }
    }
}

/// What the root finder had to say about a failed solve.
#[derive(Clone, Copy, Debug)]
#[non_exhaustive]
pub struct Diagnostics {
    /// The finder's exit status.
    pub status: Status,
    /// Residual evaluations spent.
    pub evaluations: usize,
    /// Newton iterations taken.
    pub iterations: usize,
    /// Euclidean norm of the residual at exit.
    pub residual_norm: f64,
}

impl From<Report> for Diagnostics {
    fn from(report: Report) -> Self {
        Self {
            status: report.status,
            evaluations: report.evaluations,
            iterations: report.iterations,
            residual_norm: report.residual_norm,
        }
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} after {} iterations ({} evaluations), residual norm {:.3e}",
            self.status, self.iterations, self.evaluations, self.residual_norm
        )
    }
}
