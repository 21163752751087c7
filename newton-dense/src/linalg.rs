use faer::{Mat, linalg::solvers::FullPivLu, prelude::Solve};

/// Full-pivot LU wrapper around faer's dense solver.
/// Factored once per Newton iteration, then reused for the step solve.
#[derive(Default)]
pub(crate) struct DenseLu {
    lu: Option<FullPivLu<f64>>,
}

impl DenseLu {
    pub(crate) fn factor(&mut self, a: &Mat<f64>) {
        self.lu = Some(a.full_piv_lu());
    }

    /// Solve `A out = rhs` with the last factored matrix.
    /// Returns false when there is no factorization or the solution came out
    /// non-finite, which is how a singular factorization manifests.
    pub(crate) fn solve(&self, rhs: &[f64], out: &mut [f64]) -> bool {
        let Some(lu) = &self.lu else {
            return false;
        };
        let n = rhs.len();
        let mut b = Mat::<f64>::zeros(n, 1);
        for (i, &v) in rhs.iter().enumerate() {
            b[(i, 0)] = v;
        }
        let solution = lu.solve(b.as_ref());
        for (i, o) in out.iter_mut().enumerate() {
            *o = solution[(i, 0)];
        }
        out.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_small_system() {
        let mut a = Mat::<f64>::zeros(2, 2);
        a[(0, 0)] = 2.0;
        a[(0, 1)] = 1.0;
        a[(1, 0)] = 1.0;
        a[(1, 1)] = 3.0;

        let mut lu = DenseLu::default();
        lu.factor(&a);

        // 2x + y = 5, x + 3y = 10  =>  x = 1, y = 3.
        let mut out = [0.0; 2];
        assert!(lu.solve(&[5.0, 10.0], &mut out));
        assert!((out[0] - 1.0).abs() < 1e-12);
        assert!((out[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn singular_matrix_is_detected() {
        let mut a = Mat::<f64>::zeros(2, 2);
        a[(0, 0)] = 1.0;
        a[(0, 1)] = 1.0;
        a[(1, 0)] = 1.0;
        a[(1, 1)] = 1.0;

        let mut lu = DenseLu::default();
        lu.factor(&a);

        let mut out = [0.0; 2];
        assert!(!lu.solve(&[1.0, 2.0], &mut out));
    }
}
