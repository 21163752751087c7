use faer::Mat;

use crate::{Control, IterationStats, Options, Report, Status, linalg::DenseLu};

/// How many consecutive tiny steps before the iteration counts as settled.
const SLOW_STEP_LIMIT: usize = 3;

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// The damped Gauss-Newton loop.
///
/// Each iteration builds a forward-difference Jacobian J, solves the
/// regularized normal equations (JᵀJ + µI) d = -JᵀF for the step, and
/// backtracks along d until the residual norm improves. Every residual
/// evaluation, including the n spent on the Jacobian, is counted against
/// `opts.max_fev`.
pub(crate) fn iterate<F, Cb>(f: &mut F, x: &mut [f64], opts: Options, on_iter: &mut Cb) -> Report
where
    F: FnMut(&[f64], &mut [f64]),
    Cb: FnMut(&IterationStats) -> Control,
{
    let n = x.len();
    if n == 0 {
        return Report {
            status: Status::Converged,
            evaluations: 0,
            iterations: 0,
            residual_norm: 0.0,
        };
    }

    let fd_step = f64::EPSILON.sqrt();

    let mut fx = vec![0.0; n];
    let mut f_trial = vec![0.0; n];
    let mut x_trial = vec![0.0; n];
    let mut dx = vec![0.0; n];
    let mut rhs = vec![0.0; n];
    let mut jac = Mat::<f64>::zeros(n, n);
    let mut normal = Mat::<f64>::zeros(n, n);
    let mut lu = DenseLu::default();

    let mut evaluations = 0_usize;
    let mut iterations = 0_usize;
    let mut slow_steps = 0_usize;

    f(x, &mut fx);
    evaluations += 1;

    loop {
        let res = norm(&fx);
        if !res.is_finite() {
            return Report {
                status: Status::NonFiniteResidual,
                evaluations,
                iterations,
                residual_norm: res,
            };
        }
        let stats = IterationStats {
            iteration: iterations,
            residual: res,
        };
        if on_iter(&stats) == Control::Cancel {
            return Report {
                status: Status::Cancelled,
                evaluations,
                iterations,
                residual_norm: res,
            };
        }
        if res <= opts.res_tol {
            return Report {
                status: Status::Converged,
                evaluations,
                iterations,
                residual_norm: res,
            };
        }
        if evaluations + n > opts.max_fev {
            return Report {
                status: Status::MaxEvaluationsReached,
                evaluations,
                iterations,
                residual_norm: res,
            };
        }

        // Forward-difference Jacobian, one column per variable.
        // Step size per MINPACK: sqrt(machine eps) scaled by the variable.
        for j in 0..n {
            let xj = x[j];
            let h = fd_step * xj.abs().max(1.0);
            x[j] = xj + h;
            f(x, &mut f_trial);
            evaluations += 1;
            x[j] = xj;
            for i in 0..n {
                jac[(i, j)] = (f_trial[i] - fx[i]) / h;
            }
        }

        // Normal equations JᵀJ d = -JᵀF with a Tikhonov term on the diagonal
        // so that redundant equations don't make the factorization blow up.
        let mut max_diag: f64 = 0.0;
        for c in 0..n {
            for r in 0..n {
                let mut acc = 0.0;
                for k in 0..n {
                    acc += jac[(k, r)] * jac[(k, c)];
                }
                normal[(r, c)] = acc;
            }
            max_diag = max_diag.max(normal[(c, c)]);
        }
        let mu = opts.regularization * max_diag.max(1.0);
        for c in 0..n {
            normal[(c, c)] += mu;
        }
        for (r, slot) in rhs.iter_mut().enumerate() {
            let mut acc = 0.0;
            for k in 0..n {
                acc += jac[(k, r)] * fx[k];
            }
            *slot = -acc;
        }
        lu.factor(&normal);
        if !lu.solve(&rhs, &mut dx) {
            return Report {
                status: Status::SingularJacobian,
                evaluations,
                iterations,
                residual_norm: res,
            };
        }

        // Backtracking line search on the residual norm.
        let mut alpha = 1.0;
        let mut accepted = false;
        let mut res_trial = res;
        for _ in 0..=opts.ls_max_steps {
            if evaluations >= opts.max_fev {
                return Report {
                    status: Status::MaxEvaluationsReached,
                    evaluations,
                    iterations,
                    residual_norm: res,
                };
            }
            for i in 0..n {
                x_trial[i] = x[i] + alpha * dx[i];
            }
            f(&x_trial, &mut f_trial);
            evaluations += 1;
            res_trial = norm(&f_trial);
            if res_trial.is_finite() && res_trial < res {
                accepted = true;
                break;
            }
            alpha *= opts.ls_backtrack;
        }
        if !accepted {
            return Report {
                status: Status::NoProgress,
                evaluations,
                iterations,
                residual_norm: res,
            };
        }

        let step = alpha * norm(&dx);
        x.copy_from_slice(&x_trial);
        std::mem::swap(&mut fx, &mut f_trial);
        iterations += 1;

        // MINPACK-style x tolerance: a run of tiny accepted steps means the
        // iteration has settled. Whether that is success depends on how
        // small the residual is by then.
        if step <= opts.x_tol * (opts.x_tol + norm(x)) {
            slow_steps += 1;
            if slow_steps >= SLOW_STEP_LIMIT {
                let status = if res_trial <= opts.res_accept {
                    Status::Converged
                } else {
                    Status::NoProgress
                };
                return Report {
                    status,
                    evaluations,
                    iterations,
                    residual_norm: res_trial,
                };
            }
        } else {
            slow_steps = 0;
        }
    }
}
