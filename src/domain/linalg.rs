//! Dense linear solves for the small first-order-condition systems of the
//! horizontal models, plus the boundary-face search that keeps quantities
//! non-negative.

use crate::domain::error::FdiError;
use tracing::trace;

/// Pivot magnitude below which a system is treated as singular.
const PIVOT_EPSILON: f64 = 1e-12;

/// Slack allowed when checking a candidate against `row · x >= 0`.
const FEASIBILITY_EPSILON: f64 = 1e-9;

/// Solve `matrix * x = rhs` by Gaussian elimination with partial pivoting.
pub fn solve(matrix: &[Vec<f64>], rhs: &[f64]) -> Result<Vec<f64>, FdiError> {
    let n = rhs.len();
    if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
        return Err(FdiError::SingularSystem { size: n });
    }

    let mut aug: Vec<Vec<f64>> = matrix
        .iter()
        .zip(rhs)
        .map(|(row, &b)| {
            let mut r = row.clone();
            r.push(b);
            r
        })
        .collect();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| aug[i][col].abs().total_cmp(&aug[j][col].abs()))
            .ok_or(FdiError::SingularSystem { size: n })?;
        if aug[pivot][col].abs() < PIVOT_EPSILON {
            return Err(FdiError::SingularSystem { size: n });
        }
        aug.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = aug[row][col] / aug[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..=n {
                aug[row][k] -= factor * aug[col][k];
            }
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| aug[row][k] * x[k]).sum();
        x[row] = (aug[row][n] - tail) / aug[row][row];
    }
    Ok(x)
}

/// `matrix * x - rhs`, used to check first-order conditions.
pub fn residuals(matrix: &[Vec<f64>], x: &[f64], rhs: &[f64]) -> Vec<f64> {
    matrix
        .iter()
        .zip(rhs)
        .map(|(row, b)| row.iter().zip(x).map(|(m, v)| m * v).sum::<f64>() - b)
        .collect()
}

/// Concave quadratic objective `g·x - ½ xᵀHx` over `{ x : row·x >= 0 }`.
///
/// `hessian` must be symmetric positive definite, so the objective has a
/// single maximizer on every face of the feasible cone.
#[derive(Debug, Clone)]
pub struct ConcaveQuadratic {
    pub gradient: Vec<f64>,
    pub hessian: Vec<Vec<f64>>,
    pub constraints: Vec<Vec<f64>>,
}

impl ConcaveQuadratic {
    pub fn value(&self, x: &[f64]) -> f64 {
        let linear: f64 = self.gradient.iter().zip(x).map(|(g, v)| g * v).sum();
        let quad: f64 = self
            .hessian
            .iter()
            .zip(x)
            .map(|(row, xi)| xi * row.iter().zip(x).map(|(h, xj)| h * xj).sum::<f64>())
            .sum();
        linear - 0.5 * quad
    }

    fn is_feasible(&self, x: &[f64]) -> bool {
        self.constraints
            .iter()
            .all(|row| row.iter().zip(x).map(|(c, v)| c * v).sum::<f64>() >= -FEASIBILITY_EPSILON)
    }

    /// Stationary point of the objective with the constraints in `active` held at equality.
    fn stationary_on_face(&self, active: &[usize]) -> Result<Vec<f64>, FdiError> {
        let n = self.gradient.len();
        let size = n + active.len();
        let mut kkt = vec![vec![0.0; size]; size];
        let mut rhs = vec![0.0; size];

        for i in 0..n {
            kkt[i][..n].copy_from_slice(&self.hessian[i]);
            rhs[i] = self.gradient[i];
        }
        for (m, &c) in active.iter().enumerate() {
            for i in 0..n {
                kkt[i][n + m] = -self.constraints[c][i];
                kkt[n + m][i] = self.constraints[c][i];
            }
        }

        let mut solution = solve(&kkt, &rhs)?;
        solution.truncate(n);
        Ok(solution)
    }

    /// Maximize over the feasible cone by checking every face.
    ///
    /// Returns the maximizer and the indices of the constraints binding at it.
    pub fn maximize(&self) -> Result<(Vec<f64>, Vec<usize>), FdiError> {
        let m = self.constraints.len();
        let mut best: Option<(f64, Vec<f64>, Vec<usize>)> = None;

        for mask in 0u32..(1 << m) {
            let active: Vec<usize> = (0..m).filter(|c| mask & (1 << c) != 0).collect();
            let x = match self.stationary_on_face(&active) {
                Ok(x) => x,
                // Dependent constraint rows; the same point is reached from a smaller face.
                Err(FdiError::SingularSystem { .. }) if !active.is_empty() => continue,
                Err(e) => return Err(e),
            };
            if !self.is_feasible(&x) {
                continue;
            }
            let value = self.value(&x);
            trace!(?active, ?x, value, "feasible face candidate");
            if best.as_ref().is_none_or(|(v, _, _)| value > *v) {
                best = Some((value, x, active));
            }
        }

        best.map(|(_, x, active)| (x, active))
            .ok_or(FdiError::SingularSystem {
                size: self.gradient.len(),
            })
    }
}
