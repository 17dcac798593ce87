//! Epsilon support vector regression with an RBF kernel
//!
//! The dual has `2n` variables (`α` then `α*`) with labels `+1`/`-1`, box
//! `[0, C]` and the constraint `Σ label·z = 0`. It is solved with SMO, picking
//! the maximal violating pair each iteration and clipping the pair update
//! analytically.

use serde::{Deserialize, Serialize};

use super::model::Regressor;
use crate::error::{Error, Result};

/// Curvature floor for degenerate pairs
const TAU: f64 = 1e-12;

/// Coefficients smaller than this are treated as zero
const COEF_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvrParams {
    /// Box constraint on the dual coefficients
    pub c: f64,
    /// Width of the insensitive tube
    pub epsilon: f64,
    /// RBF width; `None` uses `1 / (n_features * var(X))`
    pub gamma: Option<f64>,
    /// KKT violation tolerance
    pub tol: f64,
    /// Iteration cap; `None` scales with the sample count
    pub max_iter: Option<usize>,
}

impl Default for SvrParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.1,
            gamma: None,
            tol: 1e-3,
            max_iter: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Svr {
    params: SvrParams,
    gamma: f64,
    support: Vec<Vec<f64>>,
    /// `α_i - α*_i` for each support vector
    coef: Vec<f64>,
    bias: f64,
}

impl Svr {
    pub fn new(params: SvrParams) -> Self {
        Self {
            params,
            gamma: 1.0,
            support: Vec::new(),
            coef: Vec::new(),
            bias: 0.0,
        }
    }

    pub fn n_support(&self) -> usize {
        self.support.len()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }
}

fn rbf(gamma: f64, a: &[f64], b: &[f64]) -> f64 {
    let dist: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    (-gamma * dist).exp()
}

/// `1 / (n_features * var(X))` over every entry of the matrix, or 1 when X is constant
fn scale_gamma(x: &[Vec<f64>]) -> f64 {
    let width = x.first().map_or(0, |r| r.len());
    let count = (x.len() * width) as f64;
    if count == 0.0 {
        return 1.0;
    }
    let mean = x.iter().flatten().sum::<f64>() / count;
    let var = x.iter().flatten().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
    if var > 0.0 {
        1.0 / (width as f64 * var)
    } else {
        1.0
    }
}

/// Dual solver state over the `2n` variables
struct SmoSolver<'a> {
    kernel: &'a [Vec<f64>],
    n: usize,
    c: f64,
    label: Vec<f64>,
    alpha: Vec<f64>,
    grad: Vec<f64>,
}

impl<'a> SmoSolver<'a> {
    fn new(kernel: &'a [Vec<f64>], y: &[f64], epsilon: f64, c: f64) -> Self {
        let n = y.len();
        let mut label = vec![1.0; 2 * n];
        let mut grad = vec![0.0; 2 * n];
        for i in 0..n {
            grad[i] = epsilon - y[i];
            grad[i + n] = epsilon + y[i];
            label[i + n] = -1.0;
        }
        Self {
            kernel,
            n,
            c,
            label,
            alpha: vec![0.0; 2 * n],
            grad,
        }
    }

    /// Signed kernel entry `label_s * label_t * K`
    fn q(&self, s: usize, t: usize) -> f64 {
        self.label[s] * self.label[t] * self.kernel[s % self.n][t % self.n]
    }

    fn in_up(&self, t: usize) -> bool {
        if self.label[t] > 0.0 {
            self.alpha[t] < self.c
        } else {
            self.alpha[t] > 0.0
        }
    }

    fn in_low(&self, t: usize) -> bool {
        if self.label[t] > 0.0 {
            self.alpha[t] > 0.0
        } else {
            self.alpha[t] < self.c
        }
    }

    /// Maximal violating pair, or `None` once KKT holds within `tol`
    fn select_pair(&self, tol: f64) -> Option<(usize, usize)> {
        let mut g_max = f64::NEG_INFINITY;
        let mut g_min = f64::INFINITY;
        let mut i = None;
        let mut j = None;
        for t in 0..2 * self.n {
            let v = -self.label[t] * self.grad[t];
            if self.in_up(t) && v > g_max {
                g_max = v;
                i = Some(t);
            }
            if self.in_low(t) && v < g_min {
                g_min = v;
                j = Some(t);
            }
        }
        if g_max - g_min < tol {
            return None;
        }
        i.zip(j)
    }

    fn step(&mut self, i: usize, j: usize) {
        let c = self.c;
        let (old_i, old_j) = (self.alpha[i], self.alpha[j]);
        let (qii, qjj, qij) = (self.q(i, i), self.q(j, j), self.q(i, j));

        if self.label[i] != self.label[j] {
            let quad = (qii + qjj + 2.0 * qij).max(TAU);
            let delta = (-self.grad[i] - self.grad[j]) / quad;
            let diff = old_i - old_j;
            let mut ai = old_i + delta;
            let mut aj = old_j + delta;
            if diff > 0.0 {
                if aj < 0.0 {
                    aj = 0.0;
                    ai = diff;
                }
            } else if ai < 0.0 {
                ai = 0.0;
                aj = -diff;
            }
            if diff > 0.0 {
                if ai > c {
                    ai = c;
                    aj = c - diff;
                }
            } else if aj > c {
                aj = c;
                ai = c + diff;
            }
            self.alpha[i] = ai;
            self.alpha[j] = aj;
        } else {
            let quad = (qii + qjj - 2.0 * qij).max(TAU);
            let delta = (self.grad[i] - self.grad[j]) / quad;
            let sum = old_i + old_j;
            let mut ai = old_i - delta;
            let mut aj = old_j + delta;
            if sum > c {
                if ai > c {
                    ai = c;
                    aj = sum - c;
                }
            } else if aj < 0.0 {
                aj = 0.0;
                ai = sum;
            }
            if sum > c {
                if aj > c {
                    aj = c;
                    ai = sum - c;
                }
            } else if ai < 0.0 {
                ai = 0.0;
                aj = sum;
            }
            self.alpha[i] = ai;
            self.alpha[j] = aj;
        }

        let d_i = self.alpha[i] - old_i;
        let d_j = self.alpha[j] - old_j;
        for t in 0..2 * self.n {
            self.grad[t] += self.q(i, t) * d_i + self.q(j, t) * d_j;
        }
    }

    /// Decision offset `ρ` (the model predicts `Σ coef·K - ρ`)
    fn rho(&self) -> f64 {
        let mut upper = f64::INFINITY;
        let mut lower = f64::NEG_INFINITY;
        let mut free_sum = 0.0;
        let mut free_count = 0usize;
        for t in 0..2 * self.n {
            let yg = self.label[t] * self.grad[t];
            let at_upper = self.alpha[t] >= self.c;
            let at_lower = self.alpha[t] <= 0.0;
            if at_upper {
                if self.label[t] < 0.0 {
                    upper = upper.min(yg);
                } else {
                    lower = lower.max(yg);
                }
            } else if at_lower {
                if self.label[t] > 0.0 {
                    upper = upper.min(yg);
                } else {
                    lower = lower.max(yg);
                }
            } else {
                free_count += 1;
                free_sum += yg;
            }
        }
        if free_count > 0 {
            free_sum / free_count as f64
        } else {
            0.5 * (upper + lower)
        }
    }

    fn coefficients(&self) -> Vec<f64> {
        (0..self.n)
            .map(|i| self.alpha[i] - self.alpha[i + self.n])
            .collect()
    }
}

impl Regressor for Svr {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        let n = x.len();
        if n == 0 || n != y.len() {
            return Err(Error::Fitting(format!(
                "SVR needs matching non-empty inputs (rows: {}, targets: {})",
                n,
                y.len()
            )));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(Error::Fitting("non-finite target value".to_string()));
        }
        let SvrParams {
            c,
            epsilon,
            tol,
            max_iter,
            ..
        } = self.params;
        if c.is_nan() || c <= 0.0 || epsilon.is_nan() || epsilon < 0.0 {
            return Err(Error::Fitting(
                "C must be positive and epsilon non-negative".to_string(),
            ));
        }

        let gamma = self.params.gamma.unwrap_or_else(|| scale_gamma(x));
        let kernel: Vec<Vec<f64>> = x
            .iter()
            .map(|a| x.iter().map(|b| rbf(gamma, a, b)).collect())
            .collect();

        let mut solver = SmoSolver::new(&kernel, y, epsilon, c);
        let max_iter = max_iter.unwrap_or_else(|| (100 * n).max(10_000));
        let mut iterations = 0;
        while iterations < max_iter {
            match solver.select_pair(tol) {
                Some((i, j)) => solver.step(i, j),
                None => break,
            }
            iterations += 1;
        }
        if iterations == max_iter {
            tracing::debug!(iterations, "SVR solver hit the iteration cap");
        }

        let bias = -solver.rho();
        if !bias.is_finite() {
            return Err(Error::Fitting("SVR solver diverged".to_string()));
        }

        let (support, coef): (Vec<Vec<f64>>, Vec<f64>) = x
            .iter()
            .zip(solver.coefficients())
            .filter(|(_, b)| b.abs() > COEF_EPS)
            .map(|(row, b)| (row.clone(), b))
            .unzip();

        self.gamma = gamma;
        self.support = support;
        self.coef = coef;
        self.bias = bias;
        Ok(())
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        self.support
            .iter()
            .zip(&self.coef)
            .map(|(sv, b)| b * rbf(self.gamma, sv, row))
            .sum::<f64>()
            + self.bias
    }
}
