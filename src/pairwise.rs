//! Pairwise comparison matrices and eigenvector priorities.
//!
//! The macro layer has no direct numeric comparison data, only
//! relative-importance judgments on Saaty's 1–9 scale. This module turns a
//! positive reciprocal comparison matrix into:
//! - the principal-eigenvector priority vector, normalized to sum to 1, and
//! - a consistency ratio against Saaty's random-index table.
//!
//! The priority vector comes from power iteration: a positive matrix has a
//! real, simple dominant eigenvalue with a positive eigenvector
//! (Perron–Frobenius), so the iteration converges without damping. λmax for
//! the consistency index is taken from the true spectrum (largest real
//! part), not from the iteration estimate.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Saaty random consistency index, indexed by `n − 1` for `n = 1..=10`.
pub const RANDOM_INDEX: [f64; 10] = [0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49];

/// RI used for matrices larger than the table covers.
pub const RANDOM_INDEX_LARGE_N: f64 = 1.49;

/// Tolerance for the unit diagonal and the reciprocal invariant
/// `M[i][j]·M[j][i] = 1`.
const RECIPROCAL_TOL: f64 = 1e-6;

const POWER_ITERATION_TOL: f64 = 1e-12;
const POWER_ITERATION_MAX: usize = 10_000;

#[derive(Debug, Error, PartialEq)]
pub enum PairwiseError {
    #[error("comparison matrix must have at least one row")]
    Empty,
    #[error("comparison matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("comparison matrix entry ({i},{j}) is not positive and finite: {value}")]
    NonPositiveEntry { i: usize, j: usize, value: f64 },
    #[error("comparison matrix violates reciprocity at ({i},{j}): {product} != 1")]
    NotReciprocal { i: usize, j: usize, product: f64 },
    #[error("diagonal entry ({i},{i}) must be 1, got {value}")]
    NonUnitDiagonal { i: usize, value: f64 },
}

/// A validated positive reciprocal matrix over `n` alternatives for one
/// criterion. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseMatrix {
    values: DMatrix<f64>,
}

impl PairwiseMatrix {
    /// Validate and wrap a comparison matrix.
    ///
    /// Hard failures only for truly invalid input: empty, non-square,
    /// non-positive entries, broken diagonal or reciprocity. High
    /// inconsistency is not rejected here — it shows up in the CR.
    pub fn new(values: DMatrix<f64>) -> Result<Self, PairwiseError> {
        let (rows, cols) = values.shape();
        if rows == 0 {
            return Err(PairwiseError::Empty);
        }
        if rows != cols {
            return Err(PairwiseError::NotSquare { rows, cols });
        }
        for i in 0..rows {
            let diag = values[(i, i)];
            if (diag - 1.0).abs() > RECIPROCAL_TOL {
                return Err(PairwiseError::NonUnitDiagonal { i, value: diag });
            }
            for j in 0..cols {
                let v = values[(i, j)];
                if !v.is_finite() || v <= 0.0 {
                    return Err(PairwiseError::NonPositiveEntry { i, j, value: v });
                }
                if j > i {
                    let product = v * values[(j, i)];
                    if (product - 1.0).abs() > RECIPROCAL_TOL {
                        return Err(PairwiseError::NotReciprocal { i, j, product });
                    }
                }
            }
        }
        Ok(Self { values })
    }

    /// Build from the upper triangle only; the lower triangle and diagonal
    /// are filled in, so reciprocity holds by construction.
    ///
    /// `upper(i, j)` is consulted for every `i < j` and must return the
    /// comparison intensity of alternative `i` over alternative `j`.
    pub fn from_upper_triangle<F>(n: usize, mut upper: F) -> Result<Self, PairwiseError>
    where
        F: FnMut(usize, usize) -> f64,
    {
        if n == 0 {
            return Err(PairwiseError::Empty);
        }
        let mut values = DMatrix::from_element(n, n, 1.0);
        for i in 0..n {
            for j in (i + 1)..n {
                let v = upper(i, j);
                if !v.is_finite() || v <= 0.0 {
                    return Err(PairwiseError::NonPositiveEntry { i, j, value: v });
                }
                values[(i, j)] = v;
                values[(j, i)] = 1.0 / v;
            }
        }
        Ok(Self { values })
    }

    pub fn n(&self) -> usize {
        self.values.nrows()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Row-major copy for report output.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n())
            .map(|i| (0..self.n()).map(|j| self.values[(i, j)]).collect())
            .collect()
    }
}

/// Priority vector and consistency diagnostics for one comparison matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Priorities {
    /// Principal eigenvector, normalized to sum to 1.
    pub vector: Vec<f64>,
    /// Largest real eigenvalue of the matrix.
    pub lambda_max: f64,
    /// Consistency index `(λmax − n)/(n − 1)`; 0 for `n ≤ 1`.
    pub consistency_index: f64,
    /// `CI / RI[n]`. Advisory output: values above 0.1 conventionally flag
    /// inconsistent judgments, but nothing here gates on it — the caller
    /// decides whether to act.
    pub consistency_ratio: f64,
}

/// Derive the priority vector and consistency ratio for a matrix.
pub fn priorities(matrix: &PairwiseMatrix) -> Priorities {
    let n = matrix.n();
    if n == 1 {
        return Priorities {
            vector: vec![1.0],
            lambda_max: 1.0,
            consistency_index: 0.0,
            consistency_ratio: 0.0,
        };
    }

    let vector = principal_eigenvector(matrix.values());
    let lambda_max = largest_real_eigenvalue(matrix.values());

    let consistency_index = (lambda_max - n as f64) / (n as f64 - 1.0);
    // With n ≤ 2 a reciprocal matrix is always consistent; RI is 0 there,
    // so CR is 0 by convention rather than a division by zero.
    let ri = random_index(n);
    let consistency_ratio = if ri > 0.0 { consistency_index / ri } else { 0.0 };

    Priorities {
        vector,
        lambda_max,
        consistency_index,
        consistency_ratio,
    }
}

/// Saaty RI lookup for an `n`-dimensional matrix.
pub fn random_index(n: usize) -> f64 {
    if n == 0 {
        0.0
    } else if n <= RANDOM_INDEX.len() {
        RANDOM_INDEX[n - 1]
    } else {
        RANDOM_INDEX_LARGE_N
    }
}

/// Dominant eigenvector of a positive matrix via power iteration,
/// L1-normalized to sum to 1.
fn principal_eigenvector(m: &DMatrix<f64>) -> Vec<f64> {
    let n = m.nrows();
    let mut v = DVector::from_element(n, 1.0 / n as f64);
    for _ in 0..POWER_ITERATION_MAX {
        let mut next = m * &v;
        let sum: f64 = next.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            break;
        }
        next /= sum;
        let delta: f64 = (0..n).map(|i| (next[i] - v[i]).abs()).sum();
        v = next;
        if delta <= POWER_ITERATION_TOL {
            break;
        }
    }
    v.iter().copied().collect()
}

/// True λmax: the eigenvalue with the largest real part.
///
/// The spectrum of a general real matrix may be complex; taking the largest
/// real part (and, where an eigenvector is involved, its real part) is the
/// defined convention for ill-conditioned inputs, not an error path.
fn largest_real_eigenvalue(m: &DMatrix<f64>) -> f64 {
    m.clone()
        .complex_eigenvalues()
        .iter()
        .map(|e| e.re)
        .fold(f64::NEG_INFINITY, f64::max)
}
