/////////////////////////////////////////////////////////////////////////////////////////////
//
// Dense solvers for the symmetric normal equations and the rank-checked moment matrix.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Small dense solvers used while fitting an element basis.
//!
//! Normal-equation systems are factorized with Cholesky (`LLᵀ`). If that fails
//! (the Gram matrix is numerically indefinite) the solve falls back to a pivoted
//! Bunch-Kaufman `LBLᵀ` factorization and the result is flagged as ill-conditioned.

use crate::error::{BasisError, BasisResult};
use faer::{
    Mat, MatRef, Side,
    linalg::solvers::{Lblt, Llt, Solve},
};

/// Numerical quality of a least-squares solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conditioning {
    /// Cholesky factorization of the normal equations succeeded.
    #[default]
    WellConditioned,

    /// Cholesky failed and a pivoted indefinite factorization was used instead.
    IllConditioned,
}

impl Conditioning {
    #[inline]
    pub fn is_ill_conditioned(&self) -> bool {
        matches!(self, Conditioning::IllConditioned)
    }

    /// The worse of two conditionings.
    #[inline]
    pub(crate) fn worst(self, other: Conditioning) -> Conditioning {
        match (self, other) {
            (Conditioning::WellConditioned, Conditioning::WellConditioned) => {
                Conditioning::WellConditioned
            }
            _ => Conditioning::IllConditioned,
        }
    }
}

/// Factorization of a symmetric matrix: `LLᵀ` when it succeeds, `LBLᵀ` otherwise.
pub enum SymmetricSolver {
    Llt(Llt<f64>),
    Lblt(Lblt<f64>),
}

impl SymmetricSolver {
    /// Factorizes the symmetric matrix `a`, reading only the `side` triangle.
    pub fn new(a: MatRef<'_, f64>, side: Side) -> Self {
        match a.llt(side) {
            Ok(llt) => SymmetricSolver::Llt(llt),
            Err(_) => SymmetricSolver::Lblt(a.lblt(side)),
        }
    }

    pub fn conditioning(&self) -> Conditioning {
        match self {
            SymmetricSolver::Llt(_) => Conditioning::WellConditioned,
            SymmetricSolver::Lblt(_) => Conditioning::IllConditioned,
        }
    }

    pub fn solve(&self, rhs: &Mat<f64>) -> Mat<f64> {
        match self {
            SymmetricSolver::Llt(s) => s.solve(rhs),
            SymmetricSolver::Lblt(s) => s.solve(rhs),
        }
    }
}

/// Solves `(AᵀA) X = Aᵀ B` for the least-squares coefficients `X`.
pub fn solve_normal_equations(a: MatRef<'_, f64>, b: MatRef<'_, f64>) -> (Mat<f64>, Conditioning) {
    let gram = a.transpose() * a;
    let projected = a.transpose() * b;

    let solver = SymmetricSolver::new(gram.as_ref(), Side::Lower);
    let x = solver.solve(&projected);

    (x, solver.conditioning())
}

/// Numerical rank of `a`: the number of pivoted `R` diagonal entries of a
/// column-pivoted QR above `tol * |R_00|`.
pub fn numerical_rank(a: MatRef<'_, f64>, tol: f64) -> usize {
    if a.nrows() == 0 || a.ncols() == 0 {
        return 0;
    }

    let qr = a.col_piv_qr();
    let r = qr.thin_R();

    let thresh = tol * r.get(0, 0).abs();

    r.diagonal()
        .column_vector()
        .iter()
        .filter(|val| val.abs() > thresh)
        .count()
}

/// Solves the square system `M X = B`, failing with
/// [`BasisError::DegenerateElement`] if `M` is rank deficient at `tol`.
pub fn solve_full_rank(m: MatRef<'_, f64>, b: MatRef<'_, f64>, tol: f64) -> BasisResult<Mat<f64>> {
    let size = m.nrows();
    let rank = numerical_rank(m, tol);

    if rank < size {
        return Err(BasisError::DegenerateElement { rank, size });
    }

    let lu = m.full_piv_lu();
    Ok(lu.solve(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use faer::{mat, utils::approx::*};

    /// Deterministic SPD matrix: A = M M^T + alpha I.
    fn make_spd(n: usize, alpha: f64) -> Mat<f64> {
        let m = Mat::<f64>::from_fn(n, n, |i, j| {
            let x = (i as f64 + 1.0) * (j as f64 + 2.0);
            (x.sin() + 2.0 * x.cos()) / (1.0 + (i + j + 1) as f64)
        });
        let mut a = &m * m.transpose();
        for i in 0..n {
            a[(i, i)] += alpha;
        }
        a
    }

    #[test]
    fn spd_uses_cholesky() {
        let n = 6usize;
        let a = make_spd(n, 1e-2);
        let b = Mat::<f64>::from_fn(n, 2, |i, j| (i + 1 + 3 * j) as f64 / (1.0 + i as f64));

        let solver = SymmetricSolver::new(a.as_ref(), Side::Lower);
        assert!(solver.conditioning() == Conditioning::WellConditioned);

        let x = solver.solve(&b);

        let approx_eq = CwiseMat(ApproxEq::eps() * 1e4 * (n as f64));
        assert!(&a * &x ~ b);
    }

    #[test]
    fn indefinite_falls_back_to_lblt() {
        let a = mat![[0.0, 2.0], [2.0, 0.0]];
        let b = mat![[4.0], [6.0]];

        let solver = SymmetricSolver::new(a.as_ref(), Side::Lower);
        assert!(solver.conditioning().is_ill_conditioned());

        let x = solver.solve(&b);

        let approx_eq = CwiseMat(ApproxEq::eps() * 16.0);
        assert!(&x ~ mat![[3.0], [2.0]]);
    }

    #[test]
    fn normal_equations_match_exact_fit() {
        // Consistent overdetermined system: y = 1 + 2x.
        let a = mat![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0], [1.0, 3.0]];
        let b = mat![[1.0], [3.0], [5.0], [7.0]];

        let (x, conditioning) = solve_normal_equations(a.as_ref(), b.as_ref());

        assert!(conditioning == Conditioning::WellConditioned);
        let approx_eq = CwiseMat(ApproxEq::eps() * 256.0);
        assert!(&x ~ mat![[1.0], [2.0]]);
    }

    #[test]
    fn rank_of_singular_matrix() {
        let m = mat![[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]];
        assert!(numerical_rank(m.as_ref(), 1e-10) == 2);
        assert!(numerical_rank(make_spd(5, 1.0).as_ref(), 1e-10) == 5);
        assert!(numerical_rank(Mat::<f64>::zeros(3, 3).as_ref(), 1e-10) == 0);
    }

    #[test]
    fn full_rank_solve_rejects_degenerate_matrix() {
        let m = mat![[1.0, 1.0], [1.0, 1.0]];
        let b = mat![[1.0], [1.0]];

        assert_eq!(
            solve_full_rank(m.as_ref(), b.as_ref(), 1e-10).unwrap_err(),
            BasisError::DegenerateElement { rank: 1, size: 2 }
        );

        let m = mat![[2.0, 1.0], [1.0, 3.0]];
        let b = mat![[3.0], [4.0]];
        let x = solve_full_rank(m.as_ref(), b.as_ref(), 1e-10).unwrap();

        let approx_eq = CwiseMat(ApproxEq::eps() * 16.0);
        assert!(&x ~ mat![[1.0], [1.0]]);
    }

    #[test]
    fn worst_conditioning() {
        let well = Conditioning::WellConditioned;
        let ill = Conditioning::IllConditioned;
        assert!(well.worst(well) == well);
        assert!(well.worst(ill) == ill);
        assert!(ill.worst(well) == ill);
    }
}
