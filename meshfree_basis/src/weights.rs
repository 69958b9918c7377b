/////////////////////////////////////////////////////////////////////////////////////////////
//
// Solves for the kernel and polynomial weights of an element basis and stores them.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    constraints::NullSpaceMap,
    error::{BasisResult, ensure_len},
    linalg::{self, Conditioning},
    polynomials::QuadraticLayout,
};
use faer::{ColRef, Mat, MatRef};

/// Fitted weights of every basis on an element, one column per basis.
///
/// Each column holds the `K` kernel weights followed by the polynomial
/// coefficients in [`QuadraticLayout`] order (constant, linear, mixed, quadratic).
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    weights: Mat<f64>,
    num_kernels: usize,
    layout: QuadraticLayout,
}

impl WeightMatrix {
    pub(crate) fn new(weights: Mat<f64>, num_kernels: usize, layout: QuadraticLayout) -> Self {
        debug_assert_eq!(weights.nrows(), num_kernels + layout.size());
        Self {
            weights,
            num_kernels,
            layout,
        }
    }

    #[inline]
    pub fn as_mat(&self) -> MatRef<'_, f64> {
        self.weights.as_ref()
    }

    #[inline]
    pub fn num_bases(&self) -> usize {
        self.weights.ncols()
    }

    #[inline]
    pub fn num_kernels(&self) -> usize {
        self.num_kernels
    }

    #[inline]
    pub fn layout(&self) -> QuadraticLayout {
        self.layout
    }

    /// Weight of kernel `k` in basis `basis`.
    #[inline]
    pub fn kernel_weight(&self, k: usize, basis: usize) -> f64 {
        self.weights[(k, basis)]
    }

    /// All kernel weights of basis `basis`.
    pub fn kernel_weights(&self, basis: usize) -> ColRef<'_, f64> {
        self.weights.col(basis).subrows(0, self.num_kernels)
    }

    /// Polynomial coefficients of basis `basis`.
    pub fn polynomial(&self, basis: usize) -> ColRef<'_, f64> {
        self.weights
            .col(basis)
            .subrows(self.num_kernels, self.layout.size())
    }

    #[inline]
    pub fn constant(&self, basis: usize) -> f64 {
        self.poly(self.layout.constant(), basis)
    }

    #[inline]
    pub fn linear(&self, axis: usize, basis: usize) -> f64 {
        self.poly(self.layout.linear(axis), basis)
    }

    /// Coefficient of mixed term `m`, see [`QuadraticLayout::mixed_pair`].
    #[inline]
    pub fn mixed(&self, m: usize, basis: usize) -> f64 {
        self.poly(self.layout.mixed(m), basis)
    }

    #[inline]
    pub fn quadratic(&self, axis: usize, basis: usize) -> f64 {
        self.poly(self.layout.quadratic(axis), basis)
    }

    #[inline]
    fn poly(&self, column: usize, basis: usize) -> f64 {
        self.weights[(self.num_kernels + column, basis)]
    }
}

/// Least-squares fit of the weights against the sample targets.
///
/// `a` is the kernel matrix at the samples and `rhs` holds one column of targets
/// per basis. Neither is modified.
pub struct WeightSolver<'a> {
    a: MatRef<'a, f64>,
    rhs: MatRef<'a, f64>,
}

impl<'a> WeightSolver<'a> {
    pub fn new(a: MatRef<'a, f64>, rhs: MatRef<'a, f64>) -> BasisResult<Self> {
        ensure_len("rhs rows", a.nrows(), rhs.nrows())?;
        Ok(Self { a, rhs })
    }

    /// Solves `(AᵀA) w = Aᵀ rhs`.
    pub fn unconstrained(&self) -> (Mat<f64>, Conditioning) {
        linalg::solve_normal_equations(self.a, self.rhs)
    }

    /// Solves over the affine set `w = L v + t`:
    /// `(LᵀAᵀA L) v = Lᵀ Aᵀ (rhs − A t)`.
    pub fn constrained(&self, map: &NullSpaceMap) -> BasisResult<(Mat<f64>, Conditioning)> {
        ensure_len("null-space map rows", self.a.ncols(), map.l.nrows())?;
        ensure_len("constraint targets", self.rhs.ncols(), map.t.ncols())?;

        let b = self.rhs - self.a * &map.t;
        let al = self.a * &map.l;

        let (v, conditioning) = linalg::solve_normal_equations(al.as_ref(), b.as_ref());
        let w = &map.t + &map.l * &v;

        Ok((w, conditioning))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use faer::utils::approx::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn random_mat(rng: &mut StdRng, nrows: usize, ncols: usize) -> Mat<f64> {
        Mat::from_fn(nrows, ncols, |_, _| rng.random_range(-1.0..1.0))
    }

    #[test]
    fn unconstrained_recovers_consistent_weights() {
        let mut rng = StdRng::seed_from_u64(11);
        let a = random_mat(&mut rng, 20, 6);
        let x = random_mat(&mut rng, 6, 3);
        let rhs = &a * &x;

        let solver = WeightSolver::new(a.as_ref(), rhs.as_ref()).unwrap();
        let (w, conditioning) = solver.unconstrained();

        assert!(conditioning == Conditioning::WellConditioned);
        let approx_eq = CwiseMat(ApproxEq::eps() * 1e5);
        assert!(&w ~ &x);
    }

    #[test]
    fn constrained_stays_on_affine_set() {
        let mut rng = StdRng::seed_from_u64(12);
        let a = random_mat(&mut rng, 20, 6);
        let map = NullSpaceMap {
            l: random_mat(&mut rng, 6, 3),
            t: random_mat(&mut rng, 6, 2),
        };

        // Targets reachable on the affine set give back the generating parameters.
        let v = random_mat(&mut rng, 3, 2);
        let expected = &map.t + &map.l * &v;
        let rhs = &a * &expected;

        let solver = WeightSolver::new(a.as_ref(), rhs.as_ref()).unwrap();
        let (w, _) = solver.constrained(&map).unwrap();

        let approx_eq = CwiseMat(ApproxEq::eps() * 1e6);
        assert!(&w ~ &expected);

        // rhs is read-only.
        assert!(rhs == &a * &expected);
    }

    #[test]
    fn rejects_mismatched_rhs() {
        let a = Mat::<f64>::zeros(4, 2);
        let rhs = Mat::<f64>::zeros(3, 1);
        assert!(WeightSolver::new(a.as_ref(), rhs.as_ref()).is_err());
    }

    #[test]
    fn accessors_follow_layout() {
        let layout = QuadraticLayout::new(3).unwrap();
        let k = 2;
        let weights = Mat::from_fn(k + layout.size(), 2, |i, j| (10 * j + i) as f64);
        let wm = WeightMatrix::new(weights, k, layout);

        assert!(wm.num_bases() == 2);
        assert!(wm.kernel_weight(1, 1) == 11.0);
        assert!(wm.constant(0) == 2.0);
        assert!(wm.linear(2, 0) == 5.0);
        assert!(wm.mixed(2, 1) == 18.0);
        assert!(wm.quadratic(0, 1) == 19.0);
        assert!(wm.kernel_weights(0).nrows() == 2);
        assert!(wm.polynomial(1)[9] == 21.0);
    }
}
