/////////////////////////////////////////////////////////////////////////////////////////////
//
// Describes the full quadratic polynomial block and evaluates it and its gradient.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::error::{BasisError, BasisResult, ensure_dimension};
use faer::{Mat, MatRef, unzip, zip};

/// A non-constant monomial of the quadratic block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolynomialTerm {
    /// `x_d`
    Linear(usize),

    /// `x_a x_b` with `a != b`
    Mixed(usize, usize),

    /// `x_d²`
    Quadratic(usize),
}

/// Column layout of the full quadratic polynomial block.
///
/// Columns are ordered constant, linear, mixed, quadratic:
///
/// - 2D: `[1, x, y, xy, x², y²]`
/// - 3D: `[1, x, y, z, xy, yz, zx, x², y², z²]`
///
/// Mixed term `m` multiplies axes `(m, (m + 1) % dim)`. The weak-form constraint
/// rows use the same order with the constant dropped, so row `i` of the moment
/// matrix pairs with polynomial column `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadraticLayout {
    dim: usize,
}

impl QuadraticLayout {
    pub fn new(dim: usize) -> BasisResult<Self> {
        ensure_dimension(dim)?;
        Ok(Self { dim })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of mixed terms, `dim·(dim−1)/2`.
    #[inline]
    pub fn num_mixed(&self) -> usize {
        self.dim * (self.dim - 1) / 2
    }

    /// Number of polynomial columns including the constant.
    #[inline]
    pub fn size(&self) -> usize {
        1 + 2 * self.dim + self.num_mixed()
    }

    /// Number of weak-form constraints (5 in 2D, 9 in 3D).
    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.size() - 1
    }

    #[inline]
    pub fn constant(&self) -> usize {
        0
    }

    #[inline]
    pub fn linear(&self, axis: usize) -> usize {
        1 + axis
    }

    #[inline]
    pub fn mixed(&self, m: usize) -> usize {
        1 + self.dim + m
    }

    #[inline]
    pub fn quadratic(&self, axis: usize) -> usize {
        1 + self.dim + self.num_mixed() + axis
    }

    /// Axes multiplied by mixed term `m`.
    #[inline]
    pub fn mixed_pair(&self, m: usize) -> (usize, usize) {
        (m, (m + 1) % self.dim)
    }

    /// Mixed term multiplying axes `a` and `b` in either order.
    pub fn mixed_index(&self, a: usize, b: usize) -> Option<usize> {
        (0..self.num_mixed()).find(|&m| {
            let (p, q) = self.mixed_pair(m);
            (p == a && q == b) || (p == b && q == a)
        })
    }

    /// Non-constant terms in column order. Term `i` sits in polynomial column
    /// `i + 1` and owns weak-form constraint row `i`.
    pub fn terms(&self) -> Vec<PolynomialTerm> {
        let linear = (0..self.dim).map(PolynomialTerm::Linear);
        let mixed = (0..self.num_mixed()).map(|m| {
            let (a, b) = self.mixed_pair(m);
            PolynomialTerm::Mixed(a, b)
        });
        let quadratic = (0..self.dim).map(PolynomialTerm::Quadratic);

        linear.chain(mixed).chain(quadratic).collect()
    }

    /// Checks `axis` against the spatial dimension.
    pub(crate) fn check_axis(&self, axis: usize) -> BasisResult<()> {
        match axis < self.dim {
            true => Ok(()),
            false => Err(BasisError::IndexOutOfRange {
                index: axis,
                len: self.dim,
            }),
        }
    }

    /// Evaluates the polynomial block at each row of `points`.
    ///
    /// # Examples
    ///
    /// ```
    /// use faer::mat;
    /// use meshfree_basis::polynomials::QuadraticLayout;
    ///
    /// let layout = QuadraticLayout::new(2).unwrap();
    /// let monomials = layout.evaluate_monomials(mat![[2.0, 3.0]].as_ref());
    ///
    /// assert_eq!(monomials, mat![[1.0, 2.0, 3.0, 6.0, 4.0, 9.0]]);
    /// ```
    pub fn evaluate_monomials(&self, points: MatRef<f64>) -> Mat<f64> {
        let (n, d) = points.shape();
        debug_assert_eq!(d, self.dim);
        let mut monomials = Mat::<f64>::zeros(n, self.size());

        monomials.col_mut(self.constant()).fill(1.0);

        monomials
            .subcols_mut(self.linear(0), d)
            .copy_from(points);

        for m in 0..self.num_mixed() {
            let (a, b) = self.mixed_pair(m);
            let (xa, xb) = (points.col(a), points.col(b));
            let mut dst = monomials.col_mut(self.mixed(m));
            zip!(&mut dst, &xa, &xb).for_each(|unzip!(dst, xa, xb)| {
                *dst = xa * xb;
            });
        }

        for axis in 0..d {
            let x = points.col(axis);
            let mut dst = monomials.col_mut(self.quadratic(axis));
            zip!(&mut dst, &x).for_each(|unzip!(dst, x)| {
                *dst = x * x;
            });
        }

        monomials
    }

    /// Evaluates the derivative of the polynomial block along `axis`.
    pub fn evaluate_gradient(&self, points: MatRef<f64>, axis: usize) -> Mat<f64> {
        let n = points.nrows();
        let mut gradient = Mat::<f64>::zeros(n, self.size());

        gradient.col_mut(self.linear(axis)).fill(1.0);

        for m in 0..self.num_mixed() {
            let (a, b) = self.mixed_pair(m);
            let other = match axis {
                _ if axis == a => b,
                _ if axis == b => a,
                _ => continue,
            };
            gradient.col_mut(self.mixed(m)).copy_from(points.col(other));
        }

        let x = points.col(axis);
        let mut dst = gradient.col_mut(self.quadratic(axis));
        zip!(&mut dst, &x).for_each(|unzip!(dst, x)| {
            *dst = 2.0 * x;
        });

        gradient
    }
}
