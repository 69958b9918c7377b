/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides reference quadrature rules and point sets for validating element bases.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Reference elements (axis-aligned boxes) with tensor Gauss-Legendre rules and
//! uniform point sets, for validating and demonstrating element bases.
//!
//! # References
//! 1. Press, W. H. et al. (2007). Numerical Recipes, 3rd ed., §4.6 Gaussian Quadratures.
use crate::{
    error::{BasisResult, ensure_dimension, ensure_len},
    quadrature::Quadrature,
};
use faer::Mat;
use std::f64::consts::PI;

/// Struct that implements quadrature rules and point sets on axis-aligned boxes.
pub struct ReferenceElements;

impl ReferenceElements {
    /// Nodes and weights of the `n`-point Gauss-Legendre rule on `[-1, 1]`.
    ///
    /// The rule integrates polynomials of degree `2n - 1` exactly.
    pub fn gauss_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
        let mut nodes = Vec::with_capacity(n);
        let mut weights = Vec::with_capacity(n);

        for i in 0..n {
            // Tricomi's initial guess, refined by Newton iteration on P_n.
            let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();

            for _ in 0..100 {
                let (p, dp) = legendre(n, x);
                let dx = p / dp;
                x -= dx;
                if dx.abs() < 1e-15 {
                    break;
                }
            }

            let (_, dp) = legendre(n, x);
            nodes.push(x);
            weights.push(2.0 / ((1.0 - x * x) * dp * dp));
        }

        (nodes, weights)
    }

    /// Tensor-product Gauss-Legendre rule with `order` points per axis on the box
    /// `[lower, upper]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use meshfree_basis::ReferenceElements;
    ///
    /// let q = ReferenceElements::box_quadrature(&[0.0, 0.0], &[2.0, 1.0], 3).unwrap();
    ///
    /// assert_eq!(q.len(), 9);
    /// assert!((q.total_weight() - 2.0).abs() < 1e-14);
    /// ```
    pub fn box_quadrature(lower: &[f64], upper: &[f64], order: usize) -> BasisResult<Quadrature> {
        ensure_dimension(lower.len())?;
        ensure_len("box upper corner", lower.len(), upper.len())?;

        let dim = lower.len();
        let (nodes, node_weights) = Self::gauss_legendre(order);
        let num_points = order.pow(dim as u32);

        let mut points = Mat::<f64>::zeros(num_points, dim);
        let mut weights = vec![1.0; num_points];

        for idx in 0..num_points {
            let mut rem = idx;
            for d in 0..dim {
                let k = rem % order;
                rem /= order;

                let half = 0.5 * (upper[d] - lower[d]);
                points[(idx, d)] = lower[d] + half * (nodes[k] + 1.0);
                weights[idx] *= half * node_weights[k];
            }
        }

        Quadrature::new(points, weights)
    }

    /// Uniform samples on the boundary of the unit square, `per_edge` per side,
    /// walking counter-clockwise from the origin. Corners are included once.
    pub fn unit_square_boundary(per_edge: usize) -> Mat<f64> {
        let h = 1.0 / per_edge as f64;

        Mat::from_fn(4 * per_edge, 2, |i, j| {
            let edge = i / per_edge;
            let t = (i % per_edge) as f64 * h;

            let (x, y) = match edge {
                0 => (t, 0.0),
                1 => (1.0, t),
                2 => (1.0 - t, 1.0),
                _ => (0.0, 1.0 - t),
            };

            if j == 0 { x } else { y }
        })
    }

    /// The `2^dim` corners of the box `[lower, upper]`.
    pub fn box_corners(lower: &[f64], upper: &[f64]) -> BasisResult<Mat<f64>> {
        ensure_dimension(lower.len())?;
        ensure_len("box upper corner", lower.len(), upper.len())?;

        let dims = lower.len();
        let n = 1 << dims;
        Ok(Mat::from_fn(n, dims, |i, j| {
            if (i >> j) & 1 == 0 { lower[j] } else { upper[j] }
        }))
    }

    /// Uniform grid with `per_axis` points per axis on `[lower, upper]`,
    /// boundaries included.
    pub fn grid(lower: &[f64], upper: &[f64], per_axis: usize) -> BasisResult<Mat<f64>> {
        ensure_dimension(lower.len())?;
        ensure_len("box upper corner", lower.len(), upper.len())?;

        let dim = lower.len();
        let num_points = per_axis.pow(dim as u32);
        let step = |d: usize| match per_axis {
            0 | 1 => 0.0,
            _ => (upper[d] - lower[d]) / (per_axis - 1) as f64,
        };

        Ok(Mat::from_fn(num_points, dim, |i, j| {
            let k = (i / per_axis.pow(j as u32)) % per_axis;
            lower[j] + k as f64 * step(j)
        }))
    }
}

/// `P_n(x)` and `P_n'(x)` by the three-term recurrence.
fn legendre(n: usize, x: f64) -> (f64, f64) {
    let mut p0 = 1.0;
    let mut p1 = x;

    if n == 0 {
        return (1.0, 0.0);
    }

    for k in 2..=n {
        let kf = k as f64;
        let p2 = ((2.0 * kf - 1.0) * x * p1 - (kf - 1.0) * p0) / kf;
        p0 = p1;
        p1 = p2;
    }

    let dp = n as f64 * (x * p1 - p0) / (x * x - 1.0);
    (p1, dp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BasisError;

    #[test]
    fn gauss_legendre_three_points() {
        let (nodes, weights) = ReferenceElements::gauss_legendre(3);

        let mut pairs: Vec<(f64, f64)> = nodes.into_iter().zip(weights).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let r = (0.6f64).sqrt();
        let expected = [(-r, 5.0 / 9.0), (0.0, 8.0 / 9.0), (r, 5.0 / 9.0)];

        for ((x, w), (ex, ew)) in pairs.iter().zip(expected.iter()) {
            assert!((x - ex).abs() < 1e-14);
            assert!((w - ew).abs() < 1e-14);
        }
    }

    #[test]
    fn gauss_legendre_is_exact_to_degree_2n_minus_1() {
        for n in 1..8 {
            let (nodes, weights) = ReferenceElements::gauss_legendre(n);
            for degree in 0..2 * n {
                let approx: f64 = nodes
                    .iter()
                    .zip(weights.iter())
                    .map(|(x, w)| w * x.powi(degree as i32))
                    .sum();
                let exact = match degree % 2 {
                    0 => 2.0 / (degree as f64 + 1.0),
                    _ => 0.0,
                };
                assert!(
                    (approx - exact).abs() < 1e-13,
                    "n = {n}, degree = {degree}: {approx} vs {exact}"
                );
            }
        }
    }

    #[test]
    fn box_quadrature_integrates_quadratics() {
        let q = ReferenceElements::box_quadrature(&[0.0, -1.0, 1.0], &[1.0, 1.0, 4.0], 2).unwrap();

        assert_eq!(q.len(), 8);
        assert!((q.measure().unwrap() - 6.0).abs() < 1e-13);

        // ∫ x y z over the box: (1/2) * 0 * (15/2)
        assert!(q.integrate(|p| p[0] * p[1] * p[2]).abs() < 1e-13);
        // ∫ z^2 over the box: 1 * 2 * 21
        assert!((q.integrate(|p| p[2] * p[2]) - 42.0).abs() < 1e-12);
    }

    #[test]
    fn boundary_samples_are_uniform() {
        let samples = ReferenceElements::unit_square_boundary(4);
        assert_eq!(samples.nrows(), 16);

        for i in 0..16 {
            let (x, y) = (samples[(i, 0)], samples[(i, 1)]);
            let on_boundary = x == 0.0 || x == 1.0 || y == 0.0 || y == 1.0;
            assert!(on_boundary);

            let next = (i + 1) % 16;
            let dx = samples[(next, 0)] - x;
            let dy = samples[(next, 1)] - y;
            assert!(((dx * dx + dy * dy).sqrt() - 0.25).abs() < 1e-15);
        }
    }

    #[test]
    fn grid_and_corners() {
        let grid = ReferenceElements::grid(&[0.0, 0.0], &[1.0, 2.0], 3).unwrap();
        assert_eq!(grid.nrows(), 9);
        assert_eq!(grid[(8, 0)], 1.0);
        assert_eq!(grid[(8, 1)], 2.0);
        assert_eq!(grid[(3, 1)], 1.0);

        let corners = ReferenceElements::box_corners(&[0.0, 0.0, 0.0], &[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(corners.nrows(), 8);
        assert_eq!(corners[(5, 0)], 1.0);
        assert_eq!(corners[(5, 1)], 0.0);
        assert_eq!(corners[(5, 2)], 1.0);
    }

    #[test]
    fn mismatched_box_corners_are_rejected() {
        assert_eq!(
            ReferenceElements::box_corners(&[0.0, 0.0, 0.0], &[1.0, 1.0]).unwrap_err(),
            BasisError::DimensionMismatch {
                what: "box upper corner",
                expected: 3,
                found: 2
            }
        );
        assert!(ReferenceElements::grid(&[0.0, 0.0], &[1.0], 3).is_err());
        assert_eq!(
            ReferenceElements::grid(&[0.0], &[1.0], 3).unwrap_err(),
            BasisError::UnsupportedDimension { dim: 1 }
        );
    }
}
