/////////////////////////////////////////////////////////////////////////////////////////////
//
// Holds an element-interior quadrature rule and validates it before use.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::error::{BasisError, BasisResult, ensure_dimension, ensure_len};
use faer::{Mat, MatRef, RowRef};

/// Quadrature rule over the interior of one element.
///
/// Points are stored one per row. Weights should sum to the element measure
/// (area in 2D, volume in 3D).
#[derive(Debug, Clone, PartialEq)]
pub struct Quadrature {
    points: Mat<f64>,
    weights: Vec<f64>,
}

impl Quadrature {
    /// Creates a quadrature rule, checking that the point and weight counts agree,
    /// that the dimension is 2 or 3, and that every point and weight is finite.
    ///
    /// A zero total weight is accepted here and rejected once the rule is used
    /// to build constraints, see [`Quadrature::measure`].
    pub fn new(points: Mat<f64>, weights: Vec<f64>) -> BasisResult<Self> {
        ensure_dimension(points.ncols())?;
        ensure_len("quadrature weights", points.nrows(), weights.len())?;

        if points.nrows() == 0 {
            return Err(BasisError::InvalidQuadrature {
                reason: "rule has no points".to_string(),
            });
        }

        if let Some(i) = (0..points.nrows()).find(|&i| points.row(i).iter().any(|x| !x.is_finite())) {
            return Err(BasisError::InvalidQuadrature {
                reason: format!("point {} is not finite", i),
            });
        }

        if let Some(i) = weights.iter().position(|w| !w.is_finite()) {
            return Err(BasisError::InvalidQuadrature {
                reason: format!("weight {} is not finite", i),
            });
        }

        Ok(Self { points, weights })
    }

    #[inline]
    pub fn points(&self) -> MatRef<'_, f64> {
        self.points.as_ref()
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn point(&self, i: usize) -> RowRef<'_, f64> {
        self.points.row(i)
    }

    /// Number of quadrature points.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.points.ncols()
    }

    /// Sum of the weights.
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Element measure, the total weight, checked to be usable for integration.
    pub fn measure(&self) -> BasisResult<f64> {
        let vol = self.total_weight();
        match vol != 0.0 && vol.is_finite() {
            true => Ok(vol),
            false => Err(BasisError::InvalidQuadrature {
                reason: format!("total weight {} cannot be the measure of an element", vol),
            }),
        }
    }

    /// Approximates the integral of `f` over the element.
    pub fn integrate<F>(&self, f: F) -> f64
    where
        F: Fn(RowRef<'_, f64>) -> f64,
    {
        self.weights
            .iter()
            .enumerate()
            .map(|(i, w)| w * f(self.points.row(i)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    #[test]
    fn integrates_linear_function_on_unit_square() {
        let q = Quadrature::new(
            mat![[0.25, 0.25], [0.75, 0.25], [0.25, 0.75], [0.75, 0.75]],
            vec![0.25; 4],
        )
        .unwrap();

        assert_eq!(q.len(), 4);
        assert_eq!(q.dim(), 2);
        assert_eq!(q.measure(), Ok(1.0));
        assert!((q.integrate(|p| p[0] + 2.0 * p[1]) - 1.5).abs() < 1e-14);
    }

    #[test]
    fn rejects_mismatched_weights() {
        let err = Quadrature::new(mat![[0.0, 0.0], [1.0, 1.0]], vec![1.0]).unwrap_err();
        assert_eq!(
            err,
            BasisError::DimensionMismatch {
                what: "quadrature weights",
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn rejects_bad_shapes_and_weights() {
        assert!(matches!(
            Quadrature::new(Mat::zeros(0, 2), vec![]),
            Err(BasisError::InvalidQuadrature { .. })
        ));
        assert!(matches!(
            Quadrature::new(mat![[0.0]], vec![1.0]),
            Err(BasisError::UnsupportedDimension { dim: 1 })
        ));
        assert!(matches!(
            Quadrature::new(mat![[0.0, 0.0]], vec![f64::NAN]),
            Err(BasisError::InvalidQuadrature { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_points() {
        let err = Quadrature::new(mat![[0.0, 0.0], [f64::NAN, 1.0]], vec![0.5, 0.5]).unwrap_err();
        assert_eq!(
            err,
            BasisError::InvalidQuadrature {
                reason: "point 1 is not finite".to_string()
            }
        );

        assert!(Quadrature::new(mat![[0.0, f64::INFINITY, 0.0]], vec![1.0]).is_err());
    }

    #[test]
    fn zero_total_weight_has_no_measure() {
        let q = Quadrature::new(mat![[0.0, 0.0], [1.0, 0.0]], vec![0.5, -0.5]).unwrap();
        assert!(matches!(q.measure(), Err(BasisError::InvalidQuadrature { .. })));
    }
}
