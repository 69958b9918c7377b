/////////////////////////////////////////////////////////////////////////////////////////////
//
// Builds the kernel-plus-quadratic interpolation matrix and its analytic axis derivatives.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    error::{BasisError, BasisResult, ensure_dimension, ensure_finite, ensure_len},
    polynomials::QuadraticLayout,
};
use faer::{Mat, MatRef};
use meshfree_basis_utils::{BasisKernel, RadialKernel, get_distance};

/// Evaluates the augmented interpolation matrix
/// `A = [φ(‖x − c_j‖) | 1 | x_d | x_a x_b | x_d²]` for one element's kernel centers.
///
/// `A` has `K + 1 + dim + dim·(dim−1)/2 + dim` columns, where `K` is the number of
/// centers. A point closer than the kernel's degenerate radius to a center gets an
/// exact zero from that center, in both `A` and its gradient.
#[derive(Debug, Clone)]
pub struct KernelMatrixBuilder {
    centers: Mat<f64>,
    kernel: BasisKernel,
    layout: QuadraticLayout,
}

impl KernelMatrixBuilder {
    pub fn new(centers: Mat<f64>, kernel: BasisKernel) -> BasisResult<Self> {
        let dim = centers.ncols();
        ensure_dimension(dim)?;

        if centers.nrows() == 0 {
            return Err(BasisError::EmptyCenters);
        }

        ensure_finite("kernel centers", centers.as_ref())?;

        Ok(Self {
            centers,
            kernel,
            layout: QuadraticLayout::new(dim)?,
        })
    }

    #[inline]
    pub fn centers(&self) -> MatRef<'_, f64> {
        self.centers.as_ref()
    }

    #[inline]
    pub fn kernel(&self) -> &BasisKernel {
        &self.kernel
    }

    #[inline]
    pub fn layout(&self) -> QuadraticLayout {
        self.layout
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.layout.dim()
    }

    /// Number of kernel centers `K`.
    #[inline]
    pub fn num_kernels(&self) -> usize {
        self.centers.nrows()
    }

    /// Total columns of `A`.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.num_kernels() + self.layout.size()
    }

    /// Kernel block of `A`: `φ(‖x_i − c_j‖)`, one row per point.
    pub fn kernel_values(&self, points: MatRef<f64>) -> BasisResult<Mat<f64>> {
        self.check_points(points)?;

        Ok(Mat::from_fn(points.nrows(), self.num_kernels(), |i, j| {
            let r = get_distance(points.row(i), self.centers.row(j));
            self.kernel.phi(r)
        }))
    }

    /// Kernel block of `∂A/∂x_axis`: `(x_axis − c_axis) φ'(r)/r`.
    pub fn kernel_derivatives(&self, points: MatRef<f64>, axis: usize) -> BasisResult<Mat<f64>> {
        self.check_points(points)?;
        self.layout.check_axis(axis)?;

        Ok(Mat::from_fn(points.nrows(), self.num_kernels(), |i, j| {
            let r = get_distance(points.row(i), self.centers.row(j));
            (points[(i, axis)] - self.centers[(j, axis)]) * self.kernel.gradient_factor(r)
        }))
    }

    /// Builds `A` at each row of `points`.
    pub fn kernels_matrix(&self, points: MatRef<f64>) -> BasisResult<Mat<f64>> {
        let kernel_block = self.kernel_values(points)?;
        let poly_block = self.layout.evaluate_monomials(points);

        Ok(self.concat(kernel_block, poly_block))
    }

    /// Builds `∂A/∂x_axis` at each row of `points`.
    pub fn kernels_gradient(&self, points: MatRef<f64>, axis: usize) -> BasisResult<Mat<f64>> {
        let kernel_block = self.kernel_derivatives(points, axis)?;
        let poly_block = self.layout.evaluate_gradient(points, axis);

        Ok(self.concat(kernel_block, poly_block))
    }

    fn concat(&self, kernel_block: Mat<f64>, poly_block: Mat<f64>) -> Mat<f64> {
        let k = self.num_kernels();
        let mut a = Mat::<f64>::zeros(kernel_block.nrows(), self.num_columns());
        a.subcols_mut(0, k).copy_from(&kernel_block);
        a.subcols_mut(k, self.layout.size()).copy_from(&poly_block);
        a
    }

    fn check_points(&self, points: MatRef<f64>) -> BasisResult<()> {
        ensure_len("point coordinates", self.dim(), points.ncols())
    }
}
