/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the per-element quadratic RBF basis, its builder, and its evaluation queries.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    config::BasisParams,
    constraints::{self, KernelMoments},
    diagnostics::{self, DiagnosticMsg, DiagnosticSink, SolveStage},
    error::{BasisError, BasisResult, ensure_finite, ensure_len},
    kernel_matrix::KernelMatrixBuilder,
    linalg::Conditioning,
    quadrature::Quadrature,
    weights::{WeightMatrix, WeightSolver},
};

use faer::{Mat, MatRef};
use meshfree_basis_utils::{BasisKernel, KernelType};
use std::{sync::Arc, time::Instant};

/// Convenience builder for constructing an [`RBFQuadraticBasis`].
///
/// The builder should be called via the [`RBFQuadraticBasis::builder`] method.
///
/// Samples and targets are borrowed and never modified. Attaching constraint
/// data with [`RBFQuadraticBasisBuilder::constraints`] switches the fit to the
/// constrained solve.
pub struct RBFQuadraticBasisBuilder<'a> {
    centers: Mat<f64>,
    samples: MatRef<'a, f64>,
    rhs: MatRef<'a, f64>,
    constraints: Option<(&'a Quadrature, MatRef<'a, f64>)>,
    with_constraints: bool,
    params: BasisParams,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl<'a> RBFQuadraticBasisBuilder<'a> {
    fn new(centers: Mat<f64>, samples: MatRef<'a, f64>, rhs: MatRef<'a, f64>) -> Self {
        Self {
            centers,
            samples,
            rhs,
            constraints: None,
            with_constraints: false,
            params: BasisParams::default(),
            diagnostics: None,
        }
    }

    /// Attaches the interior quadrature rule and the weak-form targets
    /// (`num_bases × 5` in 2D, `num_bases × 9` in 3D) and enables the constraints.
    pub fn constraints(
        mut self,
        quadrature: &'a Quadrature,
        local_basis_integral: MatRef<'a, f64>,
    ) -> Self {
        self.constraints = Some((quadrature, local_basis_integral));
        self.with_constraints = true;
        self
    }

    /// Enables or disables the constraints. Enabling them without attached
    /// constraint data makes [`build`](Self::build) fail.
    pub fn with_constraints(mut self, with_constraints: bool) -> Self {
        self.with_constraints = with_constraints;
        self
    }

    /// Sets custom kernel and solver parameters.
    pub fn params(mut self, params: BasisParams) -> Self {
        self.params = params;
        self
    }

    /// Optional sink receiving ill-conditioning warnings and fit diagnostics.
    pub fn diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Fits the weights and returns the immutable basis.
    pub fn build(self) -> BasisResult<RBFQuadraticBasis> {
        let constraints = match self.with_constraints {
            true => Some(self.constraints.ok_or_else(|| BasisError::InvalidQuadrature {
                reason: "constraints requested without a quadrature rule".to_string(),
            })?),
            false => None,
        };

        RBFQuadraticBasis::new(
            self.centers,
            self.samples,
            self.rhs,
            constraints,
            self.params,
            self.diagnostics,
        )
    }
}

#[doc = include_str!("../docs/rbf_quadratic_basis.md")]
#[derive(Debug, Clone)]
pub struct RBFQuadraticBasis {
    kernel_matrix: KernelMatrixBuilder,
    weights: WeightMatrix,
    conditioning: Conditioning,
    params: BasisParams,
}

impl RBFQuadraticBasis {
    /// Creates a new [`RBFQuadraticBasisBuilder`] for the given kernel centers
    /// (`K × dim`), samples (`N × dim`) and per-basis sample targets (`N × M`).
    ///
    /// This is the way to construct a basis.
    pub fn builder<'a>(
        centers: Mat<f64>,
        samples: MatRef<'a, f64>,
        rhs: MatRef<'a, f64>,
    ) -> RBFQuadraticBasisBuilder<'a> {
        RBFQuadraticBasisBuilder::new(centers, samples, rhs)
    }

    fn new(
        centers: Mat<f64>,
        samples: MatRef<'_, f64>,
        rhs: MatRef<'_, f64>,
        constraints: Option<(&Quadrature, MatRef<'_, f64>)>,
        params: BasisParams,
        sink: Option<Arc<dyn DiagnosticSink>>,
    ) -> BasisResult<Self> {
        let fit_start = Instant::now();

        let dim = centers.ncols();
        let kernel = BasisKernel::new(&params.kernel, dim).ok_or(match dim {
            2 | 3 => BasisError::UnsupportedKernel {
                kernel: params.kernel.kernel_type,
                dim,
            },
            _ => BasisError::UnsupportedDimension { dim },
        })?;

        let kernel_matrix = KernelMatrixBuilder::new(centers, kernel)?;

        ensure_len("sample coordinates", dim, samples.ncols())?;
        ensure_len("rhs rows", samples.nrows(), rhs.nrows())?;
        ensure_finite("samples", samples)?;
        ensure_finite("rhs", rhs)?;

        log::trace!("num centers: {}", kernel_matrix.num_kernels());
        log::trace!("num samples: {}", samples.nrows());
        log::trace!("num bases: {}", rhs.ncols());

        let a = kernel_matrix.kernels_matrix(samples)?;
        let solver = WeightSolver::new(a.as_ref(), rhs)?;

        let (weights, conditioning, stage, system_size) = match constraints {
            Some((quadrature, local_basis_integral)) => {
                log::trace!("num quadrature points: {}", quadrature.len());
                ensure_len(
                    "local basis integral rows",
                    rhs.ncols(),
                    local_basis_integral.nrows(),
                )?;
                ensure_finite("local basis integral", local_basis_integral)?;

                let map = constraints::compute_null_space_map(
                    &kernel_matrix,
                    quadrature,
                    local_basis_integral,
                    params.rank_tolerance,
                )?;

                let (w, conditioning) = solver.constrained(&map)?;
                (w, conditioning, SolveStage::ConstraintReduced, map.l.ncols())
            }
            None => {
                let (w, conditioning) = solver.unconstrained();
                (w, conditioning, SolveStage::Unconstrained, a.ncols())
            }
        };

        if conditioning.is_ill_conditioned() {
            diagnostics::report(
                sink.as_ref(),
                DiagnosticMsg::IllConditionedFit {
                    stage,
                    size: system_size,
                },
            );
        }

        let basis = Self {
            weights: WeightMatrix::new(weights, kernel_matrix.num_kernels(), kernel_matrix.layout()),
            kernel_matrix,
            conditioning,
            params,
        };

        if params.report_residuals {
            let mean_max_residual = basis.fit_residual(samples, rhs)?;
            diagnostics::report(
                sink.as_ref(),
                DiagnosticMsg::FitResidual { mean_max_residual },
            );
        }

        diagnostics::report(
            sink.as_ref(),
            DiagnosticMsg::Message {
                message: format!(
                    "Took {:?} to fit {} bases with {} kernels ({:?} solve, {:?})",
                    fit_start.elapsed(),
                    basis.num_bases(),
                    basis.num_kernels(),
                    stage,
                    conditioning,
                ),
            },
        );

        Ok(basis)
    }

    /// Spatial dimension of the element.
    #[inline]
    pub fn dim(&self) -> usize {
        self.kernel_matrix.dim()
    }

    /// Number of kernel centers.
    #[inline]
    pub fn num_kernels(&self) -> usize {
        self.kernel_matrix.num_kernels()
    }

    /// Number of locally active basis functions.
    #[inline]
    pub fn num_bases(&self) -> usize {
        self.weights.num_bases()
    }

    #[inline]
    pub fn centers(&self) -> MatRef<'_, f64> {
        self.kernel_matrix.centers()
    }

    #[inline]
    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    /// Whether the least-squares solve had to fall back from Cholesky.
    #[inline]
    pub fn conditioning(&self) -> Conditioning {
        self.conditioning
    }

    #[inline]
    pub fn params(&self) -> &BasisParams {
        &self.params
    }

    #[inline]
    pub fn kernel_type(&self) -> KernelType {
        self.kernel_matrix.kernel().kernel_type()
    }

    /// Values of every basis at `points`, `#points × num_bases`.
    pub fn bases_values(&self, points: MatRef<'_, f64>) -> BasisResult<Mat<f64>> {
        let a = self.kernel_matrix.kernels_matrix(points)?;
        Ok(a * self.weights.as_mat())
    }

    /// Derivatives along `axis` of every basis at `points`, `#points × num_bases`.
    pub fn bases_grads(&self, axis: usize, points: MatRef<'_, f64>) -> BasisResult<Mat<f64>> {
        let g = self.kernel_matrix.kernels_gradient(points, axis)?;
        Ok(g * self.weights.as_mat())
    }

    /// Value of basis `local_index` at `points`, `#points × 1`.
    ///
    /// ### Example
    /// ```no_run
    /// # use meshfree_basis::RBFQuadraticBasis;
    /// # use faer::Mat;
    /// # let (basis, points): (RBFQuadraticBasis, Mat<f64>) = unimplemented!();
    /// let values = basis.basis(0, points.as_ref()).unwrap();
    /// ```
    pub fn basis(&self, local_index: usize, points: MatRef<'_, f64>) -> BasisResult<Mat<f64>> {
        self.check_index(local_index)?;
        let a = self.kernel_matrix.kernels_matrix(points)?;
        Ok(a * self.weights.as_mat().subcols(local_index, 1))
    }

    /// Gradient of basis `local_index` at `points`, `#points × dim`.
    pub fn grad(&self, local_index: usize, points: MatRef<'_, f64>) -> BasisResult<Mat<f64>> {
        self.check_index(local_index)?;
        let w = self.weights.as_mat().col(local_index);

        let mut grad = Mat::<f64>::zeros(points.nrows(), self.dim());
        for axis in 0..self.dim() {
            let g = self.kernel_matrix.kernels_gradient(points, axis)?;
            let column = &g * w;
            grad.col_mut(axis).copy_from(column.as_ref());
        }

        Ok(grad)
    }

    /// Achieved weak-form integrals minus `local_basis_integral`, integrated with
    /// `quadrature`. One row per basis, one column per constraint.
    ///
    /// With the same rule and targets used for construction every entry is zero
    /// up to round-off.
    pub fn constraint_residuals(
        &self,
        quadrature: &Quadrature,
        local_basis_integral: MatRef<'_, f64>,
    ) -> BasisResult<Mat<f64>> {
        let layout = self.kernel_matrix.layout();
        ensure_len("local basis integral rows", self.num_bases(), local_basis_integral.nrows())?;
        ensure_len(
            "local basis integral columns",
            layout.num_constraints(),
            local_basis_integral.ncols(),
        )?;
        ensure_len("quadrature dimension", self.dim(), quadrature.dim())?;

        let points = quadrature.points();
        let values = self.bases_values(points)?;
        let gradients = (0..self.dim())
            .map(|axis| self.bases_grads(axis, points))
            .collect::<BasisResult<Vec<_>>>()?;

        let achieved = KernelMoments::from_evaluations(layout, quadrature, values.as_ref(), &gradients)?
            .functionals(&layout);

        Ok(achieved.transpose() - local_basis_integral)
    }

    /// Mean over bases of the maximum absolute residual at the samples.
    pub fn fit_residual(&self, samples: MatRef<'_, f64>, rhs: MatRef<'_, f64>) -> BasisResult<f64> {
        ensure_len("rhs rows", samples.nrows(), rhs.nrows())?;
        ensure_len("rhs columns", self.num_bases(), rhs.ncols())?;

        let fitted = self.bases_values(samples)?;

        let total: f64 = (0..self.num_bases())
            .map(|j| {
                fitted
                    .col(j)
                    .iter()
                    .zip(rhs.col(j).iter())
                    .fold(0.0f64, |acc, (a, b)| acc.max((a - b).abs()))
            })
            .sum();

        Ok(total / self.num_bases().max(1) as f64)
    }

    fn check_index(&self, local_index: usize) -> BasisResult<()> {
        match local_index < self.num_bases() {
            true => Ok(()),
            false => Err(BasisError::IndexOutOfRange {
                index: local_index,
                len: self.num_bases(),
            }),
        }
    }
}
