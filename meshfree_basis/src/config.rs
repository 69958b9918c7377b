/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares configuration types for kernel selection, degeneracy detection and fit diagnostics.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Declares configuration types for kernel selection, degeneracy detection and fit diagnostics.
use meshfree_basis_utils::{KernelParams, KernelType};
use serde::{Deserialize, Serialize};

/// Parameters controlling how an element basis is constructed.
///
/// The defaults reproduce the classic harmonic construction: `ln r` kernels on
/// planar elements, `1/r` kernels on volumetric elements, and a singularity cut-off
/// of `1e-8`.
///
/// ### Default Values
/// - `kernel`: harmonic, degenerate radius `1e-8`
/// - `rank_tolerance`: `1e-10`
/// - `report_residuals`: `false`
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct BasisParams {
    /// Radial kernel anchored at each center.
    pub kernel: KernelParams,

    /// Relative threshold on the pivoted `R` diagonal of the moment matrix, built
    /// in the element's centred unit-size frame.
    /// Diagonal entries below `rank_tolerance * |R_00|` count as zero, and any
    /// resulting rank loss marks the element as degenerate.
    pub rank_tolerance: f64,

    /// When set, the post-fit sample residual is computed and reported at
    /// `debug` level and to the diagnostics sink.
    pub report_residuals: bool,
}

impl Default for BasisParams {
    fn default() -> Self {
        BasisParams::builder(KernelType::Harmonic).build()
    }
}

impl BasisParams {
    /// Returns a new [`BasisParamsBuilder`] with defaults for the given kernel type.
    pub fn builder(kernel_type: KernelType) -> BasisParamsBuilder {
        BasisParamsBuilder::new(kernel_type)
    }
}

/// A convenience builder for constructing a [`BasisParams`] instance.
///
/// The builder should be called via the [`BasisParams::builder`] method.
///
/// See [`BasisParams`] for details on each field.
#[derive(Debug, Clone, Copy)]
pub struct BasisParamsBuilder {
    pub kernel: KernelParams,
    pub rank_tolerance: f64,
    pub report_residuals: bool,
}

impl BasisParamsBuilder {
    fn new(kernel_type: KernelType) -> Self {
        Self {
            kernel: KernelParams::builder(kernel_type).build(),
            rank_tolerance: 1e-10,
            report_residuals: false,
        }
    }

    /// Replaces the kernel parameters.
    pub fn kernel(mut self, kernel: KernelParams) -> Self {
        self.kernel = kernel;
        self
    }

    /// Sets the radius inside which kernels evaluate to zero.
    pub fn degenerate_radius(mut self, degenerate_radius: f64) -> Self {
        self.kernel = KernelParams::builder(self.kernel.kernel_type)
            .degenerate_radius(degenerate_radius)
            .build();
        self
    }

    /// Sets the relative rank threshold used to detect degenerate elements.
    pub fn rank_tolerance(mut self, rank_tolerance: f64) -> Self {
        self.rank_tolerance = rank_tolerance;
        self
    }

    /// Enables or disables post-fit residual reporting.
    pub fn report_residuals(mut self, report_residuals: bool) -> Self {
        self.report_residuals = report_residuals;
        self
    }

    /// Builds and returns a [`BasisParams`] instance.
    pub fn build(self) -> BasisParams {
        BasisParams {
            kernel: self.kernel,
            rank_tolerance: self.rank_tolerance,
            report_residuals: self.report_residuals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = BasisParams::default();
        assert_eq!(params.kernel.kernel_type, KernelType::Harmonic);
        assert_eq!(params.kernel.degenerate_radius, 1e-8);
        assert_eq!(params.rank_tolerance, 1e-10);
        assert!(!params.report_residuals);
    }

    #[test]
    fn builder_overrides() {
        let params = BasisParams::builder(KernelType::Biharmonic)
            .degenerate_radius(1e-6)
            .rank_tolerance(1e-12)
            .report_residuals(true)
            .build();

        assert_eq!(params.kernel.kernel_type, KernelType::Biharmonic);
        assert_eq!(params.kernel.degenerate_radius, 1e-6);
        assert_eq!(params.rank_tolerance, 1e-12);
        assert!(params.report_residuals);
    }
}
