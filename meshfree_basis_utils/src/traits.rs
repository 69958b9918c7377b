/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares traits shared by all radial kernels.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::kernel_helpers::KernelParams;

/// Converts a shared [`KernelParams`] configuration into a concrete kernel type.
pub trait KernelFromParams: Sized {
    /// Constructs `Self` from a set of uniform kernel parameters.
    fn from_params(p: &KernelParams) -> Self;
}

/// A radially symmetric kernel `psi(x) = phi(|x - c|)` with an analytic derivative.
pub trait RadialKernel {
    /// Kernel profile `phi(r)`.
    fn phi(&self, r: f64) -> f64;

    /// Radial derivative `phi'(r)`.
    fn phi_prime(&self, r: f64) -> f64;

    /// Radius below which both `phi` and `phi'` are reported as zero.
    fn degenerate_radius(&self) -> f64;

    /// Returns `phi'(r) / r`, the factor that turns a center offset into a gradient.
    ///
    /// `∇psi(x) = (x - c) * phi'(r) / r`. Inside the degenerate radius the factor is zero.
    #[inline(always)]
    fn gradient_factor(&self, r: f64) -> f64 {
        if r < self.degenerate_radius() {
            0.0
        } else {
            self.phi_prime(r) / r
        }
    }
}
