/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the concrete radial kernels and their analytic derivatives.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{KernelFromParams, KernelParams, RadialKernel};

/// Harmonic kernel in two dimensions, `phi(r) = ln r`.
///
/// The fundamental solution of the 2D Laplacian (up to scaling).
#[derive(Clone, Debug, Copy)]
pub struct LogKernel {
    pub degenerate_radius: f64,
}

impl RadialKernel for LogKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        match r < self.degenerate_radius {
            true => 0.0,
            false => r.ln(),
        }
    }

    #[inline(always)]
    fn phi_prime(&self, r: f64) -> f64 {
        match r < self.degenerate_radius {
            true => 0.0,
            false => 1.0 / r,
        }
    }

    #[inline(always)]
    fn degenerate_radius(&self) -> f64 {
        self.degenerate_radius
    }
}

impl KernelFromParams for LogKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        LogKernel {
            degenerate_radius: p.degenerate_radius,
        }
    }
}

/// Harmonic kernel in three dimensions, `phi(r) = 1 / r`.
#[derive(Clone, Debug, Copy)]
pub struct InverseDistanceKernel {
    pub degenerate_radius: f64,
}

impl RadialKernel for InverseDistanceKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        match r < self.degenerate_radius {
            true => 0.0,
            false => 1.0 / r,
        }
    }

    #[inline(always)]
    fn phi_prime(&self, r: f64) -> f64 {
        match r < self.degenerate_radius {
            true => 0.0,
            false => -1.0 / (r * r),
        }
    }

    #[inline(always)]
    fn degenerate_radius(&self) -> f64 {
        self.degenerate_radius
    }
}

impl KernelFromParams for InverseDistanceKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        InverseDistanceKernel {
            degenerate_radius: p.degenerate_radius,
        }
    }
}

/// Biharmonic kernel in two dimensions, `phi(r) = r^2 (ln r - 1)`.
///
/// Only defined for planar elements.
#[derive(Clone, Debug, Copy)]
pub struct BiharmonicKernel {
    pub degenerate_radius: f64,
}

impl RadialKernel for BiharmonicKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        match r < self.degenerate_radius {
            true => 0.0,
            false => r * r * (r.ln() - 1.0),
        }
    }

    #[inline(always)]
    fn phi_prime(&self, r: f64) -> f64 {
        match r < self.degenerate_radius {
            true => 0.0,
            false => r * (2.0 * r.ln() - 1.0),
        }
    }

    #[inline(always)]
    fn degenerate_radius(&self) -> f64 {
        self.degenerate_radius
    }
}

impl KernelFromParams for BiharmonicKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        BiharmonicKernel {
            degenerate_radius: p.degenerate_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_DEGENERATE_RADIUS;

    const R: f64 = DEFAULT_DEGENERATE_RADIUS;

    fn central_difference<K: RadialKernel>(k: &K, r: f64) -> f64 {
        let h = 1e-6;
        (k.phi(r + h) - k.phi(r - h)) / (2.0 * h)
    }

    #[test]
    fn kernels_vanish_inside_degenerate_radius() {
        let log = LogKernel { degenerate_radius: R };
        let inv = InverseDistanceKernel { degenerate_radius: R };
        let bih = BiharmonicKernel { degenerate_radius: R };

        for r in [0.0, 1e-12, 0.5 * R] {
            assert_eq!(log.phi(r), 0.0);
            assert_eq!(log.phi_prime(r), 0.0);
            assert_eq!(log.gradient_factor(r), 0.0);
            assert_eq!(inv.phi(r), 0.0);
            assert_eq!(inv.phi_prime(r), 0.0);
            assert_eq!(inv.gradient_factor(r), 0.0);
            assert_eq!(bih.phi(r), 0.0);
            assert_eq!(bih.gradient_factor(r), 0.0);
        }
    }

    #[test]
    fn kernel_values() {
        let log = LogKernel { degenerate_radius: R };
        let inv = InverseDistanceKernel { degenerate_radius: R };
        let bih = BiharmonicKernel { degenerate_radius: R };

        assert_eq!(log.phi(1.0), 0.0);
        assert!((log.phi(std::f64::consts::E) - 1.0).abs() < 1e-15);
        assert_eq!(inv.phi(2.0), 0.5);
        assert_eq!(inv.phi_prime(2.0), -0.25);
        assert_eq!(bih.phi(1.0), -1.0);
        assert_eq!(bih.phi_prime(1.0), -1.0);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let log = LogKernel { degenerate_radius: R };
        let inv = InverseDistanceKernel { degenerate_radius: R };
        let bih = BiharmonicKernel { degenerate_radius: R };

        for r in [0.1, 0.5, 1.0, 2.5] {
            assert!((log.phi_prime(r) - central_difference(&log, r)).abs() < 1e-6);
            assert!((inv.phi_prime(r) - central_difference(&inv, r)).abs() < 1e-5);
            assert!((bih.phi_prime(r) - central_difference(&bih, r)).abs() < 1e-6);
        }
    }

    #[test]
    fn gradient_factor_divides_by_radius() {
        let inv = InverseDistanceKernel { degenerate_radius: R };
        assert_eq!(inv.gradient_factor(2.0), -0.125);

        let log = LogKernel { degenerate_radius: R };
        assert_eq!(log.gradient_factor(0.5), 4.0);
    }
}
