/////////////////////////////////////////////////////////////////////////////////////////////
//
// Supplies the runtime kernel selector, the dimension-resolved kernel wrapper and
// distance helpers.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    KernelFromParams, KernelParams, RadialKernel,
    kernels::{BiharmonicKernel, InverseDistanceKernel, LogKernel},
};
use faer::RowRef;
use serde::{Deserialize, Serialize};

/// Runtime kernel selector.
///
/// The concrete profile also depends on the spatial dimension, see [`BasisKernel::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelType {
    /// Fundamental solution of the Laplacian: `ln r` in 2D, `1/r` in 3D.
    Harmonic,

    /// `r^2 (ln r - 1)`, 2D only.
    Biharmonic,
}

impl Default for KernelType {
    fn default() -> Self {
        KernelType::Harmonic
    }
}

/// Runtime-erased kernel, resolved for a given spatial dimension so callers don't
/// need to be generic over the concrete kernel type.
#[derive(Debug, Clone, Copy)]
pub enum BasisKernel {
    /// `ln r`, planar harmonic.
    Log(LogKernel),

    /// `1/r`, volumetric harmonic.
    InverseDistance(InverseDistanceKernel),

    /// `r^2 (ln r - 1)`, planar biharmonic.
    Biharmonic(BiharmonicKernel),
}

impl BasisKernel {
    /// Resolves `params` for a `dim`-dimensional element.
    ///
    /// Returns `None` when the kernel type has no definition in that dimension.
    pub fn new(params: &KernelParams, dim: usize) -> Option<Self> {
        match (params.kernel_type, dim) {
            (KernelType::Harmonic, 2) => Some(BasisKernel::Log(LogKernel::from_params(params))),
            (KernelType::Harmonic, 3) => Some(BasisKernel::InverseDistance(
                InverseDistanceKernel::from_params(params),
            )),
            (KernelType::Biharmonic, 2) => {
                Some(BasisKernel::Biharmonic(BiharmonicKernel::from_params(params)))
            }
            _ => None,
        }
    }

    /// The [`KernelType`] this kernel was resolved from.
    pub fn kernel_type(&self) -> KernelType {
        match self {
            BasisKernel::Log(_) | BasisKernel::InverseDistance(_) => KernelType::Harmonic,
            BasisKernel::Biharmonic(_) => KernelType::Biharmonic,
        }
    }
}

impl RadialKernel for BasisKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        match self {
            BasisKernel::Log(k) => k.phi(r),
            BasisKernel::InverseDistance(k) => k.phi(r),
            BasisKernel::Biharmonic(k) => k.phi(r),
        }
    }

    #[inline(always)]
    fn phi_prime(&self, r: f64) -> f64 {
        match self {
            BasisKernel::Log(k) => k.phi_prime(r),
            BasisKernel::InverseDistance(k) => k.phi_prime(r),
            BasisKernel::Biharmonic(k) => k.phi_prime(r),
        }
    }

    #[inline(always)]
    fn degenerate_radius(&self) -> f64 {
        match self {
            BasisKernel::Log(k) => k.degenerate_radius(),
            BasisKernel::InverseDistance(k) => k.degenerate_radius(),
            BasisKernel::Biharmonic(k) => k.degenerate_radius(),
        }
    }
}

/// Calculates the euclidean distance between two points.
///
/// # Examples
///
/// ```
/// use faer::mat;
/// use meshfree_basis_utils::get_distance;
///
/// let points = mat![
///     [1.0, 2.0],
///     [4.0, 6.0],
/// ];
///
/// let target = points.row(0);
/// let source = points.row(1);
///
/// let dist = get_distance(target, source);
///
/// assert_eq!(dist, 5.0);
/// ```
#[inline(always)]
pub fn get_distance(target: RowRef<f64>, source: RowRef<f64>) -> f64 {
    let mut dist = 0.0;
    for (t, s) in target.iter().zip(source.iter()) {
        let diff = t - s;
        dist += diff * diff;
    }
    dist.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harmonic_resolves_per_dimension() {
        let params = KernelParams::default();

        let planar = BasisKernel::new(&params, 2).unwrap();
        assert!(matches!(planar, BasisKernel::Log(_)));
        assert_eq!(planar.phi(1.0), 0.0);

        let volume = BasisKernel::new(&params, 3).unwrap();
        assert!(matches!(volume, BasisKernel::InverseDistance(_)));
        assert_eq!(volume.phi(4.0), 0.25);

        assert!(BasisKernel::new(&params, 1).is_none());
    }

    #[test]
    fn biharmonic_is_planar_only() {
        let params = KernelParams::builder(KernelType::Biharmonic).build();

        let planar = BasisKernel::new(&params, 2).unwrap();
        assert_eq!(planar.kernel_type(), KernelType::Biharmonic);
        assert!(BasisKernel::new(&params, 3).is_none());
    }

    #[test]
    fn degenerate_radius_is_forwarded() {
        let params = KernelParams::builder(KernelType::Harmonic)
            .degenerate_radius(1e-3)
            .build();
        let kernel = BasisKernel::new(&params, 3).unwrap();

        assert_eq!(kernel.degenerate_radius(), 1e-3);
        assert_eq!(kernel.phi(5e-4), 0.0);
        assert_eq!(kernel.gradient_factor(5e-4), 0.0);
        assert_eq!(kernel.phi(0.5), 2.0);
    }
}
