/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides parameter and builder types for configuring radial kernels.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{constants::DEFAULT_DEGENERATE_RADIUS, utils::KernelType};
use serde::{Deserialize, Serialize};

/// Defines the [`KernelType`] to use, along with the radius inside which the
/// kernel singularity is removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelParams {
    /// KernelType enum variant to use.
    pub kernel_type: KernelType,

    /// Distances strictly below this value evaluate the kernel and its
    /// derivative to zero. This is what makes a sample coinciding with a
    /// kernel center contribute nothing from that center.
    pub degenerate_radius: f64,
}

impl Default for KernelParams {
    fn default() -> Self {
        KernelParams::builder(KernelType::Harmonic).build()
    }
}

impl KernelParams {
    /// Begins building a [`KernelParams`] instance for the given kernel type.
    pub fn builder(kernel_type: KernelType) -> KernelParamsBuilder {
        KernelParamsBuilder {
            kernel_type,
            degenerate_radius: DEFAULT_DEGENERATE_RADIUS,
        }
    }
}

/// Builder for [`KernelParams`] that provides sensible defaults.
#[derive(Debug, Clone, Copy)]
pub struct KernelParamsBuilder {
    kernel_type: KernelType,
    degenerate_radius: f64,
}

impl KernelParamsBuilder {
    /// Sets the `degenerate_radius` parameter on the builder.
    pub fn degenerate_radius(mut self, v: f64) -> Self {
        self.degenerate_radius = v;
        self
    }

    /// Finalises the builder into a [`KernelParams`] value.
    ///
    /// Negative radii are clamped to zero.
    pub fn build(self) -> KernelParams {
        KernelParams {
            kernel_type: self.kernel_type,
            degenerate_radius: self.degenerate_radius.max(0.0),
        }
    }
}
