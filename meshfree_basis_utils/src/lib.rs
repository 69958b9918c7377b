/////////////////////////////////////////////////////////////////////////////////////////////
//
// Re-exports kernel utilities, constants, and helper functions used by the meshfree_basis crate.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Utilities for the [`meshfree_basis`] crate
mod constants;
mod kernel_helpers;
mod rbf_kernels;
mod traits;
mod utils;

/// Implemented radial kernels.
pub mod kernels {
    pub use super::rbf_kernels::*;
}

pub use {
    constants::DEFAULT_DEGENERATE_RADIUS,
    kernel_helpers::{KernelParams, KernelParamsBuilder},
    traits::{KernelFromParams, RadialKernel},
    utils::{BasisKernel, KernelType, get_distance},
};
