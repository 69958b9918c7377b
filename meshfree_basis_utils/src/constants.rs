/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines numerical constants shared by the radial kernels.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

/// Distances below this value are treated as a sample sitting on its kernel center.
///
/// The kernel value and its derivative are both mapped to `0.0` inside this radius,
/// removing the singularity of the harmonic kernels at `r = 0`.
pub const DEFAULT_DEGENERATE_RADIUS: f64 = 1e-8;
