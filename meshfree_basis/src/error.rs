/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the error type returned when an element basis cannot be constructed or queried.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::MatRef;
use meshfree_basis_utils::KernelType;
use thiserror::Error;

/// Errors that abort construction (or a query) of a single element's basis.
///
/// Every variant is local to one element. Callers assembling many elements decide
/// whether to abort the whole assembly or flag the element as invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BasisError {
    /// The moment matrix relating polynomial coefficients to the weak-form
    /// constraints is singular, for example when every quadrature point coincides
    /// or the support is collinear (2D) or coplanar (3D).
    #[error("degenerate element: moment matrix has numerical rank {rank} but needs {size}")]
    DegenerateElement { rank: usize, size: usize },

    /// Two inputs disagree on a size.
    #[error("dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Elements must be planar (2D) or volumetric (3D).
    #[error("unsupported spatial dimension {dim}, expected 2 or 3")]
    UnsupportedDimension { dim: usize },

    /// The requested kernel has no definition in this dimension.
    #[error("kernel {kernel:?} is not defined in {dim}D")]
    UnsupportedKernel { kernel: KernelType, dim: usize },

    /// At least one kernel center is required.
    #[error("no kernel centers supplied")]
    EmptyCenters,

    /// The quadrature rule is missing or cannot integrate over the element.
    #[error("invalid quadrature: {reason}")]
    InvalidQuadrature { reason: String },

    /// An input holds a NaN or infinite entry.
    #[error("{what} contain non-finite values")]
    NonFinite { what: &'static str },

    /// A local basis index or axis outside the valid range.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

pub(crate) type BasisResult<T> = std::result::Result<T, BasisError>;

/// Checks that `found` equals `expected`, naming the offending input otherwise.
#[inline]
pub(crate) fn ensure_len(what: &'static str, expected: usize, found: usize) -> BasisResult<()> {
    match expected == found {
        true => Ok(()),
        false => Err(BasisError::DimensionMismatch {
            what,
            expected,
            found,
        }),
    }
}

/// Checks that `dim` is a supported spatial dimension.
#[inline]
pub(crate) fn ensure_dimension(dim: usize) -> BasisResult<()> {
    match dim {
        2 | 3 => Ok(()),
        _ => Err(BasisError::UnsupportedDimension { dim }),
    }
}

/// Checks that every entry of `values` is finite.
pub(crate) fn ensure_finite(what: &'static str, values: MatRef<'_, f64>) -> BasisResult<()> {
    match values.col_iter().all(|c| c.iter().all(|v| v.is_finite())) {
        true => Ok(()),
        false => Err(BasisError::NonFinite { what }),
    }
}
