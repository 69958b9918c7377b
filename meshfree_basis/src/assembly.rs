/////////////////////////////////////////////////////////////////////////////////////////////
//
// Builds the bases of many independent elements in parallel.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    basis::RBFQuadraticBasis, config::BasisParams, diagnostics::DiagnosticSink,
    error::BasisResult, quadrature::Quadrature,
};
use faer::Mat;
use rayon::prelude::*;
use std::sync::Arc;

/// Constraint data of one element. The quadrature rule may be shared between
/// elements of the same shape.
#[derive(Debug, Clone)]
pub struct ElementConstraints {
    pub quadrature: Arc<Quadrature>,

    /// `num_bases × 5` (2D) or `num_bases × 9` (3D).
    pub local_basis_integral: Mat<f64>,
}

/// Everything needed to construct one element's basis.
#[derive(Debug, Clone)]
pub struct ElementInput {
    pub centers: Mat<f64>,
    pub samples: Mat<f64>,
    pub rhs: Mat<f64>,
    pub constraints: Option<ElementConstraints>,
}

impl ElementInput {
    /// Builds this element's basis.
    pub fn build(
        &self,
        params: BasisParams,
        diagnostics: Option<&Arc<dyn DiagnosticSink>>,
    ) -> BasisResult<RBFQuadraticBasis> {
        let mut builder =
            RBFQuadraticBasis::builder(self.centers.clone(), self.samples.as_ref(), self.rhs.as_ref())
                .params(params);

        if let Some(c) = &self.constraints {
            builder = builder.constraints(&c.quadrature, c.local_basis_integral.as_ref());
        }

        if let Some(sink) = diagnostics {
            builder = builder.diagnostics(sink.clone());
        }

        builder.build()
    }
}

/// Builds every element's basis in parallel.
///
/// Results are returned in input order. A failed element does not affect the
/// others; callers decide whether to abort or mark it invalid.
pub fn build_element_bases(
    elements: &[ElementInput],
    params: BasisParams,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
) -> Vec<BasisResult<RBFQuadraticBasis>> {
    elements
        .par_iter()
        .map(|element| element.build(params, diagnostics.as_ref()))
        .collect()
}
