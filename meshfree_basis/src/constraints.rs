/////////////////////////////////////////////////////////////////////////////////////////////
//
// Assembles the weak-form polynomial reproduction constraints and their null-space map.
//
// Created on: 16 Oct 2026     Author: Daniel Owen
//
// Copyright (c) 2026, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Weak-form polynomial reproduction constraints.
//!
//! For a function `f` on an element the constraint functionals are, one per
//! non-constant polynomial term and in the same order:
//!
//! - linear `x_i`: `∫ ∂_i f`
//! - mixed `x_a x_b`: `∫ (x_b ∂_a f + x_a ∂_b f)`
//! - quadratic `x_i²`: `2 ∫ (x_i ∂_i f + f)`
//!
//! A basis with weights `w` satisfies the constraints when these functionals equal
//! the caller's `local_basis_integral` row. Applied to the polynomial columns the
//! functionals form the moment matrix `M`, so the polynomial part of `w` is
//! determined by the kernel part and the constant. That relation is the affine
//! null-space map `w = L v + t`.
//!
//! The moments are integrated in an [`ElementFrame`] centred on the element and
//! scaled to unit size, so the rank test and the solve with `M` do not depend on
//! where the element sits. The resulting map is expressed back in global monomials.
use crate::{
    error::{BasisResult, ensure_len},
    kernel_matrix::KernelMatrixBuilder,
    linalg,
    polynomials::{PolynomialTerm, QuadraticLayout},
    quadrature::Quadrature,
};
use faer::{Mat, MatRef, unzip, zip};

/// Local coordinates `z = (x − origin) / scale` of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementFrame {
    pub origin: Vec<f64>,
    pub scale: f64,
}

impl ElementFrame {
    /// Frame centred on the quadrature centroid and scaled by the largest
    /// coordinate offset of a quadrature point from it.
    pub fn from_quadrature(quadrature: &Quadrature) -> BasisResult<Self> {
        let measure = quadrature.measure()?;
        let dim = quadrature.dim();

        let origin: Vec<f64> = (0..dim)
            .map(|d| quadrature.integrate(|x| x[d]) / measure)
            .collect();

        let points = quadrature.points();
        let mut spread = 0.0f64;
        for i in 0..points.nrows() {
            for d in 0..dim {
                spread = spread.max((points[(i, d)] - origin[d]).abs());
            }
        }

        // Coincident points have no extent; the rank test rejects them later.
        let scale = match spread > 0.0 && spread.is_finite() {
            true => spread,
            false => 1.0,
        };

        Ok(Self { origin, scale })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.origin.len()
    }

    /// `quadrature` in frame coordinates, weights rescaled to `dz`.
    pub fn localize(&self, quadrature: &Quadrature) -> BasisResult<Quadrature> {
        ensure_len("quadrature dimension", self.dim(), quadrature.dim())?;

        let x = quadrature.points();
        let points = Mat::from_fn(x.nrows(), x.ncols(), |i, d| {
            (x[(i, d)] - self.origin[d]) / self.scale
        });

        let jacobian = self.scale.powi(self.dim() as i32);
        let weights = quadrature.weights().iter().map(|w| w / jacobian).collect();

        Quadrature::new(points, weights)
    }

    /// Converts values of the global constraint functionals (`num_constraints × n`,
    /// rows in [`QuadraticLayout::terms`] order) into values of the same
    /// functionals taken in frame coordinates.
    ///
    /// With `x = origin + h z` and `h^d` the volume scale:
    /// - linear: `F_i(x) = h^(d−1) F_i(z)`
    /// - mixed: `F_ab(x) = h^d F_ab(z) + origin_b F_a(x) + origin_a F_b(x)`
    /// - quadratic: `F_ii(x) = h^d F_ii(z) + 2 origin_i F_i(x)`
    pub fn localize_functionals(&self, layout: &QuadraticLayout, global: MatRef<'_, f64>) -> Mat<f64> {
        let terms = layout.terms();
        let h = self.scale;
        let hd = h.powi(layout.dim() as i32);
        let o = &self.origin;

        Mat::from_fn(terms.len(), global.ncols(), |r, k| {
            let lin = |i: usize| global[(layout.linear(i) - 1, k)];

            match terms[r] {
                PolynomialTerm::Linear(i) => lin(i) * h / hd,
                PolynomialTerm::Mixed(a, b) => (global[(r, k)] - o[b] * lin(a) - o[a] * lin(b)) / hd,
                PolynomialTerm::Quadratic(i) => (global[(r, k)] - 2.0 * o[i] * lin(i)) / hd,
            }
        })
    }

    /// Global monomial coefficients of each frame monomial, `size × size`.
    ///
    /// Column `j` expands the `j`-th monomial in `z` over the monomials in `x`, so
    /// frame coefficients `b` become global coefficients `P b`.
    pub fn polynomial_transform(&self, layout: &QuadraticLayout) -> Mat<f64> {
        let n = layout.size();
        let h = self.scale;
        let h2 = h * h;
        let o = &self.origin;
        let c = layout.constant();

        let mut p = Mat::<f64>::zeros(n, n);
        p[(c, c)] = 1.0;

        for i in 0..layout.dim() {
            let (li, qi) = (layout.linear(i), layout.quadratic(i));

            p[(li, li)] = 1.0 / h;
            p[(c, li)] = -o[i] / h;

            p[(qi, qi)] = 1.0 / h2;
            p[(li, qi)] = -2.0 * o[i] / h2;
            p[(c, qi)] = o[i] * o[i] / h2;
        }

        for m in 0..layout.num_mixed() {
            let (a, b) = layout.mixed_pair(m);
            let col = layout.mixed(m);

            p[(col, col)] = 1.0 / h2;
            p[(layout.linear(a), col)] = -o[b] / h2;
            p[(layout.linear(b), col)] = -o[a] / h2;
            p[(c, col)] = o[a] * o[b] / h2;
        }

        p
    }
}

/// Geometric moments of an element, integrated with its quadrature rule.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometricMoments {
    /// `∫ 1`, the element measure.
    pub measure: f64,

    /// `∫ x_d`.
    pub linear: Vec<f64>,

    /// `∫ x_a x_b` per mixed term.
    pub mixed: Vec<f64>,

    /// `∫ x_d²`.
    pub square: Vec<f64>,
}

impl GeometricMoments {
    pub fn compute(layout: QuadraticLayout, quadrature: &Quadrature) -> BasisResult<Self> {
        ensure_len("quadrature dimension", layout.dim(), quadrature.dim())?;
        let measure = quadrature.measure()?;

        let linear = (0..layout.dim())
            .map(|d| quadrature.integrate(|x| x[d]))
            .collect();

        let mixed = (0..layout.num_mixed())
            .map(|m| {
                let (a, b) = layout.mixed_pair(m);
                quadrature.integrate(|x| x[a] * x[b])
            })
            .collect();

        let square = (0..layout.dim())
            .map(|d| quadrature.integrate(|x| x[d] * x[d]))
            .collect();

        Ok(Self {
            measure,
            linear,
            mixed,
            square,
        })
    }

    /// `∫ x_i x_j`.
    fn second(&self, layout: &QuadraticLayout, i: usize, j: usize) -> f64 {
        match layout.mixed_index(i, j) {
            _ if i == j => self.square[i],
            Some(m) => self.mixed[m],
            None => 0.0,
        }
    }
}

/// Weak-form integrals of a family of functions, one column per function.
///
/// During construction the family is the element's kernels `ψ_k`. After a fit the
/// same integrals of the fitted bases verify the constraints.
#[derive(Debug, Clone)]
pub struct KernelMoments {
    /// `Σ ψ w`, `1 × n`.
    pub constant: Mat<f64>,

    /// `Σ ∂_d ψ w`, `dim × n`.
    pub linear: Mat<f64>,

    /// `Σ (x_b ∂_a ψ + x_a ∂_b ψ) w`, `num_mixed × n`.
    pub mixed: Mat<f64>,

    /// `Σ x_d ∂_d ψ w`, `dim × n`.
    pub square: Mat<f64>,
}

impl KernelMoments {
    /// Moments of the kernels anchored at the builder's centers, taken in the
    /// coordinates of `frame`. `quadrature` is the rule in global coordinates.
    pub fn compute(
        builder: &KernelMatrixBuilder,
        frame: &ElementFrame,
        quadrature: &Quadrature,
    ) -> BasisResult<Self> {
        let points = quadrature.points();
        let values = builder.kernel_values(points)?;

        // ∂/∂z = h ∂/∂x
        let gradients = (0..builder.dim())
            .map(|axis| {
                let mut g = builder.kernel_derivatives(points, axis)?;
                zip!(&mut g).for_each(|unzip!(x)| *x *= frame.scale);
                Ok(g)
            })
            .collect::<BasisResult<Vec<_>>>()?;

        let local = frame.localize(quadrature)?;
        Self::from_evaluations(builder.layout(), &local, values.as_ref(), &gradients)
    }

    /// Moments of arbitrary functions given their values and per-axis derivatives
    /// at the quadrature points (`Q × n` each).
    pub fn from_evaluations(
        layout: QuadraticLayout,
        quadrature: &Quadrature,
        values: MatRef<'_, f64>,
        gradients: &[Mat<f64>],
    ) -> BasisResult<Self> {
        let dim = layout.dim();
        let q = quadrature.len();
        let n = values.ncols();

        ensure_len("quadrature dimension", dim, quadrature.dim())?;
        ensure_len("evaluation rows", q, values.nrows())?;
        ensure_len("gradient axes", dim, gradients.len())?;
        for g in gradients {
            ensure_len("gradient rows", q, g.nrows())?;
            ensure_len("gradient columns", n, g.ncols())?;
        }

        let x = quadrature.points();
        let w = quadrature.weights();

        let sum = |f: &dyn Fn(usize) -> f64| (0..q).map(|p| w[p] * f(p)).sum::<f64>();

        let constant = Mat::from_fn(1, n, |_, k| sum(&|p| values[(p, k)]));

        let linear = Mat::from_fn(dim, n, |d, k| sum(&|p| gradients[d][(p, k)]));

        let mixed = Mat::from_fn(layout.num_mixed(), n, |m, k| {
            let (a, b) = layout.mixed_pair(m);
            sum(&|p| x[(p, b)] * gradients[a][(p, k)] + x[(p, a)] * gradients[b][(p, k)])
        });

        let square = Mat::from_fn(dim, n, |d, k| sum(&|p| x[(p, d)] * gradients[d][(p, k)]));

        Ok(Self {
            constant,
            linear,
            mixed,
            square,
        })
    }

    /// Constraint functionals in row order, `num_constraints × n`.
    pub fn functionals(&self, layout: &QuadraticLayout) -> Mat<f64> {
        let n = self.constant.ncols();
        let terms = layout.terms();

        Mat::from_fn(terms.len(), n, |r, k| match terms[r] {
            PolynomialTerm::Linear(i) => self.linear[(i, k)],
            PolynomialTerm::Mixed(..) => self.mixed[(r - layout.dim(), k)],
            PolynomialTerm::Quadratic(i) => 2.0 * (self.square[(i, k)] + self.constant[(0, k)]),
        })
    }
}

#[inline]
fn ind(cond: bool) -> f64 {
    if cond { 1.0 } else { 0.0 }
}

/// Closed-form moment matrix: the constraint functionals applied to each
/// non-constant polynomial term. Rows are constraints, columns are terms, both
/// in [`QuadraticLayout::terms`] order (5×5 in 2D, 9×9 in 3D).
pub fn moment_matrix(layout: &QuadraticLayout, moments: &GeometricMoments) -> Mat<f64> {
    use PolynomialTerm::*;

    let terms = layout.terms();
    let vol = moments.measure;
    let il = &moments.linear;
    let isq = &moments.square;
    let i2 = |i: usize, j: usize| moments.second(layout, i, j);

    Mat::from_fn(terms.len(), terms.len(), |row, col| match (terms[row], terms[col]) {
        (Linear(i), Linear(j)) => ind(i == j) * vol,
        (Linear(i), Mixed(c, e)) => ind(i == c) * il[e] + ind(i == e) * il[c],
        (Linear(i), Quadratic(j)) => ind(i == j) * 2.0 * il[i],

        (Mixed(a, b), Linear(j)) => ind(j == a) * il[b] + ind(j == b) * il[a],
        (Mixed(a, b), Mixed(c, e)) => {
            ind(a == c) * i2(b, e)
                + ind(a == e) * i2(b, c)
                + ind(b == c) * i2(a, e)
                + ind(b == e) * i2(a, c)
        }
        (Mixed(a, b), Quadratic(j)) => {
            ind(a == j) * 2.0 * i2(b, j) + ind(b == j) * 2.0 * i2(a, j)
        }

        (Quadratic(i), Linear(j)) => ind(i == j) * 2.0 * il[i] + 2.0 * il[j],
        (Quadratic(i), Mixed(c, e)) => {
            2.0 * (ind(i == c) * i2(i, e) + ind(i == e) * i2(i, c)) + 2.0 * i2(c, e)
        }
        (Quadratic(i), Quadratic(j)) => ind(i == j) * 4.0 * isq[i] + 2.0 * isq[j],
    })
}

/// Affine parametrization `w = L v + t` of the weights satisfying the constraints.
///
/// `v` holds the kernel weights and the constant term in the element frame. `L` is
/// the identity on the kernel rows and `t` is zero on them.
#[derive(Debug, Clone)]
pub struct NullSpaceMap {
    /// `(K + poly) × (K + 1)`.
    pub l: Mat<f64>,

    /// `(K + poly) × M`, one column per basis.
    pub t: Mat<f64>,
}

/// Builds the null-space map for the builder's kernels over the element described by
/// `quadrature`. `local_basis_integral` holds the constraint targets, one row per
/// basis.
///
/// Fails with [`BasisError::DegenerateElement`](crate::BasisError::DegenerateElement)
/// when the moment matrix is rank deficient at `rank_tolerance`.
pub fn compute_null_space_map(
    builder: &KernelMatrixBuilder,
    quadrature: &Quadrature,
    local_basis_integral: MatRef<'_, f64>,
    rank_tolerance: f64,
) -> BasisResult<NullSpaceMap> {
    let layout = builder.layout();
    let nc = layout.num_constraints();
    let k = builder.num_kernels();
    let num_bases = local_basis_integral.nrows();

    ensure_len("quadrature dimension", layout.dim(), quadrature.dim())?;
    ensure_len("local basis integral columns", nc, local_basis_integral.ncols())?;

    let frame = ElementFrame::from_quadrature(quadrature)?;
    let local = frame.localize(quadrature)?;

    let geometric = GeometricMoments::compute(layout, &local)?;
    let m = moment_matrix(&layout, &geometric);

    let kernel_functionals = KernelMoments::compute(builder, &frame, quadrature)?.functionals(&layout);
    let targets = frame.localize_functionals(&layout, local_basis_integral.transpose());

    // [ L̃ | targets ], solved against M in one pass.
    let mut rhs = Mat::<f64>::zeros(nc, k + 1 + num_bases);
    for r in 0..nc {
        for j in 0..k {
            rhs[(r, j)] = -kernel_functionals[(r, j)];
        }
    }
    for d in 0..layout.dim() {
        rhs[(layout.quadratic(d) - 1, k)] = -2.0 * geometric.measure;
    }
    rhs.subcols_mut(k + 1, num_bases).copy_from(targets.as_ref());

    let solved = linalg::solve_full_rank(m.as_ref(), rhs.as_ref(), rank_tolerance)?;

    // Polynomial blocks in frame monomials; row 0 is the constant.
    let size = layout.size();
    let mut poly_l = Mat::<f64>::zeros(size, k + 1);
    poly_l[(layout.constant(), k)] = 1.0;
    poly_l.subrows_mut(1, nc).copy_from(solved.subcols(0, k + 1));

    let mut poly_t = Mat::<f64>::zeros(size, num_bases);
    poly_t.subrows_mut(1, nc).copy_from(solved.subcols(k + 1, num_bases));

    let p = frame.polynomial_transform(&layout);
    let global_l = &p * &poly_l;
    let global_t = &p * &poly_t;

    let n = builder.num_columns();

    let mut l = Mat::<f64>::zeros(n, k + 1);
    for j in 0..k {
        l[(j, j)] = 1.0;
    }
    l.subrows_mut(k, size).copy_from(global_l.as_ref());

    let mut t = Mat::<f64>::zeros(n, num_bases);
    t.subrows_mut(k, size).copy_from(global_t.as_ref());

    Ok(NullSpaceMap { l, t })
}
