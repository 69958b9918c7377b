use faer::Mat;
use meshfree_basis::{
    BasisParams, KernelType, RBFQuadraticBasis, ReferenceElements, closure_sink,
    constraints::KernelMoments, polynomials::QuadraticLayout,
};

/// Bilinear nodal functions of the unit square and their derivatives.
fn bilinear(points: &Mat<f64>) -> (Mat<f64>, Vec<Mat<f64>>) {
    let n = points.nrows();
    // Corner `j` sits at ((j >> 0) & 1, (j >> 1) & 1), as in `box_corners`.
    let corner = |j: usize, d: usize| ((j >> d) & 1) as f64;

    let factor = |c: f64, x: f64| if c == 0.0 { 1.0 - x } else { x };
    let slope = |c: f64| if c == 0.0 { -1.0 } else { 1.0 };

    let values = Mat::from_fn(n, 4, |i, j| {
        factor(corner(j, 0), points[(i, 0)]) * factor(corner(j, 1), points[(i, 1)])
    });
    let dx = Mat::from_fn(n, 4, |i, j| {
        slope(corner(j, 0)) * factor(corner(j, 1), points[(i, 1)])
    });
    let dy = Mat::from_fn(n, 4, |i, j| {
        factor(corner(j, 0), points[(i, 0)]) * slope(corner(j, 1))
    });

    (values, vec![dx, dy])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Kernel centers at the corners, 16 samples on the boundary.
    let centers = ReferenceElements::box_corners(&[0.0, 0.0], &[1.0, 1.0])?;
    let samples = ReferenceElements::unit_square_boundary(4);

    // One basis per corner, matching the bilinear nodal functions on the boundary.
    let (rhs, _) = bilinear(&samples);

    // Weak-form targets integrated with a 3x3 Gauss rule.
    let quadrature = ReferenceElements::box_quadrature(&[0.0, 0.0], &[1.0, 1.0], 3)?;
    let (values, grads) = bilinear(&quadrature.points().to_owned());
    let layout = QuadraticLayout::new(2)?;
    let local_basis_integral =
        KernelMoments::from_evaluations(layout, &quadrature, values.as_ref(), &grads)?
            .functionals(&layout)
            .transpose()
            .to_owned();

    let (sink, handle) = closure_sink(16, |msg| println!("{:?}", msg));

    let params = BasisParams::builder(KernelType::Harmonic)
        .report_residuals(true)
        .build();

    let basis = RBFQuadraticBasis::builder(centers, samples.as_ref(), rhs.as_ref())
        .constraints(&quadrature, local_basis_integral.as_ref())
        .params(params)
        .diagnostics(sink)
        .build()?;

    let residuals = basis.constraint_residuals(&quadrature, local_basis_integral.as_ref())?;
    let worst = (0..residuals.nrows())
        .flat_map(|i| (0..residuals.ncols()).map(move |j| (i, j)))
        .fold(0.0f64, |acc, (i, j)| acc.max(residuals[(i, j)].abs()));
    println!("max constraint residual: {:e}", worst);

    // Evaluate the first basis and its gradient at the element center.
    let center = faer::mat![[0.5, 0.5]];
    println!("u_0(0.5, 0.5) = {:?}", basis.basis(0, center.as_ref())?);
    println!("grad u_0(0.5, 0.5) = {:?}", basis.grad(0, center.as_ref())?);

    drop(basis);
    handle.join().map_err(|_| "diagnostics listener panicked")?;

    Ok(())
}
