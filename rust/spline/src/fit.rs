// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cubic B-spline interpolation through fit points.
//!
//! For `N` fit points at parameters `u` the fitter builds the clamped knot
//! vector `[u0, u0, u0, u..., uN, uN, uN]` and solves for `N + 2` control
//! points. The `N` interpolation equations are completed by one boundary
//! equation at each end:
//!
//! - **free**: zero second derivative, selected by a zero tangent vector;
//! - **tangent**: the first derivative equals the given tangent;
//! - **periodic**: first and second derivatives agree across the seam.
//!   Tangents are ignored.

use nalgebra::{DMatrix, Point3, Vector3};

use crate::basis::{open_basis, BasisMatrices, KNOT_EPS};
use crate::curve::BSpline;
use crate::error::{Error, Result};

/// The only degree the fitter supports.
pub const CUBIC: usize = 3;

/// Singular values below this fraction of the largest are dropped by the
/// least-squares fallback.
const SVD_RELATIVE_EPS: f64 = 1e-12;

/// Input of [`fit_cubic`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitRequest {
    pub degree: usize,
    /// Parameter of each fit point, strictly ascending.
    pub knots: Vec<f64>,
    pub points: Vec<Point3<f64>>,
    /// Zero means a free (natural) start.
    pub start_tangent: Vector3<f64>,
    /// Zero means a free (natural) end.
    pub end_tangent: Vector3<f64>,
    pub periodic: bool,
}

impl FitRequest {
    /// A free/free cubic request.
    pub fn new(knots: Vec<f64>, points: Vec<Point3<f64>>) -> Self {
        Self {
            degree: CUBIC,
            knots,
            points,
            start_tangent: Vector3::zeros(),
            end_tangent: Vector3::zeros(),
            periodic: false,
        }
    }

    /// A request parameterized by cumulative chord length, starting at 0.
    pub fn chord_length(points: Vec<Point3<f64>>) -> Self {
        let mut knots = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += (p - points[i - 1]).norm();
            }
            knots.push(total);
        }
        Self::new(knots, points)
    }

    pub fn with_tangents(mut self, start: Vector3<f64>, end: Vector3<f64>) -> Self {
        self.start_tangent = start;
        self.end_tangent = end;
        self
    }

    pub fn with_periodic(mut self, periodic: bool) -> Self {
        self.periodic = periodic;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.degree != CUBIC {
            return Err(Error::UnsupportedDegree(self.degree));
        }
        let n = self.knots.len();
        if n < 2 {
            return Err(Error::TooFewKnots(n));
        }
        if n != self.points.len() {
            return Err(Error::LengthMismatch {
                knots: n,
                points: self.points.len(),
            });
        }

        let finite = self.knots.iter().all(|k| k.is_finite())
            && self.points.iter().all(|p| p.coords.iter().all(|c| c.is_finite()))
            && self.start_tangent.iter().all(|c| c.is_finite())
            && self.end_tangent.iter().all(|c| c.is_finite());
        if !finite {
            return Err(Error::NonFinite("fit request"));
        }

        let (lo, hi) = self
            .knots
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &k| {
                (lo.min(k), hi.max(k))
            });
        if hi - lo <= KNOT_EPS {
            return Err(Error::DegenerateKnotRange(hi - lo));
        }
        if let Some(i) = self.knots.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::NonAscendingKnots { index: i + 1 });
        }
        Ok(())
    }
}

/// Copies column `sample` of `basis` into row `row` of `a`.
fn set_row(a: &mut DMatrix<f64>, row: usize, basis: &DMatrix<f64>, sample: usize) {
    for c in 0..a.ncols() {
        a[(row, c)] = basis[(c, sample)];
    }
}

/// Fills the boundary equation `row` for the fit point at `sample`.
fn set_boundary(
    a: &mut DMatrix<f64>,
    rhs: &mut DMatrix<f64>,
    row: usize,
    basis: &BasisMatrices,
    sample: usize,
    tangent: &Vector3<f64>,
) {
    if tangent.iter().all(|&c| c == 0.0) {
        set_row(a, row, &basis.second, sample);
    } else {
        set_row(a, row, &basis.first, sample);
        for (c, &v) in tangent.iter().enumerate() {
            rhs[(row, c)] = v;
        }
    }
}

/// Solves `a x = rhs` by LU, falling back to least squares when `a` is
/// singular or LU produces non-finite values.
fn solve(a: DMatrix<f64>, rhs: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let lu = a.clone().lu();
    if lu.is_invertible() {
        if let Some(x) = lu.solve(rhs) {
            if x.iter().all(|v| v.is_finite()) {
                return Ok(x);
            }
        }
    }

    tracing::debug!(
        size = a.nrows(),
        "Spline system is singular, solving by least squares"
    );
    let svd = a.svd(true, true);
    let eps = svd.singular_values.max() * SVD_RELATIVE_EPS;
    let x = svd
        .solve(rhs, eps)
        .map_err(|_| Error::NonFinite("least-squares solution"))?;
    if x.iter().all(|v| v.is_finite()) {
        Ok(x)
    } else {
        Err(Error::NonFinite("least-squares solution"))
    }
}

/// Fits a cubic B-spline through `request.points`.
///
/// The curve passes through every fit point at its knot parameter. The
/// result carries the clamped knot vector (`N + 6` knots) and `N + 2`
/// control points.
pub fn fit_cubic(request: &FitRequest) -> Result<BSpline> {
    request.validate()?;

    let n = request.knots.len();
    let first = request.knots[0];
    let last = request.knots[n - 1];

    let mut knots = Vec::with_capacity(n + 6);
    knots.extend([first; 3]);
    knots.extend_from_slice(&request.knots);
    knots.extend([last; 3]);

    let basis = open_basis(CUBIC, &knots, &request.knots)?;
    let size = n + 2;
    let mut a = DMatrix::zeros(size, size);
    let mut rhs = DMatrix::zeros(size, 3);

    for (k, point) in request.points.iter().enumerate() {
        set_row(&mut a, k + 1, &basis.values, k);
        for (c, &v) in point.coords.iter().enumerate() {
            rhs[(k + 1, c)] = v;
        }
    }

    if request.periodic {
        for c in 0..size {
            a[(0, c)] = basis.first[(c, 0)] - basis.first[(c, n - 1)];
            a[(size - 1, c)] = basis.second[(c, 0)] - basis.second[(c, n - 1)];
        }
    } else {
        set_boundary(&mut a, &mut rhs, 0, &basis, 0, &request.start_tangent);
        set_boundary(&mut a, &mut rhs, size - 1, &basis, n - 1, &request.end_tangent);
    }

    let solution = solve(a, &rhs)?;
    let control_points = solution
        .row_iter()
        .map(|r| Point3::new(r[0], r[1], r[2]))
        .collect();

    BSpline::new(CUBIC, knots, control_points)
}
