// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Non-rational B-spline curves.

use nalgebra::{Point3, Vector3};

use crate::basis::open_basis;
use crate::error::{Error, Result};

/// A B-spline curve over an open knot vector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BSpline {
    pub degree: usize,
    pub knots: Vec<f64>,
    pub control_points: Vec<Point3<f64>>,
}

impl BSpline {
    /// Checks that `knots.len() == control_points.len() + degree + 1`.
    pub fn new(degree: usize, knots: Vec<f64>, control_points: Vec<Point3<f64>>) -> Result<Self> {
        if knots.len() != control_points.len() + degree + 1 {
            return Err(Error::InvalidKnotVector(format!(
                "{} knots for {} control points of degree {degree}",
                knots.len(),
                control_points.len()
            )));
        }
        Ok(Self {
            degree,
            knots,
            control_points,
        })
    }

    /// The parameter range `[K[p], K[m-p-1]]` on which the curve is defined.
    pub fn domain(&self) -> (f64, f64) {
        let m = self.knots.len();
        (self.knots[self.degree], self.knots[m - self.degree - 1])
    }

    /// The point at parameter `s`.
    pub fn evaluate(&self, s: f64) -> Result<Point3<f64>> {
        self.derivative(s, 0).map(Point3::from)
    }

    /// The `order`-th derivative (0, 1 or 2) with respect to the parameter.
    ///
    /// Order 0 returns the position vector. Outside the knot range every
    /// basis vanishes and the result is zero.
    pub fn derivative(&self, s: f64, order: usize) -> Result<Vector3<f64>> {
        let mut out = self.sample(&[s], order)?;
        out.pop().ok_or(Error::NonFinite("curve sample"))
    }

    /// Derivatives of order `order` at every parameter in `params`.
    pub fn sample(&self, params: &[f64], order: usize) -> Result<Vec<Vector3<f64>>> {
        let basis = open_basis(self.degree, &self.knots, params)?;
        let matrix = basis
            .order(order)
            .ok_or(Error::UnsupportedDerivative(order))?;

        let out = (0..params.len())
            .map(|s| {
                self.control_points
                    .iter()
                    .enumerate()
                    .fold(Vector3::zeros(), |acc, (i, p)| acc + p.coords * matrix[(i, s)])
            })
            .collect();
        Ok(out)
    }
}
