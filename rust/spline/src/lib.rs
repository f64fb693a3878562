// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # DwgSim Spline
//!
//! B-spline basis evaluation and cubic fitting for CAD spline entities.
//!
//! A spline stored by fit points (optionally with end tangents, optionally
//! closed) is converted into the equivalent clamped cubic B-spline given by
//! knots and control points. [`open_basis`] and [`periodic_basis`] evaluate
//! basis values with first and second derivatives for a whole sample vector
//! at once; [`fit_cubic`] assembles and solves the interpolation system.

pub mod basis;
pub mod curve;
pub mod error;
pub mod fit;

pub use nalgebra::{Point3, Vector3};

pub use basis::{open_basis, periodic_basis, BasisMatrices, KNOT_EPS};
pub use curve::BSpline;
pub use error::{Error, Result};
pub use fit::{fit_cubic, FitRequest, CUBIC};
