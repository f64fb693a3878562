// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cox–de Boor basis evaluation with first and second derivatives.
//!
//! Degree-0 indicators use closed intervals `[K[i], K[i+1]]` and every sample
//! column is divided by its sum, so a sample sitting on an interior knot (or
//! on the last knot) still gets a partition of unity. The recursion then
//! raises all rows one degree at a time for all samples at once.

use nalgebra::DMatrix;

use crate::error::{Error, Result};

/// Added to every denominator so repeated knots never divide by zero.
pub const KNOT_EPS: f64 = 1e-200;

/// Basis values and derivatives, one row per basis function and one column
/// per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisMatrices {
    pub values: DMatrix<f64>,
    pub first: DMatrix<f64>,
    pub second: DMatrix<f64>,
}

impl BasisMatrices {
    pub fn bases(&self) -> usize {
        self.values.nrows()
    }

    pub fn samples(&self) -> usize {
        self.values.ncols()
    }

    /// Row `order` of the value/derivative stack.
    pub fn order(&self, order: usize) -> Option<&DMatrix<f64>> {
        match order {
            0 => Some(&self.values),
            1 => Some(&self.first),
            2 => Some(&self.second),
            _ => None,
        }
    }
}

fn check_finite(values: &[f64], what: &'static str) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::NonFinite(what))
    }
}

/// Evaluates the `knots.len() - degree - 1` bases of an open knot vector.
///
/// Knots must be non-decreasing. Samples outside `[K[0], K[last]]` evaluate
/// to zero in every row.
pub fn open_basis(degree: usize, knots: &[f64], samples: &[f64]) -> Result<BasisMatrices> {
    let m = knots.len();
    if m < degree + 2 {
        return Err(Error::InvalidKnotVector(format!(
            "{m} knots cannot carry a degree {degree} basis"
        )));
    }
    check_finite(knots, "knot vector")?;
    check_finite(samples, "sample parameters")?;
    if let Some(i) = knots.windows(2).position(|w| w[1] < w[0]) {
        return Err(Error::InvalidKnotVector(format!(
            "knot {} decreases",
            i + 1
        )));
    }

    let rows = m - 1;
    let cols = samples.len();

    let mut values = DMatrix::zeros(rows, cols);
    for i in 0..rows {
        let (lo, hi) = (knots[i], knots[i + 1]);
        if lo < hi {
            for (s, &x) in samples.iter().enumerate() {
                if lo <= x && x <= hi {
                    values[(i, s)] = 1.0;
                }
            }
        }
    }
    for mut column in values.column_iter_mut() {
        let total = column.sum() + KNOT_EPS;
        column /= total;
    }

    let mut first = DMatrix::zeros(rows, cols);
    let mut second = DMatrix::zeros(rows, cols);

    for j in 1..=degree {
        let mut next = DMatrix::zeros(rows, cols);
        let mut next_first = DMatrix::zeros(rows, cols);
        let mut next_second = DMatrix::zeros(rows, cols);

        for i in 0..rows - j {
            let left = knots[i + j] - knots[i] + KNOT_EPS;
            let right = knots[i + j + 1] - knots[i + 1] + KNOT_EPS;
            for (s, &x) in samples.iter().enumerate() {
                let w1 = (x - knots[i]) / left;
                let w2 = (knots[i + j + 1] - x) / right;
                next[(i, s)] = w1 * values[(i, s)] + w2 * values[(i + 1, s)];
                next_first[(i, s)] = values[(i, s)] / left + w1 * first[(i, s)]
                    - values[(i + 1, s)] / right
                    + w2 * first[(i + 1, s)];
                next_second[(i, s)] = 2.0 * first[(i, s)] / left + w1 * second[(i, s)]
                    - 2.0 * first[(i + 1, s)] / right
                    + w2 * second[(i + 1, s)];
            }
        }

        values = next;
        first = next_first;
        second = next_second;
    }

    let bases = m - degree - 1;
    let extra = rows - bases;
    Ok(BasisMatrices {
        values: values.remove_rows(bases, extra),
        first: first.remove_rows(bases, extra),
        second: second.remove_rows(bases, extra),
    })
}

/// Evaluates a periodic basis over one period of breakpoints.
///
/// `breakpoints` spans exactly one period, so the last breakpoint is the
/// first one shifted by the period. The result has one row per breakpoint
/// interval; basis functions that wrap around the seam are folded back onto
/// their row. Samples may lie anywhere; they are reduced modulo the period.
pub fn periodic_basis(
    degree: usize,
    breakpoints: &[f64],
    samples: &[f64],
) -> Result<BasisMatrices> {
    if breakpoints.len() < 2 {
        return Err(Error::InvalidKnotVector(format!(
            "a periodic basis needs at least 2 breakpoints, got {}",
            breakpoints.len()
        )));
    }
    check_finite(breakpoints, "breakpoints")?;
    check_finite(samples, "sample parameters")?;

    let intervals = breakpoints.len() - 1;
    let start = breakpoints[0];
    let period = breakpoints[intervals] - start;
    if period <= KNOT_EPS {
        return Err(Error::DegenerateKnotRange(period));
    }

    // enough copies on each side that every basis touching the central
    // period is complete
    let copies = degree.div_ceil(intervals);
    let tiles = 2 * copies + 1;
    let extended: Vec<f64> = (0..=tiles * intervals)
        .map(|k| breakpoints[k % intervals] + period * (k / intervals) as f64)
        .collect();
    let shifted: Vec<f64> = samples
        .iter()
        .map(|&s| start + (s - start).rem_euclid(period) + copies as f64 * period)
        .collect();

    let open = open_basis(degree, &extended, &shifted)?;
    let fold = |m: &DMatrix<f64>| {
        let mut out = DMatrix::zeros(intervals, samples.len());
        for (k, row) in m.row_iter().enumerate() {
            let mut target = out.row_mut(k % intervals);
            target += row;
        }
        out
    };

    Ok(BasisMatrices {
        values: fold(&open.values),
        first: fold(&open.first),
        second: fold(&open.second),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn clamped(inner: &[f64]) -> Vec<f64> {
        let (a, b) = (inner[0], inner[inner.len() - 1]);
        let mut k = vec![a; 3];
        k.extend_from_slice(inner);
        k.extend([b; 3]);
        k
    }

    fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| a + (b - a) * i as f64 / (n - 1) as f64).collect()
    }

    #[test]
    fn shape_is_bases_by_samples() {
        let knots = clamped(&[0.0, 1.0, 2.0, 4.0]);
        let basis = open_basis(3, &knots, &[0.0, 0.5, 4.0]).unwrap();
        assert_eq!(basis.bases(), knots.len() - 4);
        assert_eq!(basis.samples(), 3);
        assert_eq!(basis.first.shape(), basis.values.shape());
        assert_eq!(basis.second.shape(), basis.values.shape());
    }

    #[test]
    fn partition_of_unity_including_knots() {
        let knots = clamped(&[0.0, 1.0, 2.5, 3.0, 7.0]);
        let samples = linspace(0.0, 7.0, 29);
        let basis = open_basis(3, &knots, &samples).unwrap();
        for s in 0..samples.len() {
            assert_relative_eq!(basis.values.column(s).sum(), 1.0, epsilon = 1e-10);
            assert_relative_eq!(basis.first.column(s).sum(), 0.0, epsilon = 1e-10);
            assert_relative_eq!(basis.second.column(s).sum(), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn clamped_ends_interpolate() {
        let knots = clamped(&[0.0, 1.0, 2.0]);
        let basis = open_basis(3, &knots, &[0.0, 2.0]).unwrap();
        let last = basis.bases() - 1;
        assert_relative_eq!(basis.values[(0, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(basis.values[(last, 1)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let knots = clamped(&[0.0, 1.0, 2.5, 3.0, 7.0]);
        let h = 1e-6;
        for x in [0.3, 1.7, 2.9, 5.5] {
            let b = open_basis(3, &knots, &[x - h, x, x + h]).unwrap();
            for i in 0..b.bases() {
                let d1 = (b.values[(i, 2)] - b.values[(i, 0)]) / (2.0 * h);
                let d2 = (b.first[(i, 2)] - b.first[(i, 0)]) / (2.0 * h);
                assert_relative_eq!(b.first[(i, 1)], d1, epsilon = 1e-5);
                assert_relative_eq!(b.second[(i, 1)], d2, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn degree_zero_is_normalized_indicator() {
        let basis = open_basis(0, &[0.0, 1.0, 2.0], &[0.5, 1.0, 2.0]).unwrap();
        assert_eq!(basis.values[(0, 0)], 1.0);
        assert_eq!(basis.values[(1, 0)], 0.0);
        // shared knot is split between both intervals
        assert_relative_eq!(basis.values[(0, 1)], 0.5);
        assert_relative_eq!(basis.values[(1, 1)], 0.5);
        assert_relative_eq!(basis.values[(1, 2)], 1.0);
    }

    #[test]
    fn rejects_short_or_decreasing_knots() {
        assert!(matches!(
            open_basis(3, &[0.0, 1.0, 2.0, 3.0], &[0.5]),
            Err(Error::InvalidKnotVector(_))
        ));
        assert!(matches!(
            open_basis(1, &[0.0, 2.0, 1.0], &[0.5]),
            Err(Error::InvalidKnotVector(_))
        ));
        assert!(matches!(
            open_basis(1, &[0.0, 1.0, 2.0], &[f64::NAN]),
            Err(Error::NonFinite(_))
        ));
    }

    #[test]
    fn periodic_partition_of_unity() {
        for breakpoints in [
            vec![0.0, 1.0, 2.5, 3.0],
            vec![0.0, 2.0],
            vec![0.0, 1.0, 3.0],
            vec![0.0, 0.5, 1.0, 2.0, 3.5, 4.0],
        ] {
            let period = breakpoints[breakpoints.len() - 1];
            let samples = linspace(-period, 2.0 * period, 31);
            let basis = periodic_basis(3, &breakpoints, &samples).unwrap();
            assert_eq!(basis.bases(), breakpoints.len() - 1);
            for s in 0..samples.len() {
                assert_relative_eq!(basis.values.column(s).sum(), 1.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn periodic_basis_is_continuous_across_seam() {
        let breakpoints = [0.0, 0.5, 1.0, 2.0, 3.5, 4.0];
        let h = 1e-9;
        let basis = periodic_basis(3, &breakpoints, &[4.0 - h, h]).unwrap();
        for i in 0..basis.bases() {
            assert_relative_eq!(basis.values[(i, 0)], basis.values[(i, 1)], epsilon = 1e-7);
            assert_relative_eq!(basis.first[(i, 0)], basis.first[(i, 1)], epsilon = 1e-7);
            assert_relative_eq!(basis.second[(i, 0)], basis.second[(i, 1)], epsilon = 1e-6);
        }
    }

    #[test]
    fn periodic_rejects_zero_period() {
        let err = periodic_basis(3, &[5.0, 5.0], &[5.0]).unwrap_err();
        assert!(err.is_numerical());
    }
}
