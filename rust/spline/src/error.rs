// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for basis evaluation and spline fitting.

/// Result type alias for spline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the fitter and the basis evaluator.
///
/// Structural problems with the request are malformed input; problems that
/// depend only on magnitudes are numerical (see [`Error::is_numerical`]).
/// An ill-conditioned system is neither: it is solved by least squares.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fewer than two knots were supplied.
    #[error("at least 2 knots are required, got {0}")]
    TooFewKnots(usize),

    /// Knot and fit-point counts differ.
    #[error("{knots} knots but {points} fit points")]
    LengthMismatch { knots: usize, points: usize },

    /// Knot `index` does not exceed its predecessor.
    #[error("knots must be strictly ascending: knot {index} does not exceed its predecessor")]
    NonAscendingKnots { index: usize },

    /// Only cubic fits are implemented.
    #[error("unsupported degree {0}, only cubic fits are supported")]
    UnsupportedDegree(usize),

    /// Only value, first and second derivative are evaluated.
    #[error("derivative order {0} is not supported, expected 0..=2")]
    UnsupportedDerivative(usize),

    /// The knot vector cannot carry a basis of the requested degree.
    #[error("invalid knot vector: {0}")]
    InvalidKnotVector(String),

    /// The knot span is below the numeric floor.
    #[error("knot range {0:e} is below the numeric floor")]
    DegenerateKnotRange(f64),

    /// A non-finite value appeared in the input or the solution.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

impl Error {
    /// Whether the failure depends on magnitudes rather than structure.
    pub fn is_numerical(&self) -> bool {
        matches!(self, Error::DegenerateKnotRange(_) | Error::NonFinite(_))
    }
}
