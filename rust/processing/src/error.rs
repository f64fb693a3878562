// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the drawing passes.

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while processing single entities.
///
/// Passes never abort a drawing on these; they log them and move on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("geometry error: {0}")]
    Geometry(#[from] dwgsim_geometry::Error),

    #[error("spline error: {0}")]
    Spline(#[from] dwgsim_spline::Error),

    /// The entity does not carry the data a pass needs.
    #[error("unsupported entity: {0}")]
    Unsupported(String),

    /// A failure attributed to one entity of one space.
    #[error("{space}[{index}]: {source}")]
    Entity {
        space: String,
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attaches the location of the failing entity.
    pub fn at(self, space: &str, index: usize) -> Self {
        Error::Entity {
            space: space.to_string(),
            index,
            source: Box::new(self),
        }
    }

    /// Whether the root cause is numerical rather than malformed input.
    pub fn is_numerical(&self) -> bool {
        match self {
            Error::Spline(e) => e.is_numerical(),
            Error::Entity { source, .. } => source.is_numerical(),
            Error::Geometry(_) | Error::Unsupported(_) => false,
        }
    }
}
