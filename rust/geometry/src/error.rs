// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for canonicalization and indexing.

/// Result type alias for geometry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while canonicalizing or indexing primitives.
///
/// Lines and arcs never produce errors, degenerate input included. Only
/// structurally malformed input is rejected.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A polyline must have at least one vertex.
    #[error("polyline has no vertices")]
    EmptyPolyline,

    /// Every polyline vertex carries exactly one bulge.
    #[error("polyline has {vertices} vertices but {bulges} bulges")]
    BulgeCountMismatch { vertices: usize, bulges: usize },

    /// A vector handed to a dynamically sized index has the wrong length.
    #[error("point {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}
