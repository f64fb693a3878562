// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # DwgSim Geometry
//!
//! Duplicate and inclusion detection for 2D/3D CAD primitives.
//!
//! Lines, arcs (circles included) and bulged polylines are mapped to
//! scale-normalized canonical vectors, indexed in a [`KdTree`], and grouped
//! with a [`DisjointSet`]. Inside each coarse group the 1D extents of the
//! members are compared to tell precise duplicates from inclusions.
//!
//! ```
//! use dwgsim_geometry::{line_duplicates, LineSegment, Tolerance};
//!
//! let lines = [
//!     LineSegment::from_row([0.0, 0.0, 0.0, 4.0, 0.0, 0.0]),
//!     LineSegment::from_row([4.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
//!     LineSegment::from_row([1.0, 0.0, 0.0, 2.0, 0.0, 0.0]),
//! ];
//! let report = line_duplicates(&lines, &Tolerance::default());
//! assert_eq!(report.precise_groups, vec![vec![0, 1]]);
//! assert_eq!(report.inclusions.len(), 1);
//! ```

pub mod canonical;
pub mod classify;
pub mod error;
pub mod policy;
pub mod primitives;
pub mod spatial;
pub mod union_find;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use canonical::{CanonicalArc, InfiniteLine, PolylineScale, ScaleStats};
pub use classify::{
    arc_duplicates, line_coarse_groups, line_duplicates, point_duplicates, polyline_duplicates,
    ArcReference, CrossMatch, CrossReport, DuplicateReport, Inclusion, LineReference,
    PolylineReference, Tolerance,
};
pub use error::{Error, Result};
pub use policy::DeletionPolicy;
pub use primitives::{Arc, LineSegment, Polyline, PolylineVertex};
pub use spatial::{KdTree, Neighbor};
pub use union_find::DisjointSet;
