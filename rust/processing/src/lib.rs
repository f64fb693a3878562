// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # DwgSim Processing
//!
//! Drawing-level passes over an already walked CAD drawing:
//!
//! 1. **Spline reforming** rewrites splines defined by fit points as clamped
//!    cubic B-splines defined by knots and control points.
//! 2. **Duplicate cleaning** finds precise duplicates and contained entities
//!    among lines, arcs/circles and polylines and removes them according to
//!    the configured deletion level.
//!
//! Every entity space (model space, paper spaces, block definitions) is
//! independent, so spaces are processed in parallel. Failures on single
//! entities are logged and skipped.

pub mod config;
pub mod dedup;
pub mod entity;
pub mod error;
pub mod splines;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub use config::ProcessingConfig;
pub use dedup::{classify_space, clean_space, CleanStats, SpaceReport};
pub use entity::{Drawing, Entity, EntityGeometry, EntitySpace, SpaceKind, SplineEntity, SplineScenario};
pub use error::{Error, Result};
pub use splines::{reform_spline, reform_splines, ReformStats};

/// Counts for one processed entity space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceSummary {
    pub name: String,
    pub kind: SpaceKind,
    pub entities_before: usize,
    pub entities_after: usize,
    pub splines: ReformStats,
    pub duplicates: CleanStats,
    /// Set when classification of the space failed as a whole; the space is
    /// left without duplicate removal.
    pub error: Option<String>,
}

/// Counts for a whole drawing, one entry per space in drawing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub spaces: Vec<SpaceSummary>,
}

impl ProcessingSummary {
    pub fn splines_reformed(&self) -> usize {
        self.spaces.iter().map(|s| s.splines.reformed).sum()
    }

    pub fn splines_failed(&self) -> usize {
        self.spaces.iter().map(|s| s.splines.failed).sum()
    }

    pub fn precise_groups(&self) -> usize {
        self.spaces.iter().map(|s| s.duplicates.precise_groups).sum()
    }

    pub fn inclusions(&self) -> usize {
        self.spaces.iter().map(|s| s.duplicates.inclusions).sum()
    }

    pub fn removed(&self) -> usize {
        self.spaces.iter().map(|s| s.duplicates.removed).sum()
    }
}

/// Runs both passes over one space: splines first, then duplicates.
pub fn process_space(space: &mut EntitySpace, config: &ProcessingConfig) -> SpaceSummary {
    let entities_before = space.entities.len();

    let splines = if config.reform_splines {
        reform_splines(space)
    } else {
        ReformStats::default()
    };

    let (duplicates, error) = match clean_space(space, config) {
        Ok(stats) => (stats, None),
        Err(err) => {
            tracing::warn!(space = %space.name, error = %err, "Duplicate cleaning failed");
            (CleanStats::default(), Some(err.to_string()))
        }
    };

    let summary = SpaceSummary {
        name: space.name.clone(),
        kind: space.kind,
        entities_before,
        entities_after: space.entities.len(),
        splines,
        duplicates,
        error,
    };
    tracing::info!(
        space = %summary.name,
        entities = summary.entities_after,
        splines_reformed = summary.splines.reformed,
        splines_failed = summary.splines.failed,
        precise_groups = summary.duplicates.precise_groups,
        inclusions = summary.duplicates.inclusions,
        removed = summary.duplicates.removed,
        "Entity space processed"
    );
    summary
}

/// Processes every space of `drawing` in place.
pub fn process_drawing(drawing: &mut Drawing, config: &ProcessingConfig) -> ProcessingSummary {
    tracing::info!(
        spaces = drawing.spaces.len(),
        parallel = config.parallel,
        "Starting drawing processing"
    );

    let spaces: Vec<SpaceSummary> = if config.parallel {
        drawing
            .spaces
            .par_iter_mut()
            .map(|space| process_space(space, config))
            .collect()
    } else {
        drawing
            .spaces
            .iter_mut()
            .map(|space| process_space(space, config))
            .collect()
    };

    let summary = ProcessingSummary { spaces };
    tracing::info!(
        splines_reformed = summary.splines_reformed(),
        splines_failed = summary.splines_failed(),
        precise_groups = summary.precise_groups(),
        removed = summary.removed(),
        "Drawing processing complete"
    );
    summary
}
