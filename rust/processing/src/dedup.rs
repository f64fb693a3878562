// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Removing duplicated and contained entities from an entity space.

use dwgsim_geometry::{
    arc_duplicates, line_duplicates, polyline_duplicates, Arc, DeletionPolicy, DuplicateReport,
    LineSegment, Polyline, Tolerance,
};
use serde::{Deserialize, Serialize};

use crate::config::ProcessingConfig;
use crate::entity::EntitySpace;
use crate::error::Result;

/// Outcome counts of [`clean_space`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanStats {
    pub precise_groups: usize,
    pub inclusions: usize,
    pub removed: usize,
    /// Polylines skipped because their vertex and bulge lists disagree.
    pub malformed: usize,
}

/// Primitives of one family together with their indices in the space.
struct Family<T> {
    indices: Vec<usize>,
    items: Vec<T>,
}

impl<T> Default for Family<T> {
    fn default() -> Self {
        Self {
            indices: Vec::new(),
            items: Vec::new(),
        }
    }
}

impl<T> Family<T> {
    fn push(&mut self, index: usize, item: T) {
        self.indices.push(index);
        self.items.push(item);
    }
}

/// Duplicate reports of one space, with indices into `space.entities`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpaceReport {
    pub lines: DuplicateReport,
    pub arcs: DuplicateReport,
    pub polylines: DuplicateReport,
    pub malformed: usize,
}

impl SpaceReport {
    fn families(&self) -> [(&'static str, &DuplicateReport); 3] {
        [
            ("line", &self.lines),
            ("arc", &self.arcs),
            ("polyline", &self.polylines),
        ]
    }

    pub fn precise_groups(&self) -> usize {
        self.families()
            .iter()
            .map(|(_, r)| r.precise_groups.len())
            .sum()
    }

    pub fn inclusions(&self) -> usize {
        self.families().iter().map(|(_, r)| r.inclusions.len()).sum()
    }
}

/// Runs the self-set classifier on every family of `space`.
pub fn classify_space(space: &EntitySpace, tol: &Tolerance) -> Result<SpaceReport> {
    let mut lines: Family<LineSegment> = Family::default();
    let mut arcs: Family<Arc> = Family::default();
    let mut polylines: Family<Polyline> = Family::default();
    let mut malformed = 0;

    for (index, entity) in space.entities.iter().enumerate() {
        let geometry = &entity.geometry;
        if let Some(line) = geometry.as_line() {
            lines.push(index, line);
        } else if let Some(arc) = geometry.as_arc() {
            arcs.push(index, arc);
        } else if let Some(poly) = geometry.as_polyline() {
            match poly {
                Ok(poly) => polylines.push(index, poly),
                Err(err) => {
                    malformed += 1;
                    tracing::warn!(error = %err.at(&space.name, index), "Skipping malformed polyline");
                }
            }
        }
    }

    let report = SpaceReport {
        lines: line_duplicates(&lines.items, tol).remap(&lines.indices),
        arcs: arc_duplicates(&arcs.items, tol).remap(&arcs.indices),
        polylines: polyline_duplicates(&polylines.items, tol)?.remap(&polylines.indices),
        malformed,
    };

    tracing::debug!(
        space = %space.name,
        lines = lines.items.len(),
        arcs = arcs.items.len(),
        polylines = polylines.items.len(),
        precise_groups = report.precise_groups(),
        inclusions = report.inclusions(),
        "Classified entity space"
    );
    Ok(report)
}

/// Entities of `space` to remove under `policy`.
///
/// Each family is resolved on its own; duplicates never cross families.
pub fn removal_mask(space: &EntitySpace, report: &SpaceReport, policy: &DeletionPolicy) -> Vec<bool> {
    let len = space.entities.len();
    let mut mask = vec![false; len];
    for (kind, family) in report.families() {
        policy.warn(kind, family);
        for (i, remove) in policy.removal_mask(len, family).into_iter().enumerate() {
            mask[i] |= remove;
        }
    }
    mask
}

/// Classifies `space`, logs findings and drops the entities the policy
/// marks.
pub fn clean_space(space: &mut EntitySpace, config: &ProcessingConfig) -> Result<CleanStats> {
    let report = classify_space(space, &config.tolerance())?;
    let mask = removal_mask(space, &report, &config.policy());

    let before = space.entities.len();
    let mut flags = mask.iter();
    space
        .entities
        .retain(|_| !flags.next().copied().unwrap_or(false));

    Ok(CleanStats {
        precise_groups: report.precise_groups(),
        inclusions: report.inclusions(),
        removed: before - space.entities.len(),
        malformed: report.malformed,
    })
}
