// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turning a [`DuplicateReport`] into warnings and a removal mask.

use crate::classify::DuplicateReport;

/// How aggressively duplicates are reported and removed.
///
/// | level | warn                      | delete                               |
/// |-------|---------------------------|--------------------------------------|
/// | 0     | nothing                   | nothing                              |
/// | 1     | precise duplicate groups  | all but the first of every group     |
/// | 2+    | also inclusions           | also the contained side of inclusions |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeletionPolicy {
    pub warn_level: u8,
    pub delete_level: u8,
}

impl DeletionPolicy {
    pub fn new(warn_level: u8, delete_level: u8) -> Self {
        Self {
            warn_level,
            delete_level,
        }
    }

    /// Logs the findings of `report` at the configured warn level.
    ///
    /// `kind` names the entity type in the log output.
    pub fn warn(&self, kind: &str, report: &DuplicateReport) {
        if self.warn_level >= 1 {
            for group in &report.precise_groups {
                tracing::warn!(kind, members = ?group, "Precise duplicates");
            }
        }
        if self.warn_level >= 2 {
            for inc in &report.inclusions {
                tracing::warn!(
                    kind,
                    container = inc.container,
                    contained = inc.contained,
                    "Entity contained in another"
                );
            }
        }
    }

    /// Entities to remove, as a mask over `len` indices.
    ///
    /// The first member of each precise group survives. At delete level 2 the
    /// contained side of an inclusion is removed too, unless its container
    /// was itself removed as a precise duplicate.
    pub fn removal_mask(&self, len: usize, report: &DuplicateReport) -> Vec<bool> {
        let mut mask = vec![false; len];
        if self.delete_level < 1 {
            return mask;
        }

        for group in &report.precise_groups {
            for &i in group.iter().skip(1) {
                mask[i] = true;
            }
        }

        if self.delete_level >= 2 {
            let removed_as_duplicate = mask.clone();
            for inc in &report.inclusions {
                if !removed_as_duplicate[inc.container] {
                    mask[inc.contained] = true;
                }
            }
        }
        mask
    }
}
