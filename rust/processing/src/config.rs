// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Processing configuration loaded from environment variables.

use std::str::FromStr;

use dwgsim_geometry::{DeletionPolicy, Tolerance};
use serde::{Deserialize, Serialize};

/// Settings for [`process_drawing`](crate::process_drawing).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Coarse grouping radius in normalized canonical space.
    pub eps: f64,
    /// Interval tolerance in drawing units.
    pub length_eps: f64,
    /// 0: silent, 1: log duplicate groups, 2: also log inclusions.
    pub warn_level: u8,
    /// 0: keep all, 1: remove duplicates, 2: also remove contained entities.
    pub delete_level: u8,
    /// Rewrite fit-point splines as control-point splines.
    pub reform_splines: bool,
    /// Process entity spaces on the rayon pool.
    pub parallel: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        let tol = Tolerance::default();
        Self {
            eps: tol.eps,
            length_eps: tol.length_eps,
            warn_level: 0,
            delete_level: 0,
            reform_splines: true,
            parallel: true,
        }
    }
}

impl ProcessingConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            eps: parse_or(&lookup, "DWGSIM_EPS", d.eps),
            length_eps: parse_or(&lookup, "DWGSIM_LENGTH_EPS", d.length_eps),
            warn_level: parse_or(&lookup, "DWGSIM_DUP_WARN", d.warn_level),
            delete_level: parse_or(&lookup, "DWGSIM_DUP_DEL", d.delete_level),
            reform_splines: flag_or(&lookup, "DWGSIM_REFORM_SPLINES", d.reform_splines),
            parallel: flag_or(&lookup, "DWGSIM_PARALLEL", d.parallel),
        }
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.eps, self.length_eps)
    }

    pub fn policy(&self) -> DeletionPolicy {
        DeletionPolicy::new(self.warn_level, self.delete_level)
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
