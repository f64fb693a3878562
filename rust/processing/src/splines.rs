// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rewriting fit-point splines as control-point splines.

use dwgsim_spline::{fit_cubic, FitRequest};
use serde::{Deserialize, Serialize};

use crate::entity::{point, vector, EntityGeometry, EntitySpace, SplineEntity, SplineScenario};
use crate::error::Result;

/// Outcome counts of [`reform_splines`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReformStats {
    pub reformed: usize,
    pub failed: usize,
}

/// Builds the fit request for a spline in the fit scenario.
///
/// Without stored knots the fit points are parameterized by chord length.
pub fn fit_request(spline: &SplineEntity) -> FitRequest {
    let points = spline.fit_points.iter().map(point).collect();
    let mut request = if spline.knots.is_empty() {
        FitRequest::chord_length(points)
    } else {
        FitRequest::new(spline.knots.clone(), points)
    };
    request.degree = spline.degree;
    request
        .with_tangents(vector(&spline.begin_tangent), vector(&spline.end_tangent))
        .with_periodic(spline.periodic)
}

/// Fits `spline` and switches it to the control scenario.
///
/// On error the spline is left unchanged.
pub fn reform_spline(spline: &mut SplineEntity) -> Result<()> {
    let curve = fit_cubic(&fit_request(spline))?;

    spline.scenario = SplineScenario::Control;
    spline.degree = curve.degree;
    spline.rational = false;
    spline.knots = curve.knots;
    spline.control_points = curve
        .control_points
        .iter()
        .map(|p| [p.x, p.y, p.z, 1.0])
        .collect();
    spline.fit_points.clear();
    spline.begin_tangent = [0.0; 3];
    spline.end_tangent = [0.0; 3];
    Ok(())
}

/// Reforms every fit-scenario spline of `space`.
///
/// Failures are logged and counted; the remaining splines are still processed.
pub fn reform_splines(space: &mut EntitySpace) -> ReformStats {
    let mut stats = ReformStats::default();
    for (index, entity) in space.entities.iter_mut().enumerate() {
        let EntityGeometry::Spline(spline) = &mut entity.geometry else {
            continue;
        };
        if spline.scenario != SplineScenario::Fit {
            continue;
        }

        match reform_spline(spline) {
            Ok(()) => stats.reformed += 1,
            Err(err) => {
                stats.failed += 1;
                let err = err.at(&space.name, index);
                tracing::warn!(
                    error = %err,
                    numerical = err.is_numerical(),
                    "Spline reform failed, keeping fit points"
                );
            }
        }
    }

    tracing::debug!(
        space = %space.name,
        reformed = stats.reformed,
        failed = stats.failed,
        "Spline reform pass complete"
    );
    stats
}
