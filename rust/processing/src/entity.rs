// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory entity model of a walked drawing.
//!
//! Coordinates are plain `[f64; 3]` arrays so the model serializes to flat
//! JSON; conversion into the geometry types happens per pass.

use dwgsim_geometry::{Arc, LineSegment, Point3, Polyline, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which block record an entity space belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceKind {
    Model,
    Paper,
    Block,
}

/// A drawing as a list of independent entity spaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub spaces: Vec<EntitySpace>,
}

/// The entities owned by model space, a paper space or a block definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpace {
    pub kind: SpaceKind,
    pub name: String,
    pub entities: Vec<Entity>,
}

impl EntitySpace {
    pub fn new(kind: SpaceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            entities: Vec::new(),
        }
    }

    pub fn with_entities(mut self, entities: Vec<Entity>) -> Self {
        self.entities = entities;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub layer_id: u32,
    pub geometry: EntityGeometry,
}

impl Entity {
    pub fn new(layer_id: u32, geometry: EntityGeometry) -> Self {
        Self { layer_id, geometry }
    }
}

/// Geometry of an entity. Types the passes do not handle are carried as
/// [`EntityGeometry::Other`] and never touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityGeometry {
    Line {
        start: [f64; 3],
        end: [f64; 3],
        extrusion: [f64; 3],
    },
    Arc {
        center: [f64; 3],
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        extrusion: [f64; 3],
    },
    Circle {
        center: [f64; 3],
        radius: f64,
        extrusion: [f64; 3],
    },
    /// Lightweight, 2D and 3D polylines. 3D polylines carry zero bulges.
    Polyline {
        vertices: Vec<[f64; 3]>,
        bulges: Vec<f64>,
        extrusion: [f64; 3],
    },
    Spline(SplineEntity),
    Other {
        type_name: String,
    },
}

impl EntityGeometry {
    pub fn type_name(&self) -> &str {
        match self {
            EntityGeometry::Line { .. } => "line",
            EntityGeometry::Arc { .. } => "arc",
            EntityGeometry::Circle { .. } => "circle",
            EntityGeometry::Polyline { .. } => "polyline",
            EntityGeometry::Spline(_) => "spline",
            EntityGeometry::Other { type_name } => type_name,
        }
    }

    pub fn as_line(&self) -> Option<LineSegment> {
        match self {
            EntityGeometry::Line { start, end, .. } => {
                Some(LineSegment::new(point(start), point(end)))
            }
            _ => None,
        }
    }

    /// Arcs and circles as [`Arc`]; circles span the full turn.
    pub fn as_arc(&self) -> Option<Arc> {
        match self {
            EntityGeometry::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                extrusion,
            } => Some(Arc::new(
                vector(extrusion),
                point(center),
                *radius,
                *start_angle,
                *end_angle,
            )),
            EntityGeometry::Circle {
                center,
                radius,
                extrusion,
            } => Some(Arc::circle(vector(extrusion), point(center), *radius)),
            _ => None,
        }
    }

    /// Polylines as [`Polyline`]; `None` for other types, an error for
    /// malformed vertex/bulge lists.
    pub fn as_polyline(&self) -> Option<Result<Polyline>> {
        match self {
            EntityGeometry::Polyline {
                vertices,
                bulges,
                extrusion,
            } => {
                let points: Vec<Point3<f64>> = vertices.iter().map(point).collect();
                Some(Polyline::from_parts(vector(extrusion), &points, bulges).map_err(Into::into))
            }
            _ => None,
        }
    }
}

/// How a spline entity is currently defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplineScenario {
    /// Defined by fit points, optional knots and end tangents.
    Fit,
    /// Defined by knots and control points.
    Control,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplineEntity {
    pub scenario: SplineScenario,
    pub degree: usize,
    pub periodic: bool,
    pub rational: bool,
    /// Zero when the start is free.
    pub begin_tangent: [f64; 3],
    /// Zero when the end is free.
    pub end_tangent: [f64; 3],
    pub fit_points: Vec<[f64; 3]>,
    pub knots: Vec<f64>,
    /// `(x, y, z, weight)`.
    pub control_points: Vec<[f64; 4]>,
}

impl SplineEntity {
    /// A cubic spline through `fit_points` with free ends.
    pub fn through(fit_points: Vec<[f64; 3]>) -> Self {
        Self {
            scenario: SplineScenario::Fit,
            degree: 3,
            periodic: false,
            rational: false,
            begin_tangent: [0.0; 3],
            end_tangent: [0.0; 3],
            fit_points,
            knots: Vec::new(),
            control_points: Vec::new(),
        }
    }
}

pub(crate) fn point(p: &[f64; 3]) -> Point3<f64> {
    Point3::new(p[0], p[1], p[2])
}

pub(crate) fn vector(v: &[f64; 3]) -> Vector3<f64> {
    Vector3::new(v[0], v[1], v[2])
}
