// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plain geometric primitives as handed over by the drawing walker.

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSegment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl LineSegment {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    /// Builds a segment from a flat `[x0, y0, z0, x1, y1, z1]` row.
    pub fn from_row(row: [f64; 6]) -> Self {
        Self {
            start: Point3::new(row[0], row[1], row[2]),
            end: Point3::new(row[3], row[4], row[5]),
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// A circular arc in the plane defined by `extrusion`.
///
/// Angles are measured in the object coordinate system of the extrusion, in
/// radians. Circles are arcs spanning `[0, 2π)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc {
    pub extrusion: Vector3<f64>,
    pub center: Point3<f64>,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Arc {
    pub fn new(
        extrusion: Vector3<f64>,
        center: Point3<f64>,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        Self {
            extrusion,
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// A full circle.
    pub fn circle(extrusion: Vector3<f64>, center: Point3<f64>, radius: f64) -> Self {
        Self::new(extrusion, center, radius, 0.0, TAU)
    }
}

/// A polyline vertex with the bulge of the segment that starts at it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolylineVertex {
    pub point: Point3<f64>,
    pub bulge: f64,
}

/// An ordered list of vertices, each carrying a bulge.
///
/// The bulge of the last vertex only matters for closed polylines.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline {
    pub extrusion: Vector3<f64>,
    pub vertices: Vec<PolylineVertex>,
}

impl Polyline {
    pub fn new(extrusion: Vector3<f64>, vertices: Vec<PolylineVertex>) -> Self {
        Self {
            extrusion,
            vertices,
        }
    }

    /// Zips separate point and bulge lists, rejecting empty or mismatched input.
    pub fn from_parts(
        extrusion: Vector3<f64>,
        points: &[Point3<f64>],
        bulges: &[f64],
    ) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyPolyline);
        }
        if points.len() != bulges.len() {
            return Err(Error::BulgeCountMismatch {
                vertices: points.len(),
                bulges: bulges.len(),
            });
        }
        let vertices = points
            .iter()
            .zip(bulges)
            .map(|(&point, &bulge)| PolylineVertex { point, bulge })
            .collect();
        Ok(Self::new(extrusion, vertices))
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The same polyline traversed backwards.
    ///
    /// Segment `i` of the result is segment `N-2-i` of this polyline in the
    /// opposite direction, so its bulge is negated. The closing bulge maps to
    /// itself, negated.
    pub fn reversed(&self) -> Self {
        let n = self.vertices.len();
        let vertices = (0..n)
            .map(|i| {
                let source = (2 * n - 2 - i) % n;
                PolylineVertex {
                    point: self.vertices[n - 1 - i].point,
                    bulge: -self.vertices[source].bulge,
                }
            })
            .collect();
        Self::new(self.extrusion, vertices)
    }
}
