// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical forms for lines, arcs and polylines.
//!
//! Canonicalization is a two-pass affair. The first pass maps every primitive
//! to an orientation-resolved form in drawing units ([`InfiniteLine`],
//! [`CanonicalArc`]) and [`ScaleStats`] / [`PolylineScale`] collect the
//! set-wide maxima from those forms. The second pass divides by the maxima to
//! obtain the scale-free vectors that go into the spatial index, so a single
//! `eps` means the same thing for a drawing in millimetres and one in metres.
//!
//! When a test set is compared against a fixed reference set, the reference
//! statistics are reused for the test set instead of being recomputed.

use std::cmp::Ordering;
use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::primitives::{Arc, LineSegment, Polyline, PolylineVertex};

/// Components below this magnitude count as zero when fixing a line's sign.
pub const DIRECTION_EPS: f64 = 1e-13;

/// A segment shorter than this fraction of its distance to the origin is a point.
pub const DEGENERATE_RATIO: f64 = 1e-10;

/// Tolerance on angles when wrapping arc intervals.
pub const ANGLE_EPS: f64 = 1e-10;

/// Tolerance on normalized coordinates when orienting polylines.
pub const ORIENTATION_EPS: f64 = 1e-10;

/// Lower bound for every set-wide maximum, so empty or all-zero sets divide safely.
pub const SCALE_FLOOR: f64 = 1e-300;

/// The infinite support line of a segment.
///
/// `direction` is a unit vector whose first non-zero component in the order
/// z, x, y is positive. `base` is the foot of the perpendicular from the
/// origin. Both are in drawing units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfiniteLine {
    pub direction: Vector3<f64>,
    pub base: Point3<f64>,
    /// The segment collapsed to a point; direction is fixed to +X.
    pub degenerate: bool,
}

impl InfiniteLine {
    pub fn from_segment(segment: &LineSegment) -> Self {
        let p0 = segment.start.coords;
        let p1 = segment.end.coords;
        let reference = p0.norm().max(p1.norm());
        let d = p1 - p0;

        if reference == 0.0 || d.norm() < reference * DEGENERATE_RATIO {
            return Self {
                direction: Vector3::x(),
                base: segment.start,
                degenerate: true,
            };
        }

        let alpha = -p0.dot(&d) / (d.norm_squared() + SCALE_FLOOR);
        let base = p0 * (1.0 - alpha) + p1 * alpha;

        Self {
            direction: resolve_sign(d.normalize()),
            base: Point3::from(base),
            degenerate: false,
        }
    }

    /// Signed position of `p` along the line, measured from `base`.
    pub fn project(&self, p: &Point3<f64>) -> f64 {
        (p - self.base).dot(&self.direction)
    }

    /// The interval `[l, r]` covered by `segment` on this line, with `l <= r`.
    pub fn interval(&self, segment: &LineSegment) -> (f64, f64) {
        let a = self.project(&segment.start);
        let b = self.project(&segment.end);
        if a > b {
            (b, a)
        } else {
            (a, b)
        }
    }

    /// Index key: direction followed by the base scaled by the set maximum.
    pub fn canonical(&self, stats: &ScaleStats) -> [f64; 6] {
        let base = self.base.coords / stats.max_base_norm;
        [
            self.direction.x,
            self.direction.y,
            self.direction.z,
            base.x,
            base.y,
            base.z,
        ]
    }
}

/// Flips `dir` so its first significant component (z, then x, then y) is positive.
fn resolve_sign(dir: Vector3<f64>) -> Vector3<f64> {
    let key = if dir.z.abs() > DIRECTION_EPS {
        dir.z
    } else if dir.x.abs() > DIRECTION_EPS {
        dir.x
    } else {
        dir.y
    };
    if key < 0.0 {
        -dir
    } else {
        dir
    }
}

/// An arc with unit extrusion and an ascending angle interval.
///
/// `start` lies in `[-ANGLE_EPS, 2π)` and `end >= start`; the interval may
/// run past `2π` when the arc crosses the zero angle. Full circles are
/// `[0, 2π]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalArc {
    pub extrusion: Vector3<f64>,
    pub center: Point3<f64>,
    pub radius: f64,
    pub start: f64,
    pub end: f64,
}

impl CanonicalArc {
    pub fn from_arc(arc: &Arc) -> Self {
        let extrusion = arc
            .extrusion
            .try_normalize(SCALE_FLOOR)
            .unwrap_or_else(Vector3::z);
        let (start, end) = wrap_angles(arc.start_angle, arc.end_angle);
        Self {
            extrusion,
            center: arc.center,
            radius: arc.radius,
            start,
            end,
        }
    }

    pub fn is_full(&self) -> bool {
        self.end - self.start >= TAU - ANGLE_EPS
    }

    pub fn is_degenerate(&self) -> bool {
        self.radius.abs() < SCALE_FLOOR
    }

    /// Index key: extrusion, scaled center, scaled radius.
    ///
    /// The angle interval is not part of the key; it is compared
    /// analytically inside each coarse group.
    pub fn canonical(&self, stats: &ScaleStats) -> [f64; 7] {
        let center = self.center.coords / stats.max_center_norm;
        [
            self.extrusion.x,
            self.extrusion.y,
            self.extrusion.z,
            center.x,
            center.y,
            center.z,
            self.radius / stats.max_radius,
        ]
    }
}

/// Brings `(start, end)` into ascending order within one turn.
pub fn wrap_angles(start: f64, end: f64) -> (f64, f64) {
    if end - start >= TAU - ANGLE_EPS {
        return (0.0, TAU);
    }
    let mut s = start.rem_euclid(TAU);
    let mut e = end.rem_euclid(TAU);
    if e < s {
        e += TAU;
    }
    if s >= TAU - ANGLE_EPS {
        s -= TAU;
        e -= TAU;
    }
    (s, e)
}

/// Set-wide maxima used to normalize lines and arcs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleStats {
    pub max_base_norm: f64,
    pub max_center_norm: f64,
    pub max_radius: f64,
}

impl Default for ScaleStats {
    fn default() -> Self {
        Self {
            max_base_norm: SCALE_FLOOR,
            max_center_norm: SCALE_FLOOR,
            max_radius: SCALE_FLOOR,
        }
    }
}

impl ScaleStats {
    pub fn from_lines(lines: &[InfiniteLine]) -> Self {
        Self::default().with_lines(lines)
    }

    pub fn from_arcs(arcs: &[CanonicalArc]) -> Self {
        Self::default().with_arcs(arcs)
    }

    /// Folds the base norms of `lines` into the line maximum.
    pub fn with_lines(mut self, lines: &[InfiniteLine]) -> Self {
        self.max_base_norm = lines
            .iter()
            .map(|l| l.base.coords.norm())
            .fold(self.max_base_norm, f64::max);
        self
    }

    /// Folds centers and radii of `arcs` into their maxima, tracked separately.
    pub fn with_arcs(mut self, arcs: &[CanonicalArc]) -> Self {
        for arc in arcs {
            self.max_center_norm = self.max_center_norm.max(arc.center.coords.norm());
            self.max_radius = self.max_radius.max(arc.radius.abs());
        }
        self
    }
}

/// Per-bucket maxima for polylines, bucketed by vertex count.
#[derive(Debug, Clone, Default)]
pub struct PolylineScale {
    max_abs: FxHashMap<usize, f64>,
}

impl PolylineScale {
    pub fn from_polylines(polylines: &[Polyline]) -> Self {
        let mut max_abs: FxHashMap<usize, f64> = FxHashMap::default();
        for poly in polylines {
            let entry = max_abs.entry(poly.len()).or_insert(SCALE_FLOOR);
            for v in &poly.vertices {
                *entry = v.point.coords.amax().max(*entry);
            }
        }
        Self { max_abs }
    }

    /// The divisor for polylines with `vertex_count` vertices, if that bucket exists.
    pub fn factor(&self, vertex_count: usize) -> Option<f64> {
        self.max_abs.get(&vertex_count).copied()
    }
}

/// Flattens a polyline into `[extrusion, (x, y, z, bulge)*]`.
///
/// Coordinates are divided by `factor`; bulges are dimensionless and kept
/// as-is. The traversal direction is normalized so a polyline and its reverse
/// produce bit-identical vectors: the endpoint that is smaller in `(x, y)`
/// comes first, ties fall back to the second and second-to-last vertices and
/// finally to the larger leading bulge.
pub fn canonical_polyline(poly: &Polyline, factor: f64) -> Result<Vec<f64>> {
    if poly.is_empty() {
        return Err(Error::EmptyPolyline);
    }
    let extrusion = poly
        .extrusion
        .try_normalize(SCALE_FLOOR)
        .unwrap_or_else(Vector3::z);

    let scaled: Vec<PolylineVertex> = poly
        .vertices
        .iter()
        .map(|v| PolylineVertex {
            point: Point3::from(v.point.coords / factor),
            bulge: v.bulge,
        })
        .collect();
    let scaled = Polyline::new(extrusion, scaled);
    let oriented = if should_reverse(&scaled.vertices) {
        scaled.reversed()
    } else {
        scaled
    };

    let mut out = Vec::with_capacity(3 + 4 * oriented.len());
    out.extend_from_slice(&[extrusion.x, extrusion.y, extrusion.z]);
    for v in &oriented.vertices {
        out.extend_from_slice(&[v.point.x, v.point.y, v.point.z, v.bulge]);
    }
    Ok(out)
}

fn should_reverse(vertices: &[PolylineVertex]) -> bool {
    let n = vertices.len();
    if n < 2 {
        return false;
    }
    let by_points = compare_xy(&vertices[0].point, &vertices[n - 1].point)
        .then_with(|| compare_xy(&vertices[1].point, &vertices[n - 2].point));
    match by_points {
        Ordering::Less => false,
        Ordering::Greater => true,
        Ordering::Equal => {
            let forward = vertices[0].bulge;
            let backward = -vertices[n - 2].bulge;
            backward > forward + ORIENTATION_EPS
        }
    }
}

/// Lexicographic `(x, y)` comparison with tolerance.
fn compare_xy(a: &Point3<f64>, b: &Point3<f64>) -> Ordering {
    let axis = |u: f64, v: f64| {
        if u < v - ORIENTATION_EPS {
            Ordering::Less
        } else if u > v + ORIENTATION_EPS {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    };
    axis(a.x, b.x).then_with(|| axis(a.y, b.y))
}
