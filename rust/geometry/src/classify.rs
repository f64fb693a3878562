// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Duplicate and inclusion classification.
//!
//! Classification runs in two stages:
//!
//! 1. **Coarse grouping.** Canonical keys go into a [`KdTree`]; every key is
//!    linked to all keys within `eps`, and the connected components become the
//!    coarse groups. For lines a coarse group is a family of segments on one
//!    infinite line, for arcs a family of arcs on one circle.
//! 2. **Refinement.** Inside a coarse group the 1D extent of each member (the
//!    projected interval on the line, the angle range on the circle) decides
//!    between *precise duplicate* and *inclusion*. Precise duplicates are
//!    merged into equivalence classes; inclusion pairs are only reported
//!    between entities that are not precise duplicates of each other.
//!
//! Polylines stop after stage 1: their coarse groups are their precise groups.
//!
//! Two modes exist. Self-set functions ([`line_duplicates`],
//! [`arc_duplicates`], [`polyline_duplicates`]) look for redundancy inside one
//! set. Reference types ([`LineReference`], [`ArcReference`],
//! [`PolylineReference`]) index a fixed set once and classify any number of
//! test entities against it; containers are always reference entities.

use std::f64::consts::TAU;

use rustc_hash::FxHashMap;

use crate::canonical::{
    canonical_polyline, CanonicalArc, InfiniteLine, PolylineScale, ScaleStats, SCALE_FLOOR,
};
use crate::error::Result;
use crate::primitives::{Arc, LineSegment, Polyline};
use crate::spatial::KdTree;
use crate::union_find::DisjointSet;

/// Tolerances for classification.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerance {
    /// Radius in normalized canonical space for coarse grouping.
    pub eps: f64,
    /// Length tolerance in drawing units for interval comparison. Arcs
    /// convert it to an angle through their radius.
    pub length_eps: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            eps: 1e-8,
            length_eps: 1e-5,
        }
    }
}

impl Tolerance {
    pub fn new(eps: f64, length_eps: f64) -> Self {
        Self { eps, length_eps }
    }
}

/// `container` covers `contained` on their common support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inclusion {
    pub container: usize,
    pub contained: usize,
}

/// A test entity that precisely duplicates a reference entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossMatch {
    pub reference: usize,
    pub test: usize,
}

/// Result of classifying one set against itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DuplicateReport {
    /// Connected components of the radius graph over canonical keys.
    pub coarse_groups: Vec<Vec<usize>>,
    /// Equivalence classes of precise duplicates, smallest index first.
    pub precise_groups: Vec<Vec<usize>>,
    /// Containment pairs between entities that are not precise duplicates.
    pub inclusions: Vec<Inclusion>,
}

impl DuplicateReport {
    /// Whether nothing redundant was found.
    pub fn is_clean(&self) -> bool {
        self.precise_groups.is_empty() && self.inclusions.is_empty()
    }

    /// Translates local indices into the caller's indices through `map`.
    pub fn remap(self, map: &[usize]) -> Self {
        let remap_groups = |groups: Vec<Vec<usize>>| -> Vec<Vec<usize>> {
            groups
                .into_iter()
                .map(|g| g.into_iter().map(|i| map[i]).collect())
                .collect()
        };
        Self {
            coarse_groups: remap_groups(self.coarse_groups),
            precise_groups: remap_groups(self.precise_groups),
            inclusions: self
                .inclusions
                .into_iter()
                .map(|inc| Inclusion {
                    container: map[inc.container],
                    contained: map[inc.contained],
                })
                .collect(),
        }
    }
}

/// Result of classifying a test set against a reference set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossReport {
    pub duplicates: Vec<CrossMatch>,
    /// `container` indexes the reference set, `contained` the test set.
    pub inclusions: Vec<Inclusion>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Relation {
    precise: bool,
    includes: bool,
}

/// Compares two segments on the support line `frame` of the first one.
fn line_relation(
    frame: &InfiniteLine,
    container: &LineSegment,
    other: &LineSegment,
    length_eps: f64,
) -> Relation {
    let (li, ri) = frame.interval(container);
    let (lj, rj) = frame.interval(other);
    Relation {
        precise: (li - lj).abs() < length_eps && (ri - rj).abs() < length_eps,
        includes: li - length_eps < lj && ri + length_eps > rj,
    }
}

/// Compares the angle ranges of two arcs on the same circle.
fn arc_relation(container: &CanonicalArc, other: &CanonicalArc, length_eps: f64) -> Relation {
    if container.is_full() {
        return Relation {
            precise: other.is_full(),
            includes: true,
        };
    }
    if other.is_full() {
        return Relation::default();
    }

    let tol = length_eps / container.radius.abs().max(SCALE_FLOOR);
    let mut rel = Relation::default();
    for shift in [-TAU, 0.0, TAU] {
        let (s, e) = (other.start + shift, other.end + shift);
        rel.precise |= (container.start - s).abs() < tol && (container.end - e).abs() < tol;
        rel.includes |= container.start - tol < s && container.end + tol > e;
    }
    rel
}

/// Coarse duplicate groups of raw fixed-dimension vectors.
///
/// Groups are the connected components of the graph linking every pair of
/// vectors within `eps`; singletons are omitted.
pub fn point_duplicates<const D: usize>(points: &[[f64; D]], eps: f64) -> Vec<Vec<usize>> {
    let tree = KdTree::build(points);
    let mut sets = DisjointSet::new(points.len());
    for (i, p) in points.iter().enumerate() {
        for n in tree.radius_search(p, eps) {
            sets.union(i, n.index);
        }
    }
    sets.groups()
}

/// Splits coarse groups into precise-duplicate classes and inclusion pairs.
///
/// An inclusion is dropped when its members are precise duplicates (mutual
/// containment), when either member is degenerate, or when either member is
/// not the representative of its precise class.
fn resolve_groups(
    len: usize,
    coarse: &[Vec<usize>],
    relation: impl Fn(usize, usize) -> Relation,
    degenerate: impl Fn(usize) -> bool,
) -> (Vec<Vec<usize>>, Vec<Inclusion>) {
    let mut precise = DisjointSet::new(len);
    let mut candidates = Vec::new();

    // O(n^2) per coarse group; coarse groups are small in practice
    for group in coarse {
        for &i in group {
            for &j in group {
                if i == j {
                    continue;
                }
                let rel = relation(i, j);
                if rel.precise {
                    precise.union(i, j);
                } else if rel.includes && !degenerate(i) && !degenerate(j) {
                    candidates.push(Inclusion {
                        container: i,
                        contained: j,
                    });
                }
            }
        }
    }

    let inclusions = candidates
        .into_iter()
        .filter(|inc| {
            !precise.same(inc.container, inc.contained)
                && precise.is_representative(inc.container)
                && precise.is_representative(inc.contained)
        })
        .collect();
    (precise.groups(), inclusions)
}

fn line_keys(lines: &[LineSegment]) -> (Vec<InfiniteLine>, Vec<[f64; 6]>) {
    let infinite: Vec<InfiniteLine> = lines.iter().map(InfiniteLine::from_segment).collect();
    let stats = ScaleStats::from_lines(&infinite);
    let keys = infinite.iter().map(|l| l.canonical(&stats)).collect();
    (infinite, keys)
}

/// Groups segments that lie on the same infinite line, ignoring their extents.
pub fn line_coarse_groups(lines: &[LineSegment], eps: f64) -> Vec<Vec<usize>> {
    let (_, keys) = line_keys(lines);
    point_duplicates(&keys, eps)
}

/// Finds precise duplicates and inclusions among `lines`.
pub fn line_duplicates(lines: &[LineSegment], tol: &Tolerance) -> DuplicateReport {
    let (infinite, keys) = line_keys(lines);
    let coarse_groups = point_duplicates(&keys, tol.eps);
    let (precise_groups, inclusions) = resolve_groups(
        lines.len(),
        &coarse_groups,
        |i, j| line_relation(&infinite[i], &lines[i], &lines[j], tol.length_eps),
        |i| infinite[i].degenerate,
    );

    tracing::debug!(
        lines = lines.len(),
        coarse = coarse_groups.len(),
        precise = precise_groups.len(),
        inclusions = inclusions.len(),
        "Classified line duplicates"
    );

    DuplicateReport {
        coarse_groups,
        precise_groups,
        inclusions,
    }
}

/// Finds precise duplicates and inclusions among arcs and circles.
///
/// A full circle includes every arc on the same circle; two full circles are
/// precise duplicates.
pub fn arc_duplicates(arcs: &[Arc], tol: &Tolerance) -> DuplicateReport {
    let canonical: Vec<CanonicalArc> = arcs.iter().map(CanonicalArc::from_arc).collect();
    let stats = ScaleStats::from_arcs(&canonical);
    let keys: Vec<[f64; 7]> = canonical.iter().map(|a| a.canonical(&stats)).collect();

    let coarse_groups = point_duplicates(&keys, tol.eps);
    let (precise_groups, inclusions) = resolve_groups(
        arcs.len(),
        &coarse_groups,
        |i, j| arc_relation(&canonical[i], &canonical[j], tol.length_eps),
        |i| canonical[i].is_degenerate(),
    );

    tracing::debug!(
        arcs = arcs.len(),
        coarse = coarse_groups.len(),
        precise = precise_groups.len(),
        inclusions = inclusions.len(),
        "Classified arc duplicates"
    );

    DuplicateReport {
        coarse_groups,
        precise_groups,
        inclusions,
    }
}

/// Indices of `polylines` bucketed by vertex count, in ascending count order.
fn buckets(polylines: &[Polyline]) -> Vec<(usize, Vec<usize>)> {
    let mut map: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for (i, poly) in polylines.iter().enumerate() {
        map.entry(poly.len()).or_default().push(i);
    }
    let mut out: Vec<_> = map.into_iter().collect();
    out.sort_unstable_by_key(|(len, _)| *len);
    out
}

/// Finds polylines with identical canonical vectors (within `eps`).
///
/// Only polylines with the same vertex count can match. Traversal direction
/// does not matter. There is no inclusion test for polylines.
pub fn polyline_duplicates(polylines: &[Polyline], tol: &Tolerance) -> Result<DuplicateReport> {
    let scale = PolylineScale::from_polylines(polylines);
    let mut sets = DisjointSet::new(polylines.len());

    for (len, members) in buckets(polylines) {
        let factor = scale.factor(len).unwrap_or(1.0);
        let keys = members
            .iter()
            .map(|&i| canonical_polyline(&polylines[i], factor))
            .collect::<Result<Vec<_>>>()?;
        let tree = KdTree::build_dynamic(&keys)?;
        for (local, key) in keys.iter().enumerate() {
            for n in tree.radius_search(key, tol.eps) {
                sets.union(members[local], members[n.index]);
            }
        }
    }

    let groups = sets.groups();
    tracing::debug!(
        polylines = polylines.len(),
        groups = groups.len(),
        "Classified polyline duplicates"
    );

    Ok(DuplicateReport {
        coarse_groups: groups.clone(),
        precise_groups: groups,
        inclusions: Vec::new(),
    })
}

fn record(report: &mut CrossReport, reference: usize, test: usize, rel: Relation, degenerate: bool) {
    if rel.precise {
        report.duplicates.push(CrossMatch { reference, test });
    } else if rel.includes && !degenerate {
        report.inclusions.push(Inclusion {
            container: reference,
            contained: test,
        });
    }
}

/// A reference set of segments indexed once for repeated queries.
#[derive(Debug)]
pub struct LineReference<'a> {
    segments: &'a [LineSegment],
    infinite: Vec<InfiniteLine>,
    stats: ScaleStats,
    tree: KdTree,
}

impl<'a> LineReference<'a> {
    pub fn new(segments: &'a [LineSegment]) -> Self {
        let infinite: Vec<InfiniteLine> = segments.iter().map(InfiniteLine::from_segment).collect();
        let stats = ScaleStats::from_lines(&infinite);
        let keys: Vec<[f64; 6]> = infinite.iter().map(|l| l.canonical(&stats)).collect();
        Self {
            segments,
            infinite,
            stats,
            tree: KdTree::build(&keys),
        }
    }

    /// The reference maxima, applied unchanged to every test segment.
    pub fn stats(&self) -> &ScaleStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn classify(&self, tests: &[LineSegment], tol: &Tolerance) -> CrossReport {
        let mut report = CrossReport::default();
        for (t, segment) in tests.iter().enumerate() {
            let line = InfiniteLine::from_segment(segment);
            let key = line.canonical(&self.stats);
            for n in self.tree.radius_search(&key, tol.eps) {
                let r = n.index;
                let rel = line_relation(&self.infinite[r], &self.segments[r], segment, tol.length_eps);
                record(&mut report, r, t, rel, self.infinite[r].degenerate || line.degenerate);
            }
        }
        report
    }
}

/// A reference set of arcs and circles indexed once for repeated queries.
#[derive(Debug)]
pub struct ArcReference {
    canonical: Vec<CanonicalArc>,
    stats: ScaleStats,
    tree: KdTree,
}

impl ArcReference {
    pub fn new(arcs: &[Arc]) -> Self {
        let canonical: Vec<CanonicalArc> = arcs.iter().map(CanonicalArc::from_arc).collect();
        let stats = ScaleStats::from_arcs(&canonical);
        let keys: Vec<[f64; 7]> = canonical.iter().map(|a| a.canonical(&stats)).collect();
        Self {
            canonical,
            stats,
            tree: KdTree::build(&keys),
        }
    }

    pub fn stats(&self) -> &ScaleStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    pub fn classify(&self, tests: &[Arc], tol: &Tolerance) -> CrossReport {
        let mut report = CrossReport::default();
        for (t, arc) in tests.iter().enumerate() {
            let test = CanonicalArc::from_arc(arc);
            let key = test.canonical(&self.stats);
            for n in self.tree.radius_search(&key, tol.eps) {
                let r = n.index;
                let reference = &self.canonical[r];
                let rel = arc_relation(reference, &test, tol.length_eps);
                record(
                    &mut report,
                    r,
                    t,
                    rel,
                    reference.is_degenerate() || test.is_degenerate(),
                );
            }
        }
        report
    }
}

/// A reference set of polylines, one tree per vertex count.
#[derive(Debug)]
pub struct PolylineReference {
    scale: PolylineScale,
    trees: FxHashMap<usize, (Vec<usize>, KdTree)>,
    len: usize,
}

impl PolylineReference {
    pub fn new(polylines: &[Polyline]) -> Result<Self> {
        let scale = PolylineScale::from_polylines(polylines);
        let mut trees = FxHashMap::default();
        for (len, members) in buckets(polylines) {
            let factor = scale.factor(len).unwrap_or(1.0);
            let keys = members
                .iter()
                .map(|&i| canonical_polyline(&polylines[i], factor))
                .collect::<Result<Vec<_>>>()?;
            trees.insert(len, (members, KdTree::build_dynamic(&keys)?));
        }
        Ok(Self {
            scale,
            trees,
            len: polylines.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Precise duplicates of each test polyline in the reference set.
    ///
    /// Test polylines whose vertex count does not occur in the reference set
    /// have no candidates.
    pub fn classify(&self, tests: &[Polyline], tol: &Tolerance) -> Result<CrossReport> {
        let mut report = CrossReport::default();
        for (t, poly) in tests.iter().enumerate() {
            let (Some((members, tree)), Some(factor)) =
                (self.trees.get(&poly.len()), self.scale.factor(poly.len()))
            else {
                continue;
            };
            let key = canonical_polyline(poly, factor)?;
            for n in tree.radius_search(&key, tol.eps) {
                report.duplicates.push(CrossMatch {
                    reference: members[n.index],
                    test: t,
                });
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn lines(rows: &[[f64; 6]]) -> Vec<LineSegment> {
        rows.iter().copied().map(LineSegment::from_row).collect()
    }

    fn arc(start: f64, end: f64) -> Arc {
        Arc::new(Vector3::z(), Point3::new(1.0, 2.0, 0.0), 3.0, start, end)
    }

    #[test]
    fn raw_points_group_coincident_rows() {
        let rows = [
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ];
        assert_eq!(point_duplicates(&rows, 1e-5), vec![vec![0, 4], vec![2, 3]]);
    }

    #[test]
    fn collinear_segments_share_coarse_group() {
        let segs = lines(&[
            [0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            [5.0, 0.0, 0.0, 3.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 1.0, 1.0, 0.0],
        ]);
        assert_eq!(line_coarse_groups(&segs, 1e-8), vec![vec![0, 1]]);
    }

    #[test]
    fn overlapping_segments_are_not_included() {
        let segs = lines(&[
            [0.0, 0.0, 0.0, 2.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 3.0, 0.0, 0.0],
        ]);
        let report = line_duplicates(&segs, &Tolerance::default());
        assert_eq!(report.coarse_groups, vec![vec![0, 1]]);
        assert!(report.is_clean());
    }

    #[test]
    fn reversed_segment_is_precise_duplicate() {
        let segs = lines(&[
            [1.0, 1.0, 1.0, 4.0, 5.0, 6.0],
            [4.0, 5.0, 6.0, 1.0, 1.0, 1.0],
        ]);
        let report = line_duplicates(&segs, &Tolerance::default());
        assert_eq!(report.precise_groups, vec![vec![0, 1]]);
        assert!(report.inclusions.is_empty());
    }

    #[test]
    fn degenerate_segments_never_contained() {
        let segs = lines(&[
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        ]);
        let report = line_duplicates(&segs, &Tolerance::default());
        assert_eq!(report.coarse_groups, vec![vec![0, 1]]);
        assert!(report.inclusions.is_empty());
    }

    #[test]
    fn circle_includes_arcs_on_it() {
        let arcs = [
            Arc::circle(Vector3::z(), Point3::new(1.0, 2.0, 0.0), 3.0),
            arc(0.0, FRAC_PI_2),
            arc(PI, 1.5 * PI),
        ];
        let report = arc_duplicates(&arcs, &Tolerance::default());
        assert_eq!(report.coarse_groups, vec![vec![0, 1, 2]]);
        assert!(report.precise_groups.is_empty());
        assert_eq!(
            report.inclusions,
            vec![
                Inclusion { container: 0, contained: 1 },
                Inclusion { container: 0, contained: 2 },
            ]
        );
    }

    #[test]
    fn arc_across_zero_contains_arc_after_seam() {
        let arcs = [arc(1.5 * PI, FRAC_PI_2), arc(0.1, 0.5), arc(1.6 * PI, 1.8 * PI)];
        let report = arc_duplicates(&arcs, &Tolerance::default());
        assert_eq!(
            report.inclusions,
            vec![
                Inclusion { container: 0, contained: 1 },
                Inclusion { container: 0, contained: 2 },
            ]
        );
    }

    #[test]
    fn identical_circles_are_precise() {
        let c = Arc::circle(Vector3::z(), Point3::new(1.0, 2.0, 0.0), 3.0);
        let other = Arc::circle(Vector3::z(), Point3::new(1.0, 2.0, 0.0), 3.5);
        let report = arc_duplicates(&[c, other, c], &Tolerance::default());
        assert_eq!(report.precise_groups, vec![vec![0, 2]]);
        assert!(report.inclusions.is_empty());
    }

    #[test]
    fn arcs_equal_across_seam_are_precise() {
        let report = arc_duplicates(&[arc(-0.5, 0.5), arc(TAU - 0.5, 0.5)], &Tolerance::default());
        assert_eq!(report.precise_groups, vec![vec![0, 1]]);
    }

    #[test]
    fn polylines_group_by_bucket() {
        let square = |s: f64| {
            Polyline::from_parts(
                Vector3::z(),
                &[
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(s, 0.0, 0.0),
                    Point3::new(s, s, 0.0),
                ],
                &[0.0, 0.5, 0.0],
            )
            .unwrap()
        };
        let polys = [square(1.0), square(2.0), square(1.0).reversed(), square(1.0)];
        let report = polyline_duplicates(&polys, &Tolerance::default()).unwrap();
        assert_eq!(report.precise_groups, vec![vec![0, 2, 3]]);
        assert_eq!(report.coarse_groups, report.precise_groups);
    }

    #[test]
    fn malformed_polyline_is_reported() {
        let empty = Polyline::new(Vector3::z(), Vec::new());
        assert!(polyline_duplicates(&[empty], &Tolerance::default()).is_err());
    }

    #[test]
    fn cross_lines_report_reference_as_container() {
        let reference = lines(&[
            [0.0, 0.0, 0.0, 10.0, 0.0, 0.0],
            [0.0, 5.0, 0.0, 0.0, 9.0, 0.0],
        ]);
        let tests = lines(&[
            [2.0, 0.0, 0.0, 3.0, 0.0, 0.0],
            [0.0, 9.0, 0.0, 0.0, 5.0, 0.0],
            [-1.0, 0.0, 0.0, 12.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0, 0.0, 2.0],
        ]);
        let index = LineReference::new(&reference);
        let report = index.classify(&tests, &Tolerance::default());
        assert_eq!(report.duplicates, vec![CrossMatch { reference: 1, test: 1 }]);
        // the longer test segment 2 contains reference 0, which is not reported
        assert_eq!(
            report.inclusions,
            vec![Inclusion { container: 0, contained: 0 }]
        );
    }

    #[test]
    fn cross_arcs_and_polylines() {
        let reference = [Arc::circle(Vector3::z(), Point3::new(1.0, 2.0, 0.0), 3.0), arc(0.0, PI)];
        let index = ArcReference::new(&reference);
        let report = index.classify(&[arc(0.0, PI), arc(0.5, 1.0)], &Tolerance::default());
        assert_eq!(report.duplicates, vec![CrossMatch { reference: 1, test: 0 }]);
        let mut inclusions = report.inclusions.clone();
        inclusions.sort();
        assert_eq!(
            inclusions,
            vec![
                Inclusion { container: 0, contained: 0 },
                Inclusion { container: 0, contained: 1 },
                Inclusion { container: 1, contained: 1 },
            ]
        );

        let poly = Polyline::from_parts(
            Vector3::z(),
            &[Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 4.0, 0.0)],
            &[0.2, 0.0],
        )
        .unwrap();
        let index = PolylineReference::new(std::slice::from_ref(&poly)).unwrap();
        let single = Polyline::new(Vector3::z(), vec![poly.vertices[0]]);
        let report = index
            .classify(&[poly.reversed(), poly.clone(), single], &Tolerance::default())
            .unwrap();
        assert_eq!(
            report.duplicates,
            vec![
                CrossMatch { reference: 0, test: 0 },
                CrossMatch { reference: 0, test: 1 },
            ]
        );
    }

    #[test]
    fn remap_translates_indices() {
        let report = DuplicateReport {
            coarse_groups: vec![vec![0, 1]],
            precise_groups: vec![vec![0, 1]],
            inclusions: vec![Inclusion { container: 1, contained: 0 }],
        };
        let remapped = report.remap(&[7, 3]);
        assert_eq!(remapped.precise_groups, vec![vec![7, 3]]);
        assert_eq!(remapped.inclusions, vec![Inclusion { container: 3, contained: 7 }]);
    }
}
