// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! k-d tree for tolerance-based lookup of canonical vectors.
//!
//! The tree is built once over a set of equally sized vectors and answers
//! radius queries. There is no insertion or removal; rebuilding is the only
//! way to update it. Points are referred to by their position in the input
//! slice, so results map straight back to the caller's entity indices.

use crate::error::{Error, Result};

/// Maximum number of points stored in a leaf.
const LEAF_SIZE: usize = 10;

/// Subtrees with at least this many points are built on the rayon pool.
const PARALLEL_THRESHOLD: usize = 4096;

/// A point returned by a radius query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance_sq: f64,
}

#[derive(Debug)]
enum Node {
    Leaf {
        start: usize,
        end: usize,
    },
    Split {
        axis: usize,
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A static k-d tree over vectors of one dimension.
#[derive(Debug)]
pub struct KdTree {
    dim: usize,
    /// Row-major copy of the input, point `i` at `i * dim..(i + 1) * dim`.
    coords: Vec<f64>,
    /// Point indices, permuted so every leaf owns a contiguous range.
    order: Vec<usize>,
    root: Option<Node>,
}

impl KdTree {
    /// Builds a tree over fixed-dimension points.
    pub fn build<const D: usize>(points: &[[f64; D]]) -> Self {
        let coords = points.iter().flat_map(|p| p.iter().copied()).collect();
        Self::from_flat(D, points.len(), coords)
    }

    /// Builds a tree over runtime-sized points, which must all have the same length.
    pub fn build_dynamic(points: &[Vec<f64>]) -> Result<Self> {
        let dim = points.first().map_or(0, Vec::len);
        if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| p.len() != dim) {
            return Err(Error::DimensionMismatch {
                index,
                expected: dim,
                found: p.len(),
            });
        }
        let coords = points.iter().flatten().copied().collect();
        Ok(Self::from_flat(dim, points.len(), coords))
    }

    fn from_flat(dim: usize, len: usize, coords: Vec<f64>) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        let root = if len == 0 {
            None
        } else {
            Some(build_node(&coords, dim, &mut order, 0))
        };
        Self {
            dim,
            coords,
            order,
            root,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The indexed vector at `index`.
    pub fn point(&self, index: usize) -> &[f64] {
        &self.coords[index * self.dim..(index + 1) * self.dim]
    }

    /// All points within Euclidean distance `eps` of `query`, nearest first.
    ///
    /// The bound is inclusive, so `eps = 0` still returns exact copies
    /// (including the query itself when it is indexed). Ties are ordered by
    /// index. A query of the wrong dimension matches nothing.
    pub fn radius_search(&self, query: &[f64], eps: f64) -> Vec<Neighbor> {
        let mut found = Vec::new();
        let Some(root) = &self.root else {
            return found;
        };
        if query.len() != self.dim {
            return found;
        }

        let radius_sq = eps * eps;
        self.search(root, query, radius_sq, &mut found);
        found.sort_by(|a, b| {
            a.distance_sq
                .total_cmp(&b.distance_sq)
                .then(a.index.cmp(&b.index))
        });
        found
    }

    fn search(&self, node: &Node, query: &[f64], radius_sq: f64, found: &mut Vec<Neighbor>) {
        match node {
            Node::Leaf { start, end } => {
                for &index in &self.order[*start..*end] {
                    let distance_sq: f64 = self
                        .point(index)
                        .iter()
                        .zip(query)
                        .map(|(a, b)| (a - b) * (a - b))
                        .sum();
                    if distance_sq <= radius_sq {
                        found.push(Neighbor { index, distance_sq });
                    }
                }
            }
            Node::Split {
                axis,
                value,
                left,
                right,
            } => {
                let diff = query[*axis] - value;
                let (near, far) = if diff < 0.0 {
                    (left, right)
                } else {
                    (right, left)
                };
                self.search(near, query, radius_sq, found);
                if diff * diff <= radius_sq {
                    self.search(far, query, radius_sq, found);
                }
            }
        }
    }
}

fn build_node(coords: &[f64], dim: usize, order: &mut [usize], offset: usize) -> Node {
    if order.len() <= LEAF_SIZE || dim == 0 {
        return Node::Leaf {
            start: offset,
            end: offset + order.len(),
        };
    }

    let axis = widest_axis(coords, dim, order);
    let mid = order.len() / 2;
    order.select_nth_unstable_by(mid, |&a, &b| {
        coords[a * dim + axis].total_cmp(&coords[b * dim + axis])
    });
    let value = coords[order[mid] * dim + axis];

    let parallel = order.len() >= PARALLEL_THRESHOLD;
    let (lower, upper) = order.split_at_mut(mid);
    let (left, right) = if parallel {
        rayon::join(
            || build_node(coords, dim, lower, offset),
            || build_node(coords, dim, upper, offset + mid),
        )
    } else {
        (
            build_node(coords, dim, lower, offset),
            build_node(coords, dim, upper, offset + mid),
        )
    };

    Node::Split {
        axis,
        value,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// The axis along which the points in `order` spread the most.
fn widest_axis(coords: &[f64], dim: usize, order: &[usize]) -> usize {
    let mut best = (0, f64::NEG_INFINITY);
    for axis in 0..dim {
        let (lo, hi) = order.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
            let v = coords[i * dim + axis];
            (lo.min(v), hi.max(v))
        });
        if hi - lo > best.1 {
            best = (axis, hi - lo);
        }
    }
    best.0
}
