// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Disjoint-set forest used to merge duplicate candidates into groups.

/// Union-find over `0..n` with path compression.
///
/// The root of every set is its smallest member, so the representative of a
/// group is always the first-seen entity and the grouping does not depend on
/// the order in which unions happen.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merges the sets of `a` and `b`. Returns `false` if they were already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        let (keep, absorb) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[absorb] = keep;
        true
    }

    pub fn same(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Whether `x` is the representative (smallest member) of its set.
    pub fn is_representative(&mut self, x: usize) -> bool {
        self.find(x) == x
    }

    /// All sets with more than one member, each sorted ascending and ordered
    /// by representative.
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); n];
        for i in 0..n {
            let root = self.find(i);
            members[root].push(i);
        }
        members.into_iter().filter(|g| g.len() > 1).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_member_is_root() {
        let mut set = DisjointSet::new(6);
        assert!(set.union(4, 2));
        assert!(set.union(5, 4));
        assert!(!set.union(2, 5));
        assert_eq!(set.find(5), 2);
        assert!(set.is_representative(2));
        assert!(!set.is_representative(4));
        assert!(set.same(4, 5));
        assert!(!set.same(0, 5));
    }

    #[test]
    fn groups_skip_singletons() {
        let mut set = DisjointSet::new(7);
        set.union(6, 1);
        set.union(3, 5);
        set.union(5, 6);
        set.union(0, 2);
        assert_eq!(set.groups(), vec![vec![0, 2], vec![1, 3, 5, 6]]);
    }

    #[test]
    fn grouping_is_order_independent() {
        let pairs = [(0, 3), (3, 7), (2, 8), (8, 3)];
        let mut forward = DisjointSet::new(9);
        let mut backward = DisjointSet::new(9);
        for &(a, b) in &pairs {
            forward.union(a, b);
        }
        for &(a, b) in pairs.iter().rev() {
            backward.union(b, a);
        }
        assert_eq!(forward.groups(), backward.groups());
    }
}
