//! Kruskal's minimum spanning tree over an indexed edge list.

use crate::graph::Edge;

/// Union-find node. `parent` is an index into the subset arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subset {
    pub parent: usize,
    /// Height bound of the tree rooted here; only meaningful on representatives
    pub rank: u32,
}

/// Disjoint sets over `0..len`, with path compression and union by rank.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    subsets: Vec<Subset>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            subsets: (0..len).map(|i| Subset { parent: i, rank: 0 }).collect(),
        }
    }

    /// Representative of `index`'s set. Every node visited is re-pointed at it.
    pub fn find(&mut self, index: usize) -> usize {
        let mut root = index;
        while self.subsets[root].parent != root {
            root = self.subsets[root].parent;
        }

        let mut current = index;
        while self.subsets[current].parent != root {
            let next = self.subsets[current].parent;
            self.subsets[current].parent = root;
            current = next;
        }
        root
    }

    /// Merge the sets holding `x` and `y`. Returns false if they already share one.
    ///
    /// On equal rank `x`'s representative becomes the root.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let x_root = self.find(x);
        let y_root = self.find(y);
        if x_root == y_root {
            return false;
        }

        let x_rank = self.subsets[x_root].rank;
        let y_rank = self.subsets[y_root].rank;
        if x_rank < y_rank {
            self.subsets[x_root].parent = y_root;
        } else if x_rank > y_rank {
            self.subsets[y_root].parent = x_root;
        } else {
            self.subsets[y_root].parent = x_root;
            self.subsets[x_root].rank += 1;
        }
        true
    }

    pub fn subsets(&self) -> &[Subset] {
        &self.subsets
    }
}

/// Reduce a weighted graph on `vertex_count` vertices to a minimum spanning tree.
///
/// Edges are sorted by weight with a stable sort, so equal weights keep their
/// input order. The first `vertex_count - 1` tree edges come first in the
/// result; with `add_branching`, up to `branch_count` of the cheapest remaining
/// edges follow them. Fewer than two vertices give an empty tree.
pub fn solve(
    vertex_count: usize,
    edges: &[Edge],
    add_branching: bool,
    branch_count: usize,
) -> Vec<Edge> {
    puffin::profile_function!();

    if vertex_count < 2 {
        return Vec::new();
    }

    let mut sorted: Vec<Edge> = edges.to_vec();
    sorted.sort_by(|x, y| x.weight.total_cmp(&y.weight));

    let mut sets = DisjointSet::new(vertex_count);
    let mut kept = vec![false; sorted.len()];
    let mut result = Vec::with_capacity(vertex_count - 1 + branch_count);

    for (index, edge) in sorted.iter().enumerate() {
        if result.len() == vertex_count - 1 {
            break;
        }
        if sets.union(edge.a, edge.b) {
            kept[index] = true;
            result.push(*edge);
        }
    }

    if result.len() < vertex_count - 1 {
        tracing::warn!(
            target: "dungeon::graph",
            vertices = vertex_count,
            tree_edges = result.len(),
            "spanning_tree.disconnected"
        );
    }

    if add_branching {
        let branches = sorted
            .iter()
            .zip(&kept)
            .filter(|(_, kept)| !**kept)
            .map(|(edge, _)| *edge)
            .take(branch_count);
        result.extend(branches);
    }

    tracing::debug!(
        target: "dungeon::graph",
        vertices = vertex_count,
        edges = result.len(),
        "spanning_tree.solved"
    );
    result
}
