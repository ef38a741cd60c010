//! Arena-backed tree of sampled configurations
//!
//! Nodes live in a flat vector and are addressed by stable index; parent
//! links are optional indices into the same arena, so re-parenting during
//! rewiring is an O(1) index swap. Each node also carries its child indices,
//! kept consistent with the parent links on every reassignment, which lets
//! cost propagation walk a subtree instead of scanning the whole arena.
//!
//! The collection is append-only during a planning run; `clear` tears the
//! whole tree down between runs.

use nalgebra::Vector2;
use std::cmp::Ordering;
use std::ops::Index;

/// A sampled configuration in the planning tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Position in the configuration space
    pub p: Vector2<f32>,
    /// Accumulated path cost from the root
    pub cost: f32,
    /// Arena index of the parent (None for the root)
    pub parent: Option<usize>,
    /// Arena indices of the children, in sync with the parent links
    children: Vec<usize>,
}

impl Node {
    /// Arena indices of this node's children
    pub fn children(&self) -> &[usize] {
        &self.children
    }
}

/// The collection of all nodes sampled so far
#[derive(Debug, Clone, Default)]
pub struct SpatialTree {
    nodes: Vec<Node>,
}

impl SpatialTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove all nodes
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Insert a node and link it into its parent's children
    ///
    /// Returns the arena index of the new node.
    pub fn add(&mut self, p: Vector2<f32>, cost: f32, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            p,
            cost,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(idx);
        }
        idx
    }

    /// Re-parent a node, keeping the children adjacency consistent
    pub fn set_parent(&mut self, child: usize, new_parent: usize) {
        if let Some(old) = self.nodes[child].parent {
            self.nodes[old].children.retain(|&c| c != child);
        }
        self.nodes[child].parent = Some(new_parent);
        self.nodes[new_parent].children.push(child);
    }

    /// Overwrite a node's accumulated cost
    pub fn set_cost(&mut self, idx: usize, cost: f32) {
        self.nodes[idx].cost = cost;
    }

    /// Index of the node nearest to a point by Euclidean distance
    ///
    /// The tree must be non-empty.
    pub fn nearest(&self, p: &Vector2<f32>) -> usize {
        let mut min_dist = f32::INFINITY;
        let mut nearest_idx = 0;

        for (i, node) in self.nodes.iter().enumerate() {
            let dist = (node.p - *p).norm();
            if dist < min_dist {
                min_dist = dist;
                nearest_idx = i;
            }
        }

        nearest_idx
    }

    /// Indices of the `k` nodes nearest to a point, closest first
    ///
    /// Returns fewer than `k` indices when the tree is smaller than `k`.
    pub fn k_nearest(&self, p: &Vector2<f32>, k: usize) -> Vec<usize> {
        let mut by_dist: Vec<(f32, usize)> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| ((node.p - *p).norm(), i))
            .collect();
        by_dist.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        by_dist.truncate(k);
        by_dist.into_iter().map(|(_, i)| i).collect()
    }

    /// Iterate over all nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}

impl Index<usize> for SpatialTree {
    type Output = Node;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_links_children() {
        let mut tree = SpatialTree::new();
        let root = tree.add(Vector2::new(0.0, 0.0), 0.0, None);
        let a = tree.add(Vector2::new(1.0, 0.0), 1.0, Some(root));
        let b = tree.add(Vector2::new(2.0, 0.0), 2.0, Some(a));

        assert_eq!(tree[root].children(), &[a]);
        assert_eq!(tree[a].children(), &[b]);
        assert_eq!(tree[b].parent, Some(a));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_set_parent_moves_child() {
        let mut tree = SpatialTree::new();
        let root = tree.add(Vector2::new(0.0, 0.0), 0.0, None);
        let a = tree.add(Vector2::new(1.0, 0.0), 1.0, Some(root));
        let b = tree.add(Vector2::new(2.0, 0.0), 2.0, Some(a));

        tree.set_parent(b, root);

        assert_eq!(tree[b].parent, Some(root));
        assert!(tree[a].children().is_empty());
        assert!(tree[root].children().contains(&b));
    }

    #[test]
    fn test_nearest() {
        let mut tree = SpatialTree::new();
        tree.add(Vector2::new(0.0, 0.0), 0.0, None);
        let far = tree.add(Vector2::new(5.0, 5.0), 0.0, None);
        tree.add(Vector2::new(-3.0, 2.0), 0.0, None);

        assert_eq!(tree.nearest(&Vector2::new(4.0, 4.0)), far);
    }

    #[test]
    fn test_k_nearest_ordering() {
        let mut tree = SpatialTree::new();
        let a = tree.add(Vector2::new(1.0, 0.0), 0.0, None);
        let b = tree.add(Vector2::new(3.0, 0.0), 0.0, None);
        let c = tree.add(Vector2::new(2.0, 0.0), 0.0, None);

        let near = tree.k_nearest(&Vector2::new(0.0, 0.0), 2);
        assert_eq!(near, vec![a, c]);

        // Asking for more than the tree holds returns everything
        let all = tree.k_nearest(&Vector2::new(0.0, 0.0), 10);
        assert_eq!(all, vec![a, c, b]);
    }

    #[test]
    fn test_clear() {
        let mut tree = SpatialTree::new();
        tree.add(Vector2::new(0.0, 0.0), 0.0, None);
        tree.clear();
        assert!(tree.is_empty());
    }
}
