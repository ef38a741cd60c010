//! RRT (Rapidly-exploring Random Tree) path planning
//!
//! Works in continuous 2D space with circular obstacles. The tree grows by
//! steering bounded-length steps from the nearest existing node toward
//! random samples; the first node that connects to the goal ends the search.

use crate::map::Map;
use crate::tree::SpatialTree;
use nalgebra::Vector2;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Configuration shared by the RRT and RRT* planners
#[derive(Debug, Clone)]
pub struct RrtConfig {
    /// Maximum length of a single tree extension
    pub max_extend_length: f32,
    /// Spacing of intermediate collision checks along an edge
    pub path_resolution: f32,
    /// Probability of sampling the goal directly (0.0 to 1.0)
    pub goal_sample_rate: f32,
    /// Number of growth iterations
    pub max_iter: usize,
    /// Random seed (None for entropy)
    pub seed: Option<u64>,
}

impl Default for RrtConfig {
    fn default() -> Self {
        Self {
            max_extend_length: 10.0,
            path_resolution: 0.5,
            goal_sample_rate: 0.05,
            max_iter: 200,
            seed: None,
        }
    }
}

/// Result of RRT or RRT* planning
#[derive(Debug, Clone)]
pub struct RrtResult {
    /// Path from start to goal in world coordinates, if one was found
    pub path: Option<Vec<Vector2<f32>>>,
    /// Cost of the returned path (infinity when no path exists)
    pub cost: f32,
    /// Number of growth iterations executed
    pub iterations: usize,
    /// Number of nodes in the grown tree
    pub tree_size: usize,
}

/// Step from `from` toward `to`, capped at `max_extend_length`
pub(crate) fn steer(
    from: &Vector2<f32>,
    to: &Vector2<f32>,
    max_extend_length: f32,
) -> Vector2<f32> {
    let d = *to - *from;
    let dist = d.norm();
    if dist <= max_extend_length {
        *to
    } else {
        *from + d * (max_extend_length / dist)
    }
}

pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// RRT path planner
pub struct RrtPlanner {
    /// Start configuration
    pub start: Vector2<f32>,
    /// Goal configuration
    pub goal: Vector2<f32>,
    /// Workspace bounds and obstacles
    pub map: Map,
    /// Configuration
    pub config: RrtConfig,
    tree: SpatialTree,
}

impl RrtPlanner {
    /// Create a new RRT planner
    pub fn new(start: Vector2<f32>, goal: Vector2<f32>, map: Map, config: RrtConfig) -> Self {
        Self {
            start,
            goal,
            map,
            config,
            tree: SpatialTree::new(),
        }
    }

    /// Plan a path from start to goal
    ///
    /// Grows the tree for up to `max_iter` iterations and finishes through
    /// the goal as soon as a new node can reach it collision-free.
    pub fn plan(&mut self) -> RrtResult {
        let mut rng = make_rng(self.config.seed);

        self.tree.clear();
        self.tree.add(self.start, 0.0, None);

        let (lower, upper) = self.map.bounds();
        let x_dist = Uniform::new(lower.x, upper.x);
        let y_dist = Uniform::new(lower.y, upper.y);
        let goal_dist = Uniform::new(0.0f32, 1.0);

        let mut iterations = 0usize;

        for _ in 0..self.config.max_iter {
            iterations += 1;

            // Sample random point (with goal bias)
            let rnd = if goal_dist.sample(&mut rng) < self.config.goal_sample_rate {
                self.goal
            } else {
                Vector2::new(x_dist.sample(&mut rng), y_dist.sample(&mut rng))
            };

            let nearest_idx = self.tree.nearest(&rnd);
            let nearest_p = self.tree[nearest_idx].p;

            let new_p = steer(&nearest_p, &rnd, self.config.max_extend_length);

            if self
                .map
                .collision(&nearest_p, &new_p, self.config.path_resolution)
            {
                continue;
            }

            let cost = self.tree[nearest_idx].cost + (new_p - nearest_p).norm();
            let new_idx = self.tree.add(new_p, cost, Some(nearest_idx));

            // Finish through the goal once it is within steering range
            let dist_to_goal = (new_p - self.goal).norm();
            if dist_to_goal <= self.config.max_extend_length
                && !self
                    .map
                    .collision(&new_p, &self.goal, self.config.path_resolution)
            {
                let goal_idx = self
                    .tree
                    .add(self.goal, cost + dist_to_goal, Some(new_idx));
                return RrtResult {
                    path: Some(self.final_path(goal_idx)),
                    cost: self.tree[goal_idx].cost,
                    iterations,
                    tree_size: self.tree.len(),
                };
            }
        }

        RrtResult {
            path: None,
            cost: f32::INFINITY,
            iterations,
            tree_size: self.tree.len(),
        }
    }

    /// The grown tree (for inspection and visualization)
    pub fn tree(&self) -> &SpatialTree {
        &self.tree
    }

    /// Reconstruct the path ending at `end` by walking the parent chain
    fn final_path(&self, end: usize) -> Vec<Vector2<f32>> {
        let mut path = Vec::new();
        let mut current = Some(end);
        while let Some(idx) = current {
            path.push(self.tree[idx].p);
            current = self.tree[idx].parent;
        }
        path.reverse();
        path
    }
}
