//! RRT* path planning with informed sampling
//!
//! Extends RRT to an asymptotically optimal planner. The tree is kept a
//! minimum-cost spanning tree over the sampled configurations: every new
//! node connects to the cheapest collision-free parent among its near
//! neighbors, near neighbors are rewired through the new node whenever that
//! lowers their cost, and the affected subtree has its costs re-propagated
//! so every node's cost stays equal to the cost of its parent chain. Once a
//! first solution exists, sampling is drawn from the ellipse of
//! configurations that could still improve it.

use crate::informed::InformedSampler;
use crate::map::Map;
use crate::rrt::{make_rng, steer, RrtConfig, RrtResult};
use crate::tree::SpatialTree;
use nalgebra::Vector2;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::PI;

/// Attempts at drawing an in-bounds ellipse sample before giving up and
/// falling back to a uniform draw over the workspace
const MAX_REJECTION_ATTEMPTS: usize = 100;

/// RRT* path planner
pub struct RrtStarPlanner {
    /// Start configuration
    pub start: Vector2<f32>,
    /// Goal configuration
    pub goal: Vector2<f32>,
    /// Workspace bounds and obstacles
    pub map: Map,
    /// Configuration
    pub config: RrtConfig,
    tree: SpatialTree,
    sampler: InformedSampler,
    /// Nodes with a collision-free direct connection to the goal
    final_nodes: Vec<usize>,
    best_final_node: Option<usize>,
    min_cost: f32,
}

impl RrtStarPlanner {
    /// Create a new RRT* planner
    pub fn new(start: Vector2<f32>, goal: Vector2<f32>, map: Map, config: RrtConfig) -> Self {
        Self {
            sampler: InformedSampler::new(start, goal),
            start,
            goal,
            map,
            config,
            tree: SpatialTree::new(),
            final_nodes: Vec::new(),
            best_final_node: None,
            min_cost: f32::INFINITY,
        }
    }

    /// Plan a path from start to goal
    ///
    /// Runs all `max_iter` iterations and returns the best path found, or
    /// no path with infinite cost when none of the sampled nodes reached
    /// the goal. The latter is a normal planning outcome, not an error.
    pub fn plan(&mut self) -> RrtResult {
        let mut rng = make_rng(self.config.seed);

        self.reset();

        for _ in 0..self.config.max_iter {
            let rnd = self.get_random_node(&mut rng);
            let nearest_idx = self.tree.nearest(&rnd);
            let nearest_p = self.tree[nearest_idx].p;

            let new_p = steer(&nearest_p, &rnd, self.config.max_extend_length);

            if self
                .map
                .collision(&nearest_p, &new_p, self.config.path_resolution)
            {
                continue;
            }

            self.add(new_p, nearest_idx);
        }

        match self.best_final_node {
            Some(idx) => RrtResult {
                path: Some(self.final_path(idx)),
                cost: self.min_cost,
                iterations: self.config.max_iter,
                tree_size: self.tree.len(),
            },
            None => RrtResult {
                path: None,
                cost: f32::INFINITY,
                iterations: self.config.max_iter,
                tree_size: self.tree.len(),
            },
        }
    }

    /// Best path cost found so far (infinity before the first solution)
    pub fn min_cost(&self) -> f32 {
        self.min_cost
    }

    /// The grown tree (for inspection and visualization)
    pub fn tree(&self) -> &SpatialTree {
        &self.tree
    }

    /// Tear down state from any previous run and re-seed the root
    fn reset(&mut self) {
        self.tree.clear();
        self.final_nodes.clear();
        self.best_final_node = None;
        self.min_cost = f32::INFINITY;
        self.tree.add(self.start, 0.0, None);
    }

    /// Insert a steered node: choose its parent among the near neighbors,
    /// rewire the neighborhood through it, and update the goal tracking
    fn add(&mut self, p: Vector2<f32>, nearest_idx: usize) {
        let near = self.near_nodes(&p);

        // Tentative connection is the steering parent
        let mut parent = nearest_idx;
        let mut cost = self.tree[nearest_idx].cost + (p - self.tree[nearest_idx].p).norm();

        // choose_parent: pick the cheapest collision-free near neighbor
        for &idx in &near {
            if self
                .map
                .collision(&p, &self.tree[idx].p, self.config.path_resolution)
            {
                continue;
            }
            let candidate = self.tree[idx].cost + (p - self.tree[idx].p).norm();
            if candidate < cost {
                parent = idx;
                cost = candidate;
            }
        }

        let new_idx = self.tree.add(p, cost, Some(parent));

        self.rewire(new_idx, &near);

        // Track nodes that can reach the goal directly
        if (p - self.goal).norm() <= self.config.max_extend_length
            && !self
                .map
                .collision(&self.goal, &p, self.config.path_resolution)
        {
            self.final_nodes.push(new_idx);
        }

        self.set_best_final_node();
    }

    /// Re-parent near neighbors through `new_idx` where that lowers their
    /// cost, then restore the cost invariant across the touched subtree
    fn rewire(&mut self, new_idx: usize, near: &[usize]) {
        for &idx in near {
            if self.map.collision(
                &self.tree[new_idx].p,
                &self.tree[idx].p,
                self.config.path_resolution,
            ) {
                continue;
            }
            let cost = self.tree[new_idx].cost + (self.tree[new_idx].p - self.tree[idx].p).norm();
            if cost < self.tree[idx].cost {
                self.tree.set_parent(idx, new_idx);
                self.tree.set_cost(idx, cost);
            }
        }

        self.propagate_cost_to_leaves(new_idx);
    }

    /// Recompute descendant costs top-down from their (possibly just
    /// updated) parents
    fn propagate_cost_to_leaves(&mut self, parent_idx: usize) {
        let children = self.tree[parent_idx].children().to_vec();
        for child in children {
            let cost = self.tree[parent_idx].cost
                + (self.tree[parent_idx].p - self.tree[child].p).norm();
            self.tree.set_cost(child, cost);
            self.propagate_cost_to_leaves(child);
        }
    }

    /// Near-neighbor set via the shrinking-radius schedule
    ///
    /// With `n` the prospective tree size, the k-nearest query is bounded
    /// by `ceil(5*pi*ln(n))`; the logarithmic growth preserves the
    /// asymptotic optimality guarantee.
    fn near_nodes(&self, p: &Vector2<f32>) -> Vec<usize> {
        let n = (self.tree.len() + 1) as f32;
        let k = (5.0 * PI * n.ln()).ceil() as usize;
        self.tree.k_nearest(p, k)
    }

    /// Rescan the goal-connected set for the cheapest total path
    fn set_best_final_node(&mut self) {
        for &idx in &self.final_nodes {
            let cost = self.tree[idx].cost + (self.tree[idx].p - self.goal).norm();
            if cost < self.min_cost {
                self.min_cost = cost;
                self.best_final_node = Some(idx);
            }
        }
    }

    /// Sample a candidate configuration: the goal with `goal_sample_rate`
    /// probability, the informed ellipse once a solution exists, uniform
    /// over the workspace otherwise
    fn get_random_node(&self, rng: &mut StdRng) -> Vector2<f32> {
        if rng.gen::<f32>() < self.config.goal_sample_rate {
            return self.goal;
        }
        if self.best_final_node.is_some() {
            self.sample_informed(rng)
        } else {
            self.sample_uniform(rng)
        }
    }

    fn sample_uniform(&self, rng: &mut StdRng) -> Vector2<f32> {
        let (lower, upper) = self.map.bounds();
        Vector2::new(
            Uniform::new(lower.x, upper.x).sample(rng),
            Uniform::new(lower.y, upper.y).sample(rng),
        )
    }

    /// Draw from the improvement ellipse, rejecting out-of-bounds samples
    fn sample_informed(&self, rng: &mut StdRng) -> Vector2<f32> {
        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let p = self.sampler.sample(rng, self.min_cost);
            if self.map.contains(&p) {
                return p;
            }
        }
        self.sample_uniform(rng)
    }

    /// Reconstruct the best path by walking the parent chain, goal appended
    fn final_path(&self, end: usize) -> Vec<Vector2<f32>> {
        let mut path = Vec::new();
        let mut current = Some(end);
        while let Some(idx) = current {
            path.push(self.tree[idx].p);
            current = self.tree[idx].parent;
        }
        path.reverse();
        path.push(self.goal);
        path
    }
}
