//! Sampling-based path planning in continuous 2D space
//!
//! This crate implements:
//! - RRT (Rapidly-exploring Random Tree): probabilistically complete,
//!   returns the first path that reaches the goal
//! - RRT*: asymptotically optimal; keeps a minimum-cost spanning tree over
//!   the samples via parent selection, rewiring, and cost propagation, and
//!   focuses sampling on the improvement ellipse once a solution exists
//!
//! Planners operate on a bounded workspace with circular obstacles and run
//! a fixed number of iterations; finding no path is a normal outcome
//! reported with infinite cost, not an error.

pub mod informed;
pub mod map;
pub mod rrt;
pub mod rrt_star;
pub mod tree;

pub mod prelude {
    pub use crate::informed::InformedSampler;
    pub use crate::map::{CircleObstacle, Map};
    pub use crate::rrt::{RrtConfig, RrtPlanner, RrtResult};
    pub use crate::rrt_star::RrtStarPlanner;
    pub use crate::tree::{Node, SpatialTree};
    pub use nalgebra::Vector2;
}

pub use prelude::*;
