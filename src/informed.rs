//! Informed sampling for optimal planners
//!
//! Once a solution of cost `c_max` exists, any configuration that could
//! still improve it must satisfy
//! `dist(p, start) + dist(p, goal) <= c_max`, which is exactly the ellipse
//! with foci at start and goal and major axis `c_max`. Sampling from that
//! ellipse instead of the whole workspace concentrates the search on the
//! only region where a better path can live.

use nalgebra::{Rotation2, Vector2};
use rand::Rng;
use rand_distr::{Distribution, UnitDisc};

/// Uniform sampler over the ellipse that can improve a known solution
#[derive(Debug, Clone)]
pub struct InformedSampler {
    /// Midpoint between the foci
    center: Vector2<f32>,
    /// Rotation aligning the major axis with the start-goal direction
    rotation: Rotation2<f32>,
    /// Straight-line distance between the foci
    c_min: f32,
}

impl InformedSampler {
    /// Create a sampler for the ellipse with foci at `start` and `goal`
    pub fn new(start: Vector2<f32>, goal: Vector2<f32>) -> Self {
        let d = goal - start;
        Self {
            center: (start + goal) / 2.0,
            rotation: Rotation2::new(d.y.atan2(d.x)),
            c_min: d.norm(),
        }
    }

    /// Distance between the foci
    pub fn c_min(&self) -> f32 {
        self.c_min
    }

    /// Draw a point uniformly from the ellipse with major axis `c_max`
    ///
    /// `c_max` must be finite and at least the focal distance. The minor
    /// semi-axis is clamped at zero so a `c_max` that only just reaches
    /// `c_min` degenerates to the start-goal segment instead of a NaN.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, c_max: f32) -> Vector2<f32> {
        let a = c_max / 2.0;
        let b = (c_max * c_max - self.c_min * self.c_min).max(0.0).sqrt() / 2.0;

        let [x, y]: [f32; 2] = UnitDisc.sample(rng);
        self.center + self.rotation * Vector2::new(a * x, b * y)
    }
}
