//! Workspace map for continuous-space planning
//!
//! Holds the axis-aligned workspace bounds and a set of circular obstacles,
//! and answers the point and segment collision queries the planners need.

use nalgebra::Vector2;

/// A circular obstacle
#[derive(Debug, Clone, Copy)]
pub struct CircleObstacle {
    pub center: Vector2<f32>,
    pub radius: f32,
}

impl CircleObstacle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Vector2::new(x, y),
            radius,
        }
    }

    fn contains(&self, p: &Vector2<f32>) -> bool {
        (*p - self.center).norm() <= self.radius
    }
}

/// A bounded 2D workspace populated with circular obstacles
#[derive(Debug, Clone)]
pub struct Map {
    /// Lower workspace bound per dimension
    lower: Vector2<f32>,
    /// Upper workspace bound per dimension
    upper: Vector2<f32>,
    obstacles: Vec<CircleObstacle>,
}

impl Map {
    /// Create an empty map spanning `[lower, upper]` in each dimension
    pub fn new(lower: Vector2<f32>, upper: Vector2<f32>) -> Self {
        Self {
            lower,
            upper,
            obstacles: Vec::new(),
        }
    }

    /// Add a circular obstacle
    pub fn add_obstacle(&mut self, obstacle: CircleObstacle) {
        self.obstacles.push(obstacle);
    }

    /// Clear all obstacles
    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }

    /// Per-dimension lower and upper workspace bounds
    pub fn bounds(&self) -> (Vector2<f32>, Vector2<f32>) {
        (self.lower, self.upper)
    }

    /// Check if a point lies within the workspace bounds
    pub fn contains(&self, p: &Vector2<f32>) -> bool {
        p.x >= self.lower.x && p.x <= self.upper.x && p.y >= self.lower.y && p.y <= self.upper.y
    }

    /// Check if a point is inside any obstacle
    pub fn point_collision(&self, p: &Vector2<f32>) -> bool {
        self.obstacles.iter().any(|obs| obs.contains(p))
    }

    /// Check if the straight segment between two points hits any obstacle
    ///
    /// The segment is sampled at `resolution` spacing, endpoints included.
    pub fn collision(&self, a: &Vector2<f32>, b: &Vector2<f32>, resolution: f32) -> bool {
        if self.point_collision(a) || self.point_collision(b) {
            return true;
        }

        let d = *b - *a;
        let dist = d.norm();
        let steps = (dist / resolution).ceil() as usize;

        for i in 1..steps {
            let t = i as f32 / steps as f32;
            if self.point_collision(&(*a + d * t)) {
                return true;
            }
        }

        false
    }

    /// Get all obstacles
    pub fn obstacles(&self) -> &[CircleObstacle] {
        &self.obstacles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_map() -> Map {
        Map::new(Vector2::new(-10.0, -10.0), Vector2::new(10.0, 10.0))
    }

    #[test]
    fn test_bounds_containment() {
        let map = square_map();
        assert!(map.contains(&Vector2::new(0.0, 0.0)));
        assert!(map.contains(&Vector2::new(10.0, -10.0)));
        assert!(!map.contains(&Vector2::new(10.1, 0.0)));
        assert!(!map.contains(&Vector2::new(0.0, -11.0)));
    }

    #[test]
    fn test_point_collision() {
        let mut map = square_map();
        map.add_obstacle(CircleObstacle::new(0.0, 0.0, 2.0));
        assert!(map.point_collision(&Vector2::new(0.0, 0.0)));
        assert!(map.point_collision(&Vector2::new(1.9, 0.0)));
        assert!(!map.point_collision(&Vector2::new(2.1, 0.0)));
    }

    #[test]
    fn test_segment_collision() {
        let mut map = square_map();
        map.add_obstacle(CircleObstacle::new(0.0, 0.0, 2.0));

        // Segment through the obstacle center
        assert!(map.collision(
            &Vector2::new(-5.0, 0.0),
            &Vector2::new(5.0, 0.0),
            0.5
        ));
        // Segment passing well clear of the obstacle
        assert!(!map.collision(
            &Vector2::new(-5.0, 5.0),
            &Vector2::new(5.0, 5.0),
            0.5
        ));
    }

    #[test]
    fn test_zero_length_segment() {
        let mut map = square_map();
        map.add_obstacle(CircleObstacle::new(0.0, 0.0, 2.0));
        let free = Vector2::new(5.0, 5.0);
        assert!(!map.collision(&free, &free, 0.5));
        let blocked = Vector2::new(0.0, 0.0);
        assert!(map.collision(&blocked, &blocked, 0.5));
    }
}
