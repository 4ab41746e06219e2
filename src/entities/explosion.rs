use glam::Vec2;

use super::EntityId;

/// Spark directions for the burst (cardinal + diagonal).
const SPARK_DIRECTIONS: [(f32, f32); 8] = [
    (0.0, 1.0),   // Up
    (1.0, 1.0),   // Up-Right
    (1.0, 0.0),   // Right
    (1.0, -1.0),  // Down-Right
    (0.0, -1.0),  // Down
    (-1.0, -1.0), // Down-Left
    (-1.0, 0.0),  // Left
    (-1.0, 1.0),  // Up-Left
];

/// A transient blast left behind where an enemy was destroyed.
#[derive(Debug, Clone)]
pub struct Explosion {
    pub id: EntityId,
    pub position: Vec2,
    pub age: f32,
    pub lifetime: f32,
}

impl Explosion {
    pub fn new(id: EntityId, position: Vec2, lifetime: f32) -> Self {
        Self {
            id,
            position,
            age: 0.0,
            lifetime,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.age += dt.max(0.0);
    }

    pub fn is_dead(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Fraction of the lifetime already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }

    /// Positions of the outward-flying sparks; they travel `radius` units
    /// over the blast's lifetime.
    pub fn spark_positions(&self, radius: f32) -> Vec<Vec2> {
        let reach = radius * self.progress();
        SPARK_DIRECTIONS
            .iter()
            .map(|(dx, dy)| self.position + Vec2::new(*dx, *dy).normalize() * reach)
            .collect()
    }
}
