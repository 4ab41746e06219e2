use glam::Vec2;

use super::EntityId;
use super::motion::LinearMotion;
use crate::collision::Body;

/// A photon torpedo fired by the player.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub position: Vec2,
    /// Position before the latest update; the body sweeps from here
    pub previous: Vec2,
    pub radius: f32,
    pub motion: LinearMotion,
}

impl Projectile {
    /// Launches from `origin` nudged up by `launch_offset`, flying straight
    /// up until it is `overshoot` units past the top edge.
    pub fn new(
        id: EntityId,
        origin: Vec2,
        launch_offset: f32,
        screen_height: f32,
        overshoot: f32,
        radius: f32,
        flight_secs: f32,
    ) -> Self {
        let start = Vec2::new(origin.x, origin.y + launch_offset);
        let target = Vec2::new(origin.x, screen_height + overshoot);

        Self {
            id,
            position: start,
            previous: start,
            radius,
            motion: LinearMotion::new(start, target, flight_secs),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.previous = self.position;
        self.position = self.motion.advance(dt);
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.motion.is_finished()
    }

    pub fn body(&self) -> Body {
        Body::projectile(self.id, self.position, self.radius).swept_from(self.previous)
    }

    pub fn get_sprite(&self) -> char {
        '|'
    }
}
