use glam::Vec2;

/// Slack for accumulated frame times that land a hair short of `duration`.
const FINISH_EPSILON: f32 = 1e-5;

/// A timed straight-line move from `start` to `target`.
///
/// Entities that own a motion are removed once it finishes, so this doubles
/// as the entity's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMotion {
    pub start: Vec2,
    pub target: Vec2,
    pub duration: f32,
    pub elapsed: f32,
}

impl LinearMotion {
    pub fn new(start: Vec2, target: Vec2, duration: f32) -> Self {
        Self {
            start,
            target,
            duration,
            elapsed: 0.0,
        }
    }

    /// Advances the motion clock and returns the new position.
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration.max(0.0));
        self.position()
    }

    pub fn position(&self) -> Vec2 {
        if self.is_finished() {
            return self.target;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.start.lerp(self.target, t)
    }

    pub fn is_finished(&self) -> bool {
        self.duration <= 0.0 || self.elapsed + FINISH_EPSILON >= self.duration
    }
}
