use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How the player ship is steered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ControlScheme {
    /// The ship stays put; the only action is firing.
    #[default]
    Touch,
    /// Accelerometer-style tilt slides the ship sideways with wrap-around.
    Tilt,
}

/// Single-pole low-pass filter over raw x-axis accelerometer samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TiltFilter {
    pub value: f32,
}

impl TiltFilter {
    /// Weight of the newest sample; the previous value keeps the remainder.
    pub const SAMPLE_WEIGHT: f32 = 0.75;

    pub fn sample(&mut self, raw: f32) -> f32 {
        self.value = raw * Self::SAMPLE_WEIGHT + self.value * (1.0 - Self::SAMPLE_WEIGHT);
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

/// Wraps a horizontal position that drifted past either side of the screen
/// onto the opposite side.
pub fn wrap_x(x: f32, screen_width: f32, margin: f32) -> f32 {
    if x < -margin {
        screen_width + margin
    } else if x > screen_width + margin {
        -margin
    } else {
        x
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub size: Vec2,
    pub controls: ControlScheme,
    pub tilt: TiltFilter,
}

impl Player {
    /// Centers the ship horizontally, resting `base_offset` above the bottom.
    pub fn new(screen_width: f32, size: Vec2, base_offset: f32, controls: ControlScheme) -> Self {
        Self {
            position: Vec2::new(screen_width / 2.0, size.y / 2.0 + base_offset),
            size,
            controls,
            tilt: TiltFilter::default(),
        }
    }

    /// Feeds one accelerometer reading. Ignored unless tilt controls are on.
    pub fn apply_tilt_sample(&mut self, raw: f32) {
        if self.controls == ControlScheme::Tilt {
            self.tilt.sample(raw);
        }
    }

    /// Moves the ship by the smoothed tilt once per simulation step.
    pub fn update(&mut self, screen_width: f32, gain: f32, wrap_margin: f32) {
        if self.controls != ControlScheme::Tilt {
            return;
        }
        let x = self.position.x + self.tilt.value * gain;
        self.position.x = wrap_x(x, screen_width, wrap_margin);
    }

    /// Where torpedoes leave the ship.
    pub fn muzzle(&self) -> Vec2 {
        self.position
    }

    pub fn get_sprite_lines(&self) -> Vec<&'static str> {
        vec!["  ^  ", " /#\\ ", "<###>"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship(controls: ControlScheme) -> Player {
        Player::new(750.0, Vec2::new(60.0, 80.0), 40.0, controls)
    }

    #[test]
    fn test_player_new() {
        let player = ship(ControlScheme::Touch);
        assert_eq!(player.position, Vec2::new(375.0, 80.0));
        assert_eq!(player.tilt.value, 0.0);
    }

    #[test]
    fn test_touch_player_never_moves() {
        let mut player = ship(ControlScheme::Touch);
        player.apply_tilt_sample(1.0);
        for _ in 0..30 {
            player.update(750.0, 50.0, 20.0);
        }
        assert_eq!(player.position, Vec2::new(375.0, 80.0));
        assert_eq!(player.tilt.value, 0.0);
    }

    #[test]
    fn test_tilt_filter_weights_new_sample() {
        let mut filter = TiltFilter::default();
        assert_eq!(filter.sample(1.0), 0.75);
        assert!((filter.sample(1.0) - 0.9375).abs() < 1e-6);
        assert!((filter.sample(0.0) - 0.234375).abs() < 1e-6);
    }

    #[test]
    fn test_tilt_player_moves_by_gain() {
        let mut player = ship(ControlScheme::Tilt);
        player.apply_tilt_sample(0.4);
        player.update(750.0, 50.0, 20.0);
        assert!((player.position.x - (375.0 + 0.3 * 50.0)).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_left_edge() {
        assert_eq!(wrap_x(-20.5, 750.0, 20.0), 770.0);
        assert_eq!(wrap_x(-20.0, 750.0, 20.0), -20.0);
    }

    #[test]
    fn test_wrap_right_edge() {
        assert_eq!(wrap_x(770.5, 750.0, 20.0), -20.0);
        assert_eq!(wrap_x(770.0, 750.0, 20.0), 770.0);
    }

    #[test]
    fn test_tilt_player_wraps_around() {
        let mut player = ship(ControlScheme::Tilt);
        player.position.x = 760.0;
        player.apply_tilt_sample(1.0);
        player.update(750.0, 50.0, 20.0);
        assert_eq!(player.position.x, -20.0);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_player_stays_within_wrap_bounds(
                width in 100.0f32..2000.0,
                samples in prop::collection::vec(-1.0f32..1.0, 1..200)
            ) {
                let size = Vec2::new(60.0, 80.0);
                let mut player = Player::new(width, size, 40.0, ControlScheme::Tilt);
                for s in samples {
                    player.apply_tilt_sample(s);
                    player.update(width, 50.0, 20.0);
                    prop_assert!(player.position.x >= -20.0);
                    prop_assert!(player.position.x <= width + 20.0);
                }
            }

            #[test]
            fn test_filter_converges_geometrically(
                start in -1.0f32..1.0,
                target in -1.0f32..1.0,
                n in 1usize..12
            ) {
                let mut filter = TiltFilter { value: start };
                for _ in 0..n {
                    filter.sample(target);
                }
                let expected = target + (start - target) * 0.25f32.powi(n as i32);
                prop_assert!((filter.value - expected).abs() < 1e-5);
            }
        }
    }
}
