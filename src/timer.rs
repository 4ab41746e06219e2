//! Periodic tasks that feed commands into the simulation.

use crate::config::GameConfig;
use crate::entities::ControlScheme;
use crate::game::{Command, Game};

/// Repeating timer. The first firing happens one full interval after start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicTimer {
    pub interval: f32,
    pub elapsed: f32,
}

impl PeriodicTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Advances the clock and returns how many times the timer fired.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if self.interval <= 0.0 {
            return 0;
        }
        self.elapsed += dt.max(0.0);
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}

/// Source of x-axis accelerometer readings.
pub trait TiltSensor {
    fn sample_x(&self) -> f32;
}

/// A sensor that always reports the same reading.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTilt(pub f32);

impl TiltSensor for FixedTilt {
    fn sample_x(&self) -> f32 {
        self.0
    }
}

/// Drives the spawn timer and, for tilt controls, the accelerometer poll.
#[derive(Debug, Clone)]
pub struct Scheduler {
    spawn: PeriodicTimer,
    accelerometer: Option<PeriodicTimer>,
}

impl Scheduler {
    pub fn new(config: &GameConfig) -> Self {
        let accelerometer = match config.controls {
            ControlScheme::Tilt => Some(PeriodicTimer::new(config.tilt_sample_secs)),
            ControlScheme::Touch => None,
        };

        Self {
            spawn: PeriodicTimer::new(config.spawn_interval_secs),
            accelerometer,
        }
    }

    /// Advances both timers by `dt` and queues the commands they produce.
    pub fn advance(&mut self, dt: f32, sensor: &dyn TiltSensor, game: &mut Game) {
        for _ in 0..self.spawn.tick(dt) {
            game.push_command(Command::SpawnEnemy);
        }
        if let Some(accelerometer) = &mut self.accelerometer {
            for _ in 0..accelerometer.tick(dt) {
                game.push_command(Command::AccelerometerSample(sensor.sample_x()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_after_full_interval() {
        let mut timer = PeriodicTimer::new(0.5);
        assert_eq!(timer.tick(0.25), 0);
        assert_eq!(timer.tick(0.25), 1);
        assert_eq!(timer.tick(0.25), 0);
    }

    #[test]
    fn test_timer_catches_up_on_long_frames() {
        let mut timer = PeriodicTimer::new(0.5);
        assert_eq!(timer.tick(1.75), 3);
        assert!((timer.elapsed - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_zero_interval_never_fires() {
        let mut timer = PeriodicTimer::new(0.0);
        assert_eq!(timer.tick(10.0), 0);
    }

    #[test]
    fn test_touch_scheduler_only_spawns() {
        let config = GameConfig::default();
        let mut game = Game::new(config.clone(), Some(1));
        let mut scheduler = Scheduler::new(&config);
        scheduler.advance(1.0, &FixedTilt(1.0), &mut game);
        assert_eq!(
            game.pending_commands(),
            vec![Command::SpawnEnemy, Command::SpawnEnemy]
        );
    }

    #[test]
    fn test_tilt_scheduler_samples_sensor() {
        let config = GameConfig {
            controls: ControlScheme::Tilt,
            ..GameConfig::default()
        };
        let mut game = Game::new(config.clone(), Some(1));
        let mut scheduler = Scheduler::new(&config);
        scheduler.advance(0.25, &FixedTilt(-0.5), &mut game);
        assert_eq!(
            game.pending_commands(),
            vec![Command::AccelerometerSample(-0.5)]
        );
    }
}
