//! Game configuration and command-line options.
//!
//! Defaults reproduce the classic tuning; a TOML file can override any
//! subset of fields and CLI flags override the file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, ensure};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entities::ControlScheme;
use crate::spawner::VariantSelection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Playback volume (0.0 - 1.0)
    pub volume: f32,
    /// Directory holding `torpedo.wav` and `explosion.wav`
    pub asset_dir: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.3,
            asset_dir: PathBuf::from("assets/sounds"),
        }
    }
}

/// All gameplay tuning, in world units (origin bottom-left, y up) and seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,

    // === Player ===
    pub player_size: Vec2,
    /// Gap between the bottom edge and the ship's underside
    pub player_base_offset: f32,
    pub controls: ControlScheme,
    pub tilt_sample_secs: f32,
    /// Horizontal units moved per step for a smoothed tilt of 1.0
    pub tilt_gain: f32,
    /// How far past either edge the ship may drift before wrapping
    pub wrap_margin: f32,
    /// Reading reported by the keyboard tilt sensor while a direction is held
    pub keyboard_tilt: f32,

    // === Enemies ===
    pub enemy_size: Vec2,
    pub spawn_interval_secs: f32,
    /// Spawn X is kept this far from both edges
    pub spawn_margin: f32,
    pub enemy_descent_secs: f32,
    pub variant_selection: VariantSelection,

    // === Torpedoes ===
    pub projectile_radius: f32,
    pub projectile_flight_secs: f32,
    pub projectile_launch_offset: f32,
    /// How far above the top edge a torpedo travels before removal
    pub projectile_overshoot: f32,

    // === Scoring and effects ===
    pub score_per_hit: u32,
    pub explosion_lifetime_secs: f32,
    pub star_count: usize,
    pub starfield_prewarm_secs: f32,

    pub audio: AudioConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 750.0,
            screen_height: 1334.0,

            player_size: Vec2::new(60.0, 80.0),
            player_base_offset: 40.0,
            controls: ControlScheme::Touch,
            tilt_sample_secs: 0.2,
            tilt_gain: 50.0,
            wrap_margin: 20.0,
            keyboard_tilt: 0.2,

            enemy_size: Vec2::new(60.0, 48.0),
            spawn_interval_secs: 0.5,
            spawn_margin: 70.0,
            enemy_descent_secs: 6.0,
            variant_selection: VariantSelection::Reshuffle,

            projectile_radius: 6.0,
            projectile_flight_secs: 0.3,
            projectile_launch_offset: 5.0,
            projectile_overshoot: 10.0,

            score_per_hit: 5,
            explosion_lifetime_secs: 2.0,
            star_count: 120,
            starfield_prewarm_secs: 15.0,

            audio: AudioConfig::default(),
        }
    }
}

fn ensure_positive(name: &str, value: f32) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{} must be a positive number, got {}",
        name,
        value
    );
    Ok(())
}

fn ensure_non_negative(name: &str, value: f32) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{} must be zero or more, got {}",
        name,
        value
    );
    Ok(())
}

impl GameConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).wrap_err("failed to parse game config")?;
        config.validate().wrap_err("invalid game config")?;
        Ok(config)
    }

    /// Rejects dimensions and durations the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("screen_width", self.screen_width)?;
        ensure_positive("screen_height", self.screen_height)?;
        ensure_positive("player_size.x", self.player_size.x)?;
        ensure_positive("player_size.y", self.player_size.y)?;
        ensure_positive("enemy_size.x", self.enemy_size.x)?;
        ensure_positive("enemy_size.y", self.enemy_size.y)?;

        ensure_positive("tilt_sample_secs", self.tilt_sample_secs)?;
        ensure_positive("spawn_interval_secs", self.spawn_interval_secs)?;
        ensure_positive("enemy_descent_secs", self.enemy_descent_secs)?;
        ensure_positive("projectile_flight_secs", self.projectile_flight_secs)?;
        ensure_positive("explosion_lifetime_secs", self.explosion_lifetime_secs)?;

        ensure_non_negative("player_base_offset", self.player_base_offset)?;
        ensure_non_negative("tilt_gain", self.tilt_gain)?;
        ensure_non_negative("wrap_margin", self.wrap_margin)?;
        ensure_non_negative("keyboard_tilt", self.keyboard_tilt)?;
        ensure_non_negative("spawn_margin", self.spawn_margin)?;
        ensure_non_negative("projectile_radius", self.projectile_radius)?;
        ensure_non_negative("projectile_launch_offset", self.projectile_launch_offset)?;
        ensure_non_negative("projectile_overshoot", self.projectile_overshoot)?;
        ensure_non_negative("starfield_prewarm_secs", self.starfield_prewarm_secs)?;
        ensure_non_negative("audio.volume", self.audio.volume)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&raw).wrap_err_with(|| format!("in {}", path.display()))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal space shooter", long_about = None)]
pub struct Cli {
    /// TOML file overriding the default tuning
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Steering scheme (overrides the config file)
    #[arg(long, value_enum)]
    pub controls: Option<ControlScheme>,
    /// Seed for spawn positions and sprite choice
    #[arg(long)]
    pub seed: Option<u64>,
    /// Where log output goes while the terminal is in use
    #[arg(long, default_value = "space-shooter.log")]
    pub log_file: PathBuf,
    /// Disable sound effects
    #[arg(long)]
    pub mute: bool,
}

impl Cli {
    /// Loads the config file (if any) and applies flag overrides on top.
    pub fn resolve_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(controls) = self.controls {
            config.controls = controls;
        }
        if self.mute {
            config.audio.enabled = false;
        }
        Ok(config)
    }
}
