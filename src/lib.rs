// Library exports for testing
pub use collision::{Body, Category, Contact, ContactOutcome, Resolution, resolve_contact};
pub use config::{Cli, GameConfig};
pub use entities::{
    ControlScheme, Enemy, EnemyVariant, EntityId, Explosion, Player, Projectile, TiltFilter,
};
pub use game::{Command, Game, GameEvent, Phase, SoundEffect};
pub use spawner::VariantSelection;
pub use timer::{FixedTilt, Scheduler, TiltSensor};

pub mod app;
pub mod audio;
pub mod collision;
pub mod config;
pub mod entities;
pub mod game;
pub mod input;
pub mod renderer;
pub mod spawner;
pub mod timer;
