mod enemy;
mod explosion;
mod motion;
mod player;
mod projectile;
mod starfield;

// Re-export all public types
pub use enemy::{Enemy, EnemyVariant};
pub use explosion::Explosion;
pub use motion::LinearMotion;
pub use player::{ControlScheme, Player, TiltFilter, wrap_x};
pub use projectile::Projectile;
pub use starfield::{Star, Starfield};

/// Unique handle for every entity spawned into a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);
