//! The simulation: one `Game` value owns every entity and the score.
//!
//! Timers and input never touch entities directly. They queue [`Command`]s,
//! which [`Game::step`] drains in FIFO order on the simulation thread. The
//! presentation layer observes the game through [`GameEvent`]s.

use std::collections::{HashSet, VecDeque};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collision::{Body, Contact, ContactOutcome, detect_contacts, resolve_contact};
use crate::config::GameConfig;
use crate::entities::{Enemy, EnemyVariant, EntityId, Explosion, Player, Projectile, Starfield};
use crate::spawner::EnemySpawner;

/// Inputs to the simulation, applied at the start of the next step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SpawnEnemy,
    Fire,
    AccelerometerSample(f32),
}

/// Named sound effects the game asks the presentation layer to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Torpedo,
    Explosion,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 2] = [SoundEffect::Torpedo, SoundEffect::Explosion];

    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Torpedo => "torpedo",
            SoundEffect::Explosion => "explosion",
        }
    }
}

/// Things the presentation layer may want to react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ScoreChanged(u32),
    Sound(SoundEffect),
    EnemySpawned(EntityId),
    EnemyDestroyed(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Paused,
}

pub struct Game {
    config: GameConfig,
    rng: StdRng,
    next_id: u64,
    phase: Phase,
    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    explosions: Vec<Explosion>,
    starfield: Starfield,
    spawner: EnemySpawner,
    score: u32,
    commands: VecDeque<Command>,
    events: Vec<GameEvent>,
}

impl Game {
    /// Builds a fresh game. `seed` makes spawns reproducible; without one the
    /// RNG is seeded from the OS.
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut starfield = Starfield::new(
            &mut rng,
            config.screen_width,
            config.screen_height,
            config.star_count,
        );
        // Start with the screen already full of stars
        starfield.advance(config.starfield_prewarm_secs);

        let player = Player::new(
            config.screen_width,
            config.player_size,
            config.player_base_offset,
            config.controls,
        );
        let spawner = EnemySpawner::new(
            config.variant_selection,
            config.spawn_margin,
            config.enemy_size,
            config.enemy_descent_secs,
        );

        info!(
            "new game: {}x{} controls={:?} seed={:?}",
            config.screen_width, config.screen_height, config.controls, seed
        );

        Self {
            config,
            rng,
            next_id: 0,
            phase: Phase::Playing,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            explosions: Vec::new(),
            starfield,
            spawner,
            score: 0,
            commands: VecDeque::new(),
            events: Vec::new(),
        }
    }

    pub fn push_command(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Commands queued but not yet applied, oldest first.
    pub fn pending_commands(&self) -> Vec<Command> {
        self.commands.iter().copied().collect()
    }

    /// Takes all events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
        };
    }

    /// Advances the simulation by `dt` seconds. Does nothing while paused;
    /// queued commands wait for the next running step.
    pub fn step(&mut self, dt: f32) {
        if self.phase == Phase::Paused {
            return;
        }

        // Existing entities move first so anything spawned by a command
        // this step shows up at its spawn point.
        self.update_entities(dt);

        while let Some(command) = self.commands.pop_front() {
            self.apply(command);
        }

        self.player.update(
            self.config.screen_width,
            self.config.tilt_gain,
            self.config.wrap_margin,
        );

        // Contacts are swept over the whole step, so entities that finished
        // their motion this step still get one last chance to collide.
        self.check_collisions();
        self.remove_finished();
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SpawnEnemy => {
                self.spawn_enemy();
            }
            Command::Fire => {
                self.fire();
            }
            Command::AccelerometerSample(raw) => self.player.apply_tilt_sample(raw),
        }
    }

    fn update_entities(&mut self, dt: f32) {
        self.starfield.advance(dt);

        for enemy in &mut self.enemies {
            enemy.update(dt);
        }
        for projectile in &mut self.projectiles {
            projectile.update(dt);
        }
        for explosion in &mut self.explosions {
            explosion.update(dt);
        }
    }

    fn remove_finished(&mut self) {
        self.enemies.retain(|e| !e.is_despawned());
        self.projectiles.retain(|p| !p.is_out_of_bounds());
        self.explosions.retain(|e| !e.is_dead());
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawns one enemy at a random column above the frame.
    pub fn spawn_enemy(&mut self) -> EntityId {
        let id = self.allocate_id();
        let enemy = self.spawner.spawn(
            &mut self.rng,
            id,
            self.config.screen_width,
            self.config.screen_height,
        );
        self.insert_enemy(enemy)
    }

    /// Spawns one enemy at a chosen column, bypassing the random placement.
    pub fn spawn_enemy_at(&mut self, x: f32, variant: EnemyVariant) -> EntityId {
        let id = self.allocate_id();
        let enemy = Enemy::new(
            id,
            x,
            self.config.screen_height,
            self.config.enemy_size,
            variant,
            self.config.enemy_descent_secs,
        );
        self.insert_enemy(enemy)
    }

    fn insert_enemy(&mut self, enemy: Enemy) -> EntityId {
        let id = enemy.id;
        debug!(
            "spawned {} {:?} at ({}, {})",
            enemy.variant.asset_name(),
            id,
            enemy.position.x,
            enemy.position.y
        );
        self.enemies.push(enemy);
        self.events.push(GameEvent::EnemySpawned(id));
        id
    }

    /// Launches a torpedo from the player's current position.
    pub fn fire(&mut self) -> EntityId {
        let id = self.allocate_id();
        let projectile = Projectile::new(
            id,
            self.player.muzzle(),
            self.config.projectile_launch_offset,
            self.config.screen_height,
            self.config.projectile_overshoot,
            self.config.projectile_radius,
            self.config.projectile_flight_secs,
        );
        self.projectiles.push(projectile);
        self.events.push(GameEvent::Sound(SoundEffect::Torpedo));
        id
    }

    fn bodies(&self) -> Vec<Body> {
        self.enemies
            .iter()
            .map(Enemy::body)
            .chain(self.projectiles.iter().map(Projectile::body))
            .collect()
    }

    fn check_collisions(&mut self) {
        let contacts = detect_contacts(&self.bodies());
        let mut destroyed = HashSet::new();
        for contact in &contacts {
            if destroyed.contains(&contact.a.id) || destroyed.contains(&contact.b.id) {
                continue;
            }
            if self.handle_contact(contact) {
                destroyed.insert(contact.a.id);
                destroyed.insert(contact.b.id);
            }
        }
    }

    /// Applies one contact event. Returns true if it destroyed anything.
    /// Contacts naming entities that no longer exist are ignored.
    pub fn handle_contact(&mut self, contact: &Contact) -> bool {
        let Some(resolution) = resolve_contact(&contact.a, &contact.b) else {
            return false;
        };

        match resolution.outcome {
            ContactOutcome::DestroyBoth => {
                let projectile_id = resolution.first.id;
                let enemy_id = resolution.second.id;

                let Some(enemy_idx) = self.enemies.iter().position(|e| e.id == enemy_id) else {
                    return false;
                };
                let Some(projectile_idx) =
                    self.projectiles.iter().position(|p| p.id == projectile_id)
                else {
                    return false;
                };

                let enemy = self.enemies.remove(enemy_idx);
                self.projectiles.remove(projectile_idx);

                let explosion_id = self.allocate_id();
                self.explosions.push(Explosion::new(
                    explosion_id,
                    enemy.position,
                    self.config.explosion_lifetime_secs,
                ));

                self.score += self.config.score_per_hit;
                debug!("{:?} destroyed {:?}", projectile_id, enemy_id);
                info!("score: {}", self.score);

                self.events.push(GameEvent::Sound(SoundEffect::Explosion));
                self.events.push(GameEvent::EnemyDestroyed(enemy_id));
                self.events.push(GameEvent::ScoreChanged(self.score));
                true
            }
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }
}
