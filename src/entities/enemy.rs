use glam::Vec2;

use super::EntityId;
use super::motion::LinearMotion;
use crate::collision::Body;

/// The three alien sprites an enemy can be drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyVariant {
    Alien,
    Alien2,
    Alien3,
}

impl EnemyVariant {
    pub const ALL: [EnemyVariant; 3] = [
        EnemyVariant::Alien,
        EnemyVariant::Alien2,
        EnemyVariant::Alien3,
    ];

    pub fn asset_name(&self) -> &'static str {
        match self {
            EnemyVariant::Alien => "alien",
            EnemyVariant::Alien2 => "alien2",
            EnemyVariant::Alien3 => "alien3",
        }
    }

    pub fn get_sprite_lines(&self) -> Vec<&'static str> {
        match self {
            EnemyVariant::Alien => vec![" \\|/ ", "{===}", " /_\\ "],
            EnemyVariant::Alien2 => vec![" <*> ", "<|||>", " <*> "],
            EnemyVariant::Alien3 => vec!["[===]", "|###|", "[===]"],
        }
    }
}

/// A descending alien. It spawns just above the visible frame and glides
/// straight down until it is one body-height below the bottom edge.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub position: Vec2,
    /// Position before the latest update; the body sweeps from here
    pub previous: Vec2,
    pub size: Vec2,
    pub variant: EnemyVariant,
    pub motion: LinearMotion,
}

impl Enemy {
    pub fn new(
        id: EntityId,
        x: f32,
        screen_height: f32,
        size: Vec2,
        variant: EnemyVariant,
        descent_secs: f32,
    ) -> Self {
        let start = Vec2::new(x, screen_height + size.y);
        let target = Vec2::new(x, -size.y);

        Self {
            id,
            position: start,
            previous: start,
            size,
            variant,
            motion: LinearMotion::new(start, target, descent_secs),
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.previous = self.position;
        self.position = self.motion.advance(dt);
    }

    /// True once the descent has completed and the enemy should be removed.
    pub fn is_despawned(&self) -> bool {
        self.motion.is_finished()
    }

    pub fn body(&self) -> Body {
        Body::enemy(self.id, self.position, self.size).swept_from(self.previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alien(x: f32) -> Enemy {
        Enemy::new(EntityId(1), x, 1334.0, Vec2::new(60.0, 48.0), EnemyVariant::Alien, 6.0)
    }

    #[test]
    fn test_enemy_spawns_above_frame() {
        let enemy = alien(120.0);
        assert_eq!(enemy.position, Vec2::new(120.0, 1382.0));
        assert_eq!(enemy.motion.target, Vec2::new(120.0, -48.0));
        assert_eq!(enemy.previous, enemy.position);
    }

    #[test]
    fn test_enemy_descends_in_straight_line() {
        let mut enemy = alien(200.0);
        enemy.update(3.0);
        assert_eq!(enemy.position.x, 200.0);
        assert!((enemy.position.y - (1382.0 - 48.0) / 2.0).abs() < 1e-3);
        assert!(!enemy.is_despawned());
    }

    #[test]
    fn test_enemy_body_sweeps_from_previous_position() {
        let mut enemy = alien(200.0);
        enemy.update(1.0);
        let body = enemy.body();
        assert_eq!(body.previous, Vec2::new(200.0, 1382.0));
        assert_eq!(body.position, enemy.position);
    }

    #[test]
    fn test_enemy_despawns_after_descent() {
        let mut enemy = alien(200.0);
        enemy.update(6.0);
        assert!(enemy.is_despawned());
        assert_eq!(enemy.position.y, -48.0);
    }

    #[test]
    fn test_variant_asset_names() {
        let names: Vec<_> = EnemyVariant::ALL.iter().map(|v| v.asset_name()).collect();
        assert_eq!(names, vec!["alien", "alien2", "alien3"]);
    }

    #[test]
    fn test_variant_sprites_are_rectangular() {
        for variant in EnemyVariant::ALL {
            let lines = variant.get_sprite_lines();
            assert_eq!(lines.len(), 3);
            assert!(lines.iter().all(|l| l.chars().count() == 5));
        }
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_enemy_never_leaves_its_column(
                x in 70.0f32..680.0,
                steps in prop::collection::vec(0.0f32..0.5, 0..40)
            ) {
                let mut enemy = alien(x);
                let mut last_y = enemy.position.y;
                for dt in steps {
                    enemy.update(dt);
                    prop_assert_eq!(enemy.position.x, x);
                    prop_assert!(enemy.position.y <= last_y);
                    last_y = enemy.position.y;
                }
            }
        }
    }
}
