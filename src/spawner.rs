//! Enemy placement and sprite selection.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::entities::{Enemy, EnemyVariant, EntityId};

/// How the next enemy sprite is picked from the three variants.
///
/// `Reshuffle` shuffles the pool before every spawn and takes the first
/// entry, which is the classic behavior. It is not a shuffle bag: the same
/// variant can come up many times in a row. `ShuffleBag` deals all three
/// in a shuffled order before reshuffling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantSelection {
    #[default]
    Reshuffle,
    ShuffleBag,
}

#[derive(Debug, Clone)]
pub struct VariantPicker {
    pool: [EnemyVariant; 3],
    cursor: usize,
    selection: VariantSelection,
}

impl VariantPicker {
    pub fn new(selection: VariantSelection) -> Self {
        Self {
            pool: EnemyVariant::ALL,
            // Forces a shuffle before the first deal
            cursor: EnemyVariant::ALL.len(),
            selection,
        }
    }

    pub fn next<R: Rng>(&mut self, rng: &mut R) -> EnemyVariant {
        match self.selection {
            VariantSelection::Reshuffle => {
                self.pool.shuffle(rng);
                self.pool[0]
            }
            VariantSelection::ShuffleBag => {
                if self.cursor >= self.pool.len() {
                    self.pool.shuffle(rng);
                    self.cursor = 0;
                }
                let variant = self.pool[self.cursor];
                self.cursor += 1;
                variant
            }
        }
    }
}

/// Builds enemies just above the top edge at a random column.
#[derive(Debug, Clone)]
pub struct EnemySpawner {
    picker: VariantPicker,
    margin: f32,
    size: Vec2,
    descent_secs: f32,
}

impl EnemySpawner {
    pub fn new(selection: VariantSelection, margin: f32, size: Vec2, descent_secs: f32) -> Self {
        Self {
            picker: VariantPicker::new(selection),
            margin,
            size,
            descent_secs,
        }
    }

    /// Uniform integer column in `[margin, screen_width - margin]`. A screen
    /// too narrow for both margins always spawns at `margin`.
    pub fn spawn_x<R: Rng>(&self, rng: &mut R, screen_width: f32) -> f32 {
        let min = self.margin.ceil() as i64;
        let max = (screen_width - self.margin).floor() as i64;
        if max <= min {
            return min as f32;
        }
        rng.random_range(min..=max) as f32
    }

    pub fn spawn<R: Rng>(
        &mut self,
        rng: &mut R,
        id: EntityId,
        screen_width: f32,
        screen_height: f32,
    ) -> Enemy {
        let variant = self.picker.next(rng);
        let x = self.spawn_x(rng, screen_width);
        Enemy::new(id, x, screen_height, self.size, variant, self.descent_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn spawner(selection: VariantSelection) -> EnemySpawner {
        EnemySpawner::new(selection, 70.0, Vec2::new(60.0, 48.0), 6.0)
    }

    #[test]
    fn test_spawn_places_enemy_above_frame() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut spawner = spawner(VariantSelection::Reshuffle);
        let enemy = spawner.spawn(&mut rng, EntityId(1), 750.0, 1334.0);
        assert_eq!(enemy.position.y, 1382.0);
        assert_eq!(enemy.motion.target.y, -48.0);
        assert_eq!(enemy.motion.duration, 6.0);
        assert_eq!(enemy.position.x.fract(), 0.0);
    }

    #[test]
    fn test_narrow_screen_collapses_to_margin() {
        let mut rng = StdRng::seed_from_u64(3);
        let spawner = spawner(VariantSelection::Reshuffle);
        assert_eq!(spawner.spawn_x(&mut rng, 100.0), 70.0);
        assert_eq!(spawner.spawn_x(&mut rng, 140.0), 70.0);
    }

    #[test]
    fn test_shuffle_bag_deals_each_variant_once_per_round() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut picker = VariantPicker::new(VariantSelection::ShuffleBag);
        for _ in 0..10 {
            let round: HashSet<_> = (0..3).map(|_| picker.next(&mut rng)).collect();
            assert_eq!(round.len(), 3);
        }
    }

    #[test]
    fn test_reshuffle_eventually_uses_every_variant() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut picker = VariantPicker::new(VariantSelection::Reshuffle);
        let seen: HashSet<_> = (0..100).map(|_| picker.next(&mut rng)).collect();
        assert_eq!(seen.len(), 3);
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_spawn_x_within_margins(
                seed in any::<u64>(),
                width in 140.0f32..3000.0,
                spawns in 1usize..50
            ) {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut spawner = spawner(VariantSelection::Reshuffle);
                for i in 0..spawns {
                    let enemy = spawner.spawn(&mut rng, EntityId(i as u64), width, 1334.0);
                    prop_assert!(enemy.position.x >= 70.0);
                    prop_assert!(enemy.position.x <= width - 70.0);
                }
            }
        }
    }
}
