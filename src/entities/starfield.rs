use glam::Vec2;
use rand::Rng;

/// Downward drift speeds, in world units per second.
const MIN_STAR_SPEED: f32 = 40.0;
const MAX_STAR_SPEED: f32 = 160.0;

#[derive(Debug, Clone)]
pub struct Star {
    pub position: Vec2,
    pub speed: f32,
    pub char: char,
}

/// Background of stars scrolling down the screen.
#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Star>,
    height: f32,
}

impl Starfield {
    /// Scatters `count` stars over the frame. A frame with no area gets none.
    pub fn new<R: Rng>(rng: &mut R, width: f32, height: f32, count: usize) -> Self {
        let has_area = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
        let count = if has_area { count } else { 0 };
        let stars = (0..count)
            .map(|_| {
                let speed = rng.random_range(MIN_STAR_SPEED..MAX_STAR_SPEED);
                // Faster stars read as nearer, so draw them brighter
                let char = if speed > (MIN_STAR_SPEED + MAX_STAR_SPEED) / 2.0 {
                    '*'
                } else {
                    '.'
                };
                let x = rng.random_range(0.0..width);
                let y = rng.random_range(0.0..height);
                Star {
                    position: Vec2::new(x, y),
                    speed,
                    char,
                }
            })
            .collect();

        Self { stars, height }
    }

    /// Scrolls every star down, wrapping the ones that leave the bottom.
    pub fn advance(&mut self, dt: f32) {
        if self.height <= 0.0 {
            return;
        }
        for star in &mut self.stars {
            star.position.y = (star.position.y - star.speed * dt).rem_euclid(self.height);
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}
