//! Cosmetic entities: explosions, particles and the starfield.
//!
//! None of these affect gameplay; they only consume RNG from the
//! simulation so runs stay reproducible.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Arena, Lifecycle};

/// Default particle cap
pub const MAX_PARTICLES: usize = 512;
/// Frames a particle lives
pub const PARTICLE_LIFE: u32 = 30;
/// Per-frame velocity retention
pub const PARTICLE_DRAG: f32 = 0.98;
/// Stars in the background
pub const STAR_COUNT: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionSize {
    Small,
    Medium,
    Large,
}

impl ExplosionSize {
    pub fn frames(self) -> u32 {
        match self {
            ExplosionSize::Small => 10,
            ExplosionSize::Medium => 15,
            ExplosionSize::Large => 20,
        }
    }

    pub fn peak_radius(self) -> f32 {
        match self {
            ExplosionSize::Small => 15.0,
            ExplosionSize::Medium => 25.0,
            ExplosionSize::Large => 40.0,
        }
    }

    pub fn particle_count(self) -> usize {
        match self {
            ExplosionSize::Small => 5,
            ExplosionSize::Medium => 10,
            ExplosionSize::Large => 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub size: ExplosionSize,
    pub frame: u32,
    pub max_frames: u32,
    pub active: bool,
}

impl Explosion {
    pub fn new(pos: Vec2, size: ExplosionSize) -> Self {
        Self {
            pos,
            size,
            frame: 0,
            max_frames: size.frames(),
            active: true,
        }
    }

    pub fn update(&mut self) {
        self.frame += 1;
        if self.frame >= self.max_frames {
            self.active = false;
        }
    }

    /// 0 at spawn, 1 on the last frame
    pub fn progress(&self) -> f32 {
        self.frame as f32 / self.max_frames as f32
    }

    pub fn current_radius(&self) -> f32 {
        self.size.peak_radius() * self.progress()
    }
}

impl Lifecycle for Explosion {
    fn is_active(&self) -> bool {
        self.active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
    pub max_life: u32,
    /// Hue in degrees (fire colors, 15-75)
    pub hue: f32,
    pub active: bool,
}

impl Particle {
    pub fn new(pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 8.0,
                (rng.random::<f32>() - 0.5) * 8.0,
            ),
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
            hue: rng.random::<f32>() * 60.0 + 15.0,
            active: true,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel *= PARTICLE_DRAG;
        self.life = self.life.saturating_sub(1);
        if self.life == 0 {
            self.active = false;
        }
    }

    pub fn alpha(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }
}

impl Lifecycle for Particle {
    fn is_active(&self) -> bool {
        self.active
    }
}

/// Spawn an explosion and its particle burst.
///
/// Oldest particles are dropped once `max_particles` is reached.
pub fn blast(
    explosions: &mut Vec<Explosion>,
    particles: &mut Vec<Particle>,
    pos: Vec2,
    size: ExplosionSize,
    max_particles: usize,
    rng: &mut impl Rng,
) {
    explosions.push(Explosion::new(pos, size));
    // Always draw every particle so RNG use doesn't depend on the cap
    particles.extend((0..size.particle_count()).map(|_| Particle::new(pos, rng)));
    if particles.len() > max_particles {
        let excess = particles.len() - max_particles;
        particles.drain(..excess);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    /// Pixels per frame
    pub speed: f32,
    pub opacity: f32,
    /// Blue-ish tint hue, `None` for white
    pub tint: Option<f32>,
}

/// Scrolling background
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Starfield {
    pub stars: Vec<Star>,
}

impl Starfield {
    pub fn generate(arena: &Arena, count: usize, rng: &mut impl Rng) -> Self {
        let stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random::<f32>() * arena.width,
                    rng.random::<f32>() * arena.height,
                ),
                size: rng.random::<f32>() * 3.0 + 0.5,
                speed: rng.random::<f32>() * 1.5 + 0.2,
                opacity: rng.random::<f32>() * 0.9 + 0.1,
                tint: (rng.random::<f32>() > 0.8).then(|| rng.random::<f32>() * 60.0 + 180.0),
            })
            .collect();
        Self { stars }
    }

    /// Scroll down one frame; stars falling off the bottom re-enter at the top
    pub fn advance(&mut self, arena: &Arena, rng: &mut impl Rng) {
        for star in &mut self.stars {
            star.pos.y += star.speed;
            if star.pos.y > arena.height {
                star.pos.y = 0.0;
                star.pos.x = rng.random::<f32>() * arena.width;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_explosion_lifetimes() {
        for (size, frames) in [
            (ExplosionSize::Small, 10),
            (ExplosionSize::Medium, 15),
            (ExplosionSize::Large, 20),
        ] {
            let mut e = Explosion::new(Vec2::ZERO, size);
            for _ in 0..frames - 1 {
                e.update();
            }
            assert!(e.active);
            e.update();
            assert!(!e.active, "{size:?}");
        }
    }

    #[test]
    fn test_explosion_grows_to_peak() {
        let mut e = Explosion::new(Vec2::ZERO, ExplosionSize::Large);
        assert_eq!(e.current_radius(), 0.0);
        for _ in 0..10 {
            e.update();
        }
        assert!((e.current_radius() - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_particle_drag_and_life() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut p = Particle::new(Vec2::ZERO, &mut rng);
        let v0 = p.vel;
        assert!(v0.x.abs() <= 4.0 && v0.y.abs() <= 4.0);
        p.update();
        assert!((p.vel - v0 * PARTICLE_DRAG).length() < 1e-6);
        for _ in 1..PARTICLE_LIFE {
            assert!(p.active);
            p.update();
        }
        assert!(!p.active);
    }

    #[test]
    fn test_blast_particle_counts() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut explosions = Vec::new();
        let mut particles = Vec::new();
        blast(&mut explosions, &mut particles, Vec2::ZERO, ExplosionSize::Large, 100, &mut rng);
        blast(&mut explosions, &mut particles, Vec2::ZERO, ExplosionSize::Medium, 100, &mut rng);
        blast(&mut explosions, &mut particles, Vec2::ZERO, ExplosionSize::Small, 100, &mut rng);
        assert_eq!(explosions.len(), 3);
        assert_eq!(particles.len(), 30);
    }

    #[test]
    fn test_blast_respects_particle_cap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut explosions = Vec::new();
        let mut particles = Vec::new();
        for _ in 0..4 {
            blast(&mut explosions, &mut particles, Vec2::ZERO, ExplosionSize::Large, 20, &mut rng);
        }
        assert_eq!(particles.len(), 20);

        // The survivors are the newest burst
        let mut fresh = Pcg32::seed_from_u64(99);
        let mut newest = Vec::new();
        blast(&mut Vec::new(), &mut newest, Vec2::ZERO, ExplosionSize::Large, 100, &mut fresh);
        let mut rng = Pcg32::seed_from_u64(99);
        let mut capped: Vec<Particle> = (0..12)
            .map(|_| Particle::new(Vec2::ONE, &mut Pcg32::seed_from_u64(5)))
            .collect();
        blast(&mut explosions, &mut capped, Vec2::ZERO, ExplosionSize::Large, 15, &mut rng);
        let vels: Vec<Vec2> = capped.iter().map(|p| p.vel).collect();
        assert_eq!(vels, newest.iter().map(|p| p.vel).collect::<Vec<_>>());

        let mut none = Vec::new();
        blast(&mut explosions, &mut none, Vec2::ZERO, ExplosionSize::Large, 0, &mut rng);
        assert!(none.is_empty());
    }

    #[test]
    fn test_starfield_wraps() {
        let arena = Arena::new(200.0, 100.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = Starfield::generate(&arena, STAR_COUNT, &mut rng);
        assert_eq!(field.stars.len(), STAR_COUNT);
        for _ in 0..600 {
            field.advance(&arena, &mut rng);
        }
        assert!(field.stars.iter().all(|s| s.pos.y >= 0.0 && s.pos.y <= arena.height));
        assert!(field.stars.iter().all(|s| s.pos.x >= 0.0 && s.pos.x <= arena.width));
    }
}
