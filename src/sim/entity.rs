//! Capabilities shared by everything that lives in the play area

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::{Explosion, Particle, Star};
use super::projectile::Projectile;
use super::ship::Ship;

pub type EntityId = u32;

/// Something with a position and a circular footprint
pub trait Body {
    fn pos(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Something that can expire and be purged at the end of a frame
pub trait Lifecycle {
    fn is_active(&self) -> bool;
}

/// Drop every inactive entry, keeping the order of the rest
pub fn purge<T: Lifecycle>(items: &mut Vec<T>) {
    items.retain(Lifecycle::is_active);
}

/// The visible play area, in screen pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(
            crate::consts::DEFAULT_ARENA_WIDTH,
            crate::consts::DEFAULT_ARENA_HEIGHT,
        )
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether `p` lies inside the arena grown by `margin` on every side
    pub fn contains(&self, p: Vec2, margin: f32) -> bool {
        p.x >= -margin && p.x <= self.width + margin && p.y >= -margin && p.y <= self.height + margin
    }
}

/// Monotonic entity ID allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdGen {
    next: EntityId,
}

impl Default for IdGen {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGen {
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// One thing to draw this frame, in back-to-front order
#[derive(Debug, Clone, Copy)]
pub enum Drawable<'a> {
    Star(&'a Star),
    Particle(&'a Particle),
    Explosion(&'a Explosion),
    Projectile(&'a Projectile),
    Ship { ship: &'a Ship, selected: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blip(bool);

    impl Lifecycle for Blip {
        fn is_active(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_purge_keeps_order() {
        let mut items = vec![Blip(true), Blip(false), Blip(true)];
        purge(&mut items);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|b| b.0));
    }

    #[test]
    fn test_arena_contains_with_margin() {
        let arena = Arena::new(100.0, 50.0);
        assert!(arena.contains(Vec2::new(0.0, 0.0), 0.0));
        assert!(!arena.contains(Vec2::new(-1.0, 10.0), 0.0));
        assert!(arena.contains(Vec2::new(-40.0, 10.0), 50.0));
        assert!(!arena.contains(Vec2::new(10.0, 101.0), 50.0));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids = IdGen::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(a, 1);
    }
}
