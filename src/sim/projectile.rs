//! Projectiles: straight-line flight with a frame budget

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Arena, Body, EntityId, Lifecycle};
use crate::direction;
use crate::tuning::{BulletKind, BulletStats, Faction};

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    /// Heading (radians)
    pub angle: f32,
    /// Pixels per frame
    pub speed: f32,
    pub damage: i32,
    pub radius: f32,
    pub faction: Faction,
    pub kind: BulletKind,
    /// Frames left before expiry
    pub life: u32,
    pub max_life: u32,
    pub active: bool,
    /// Recent positions, oldest first (rendering only)
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Projectile {
    pub fn new(
        id: EntityId,
        pos: Vec2,
        angle: f32,
        faction: Faction,
        kind: BulletKind,
        stats: BulletStats,
    ) -> Self {
        Self {
            id,
            pos,
            angle,
            speed: stats.speed,
            damage: stats.damage,
            radius: stats.radius,
            faction,
            kind,
            life: stats.life,
            max_life: stats.life,
            active: true,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Advance one frame.
    ///
    /// Expires once the life budget runs out or the projectile leaves the
    /// arena grown by `margin`.
    pub fn update(&mut self, arena: &Arena, margin: f32) {
        if self.kind.has_trail() {
            self.trail.push_back(self.pos);
            if self.trail.len() > TRAIL_LENGTH {
                self.trail.pop_front();
            }
        }

        self.pos += direction(self.angle) * self.speed;
        self.life = self.life.saturating_sub(1);

        if self.life == 0 || !arena.contains(self.pos, margin) {
            self.active = false;
        }
    }

    /// Fraction of life remaining (for fading)
    pub fn life_fraction(&self) -> f32 {
        self.life as f32 / self.max_life.max(1) as f32
    }
}

impl Body for Projectile {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

impl Lifecycle for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }
}
