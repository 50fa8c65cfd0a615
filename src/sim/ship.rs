//! Ships: hull, stats and per-frame movement

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use super::entity::{Body, EntityId, Lifecycle};
use crate::consts::*;
use crate::heading_to;
use crate::tuning::{BulletKind, Faction, ShipStats, ShipType};

/// How a ship moves on its own each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Moved only by player input
    Piloted,
    /// Drifts down the screen with a lateral wobble and chases targets
    Raider,
    /// Holds position, idly rocking its heading (fleet battle)
    Stationed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: EntityId,
    pub ship_type: ShipType,
    pub pos: Vec2,
    pub radius: f32,
    /// Always within `0..=max_hull`; only ever lowered
    hull: i32,
    max_hull: i32,
    /// Pixels per frame
    pub speed: f32,
    pub damage: i32,
    /// Facing (radians, screen coordinates)
    pub angle: f32,
    pub is_boss: bool,
    pub score_value: u64,
    /// Weight for fleet AI shooter selection
    pub fire_rate: f32,
    pub bullet: BulletKind,
    /// Drawn footprint in pixels
    pub sprite_size: f32,
    pub behavior: Behavior,
}

impl Ship {
    /// A wave survival ship; player ships are piloted, enemy ships raid
    pub fn new(id: EntityId, ship_type: ShipType, pos: Vec2, stats: ShipStats) -> Self {
        let behavior = match ship_type.faction {
            Faction::Player => Behavior::Piloted,
            Faction::Enemy => Behavior::Raider,
        };
        let hull = stats.hull.max(1);
        Self {
            id,
            ship_type,
            pos,
            radius: SHIP_RADIUS,
            hull,
            max_hull: hull,
            speed: stats.speed,
            damage: stats.damage,
            angle: 0.0,
            is_boss: false,
            score_value: SHIP_SCORE,
            fire_rate: stats.fire_rate,
            bullet: stats.bullet,
            sprite_size: SHIP_SPRITE_SIZE,
            behavior,
        }
    }

    /// Promote to boss tier: doubled hull, bigger footprint, more score
    pub fn into_boss(mut self) -> Self {
        self.hull = self.hull.saturating_mul(2);
        self.max_hull = self.hull;
        self.radius = BOSS_RADIUS;
        self.sprite_size = BOSS_SPRITE_SIZE;
        self.score_value = BOSS_SCORE;
        self.is_boss = true;
        self
    }

    /// A fleet battle ship; Blue faces right, Red faces left
    pub fn stationed(id: EntityId, ship_type: ShipType, pos: Vec2, stats: ShipStats) -> Self {
        let angle = match ship_type.faction {
            Faction::Player => FRAC_PI_2,
            Faction::Enemy => -FRAC_PI_2,
        };
        Self {
            radius: FLEET_SHIP_RADIUS,
            angle,
            sprite_size: stats.size,
            behavior: Behavior::Stationed,
            ..Self::new(id, ship_type, pos, stats)
        }
    }

    pub fn faction(&self) -> Faction {
        self.ship_type.faction
    }

    pub fn hull(&self) -> i32 {
        self.hull
    }

    pub fn max_hull(&self) -> i32 {
        self.max_hull
    }

    pub fn is_alive(&self) -> bool {
        self.hull > 0
    }

    /// Remaining hull as a fraction of full (for health bars)
    pub fn hull_fraction(&self) -> f32 {
        self.hull as f32 / self.max_hull as f32
    }

    /// Subtract `amount` from hull, stopping at zero.
    ///
    /// Callers check [`Ship::is_alive`] afterwards to detect a kill.
    pub fn take_damage(&mut self, amount: i32) {
        self.hull = self.hull.saturating_sub(amount.max(0)).max(0);
    }

    /// Knock the ship out regardless of remaining hull
    pub fn destroy(&mut self) {
        self.hull = 0;
    }

    /// Advance one frame of autonomous movement.
    ///
    /// `clock_ms` is simulation time, which drives the wobble phases.
    pub fn update(&mut self, clock_ms: f64) {
        match self.behavior {
            Behavior::Piloted => {}
            Behavior::Raider => {
                self.pos.y += 0.5;
                let phase = (clock_ms * 0.001) as f32 + self.pos.x * 0.01;
                self.pos.x += phase.sin() * 0.5;
            }
            Behavior::Stationed => {
                self.angle += ((clock_ms * 0.0005) as f32).sin() * 0.005;
            }
        }
    }

    /// Close in on the first living target and face it.
    ///
    /// Target choice is stable (list order), not nearest.
    pub fn ai_update(&mut self, targets: &[Ship]) {
        if self.behavior != Behavior::Raider || !self.is_alive() {
            return;
        }
        let Some(target) = targets.iter().find(|t| t.is_alive()) else {
            return;
        };

        let to_target = target.pos - self.pos;
        let distance = to_target.length();
        if distance > AI_STANDOFF_DISTANCE {
            self.pos += to_target / distance * self.speed * 0.5;
        }
        self.angle = heading_to(self.pos, target.pos);
    }
}

impl Body for Ship {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

impl Lifecycle for Ship {
    fn is_active(&self) -> bool {
        self.is_alive()
    }
}
