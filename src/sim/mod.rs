//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick is one arcade frame)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies
//!
//! Two variants share the entity, collision and effect code:
//! [`WaveSurvival`] (endless waves against the player's fleet) and
//! [`FleetBattle`] (two stationed fleets trading fire).

pub mod battle;
pub mod collision;
pub mod driver;
pub mod effects;
pub mod entity;
pub mod events;
pub mod input;
pub mod projectile;
pub mod ship;
pub mod spawner;
pub mod survival;

pub use battle::FleetBattle;
pub use collision::{HitModel, Impact, Ram, check_collision};
pub use driver::{FrameDriver, HudSnapshot, Simulation};
pub use effects::{Explosion, ExplosionSize, Particle, Starfield};
pub use entity::{Arena, Body, Drawable, EntityId, Lifecycle};
pub use events::{GameEvent, GamePhase, Outcome};
pub use input::{Action, Movement, TickInput};
pub use projectile::Projectile;
pub use ship::{Behavior, Ship};
pub use spawner::spawn_wave;
pub use survival::{RunSummary, WaveSurvival};
