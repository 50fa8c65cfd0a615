//! Fleet Battle - arcade space combat simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ships, projectiles, collisions, waves)
//! - `tuning`: Data-driven ship/bullet stat tables and game rules
//! - `settings`: Player preferences (fleet preset, audio, effects)
//! - `render`: Drawing contract for an external canvas
//! - `audio`: Sound cues forwarded to an external synthesizer
//! - `platform`: Input capture, HUD sink and the browser host

pub mod audio;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{FleetPreset, Settings};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one arcade frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Longest host frame the driver will try to catch up on (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default play area (host resizes it to the canvas)
    pub const DEFAULT_ARENA_WIDTH: f32 = 1280.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 720.0;

    /// Wave survival ship radii
    pub const SHIP_RADIUS: f32 = 20.0;
    pub const BOSS_RADIUS: f32 = 40.0;
    /// Wave survival sprite footprints
    pub const SHIP_SPRITE_SIZE: f32 = 32.0;
    pub const BOSS_SPRITE_SIZE: f32 = 64.0;
    /// Fleet battle ships are all the same hit size
    pub const FLEET_SHIP_RADIUS: f32 = 40.0;

    /// Score per kill
    pub const SHIP_SCORE: u64 = 100;
    pub const BOSS_SCORE: u64 = 500;

    /// Player fleet hull/shield readout at the start of a run
    pub const FULL_HULL: i32 = 100;
    pub const FULL_SHIELD: i32 = 100;

    /// Enemies stop closing in once this near their target
    pub const AI_STANDOFF_DISTANCE: f32 = 100.0;

    /// Projectile bounds margins (pixels beyond the arena edge)
    pub const SURVIVAL_BOUNDS_MARGIN: f32 = 0.0;
    pub const BATTLE_BOUNDS_MARGIN: f32 = 50.0;

    /// Player ships stay this far inside the arena edges
    pub const PLAYER_EDGE_MARGIN: f32 = 20.0;
}

/// Heading (radians) from `from` toward `to`, screen coordinates (y down)
#[inline]
pub fn heading_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit direction for a heading
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
