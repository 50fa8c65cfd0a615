//! Lifecycle phases and the events a simulation emits for the host
//! to react to (sound, UI)

use serde::{Deserialize, Serialize};

use crate::tuning::{BulletKind, Faction};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Where a simulation is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for Start
    Menu,
    Playing,
    /// Frozen; the clock does not advance
    Paused,
    /// Run ended, waiting for Restart
    GameOver(Outcome),
}

/// Something worth telling the outside world about.
///
/// Events accumulate during `tick` and are handed over by `drain_events`;
/// the simulation never waits on anyone handling them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A volley left `faction`'s ships
    Fired { faction: Faction, kind: BulletKind },
    /// The special attack was launched
    Special,
    /// A ship of `faction` took a projectile hit and survived
    ShipHit { faction: Faction },
    /// A ship of `faction` was destroyed
    ShipDestroyed { faction: Faction, boss: bool },
    /// Wave `wave` was cleared; `bonus` was added to the score
    WaveCleared { wave: u32, bonus: u64 },
    WaveSpawned { wave: u32, count: usize, boss: bool },
    GameOver { outcome: Outcome },
}
