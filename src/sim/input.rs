//! Per-frame input handed to a simulation

use glam::Vec2;

/// Discrete, one-shot commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Leave the menu and begin a run
    Start,
    /// Discard the current run and start over
    Restart,
    /// Toggle pause
    Pause,
    /// Primary fire
    Fire,
    /// Special (ray) attack
    Special,
    /// Select the previous living ship (fleet battle)
    CyclePrev,
    /// Select the next living ship (fleet battle)
    CycleNext,
}

/// Held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Movement {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Movement {
    /// Unit-per-axis step: each axis is -1, 0 or 1
    pub fn axis(&self) -> Vec2 {
        let mut d = Vec2::ZERO;
        if self.up {
            d.y -= 1.0;
        }
        if self.down {
            d.y += 1.0;
        }
        if self.left {
            d.x -= 1.0;
        }
        if self.right {
            d.x += 1.0;
        }
        d
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub movement: Movement,
    /// Pointer position in arena coordinates
    pub pointer: Vec2,
    /// One-shot actions, in arrival order
    pub actions: Vec<Action>,
}

impl TickInput {
    pub fn has(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Drop one-shot actions once a tick has seen them
    pub fn clear_actions(&mut self) {
        self.actions.clear();
    }
}

/// Whether an action last taken at `last` (ms) may be taken again at `now`
pub fn cooldown_ready(last: Option<f64>, now: f64, cooldown_ms: f64) -> bool {
    last.is_none_or(|t| now - t >= cooldown_ms)
}
