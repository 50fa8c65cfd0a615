//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Input capture (keyboard codes and pointer into [`TickInput`])
//! - The HUD sink the driver pushes snapshots to
//! - The browser canvas, DOM and sprite loading (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;

use crate::sim::driver::HudSnapshot;
use crate::sim::events::{GameEvent, GamePhase};
use crate::sim::input::{Action, TickInput};

/// One-way UI readout
pub trait HudSink {
    fn show(&mut self, hud: &HudSnapshot, events: &[GameEvent]);
}

/// HUD that writes to the log; used by the headless binary
#[derive(Debug, Default)]
pub struct LogHud {
    last_phase: Option<GamePhase>,
}

impl HudSink for LogHud {
    fn show(&mut self, hud: &HudSnapshot, events: &[GameEvent]) {
        let phase = match hud {
            HudSnapshot::Survival { phase, .. } | HudSnapshot::Battle { phase, .. } => *phase,
        };
        if self.last_phase != Some(phase) {
            log::info!("HUD {hud:?}");
            self.last_phase = Some(phase);
        }
        for event in events {
            match event {
                GameEvent::WaveCleared { .. } | GameEvent::GameOver { .. } => {
                    log::info!("{event:?} -> {hud:?}")
                }
                _ => log::trace!("{event:?}"),
            }
        }
    }
}

/// Which key layout applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    /// Move with WASD/arrows, click to fire, Space for the special attack
    Survival,
    /// W/S cycle the selected ship, Space fires it
    Battle,
}

impl Controls {
    /// Apply a key press (`KeyboardEvent.code`). Returns whether the key is
    /// bound, so the host can suppress the browser default.
    pub fn key_down(self, code: &str, input: &mut TickInput) -> bool {
        if matches!(code, "KeyP" | "Escape") {
            input.actions.push(Action::Pause);
            return true;
        }
        match self {
            Controls::Survival => {
                if code == "Space" {
                    input.actions.push(Action::Special);
                    return true;
                }
                set_movement(code, input, true)
            }
            Controls::Battle => {
                let action = match code {
                    "KeyW" | "ArrowUp" => Action::CyclePrev,
                    "KeyS" | "ArrowDown" => Action::CycleNext,
                    "Space" => Action::Fire,
                    _ => return false,
                };
                input.actions.push(action);
                true
            }
        }
    }

    pub fn key_up(self, code: &str, input: &mut TickInput) {
        if self == Controls::Survival {
            set_movement(code, input, false);
        }
    }

    pub fn pointer_moved(self, pos: Vec2, input: &mut TickInput) {
        input.pointer = pos;
    }

    pub fn pointer_pressed(self, pos: Vec2, input: &mut TickInput) {
        input.pointer = pos;
        if self == Controls::Survival {
            input.actions.push(Action::Fire);
        }
    }
}

fn set_movement(code: &str, input: &mut TickInput, held: bool) -> bool {
    let m = &mut input.movement;
    match code {
        "KeyW" | "ArrowUp" => m.up = held,
        "KeyS" | "ArrowDown" => m.down = held,
        "KeyA" | "ArrowLeft" => m.left = held,
        "KeyD" | "ArrowRight" => m.right = held,
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survival_keys() {
        let mut input = TickInput::default();
        assert!(Controls::Survival.key_down("ArrowLeft", &mut input));
        assert!(Controls::Survival.key_down("KeyW", &mut input));
        assert_eq!(input.movement.axis(), Vec2::new(-1.0, -1.0));

        Controls::Survival.key_up("KeyW", &mut input);
        assert_eq!(input.movement.axis(), Vec2::new(-1.0, 0.0));

        assert!(Controls::Survival.key_down("Space", &mut input));
        assert!(input.has(Action::Special));
        assert!(!Controls::Survival.key_down("KeyQ", &mut input));
    }

    #[test]
    fn test_battle_keys_cycle_instead_of_move() {
        let mut input = TickInput::default();
        Controls::Battle.key_down("KeyW", &mut input);
        Controls::Battle.key_down("KeyS", &mut input);
        Controls::Battle.key_down("Space", &mut input);
        assert_eq!(
            input.actions,
            vec![Action::CyclePrev, Action::CycleNext, Action::Fire]
        );
        assert_eq!(input.movement.axis(), Vec2::ZERO);
    }

    #[test]
    fn test_click_fires_only_in_survival() {
        let mut input = TickInput::default();
        let at = Vec2::new(40.0, 30.0);
        Controls::Battle.pointer_pressed(at, &mut input);
        assert!(input.actions.is_empty());
        assert_eq!(input.pointer, at);

        Controls::Survival.pointer_pressed(at, &mut input);
        assert!(input.has(Action::Fire));
    }

    #[test]
    fn test_pause_in_both_layouts() {
        for controls in [Controls::Survival, Controls::Battle] {
            let mut input = TickInput::default();
            assert!(controls.key_down("Escape", &mut input));
            assert_eq!(input.actions, vec![Action::Pause]);
        }
    }
}
