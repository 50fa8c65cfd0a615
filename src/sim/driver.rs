//! Fixed-step driver
//!
//! Hosts call [`FrameDriver::frame`] once per display refresh with the real
//! elapsed time. The driver turns that into whole simulation ticks, then
//! forwards events to audio and the HUD snapshot to the UI.

use serde::Serialize;

use super::entity::{Arena, Drawable};
use super::events::{GameEvent, GamePhase};
use super::input::{Action, TickInput};
use crate::audio::{AudioSink, dispatch_events};
use crate::consts::*;
use crate::platform::HudSink;
use crate::settings::Settings;
use crate::tuning::ShipType;

/// One-way readout for the UI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HudSnapshot {
    Survival {
        phase: GamePhase,
        score: u64,
        wave: u32,
        player_hull: i32,
        player_shield: i32,
        enemy_count: usize,
    },
    Battle {
        phase: GamePhase,
        blue_alive: usize,
        red_alive: usize,
        selected: Option<ShipType>,
    },
}

/// What a host needs from a simulation variant
pub trait Simulation {
    fn tick(&mut self, input: &TickInput, dt: f32);
    fn phase(&self) -> GamePhase;
    fn set_arena(&mut self, arena: Arena);
    fn apply_settings(&mut self, settings: &Settings);
    fn hud(&self) -> HudSnapshot;
    fn drain_events(&mut self) -> Vec<GameEvent>;
    fn drawables(&self) -> Vec<Drawable<'_>>;
}

pub struct FrameDriver<S> {
    pub sim: S,
    /// Held state plus actions queued since the last tick
    pub input: TickInput,
    accumulator: f32,
}

impl<S: Simulation> FrameDriver<S> {
    pub fn new(sim: S) -> Self {
        Self {
            sim,
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    /// Queue a one-shot action for the next tick
    pub fn push_action(&mut self, action: Action) {
        self.input.actions.push(action);
    }

    /// Run the ticks covered by `dt` seconds; returns how many ran
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.sim.tick(&self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.clear_actions();
        }

        // Don't carry a backlog past what one frame may run
        self.accumulator = self.accumulator.min(SIM_DT * MAX_SUBSTEPS as f32);
        substeps
    }

    /// Advance, then hand events to audio and the snapshot to the HUD
    pub fn frame(&mut self, dt: f32, audio: &mut impl AudioSink, hud: &mut impl HudSink) -> u32 {
        let ticks = self.advance(dt);
        let events = self.sim.drain_events();
        if !events.is_empty() {
            log::trace!("{} events this frame", events.len());
        }
        dispatch_events(audio, &events);
        hud.show(&self.sim.hud(), &events);
        ticks
    }
}
