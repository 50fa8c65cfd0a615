//! Wave survival: the player's fleet against escalating enemy waves
//!
//! Damage depletes hull. Kills score, cleared waves pay a bonus and the
//! next wave arrives after a short delay. The run ends when every player
//! ship is gone (or, optionally, once a target wave is cleared).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{HitModel, resolve_projectile_hits, resolve_rams};
use super::driver::{HudSnapshot, Simulation};
use super::effects::{Explosion, ExplosionSize, Particle, STAR_COUNT, Starfield, blast};
use super::entity::{Arena, Drawable, IdGen, purge};
use super::events::{GameEvent, GamePhase, Outcome};
use super::input::{Action, TickInput, cooldown_ready};
use super::projectile::Projectile;
use super::ship::Ship;
use super::spawner::{player_fleet, spawn_wave};
use crate::consts::*;
use crate::heading_to;
use crate::settings::{FleetPreset, Settings};
use crate::tuning::{BulletKind, Faction, Tuning};

/// Final tally of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: Outcome,
    pub score: u64,
    pub waves_survived: u32,
}

pub struct WaveSurvival {
    pub phase: GamePhase,
    pub score: u64,
    /// Current wave number (1-based)
    pub wave: u32,
    /// Rounded mean hull of living player ships
    pub player_hull: i32,
    pub player_shield: i32,

    pub players: Vec<Ship>,
    pub enemies: Vec<Ship>,
    pub projectiles: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    pub particles: Vec<Particle>,
    pub starfield: Starfield,

    arena: Arena,
    tuning: Tuning,
    preset: FleetPreset,
    max_particles: usize,

    /// Simulation time (ms); only advances while playing
    clock_ms: f64,
    last_shot_ms: Option<f64>,
    last_special_ms: Option<f64>,
    /// When the next wave arrives, once the current one is cleared
    pending_wave_at: Option<f64>,

    rng: Pcg32,
    ids: IdGen,
    events: Vec<GameEvent>,
}

impl WaveSurvival {
    pub fn new(seed: u64, arena: Arena, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let starfield = Starfield::generate(&arena, STAR_COUNT, &mut rng);
        Self {
            phase: GamePhase::Menu,
            score: 0,
            wave: 1,
            player_hull: FULL_HULL,
            player_shield: FULL_SHIELD,
            players: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            explosions: Vec::new(),
            particles: Vec::new(),
            starfield,
            arena,
            tuning,
            preset: FleetPreset::default(),
            max_particles: super::effects::MAX_PARTICLES,
            clock_ms: 0.0,
            last_shot_ms: None,
            last_special_ms: None,
            pending_wave_at: None,
            rng,
            ids: IdGen::default(),
            events: Vec::new(),
        }
    }

    /// Pick up preset and effects preferences; the preset applies from the next start
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.preset = settings.preset;
        self.max_particles = settings.max_particles();
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
        if !settings.starfield_enabled() {
            self.starfield.stars.clear();
        } else if self.starfield.stars.is_empty() {
            self.starfield = Starfield::generate(&self.arena, STAR_COUNT, &mut self.rng);
        }
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn set_arena(&mut self, arena: Arena) {
        self.arena = arena;
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Begin a run with the configured preset
    pub fn start(&mut self) {
        self.clear_entities();
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.wave = 1;
        self.player_hull = FULL_HULL;
        self.player_shield = FULL_SHIELD;
        self.last_shot_ms = None;
        self.last_special_ms = None;
        self.pending_wave_at = None;

        self.players = player_fleet(self.preset, &self.arena, &self.tuning, &mut self.ids);
        self.spawn_current_wave();

        log::info!(
            "Wave survival started: {} fleet, {} ships",
            self.preset.as_str(),
            self.players.len()
        );
    }

    /// Throw away the current run and start over
    pub fn restart(&mut self) {
        log::info!("Restarting wave survival (score was {})", self.score);
        self.start();
    }

    /// Drop everything and go back to the menu
    pub fn teardown(&mut self) {
        self.clear_entities();
        self.events.clear();
        self.pending_wave_at = None;
        self.phase = GamePhase::Menu;
    }

    fn clear_entities(&mut self) {
        self.players.clear();
        self.enemies.clear();
        self.projectiles.clear();
        self.explosions.clear();
        self.particles.clear();
    }

    fn spawn_current_wave(&mut self) {
        self.enemies = spawn_wave(
            self.wave,
            &self.arena,
            &self.tuning.survival,
            &self.tuning,
            &mut self.rng,
            &mut self.ids,
        );
        self.events.push(GameEvent::WaveSpawned {
            wave: self.wave,
            count: self.enemies.len(),
            boss: self.enemies.iter().any(|s| s.is_boss),
        });
    }

    /// Advance one frame
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        for &action in &input.actions {
            self.handle_lifecycle(action);
        }

        if self.phase != GamePhase::Playing {
            return;
        }

        self.clock_ms += f64::from(dt) * 1000.0;

        if self.pending_wave_at.is_some_and(|at| self.clock_ms >= at) {
            self.pending_wave_at = None;
            self.spawn_current_wave();
        }

        if input.has(Action::Fire) {
            self.fire(input.pointer);
        }
        if input.has(Action::Special) {
            self.special_attack(input.pointer);
        }

        // 1. Background
        self.starfield.advance(&self.arena, &mut self.rng);

        // 2. Player formation
        self.move_players(input);

        // 3-4. Ships
        for ship in self.players.iter_mut().chain(self.enemies.iter_mut()) {
            ship.update(self.clock_ms);
        }
        for enemy in &mut self.enemies {
            enemy.ai_update(&self.players);
        }

        // 5. Projectiles
        for projectile in &mut self.projectiles {
            projectile.update(&self.arena, SURVIVAL_BOUNDS_MARGIN);
        }

        // 6. Effects
        for explosion in &mut self.explosions {
            explosion.update();
        }
        for particle in &mut self.particles {
            particle.update();
        }

        // 7. Collisions
        self.resolve_collisions();

        // 8. Cleanup (dead player ships stay in the formation)
        purge(&mut self.projectiles);
        purge(&mut self.explosions);
        purge(&mut self.particles);
        self.enemies.retain(Ship::is_alive);

        // 9. Enemy fire
        self.enemy_fire();

        // 10. Terminal conditions
        self.evaluate();
    }

    fn handle_lifecycle(&mut self, action: Action) {
        match (action, self.phase) {
            (Action::Start, GamePhase::Menu) => self.start(),
            (Action::Restart, GamePhase::Menu) => {}
            (Action::Restart, _) => self.restart(),
            (Action::Pause, GamePhase::Playing) => {
                self.phase = GamePhase::Paused;
                log::debug!("Paused at {:.0} ms", self.clock_ms);
            }
            (Action::Pause, GamePhase::Paused) => self.phase = GamePhase::Playing,
            _ => {}
        }
    }

    /// Volley from every living player ship toward the pointer
    fn fire(&mut self, pointer: Vec2) {
        if !cooldown_ready(self.last_shot_ms, self.clock_ms, self.tuning.survival.shot_cooldown_ms) {
            return;
        }
        self.last_shot_ms = Some(self.clock_ms);
        self.volley(pointer, BulletKind::Bullet);
        self.events.push(GameEvent::Fired {
            faction: Faction::Player,
            kind: BulletKind::Bullet,
        });
    }

    /// Ray volley toward the pointer, on its own cooldown
    fn special_attack(&mut self, pointer: Vec2) {
        if !cooldown_ready(
            self.last_special_ms,
            self.clock_ms,
            self.tuning.survival.special_cooldown_ms,
        ) {
            return;
        }
        self.last_special_ms = Some(self.clock_ms);
        self.volley(pointer, BulletKind::Ray);
        self.events.push(GameEvent::Special);
    }

    fn volley(&mut self, target: Vec2, kind: BulletKind) {
        let stats = self.tuning.bullet(kind);
        for ship in self.players.iter().filter(|s| s.is_alive()) {
            self.projectiles.push(Projectile::new(
                self.ids.next_id(),
                ship.pos,
                heading_to(ship.pos, target),
                Faction::Player,
                kind,
                stats,
            ));
        }
    }

    fn move_players(&mut self, input: &TickInput) {
        let step = input.movement.axis() * self.tuning.survival.player_speed;
        let min = Vec2::splat(PLAYER_EDGE_MARGIN);
        let max = Vec2::new(
            self.arena.width - PLAYER_EDGE_MARGIN,
            self.arena.height - PLAYER_EDGE_MARGIN,
        )
        .max(min);

        for ship in self.players.iter_mut().filter(|s| s.is_alive()) {
            ship.pos = (ship.pos + step).clamp(min, max);
            ship.angle = heading_to(ship.pos, input.pointer);
        }
    }

    fn resolve_collisions(&mut self) {
        let impacts = resolve_projectile_hits(
            &mut self.projectiles,
            &mut self.players,
            &mut self.enemies,
            HitModel::Attrition,
            &mut self.rng,
        );
        for impact in impacts {
            self.burst(impact.pos, ExplosionSize::Small);
            if !impact.destroyed {
                self.events.push(GameEvent::ShipHit {
                    faction: impact.faction,
                });
                continue;
            }
            if impact.faction == Faction::Enemy {
                self.score += impact.score_value;
            }
            self.burst(impact.pos, ExplosionSize::Large);
            self.events.push(GameEvent::ShipDestroyed {
                faction: impact.faction,
                boss: impact.is_boss,
            });
        }

        let rams = resolve_rams(
            &mut self.players,
            &mut self.enemies,
            self.tuning.survival.ram_damage,
        );
        for ram in rams {
            self.burst(ram.player_pos, ExplosionSize::Medium);
            self.burst(ram.enemy_pos, ExplosionSize::Medium);
            if ram.player_destroyed {
                self.events.push(GameEvent::ShipDestroyed {
                    faction: Faction::Player,
                    boss: false,
                });
            }
            if ram.enemy_destroyed {
                self.events.push(GameEvent::ShipDestroyed {
                    faction: Faction::Enemy,
                    boss: false,
                });
            }
        }
    }

    fn burst(&mut self, pos: Vec2, size: ExplosionSize) {
        blast(
            &mut self.explosions,
            &mut self.particles,
            pos,
            size,
            self.max_particles,
            &mut self.rng,
        );
    }

    fn enemy_fire(&mut self) {
        let chance = self.tuning.survival.enemy_fire_chance;
        let stats = self.tuning.bullet(BulletKind::Bullet);

        for enemy in self.enemies.iter().filter(|s| s.is_alive()) {
            if self.rng.random::<f64>() >= chance {
                continue;
            }
            let Some(target) = self.players.iter().find(|s| s.is_alive()) else {
                continue;
            };
            self.projectiles.push(Projectile::new(
                self.ids.next_id(),
                enemy.pos,
                heading_to(enemy.pos, target.pos),
                Faction::Enemy,
                BulletKind::Bullet,
                stats,
            ));
            self.events.push(GameEvent::Fired {
                faction: Faction::Enemy,
                kind: BulletKind::Bullet,
            });
        }
    }

    fn evaluate(&mut self) {
        let living: Vec<i32> = self
            .players
            .iter()
            .filter(|s| s.is_alive())
            .map(Ship::hull)
            .collect();
        self.player_hull = if living.is_empty() {
            0
        } else {
            let sum: i64 = living.iter().map(|&h| i64::from(h)).sum();
            (sum as f64 / living.len() as f64).round() as i32
        };

        if self.player_hull <= 0 {
            self.end(Outcome::Defeat);
            return;
        }

        if self.enemies.is_empty() && self.pending_wave_at.is_none() {
            let cleared = self.wave;
            self.wave += 1;
            let bonus = self.tuning.survival.wave_bonus * u64::from(self.wave);
            self.score += bonus;
            self.events.push(GameEvent::WaveCleared {
                wave: cleared,
                bonus,
            });
            log::info!("Wave {cleared} cleared, +{bonus} (score {})", self.score);

            if self
                .tuning
                .survival
                .victory_wave
                .is_some_and(|target| cleared >= target)
            {
                self.end(Outcome::Victory);
                return;
            }
            self.pending_wave_at = Some(self.clock_ms + self.tuning.survival.wave_delay_secs * 1000.0);
        }
    }

    fn end(&mut self, outcome: Outcome) {
        self.phase = GamePhase::GameOver(outcome);
        self.pending_wave_at = None;
        self.events.push(GameEvent::GameOver { outcome });
        log::info!(
            "Game over ({outcome:?}): score {}, waves survived {}",
            self.score,
            self.wave.saturating_sub(1)
        );
    }

    /// Final score and waves survived, once the run is over
    pub fn summary(&self) -> Option<RunSummary> {
        match self.phase {
            GamePhase::GameOver(outcome) => Some(RunSummary {
                outcome,
                score: self.score,
                waves_survived: self.wave.saturating_sub(1),
            }),
            _ => None,
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::Survival {
            phase: self.phase,
            score: self.score,
            wave: self.wave,
            player_hull: self.player_hull,
            player_shield: self.player_shield,
            enemy_count: self.enemies.len(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Everything visible, back to front
    pub fn drawables(&self) -> Vec<Drawable<'_>> {
        let stars = self.starfield.stars.iter().map(Drawable::Star);
        let particles = self.particles.iter().map(Drawable::Particle);
        let explosions = self.explosions.iter().map(Drawable::Explosion);
        let projectiles = self.projectiles.iter().map(Drawable::Projectile);
        let ships = self
            .players
            .iter()
            .chain(&self.enemies)
            .filter(|s| s.is_alive())
            .map(|ship| Drawable::Ship {
                ship,
                selected: false,
            });

        stars
            .chain(particles)
            .chain(explosions)
            .chain(projectiles)
            .chain(ships)
            .collect()
    }
}

impl Simulation for WaveSurvival {
    fn tick(&mut self, input: &TickInput, dt: f32) {
        WaveSurvival::tick(self, input, dt);
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn set_arena(&mut self, arena: Arena) {
        WaveSurvival::set_arena(self, arena);
    }

    fn apply_settings(&mut self, settings: &Settings) {
        WaveSurvival::apply_settings(self, settings);
    }

    fn hud(&self) -> HudSnapshot {
        WaveSurvival::hud(self)
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        WaveSurvival::drain_events(self)
    }

    fn drawables(&self) -> Vec<Drawable<'_>> {
        WaveSurvival::drawables(self)
    }
}
