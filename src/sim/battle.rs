//! Fleet battle: two static fleets trading fire
//!
//! Blue (player faction) holds the left column, Red the right. The player
//! picks one living Blue ship and fires it at the nearest Red ship; an AI
//! takes occasional shots for both sides. Hits use the chance model, so hull
//! is never worn down: a ship is either untouched or destroyed.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{HitModel, resolve_projectile_hits};
use super::driver::{HudSnapshot, Simulation};
use super::effects::{Explosion, ExplosionSize, MAX_PARTICLES, Particle, STAR_COUNT, Starfield, blast};
use super::entity::{Arena, Drawable, IdGen, purge};
use super::events::{GameEvent, GamePhase, Outcome};
use super::input::{Action, TickInput, cooldown_ready};
use super::projectile::Projectile;
use super::ship::Ship;
use super::spawner::battle_formation;
use crate::consts::*;
use crate::heading_to;
use crate::settings::Settings;
use crate::tuning::{BulletKind, Faction, Tuning};

pub struct FleetBattle {
    pub phase: GamePhase,
    pub blue: Vec<Ship>,
    pub red: Vec<Ship>,
    pub projectiles: Vec<Projectile>,
    pub explosions: Vec<Explosion>,
    pub particles: Vec<Particle>,
    pub starfield: Starfield,
    /// Index into the living Blue ships
    selected: usize,

    arena: Arena,
    tuning: Tuning,
    max_particles: usize,

    clock_ms: f64,
    last_shot_ms: Option<f64>,
    last_cycle_ms: Option<f64>,
    /// Shared by every AI shooter on both sides
    last_ai_shot_ms: Option<f64>,

    rng: Pcg32,
    ids: IdGen,
    events: Vec<GameEvent>,
}

impl FleetBattle {
    pub fn new(seed: u64, arena: Arena, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let starfield = Starfield::generate(&arena, STAR_COUNT, &mut rng);
        Self {
            phase: GamePhase::Menu,
            blue: Vec::new(),
            red: Vec::new(),
            projectiles: Vec::new(),
            explosions: Vec::new(),
            particles: Vec::new(),
            starfield,
            selected: 0,
            arena,
            tuning,
            max_particles: MAX_PARTICLES,
            clock_ms: 0.0,
            last_shot_ms: None,
            last_cycle_ms: None,
            last_ai_shot_ms: None,
            rng,
            ids: IdGen::default(),
            events: Vec::new(),
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
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

    pub fn set_arena(&mut self, arena: Arena) {
        self.arena = arena;
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn start(&mut self) {
        self.clear_entities();
        self.phase = GamePhase::Playing;
        self.selected = 0;
        self.last_shot_ms = None;
        self.last_cycle_ms = None;
        self.last_ai_shot_ms = None;

        self.blue = battle_formation(Faction::Player, &self.arena, &self.tuning, &mut self.ids);
        self.red = battle_formation(Faction::Enemy, &self.arena, &self.tuning, &mut self.ids);
        log::info!(
            "Fleet battle started: {} blue vs {} red",
            self.blue.len(),
            self.red.len()
        );
    }

    pub fn restart(&mut self) {
        log::info!("Restarting fleet battle");
        self.start();
    }

    pub fn teardown(&mut self) {
        self.clear_entities();
        self.events.clear();
        self.phase = GamePhase::Menu;
    }

    fn clear_entities(&mut self) {
        self.blue.clear();
        self.red.clear();
        self.projectiles.clear();
        self.explosions.clear();
        self.particles.clear();
    }

    fn living(fleet: &[Ship]) -> impl Iterator<Item = &Ship> {
        fleet.iter().filter(|s| s.is_alive())
    }

    /// The Blue ship the player currently commands
    pub fn selected_ship(&self) -> Option<&Ship> {
        Self::living(&self.blue).nth(self.selected)
    }

    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        for &action in &input.actions {
            self.handle_lifecycle(action);
        }

        if self.phase != GamePhase::Playing {
            return;
        }

        self.clock_ms += f64::from(dt) * 1000.0;

        for &action in &input.actions {
            match action {
                Action::CyclePrev => self.cycle(-1),
                Action::CycleNext => self.cycle(1),
                Action::Fire => self.fire_selected(),
                _ => {}
            }
        }

        // 1. Background
        self.starfield.advance(&self.arena, &mut self.rng);

        // 3. Idle rotation; fleets never move
        for ship in self.blue.iter_mut().chain(self.red.iter_mut()) {
            ship.update(self.clock_ms);
        }

        // 5. Projectiles
        for projectile in &mut self.projectiles {
            projectile.update(&self.arena, BATTLE_BOUNDS_MARGIN);
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

        // 8. Cleanup; destroyed ships stay in their fleet
        purge(&mut self.projectiles);
        purge(&mut self.explosions);
        purge(&mut self.particles);
        let alive = Self::living(&self.blue).count();
        if alive > 0 {
            self.selected %= alive;
        } else {
            self.selected = 0;
        }

        // 9. AI
        self.ai_fire();

        // 10. Terminal conditions
        self.evaluate();
    }

    fn handle_lifecycle(&mut self, action: Action) {
        match (action, self.phase) {
            (Action::Start, GamePhase::Menu) => self.start(),
            (Action::Restart, GamePhase::Menu) => {}
            (Action::Restart, _) => self.restart(),
            (Action::Pause, GamePhase::Playing) => self.phase = GamePhase::Paused,
            (Action::Pause, GamePhase::Paused) => self.phase = GamePhase::Playing,
            _ => {}
        }
    }

    /// Step the selection through living Blue ships, wrapping at both ends
    fn cycle(&mut self, step: isize) {
        if !cooldown_ready(self.last_cycle_ms, self.clock_ms, self.tuning.battle.cycle_delay_ms) {
            return;
        }
        let alive = Self::living(&self.blue).count();
        if alive == 0 {
            return;
        }
        self.selected = (self.selected as isize + step).rem_euclid(alive as isize) as usize;
        self.last_cycle_ms = Some(self.clock_ms);
        log::debug!("Selected blue ship {}", self.selected);
    }

    /// The selected ship fires its own bullet kind at the nearest living Red ship
    fn fire_selected(&mut self) {
        if !cooldown_ready(self.last_shot_ms, self.clock_ms, self.tuning.battle.shot_cooldown_ms) {
            return;
        }
        let Some(shooter) = self.selected_ship() else {
            return;
        };
        let target = Self::living(&self.red).fold(None::<&Ship>, |best, ship| match best {
            Some(b) if b.pos.distance(shooter.pos) <= ship.pos.distance(shooter.pos) => Some(b),
            _ => Some(ship),
        });
        let Some(target) = target else {
            return;
        };

        let (origin, aim, kind) = (shooter.pos, target.pos, shooter.bullet);
        self.launch(Faction::Player, origin, aim, kind);
        self.last_shot_ms = Some(self.clock_ms);
    }

    fn launch(&mut self, faction: Faction, origin: Vec2, aim: Vec2, kind: BulletKind) {
        self.projectiles.push(Projectile::new(
            self.ids.next_id(),
            origin,
            heading_to(origin, aim),
            faction,
            kind,
            self.tuning.bullet(kind),
        ));
        self.events.push(GameEvent::Fired { faction, kind });
    }

    /// Once the shared cooldown allows, maybe have a living ship (weighted by
    /// fire rate) shoot a random living opponent
    fn ai_fire(&mut self) {
        if !cooldown_ready(self.last_ai_shot_ms, self.clock_ms, self.tuning.battle.ai_cooldown_ms) {
            return;
        }
        let roll = self.rng.random::<f64>();
        let shooters: Vec<&Ship> = Self::living(&self.blue).chain(Self::living(&self.red)).collect();
        if roll >= self.tuning.battle.ai_fire_chance || shooters.is_empty() {
            return;
        }

        // Quicker-firing classes get picked more often
        let Ok(&shooter) = shooters.choose_weighted(&mut self.rng, |s| s.fire_rate) else {
            return;
        };
        let opponents: Vec<&Ship> = match shooter.faction() {
            Faction::Player => Self::living(&self.red).collect(),
            Faction::Enemy => Self::living(&self.blue).collect(),
        };
        if opponents.is_empty() {
            return;
        }
        let target = opponents[self.rng.random_range(0..opponents.len())];

        let (faction, origin, aim, kind) = (shooter.faction(), shooter.pos, target.pos, shooter.bullet);
        self.launch(faction, origin, aim, kind);
        self.last_ai_shot_ms = Some(self.clock_ms);
    }

    fn resolve_collisions(&mut self) {
        let impacts = resolve_projectile_hits(
            &mut self.projectiles,
            &mut self.blue,
            &mut self.red,
            HitModel::Chance {
                destroy_chance: self.tuning.battle.destroy_chance,
            },
            &mut self.rng,
        );
        for impact in impacts {
            self.burst(impact.pos, ExplosionSize::Small);
            if impact.destroyed {
                self.burst(impact.pos, ExplosionSize::Large);
                self.events.push(GameEvent::ShipDestroyed {
                    faction: impact.faction,
                    boss: false,
                });
            } else {
                self.events.push(GameEvent::ShipHit {
                    faction: impact.faction,
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

    /// Defeat wins a tie: if both fleets die on the same frame, Blue lost
    fn evaluate(&mut self) {
        let outcome = if Self::living(&self.blue).next().is_none() {
            Outcome::Defeat
        } else if Self::living(&self.red).next().is_none() {
            Outcome::Victory
        } else {
            return;
        };
        self.phase = GamePhase::GameOver(outcome);
        self.events.push(GameEvent::GameOver { outcome });
        log::info!("Fleet battle over: {outcome:?}");
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::Battle {
            phase: self.phase,
            blue_alive: Self::living(&self.blue).count(),
            red_alive: Self::living(&self.red).count(),
            selected: self.selected_ship().map(|s| s.ship_type),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drawables(&self) -> Vec<Drawable<'_>> {
        let selected_id = self.selected_ship().map(|s| s.id);
        let stars = self.starfield.stars.iter().map(Drawable::Star);
        let particles = self.particles.iter().map(Drawable::Particle);
        let explosions = self.explosions.iter().map(Drawable::Explosion);
        let projectiles = self.projectiles.iter().map(Drawable::Projectile);
        let ships = Self::living(&self.blue)
            .chain(Self::living(&self.red))
            .map(|ship| Drawable::Ship {
                ship,
                selected: Some(ship.id) == selected_id,
            });

        stars
            .chain(particles)
            .chain(explosions)
            .chain(projectiles)
            .chain(ships)
            .collect()
    }
}

impl Simulation for FleetBattle {
    fn tick(&mut self, input: &TickInput, dt: f32) {
        FleetBattle::tick(self, input, dt);
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn set_arena(&mut self, arena: Arena) {
        FleetBattle::set_arena(self, arena);
    }

    fn apply_settings(&mut self, settings: &Settings) {
        FleetBattle::apply_settings(self, settings);
    }

    fn hud(&self) -> HudSnapshot {
        FleetBattle::hud(self)
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        FleetBattle::drain_events(self)
    }

    fn drawables(&self) -> Vec<Drawable<'_>> {
        FleetBattle::drawables(self)
    }
}
