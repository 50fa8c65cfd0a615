//! Fleet and wave construction
//!
//! Pure builders: given the arena, tuning and an RNG they return fresh
//! ordered ship lists. The caller owns the result.

use glam::Vec2;
use rand::Rng;

use super::entity::{Arena, IdGen};
use super::ship::Ship;
use crate::settings::FleetPreset;
use crate::tuning::{Faction, ShipClass, ShipType, SurvivalRules, Tuning};

/// Classes a regular wave enemy is drawn from
const REGULAR_CLASSES: [ShipClass; 4] = [
    ShipClass::Fighter,
    ShipClass::Bomber,
    ShipClass::Scout,
    ShipClass::Frigate,
];

/// Classes a boss is drawn from
const BOSS_CLASSES: [ShipClass; 4] = [
    ShipClass::Battlecruiser,
    ShipClass::Dreadnought,
    ShipClass::Support,
    ShipClass::Torpedo,
];

/// Edge margin and band height for regular enemy spawns
const WAVE_SPAWN_MARGIN: f32 = 50.0;
const WAVE_SPAWN_BAND: f32 = 200.0;
/// Boss spawn height
const BOSS_SPAWN_Y: f32 = 100.0;

/// Build the enemies for wave `wave`.
///
/// Regular enemies come first, the boss (if any) last.
pub fn spawn_wave(
    wave: u32,
    arena: &Arena,
    rules: &SurvivalRules,
    tuning: &Tuning,
    rng: &mut impl Rng,
    ids: &mut IdGen,
) -> Vec<Ship> {
    let count = rules.wave_size(wave);
    let mut ships = Vec::with_capacity(count as usize + 1);

    for _ in 0..count {
        let class = REGULAR_CLASSES[rng.random_range(0..REGULAR_CLASSES.len())];
        let pos = Vec2::new(
            rng.random::<f32>() * (arena.width - 2.0 * WAVE_SPAWN_MARGIN) + WAVE_SPAWN_MARGIN,
            rng.random::<f32>() * WAVE_SPAWN_BAND + WAVE_SPAWN_MARGIN,
        );
        let ty = ShipType::enemy(class);
        ships.push(Ship::new(ids.next_id(), ty, pos, tuning.ship(ty)));
    }

    if rules.has_boss(wave) {
        let class = BOSS_CLASSES[rng.random_range(0..BOSS_CLASSES.len())];
        let ty = ShipType::enemy(class);
        let pos = Vec2::new(arena.width / 2.0, BOSS_SPAWN_Y);
        let boss = Ship::new(ids.next_id(), ty, pos, tuning.ship(ty)).into_boss();
        log::info!("Wave {wave}: boss {} with {} hull", ty.key(), boss.hull());
        ships.push(boss);
    }

    log::info!("Wave {wave}: spawned {} enemies", ships.len());
    ships
}

/// Formation slots relative to the preset anchor
fn preset_slots(preset: FleetPreset) -> &'static [(ShipClass, f32, f32)] {
    use ShipClass::*;

    match preset {
        FleetPreset::Balanced => &[(Fighter, 0.0, 0.0), (Frigate, -60.0, 40.0), (Scout, 60.0, 40.0)],
        FleetPreset::Heavy => &[(Frigate, 0.0, 0.0), (Fighter, -80.0, 50.0), (Scout, 80.0, 50.0)],
        FleetPreset::Fast => &[
            (Fighter, 0.0, 0.0),
            (Fighter, -50.0, 30.0),
            (Fighter, 50.0, 30.0),
            (Scout, 0.0, 60.0),
        ],
    }
}

/// Build the player's starting fleet around (width/2, 0.8·height)
pub fn player_fleet(
    preset: FleetPreset,
    arena: &Arena,
    tuning: &Tuning,
    ids: &mut IdGen,
) -> Vec<Ship> {
    let anchor = Vec2::new(arena.width / 2.0, arena.height * 0.8);
    preset_slots(preset)
        .iter()
        .map(|&(class, dx, dy)| {
            let ty = ShipType::player(class);
            Ship::new(ids.next_id(), ty, anchor + Vec2::new(dx, dy), tuning.ship(ty))
        })
        .collect()
}

/// Fleet battle formations keep clear of the bottom edge by this much
const FORMATION_BOTTOM_MARGIN: f32 = 50.0;
/// Distance of each fleet's column from its side of the arena
const FORMATION_INSET: f32 = 200.0;

/// One formation slot: class, x offset from the fleet column, then
/// y = fraction · usable height + y offset
type Slot = (ShipClass, f32, f32, f32);

/// Blue: tight defensive groups
const BLUE_FORMATION: [Slot; 15] = {
    use ShipClass::*;
    [
        (Dreadnought, 20.0, 0.0, 70.0),
        (Support, -30.0, 0.0, 90.0),
        (Fighter, 70.0, 0.0, 50.0),
        (Scout, -10.0, 0.0, 130.0),
        (Battlecruiser, 0.0, 0.25, 0.0),
        (Frigate, -80.0, 0.25, 20.0),
        (Frigate, 60.0, 0.25, 30.0),
        (Torpedo, 40.0, 0.45, 0.0),
        (Fighter, -50.0, 0.65, 0.0),
        (Fighter, 10.0, 0.65, -25.0),
        (Scout, -20.0, 0.65, 40.0),
        (Bomber, 30.0, 0.8, 0.0),
        (Support, -40.0, 0.8, 30.0),
        (Scout, 0.0, 0.95, 0.0),
        (Torpedo, 80.0, 0.95, -20.0),
    ]
};

/// Red: spread out aggressive groups
const RED_FORMATION: [Slot; 15] = {
    use ShipClass::*;
    [
        (Battlecruiser, -40.0, 0.0, 60.0),
        (Torpedo, 30.0, 0.0, 80.0),
        (Fighter, -90.0, 0.0, 100.0),
        (Scout, 60.0, 0.2, 0.0),
        (Dreadnought, 0.0, 0.4, 0.0),
        (Bomber, -70.0, 0.4, -30.0),
        (Frigate, 50.0, 0.4, 40.0),
        (Torpedo, -30.0, 0.6, 0.0),
        (Fighter, 80.0, 0.6, -40.0),
        (Support, -20.0, 0.75, 0.0),
        (Frigate, -60.0, 0.75, 35.0),
        (Scout, 40.0, 0.75, 20.0),
        (Fighter, 20.0, 0.9, 0.0),
        (Bomber, -80.0, 0.9, -15.0),
        (Scout, 70.0, 0.9, 25.0),
    ]
};

/// Build one side of a fleet battle.
///
/// Blue (player faction) sits on the left column, Red on the right.
pub fn battle_formation(
    faction: Faction,
    arena: &Arena,
    tuning: &Tuning,
    ids: &mut IdGen,
) -> Vec<Ship> {
    let (column_x, slots) = match faction {
        Faction::Player => (FORMATION_INSET, &BLUE_FORMATION),
        Faction::Enemy => (arena.width - FORMATION_INSET, &RED_FORMATION),
    };
    let usable = arena.height - FORMATION_BOTTOM_MARGIN;

    slots
        .iter()
        .map(|&(class, dx, fraction, dy)| {
            let ty = ShipType::new(faction, class);
            let pos = Vec2::new(column_x + dx, usable * fraction + dy);
            Ship::stationed(ids.next_id(), ty, pos, tuning.ship(ty))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawn(wave: u32, seed: u64) -> Vec<Ship> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = IdGen::default();
        spawn_wave(
            wave,
            &Arena::new(800.0, 600.0),
            &SurvivalRules::default(),
            &Tuning::default(),
            &mut rng,
            &mut ids,
        )
    }

    #[test]
    fn test_first_wave_has_four_and_no_boss() {
        let ships = spawn(1, 11);
        assert_eq!(ships.len(), 4);
        assert!(ships.iter().all(|s| !s.is_boss));
    }

    #[test]
    fn test_third_wave_adds_boss() {
        let ships = spawn(3, 5);
        assert_eq!(ships.len(), 7);
        assert_eq!(ships.iter().filter(|s| s.is_boss).count(), 1);

        let boss = ships.last().unwrap();
        assert!(boss.is_boss);
        assert_eq!(boss.pos, Vec2::new(400.0, 100.0));
        let base = Tuning::default().ship(boss.ship_type).hull;
        assert_eq!(boss.hull(), 2 * base);
        assert!(BOSS_CLASSES.contains(&boss.ship_type.class));
    }

    #[test]
    fn test_regular_spawns_in_band() {
        for seed in 0..20 {
            for ship in spawn(5, seed) {
                assert!(ship.pos.x >= 50.0 && ship.pos.x <= 750.0);
                assert!(ship.pos.y >= 50.0 && ship.pos.y <= 250.0);
                assert!(REGULAR_CLASSES.contains(&ship.ship_type.class));
                assert_eq!(ship.faction(), Faction::Enemy);
            }
        }
    }

    #[test]
    fn test_wave_sizes_follow_rule() {
        for wave in 1..=12 {
            let ships = spawn(wave, wave as u64);
            let regular = ships.iter().filter(|s| !s.is_boss).count() as u32;
            assert_eq!(regular, (3 + wave).min(8));
            assert_eq!(ships.len() as u32 - regular, u32::from(wave % 3 == 0));
        }
    }

    #[test]
    fn test_same_seed_same_wave() {
        let a = spawn(4, 99);
        let b = spawn(4, 99);
        let pa: Vec<_> = a.iter().map(|s| (s.ship_type, s.pos)).collect();
        let pb: Vec<_> = b.iter().map(|s| (s.ship_type, s.pos)).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_presets() {
        let arena = Arena::new(1000.0, 500.0);
        let tuning = Tuning::default();
        let mut ids = IdGen::default();

        let balanced = player_fleet(FleetPreset::Balanced, &arena, &tuning, &mut ids);
        assert_eq!(balanced.len(), 3);
        assert_eq!(balanced[0].pos, Vec2::new(500.0, 400.0));
        assert_eq!(balanced[1].ship_type.class, ShipClass::Frigate);
        assert_eq!(balanced[1].pos, Vec2::new(440.0, 440.0));

        let heavy = player_fleet(FleetPreset::Heavy, &arena, &tuning, &mut ids);
        assert_eq!(heavy[0].ship_type.class, ShipClass::Frigate);
        assert_eq!(heavy[2].pos, Vec2::new(580.0, 450.0));

        let fast = player_fleet(FleetPreset::Fast, &arena, &tuning, &mut ids);
        assert_eq!(fast.len(), 4);
        assert_eq!(fast[3].ship_type.class, ShipClass::Scout);
        assert!(fast.iter().all(|s| s.faction() == Faction::Player));
    }

    #[test]
    fn test_battle_formations() {
        let arena = Arena::new(1200.0, 850.0);
        let tuning = Tuning::default();
        let mut ids = IdGen::default();

        let blue = battle_formation(Faction::Player, &arena, &tuning, &mut ids);
        let red = battle_formation(Faction::Enemy, &arena, &tuning, &mut ids);
        assert_eq!(blue.len(), 15);
        assert_eq!(red.len(), 15);

        assert_eq!(blue[0].ship_type, ShipType::player(ShipClass::Dreadnought));
        assert_eq!(blue[0].pos, Vec2::new(220.0, 70.0));
        // usable height 800 · 0.25
        assert_eq!(blue[4].pos, Vec2::new(200.0, 200.0));
        assert_eq!(red[4].ship_type, ShipType::enemy(ShipClass::Dreadnought));
        assert_eq!(red[4].pos, Vec2::new(1000.0, 320.0));

        let mut all_ids: Vec<_> = blue.iter().chain(&red).map(|s| s.id).collect();
        all_ids.dedup();
        assert_eq!(all_ids.len(), 30);
    }
}
