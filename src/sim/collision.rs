//! Hit testing and damage resolution
//!
//! Everything here is plain nested iteration over the live collections in
//! list order. There is no spatial index; fleets are small.

use glam::Vec2;
use rand::Rng;

use super::entity::{Body, EntityId};
use super::projectile::Projectile;
use super::ship::Ship;
use crate::tuning::Faction;

/// Circle overlap: centre distance strictly less than the summed radii
#[inline]
pub fn check_collision<A: Body + ?Sized, B: Body + ?Sized>(a: &A, b: &B) -> bool {
    a.pos().distance(b.pos()) < a.radius() + b.radius()
}

/// How a projectile hit translates into damage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitModel {
    /// Subtract projectile damage from hull (wave survival)
    Attrition,
    /// Ignore damage; each hit destroys the ship with this probability (fleet battle)
    Chance { destroy_chance: f64 },
}

/// A projectile striking a ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub ship_id: EntityId,
    /// Side of the ship that was hit
    pub faction: Faction,
    pub pos: Vec2,
    /// The hit took the ship from alive to dead
    pub destroyed: bool,
    pub is_boss: bool,
    pub score_value: u64,
}

/// Two opposing ships overlapping for a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ram {
    pub player_pos: Vec2,
    pub enemy_pos: Vec2,
    pub player_destroyed: bool,
    pub enemy_destroyed: bool,
}

/// Test every active projectile against the living ships of the opposing side.
///
/// A projectile stops at the first ship it overlaps (list order), so it can
/// never hit twice. Dead ships are skipped entirely.
pub fn resolve_projectile_hits(
    projectiles: &mut [Projectile],
    players: &mut [Ship],
    enemies: &mut [Ship],
    model: HitModel,
    rng: &mut impl Rng,
) -> Vec<Impact> {
    let mut impacts = Vec::new();

    for projectile in projectiles.iter_mut().filter(|p| p.active) {
        let targets: &mut [Ship] = match projectile.faction {
            Faction::Player => &mut *enemies,
            Faction::Enemy => &mut *players,
        };

        let Some(ship) = targets
            .iter_mut()
            .find(|s| s.is_alive() && check_collision(&*projectile, &**s))
        else {
            continue;
        };

        projectile.active = false;
        match model {
            HitModel::Attrition => ship.take_damage(projectile.damage),
            HitModel::Chance { destroy_chance } => {
                if rng.random::<f64>() < destroy_chance {
                    ship.destroy();
                }
            }
        }

        let impact = Impact {
            ship_id: ship.id,
            faction: ship.faction(),
            pos: ship.pos,
            destroyed: !ship.is_alive(),
            is_boss: ship.is_boss,
            score_value: ship.score_value,
        };
        log::trace!("projectile {} hit ship {}", projectile.id, ship.id);
        impacts.push(impact);
    }

    impacts
}

/// Apply ram damage to every overlapping living player/enemy pair.
///
/// Applied again on every frame the pair keeps overlapping.
pub fn resolve_rams(players: &mut [Ship], enemies: &mut [Ship], damage: i32) -> Vec<Ram> {
    let mut rams = Vec::new();

    for player in players.iter_mut() {
        for enemy in enemies.iter_mut() {
            if !player.is_alive() || !enemy.is_alive() || !check_collision(&*player, &*enemy) {
                continue;
            }
            player.take_damage(damage);
            enemy.take_damage(damage);
            rams.push(Ram {
                player_pos: player.pos,
                enemy_pos: enemy.pos,
                player_destroyed: !player.is_alive(),
                enemy_destroyed: !enemy.is_alive(),
            });
        }
    }

    rams
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{BulletKind, ShipClass, ShipStats, ShipType, Tuning, builtin_bullet_stats};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Disc(Vec2, f32);

    impl Body for Disc {
        fn pos(&self) -> Vec2 {
            self.0
        }
        fn radius(&self) -> f32 {
            self.1
        }
    }

    fn ship(id: EntityId, ty: ShipType, pos: Vec2) -> Ship {
        Ship::new(id, ty, pos, Tuning::default().ship(ty))
    }

    fn shot(faction: Faction, pos: Vec2, kind: BulletKind) -> Projectile {
        Projectile::new(100, pos, 0.0, faction, kind, builtin_bullet_stats(kind))
    }

    #[test]
    fn test_touching_edges_boundary() {
        let (r1, r2) = (20.0, 40.0);
        let a = Disc(Vec2::ZERO, r1);
        assert!(check_collision(&a, &Disc(Vec2::new(r1 + r2 - 0.1, 0.0), r2)));
        assert!(!check_collision(&a, &Disc(Vec2::new(r1 + r2 + 0.1, 0.0), r2)));
        // Exactly touching is not a hit
        assert!(!check_collision(&a, &Disc(Vec2::new(r1 + r2, 0.0), r2)));
    }

    #[test]
    fn test_projectile_hits_only_first_ship() {
        let mut enemies = vec![
            ship(1, ShipType::enemy(ShipClass::Frigate), Vec2::new(100.0, 100.0)),
            ship(2, ShipType::enemy(ShipClass::Frigate), Vec2::new(100.0, 100.0)),
        ];
        let mut players: Vec<Ship> = Vec::new();
        let mut shots = vec![shot(Faction::Player, Vec2::new(100.0, 100.0), BulletKind::Bullet)];
        let mut rng = Pcg32::seed_from_u64(0);

        let impacts = resolve_projectile_hits(
            &mut shots,
            &mut players,
            &mut enemies,
            HitModel::Attrition,
            &mut rng,
        );

        assert_eq!(impacts.len(), 1);
        assert_eq!(impacts[0].ship_id, 1);
        assert!(!shots[0].active);
        assert_eq!(enemies[0].hull(), 85);
        assert_eq!(enemies[1].hull(), 100);
    }

    #[test]
    fn test_dead_ships_are_transparent() {
        let mut dead = ship(1, ShipType::enemy(ShipClass::Scout), Vec2::new(50.0, 50.0));
        dead.destroy();
        let live = ship(2, ShipType::enemy(ShipClass::Scout), Vec2::new(50.0, 50.0));
        let mut enemies = vec![dead, live];
        let mut shots = vec![shot(Faction::Player, Vec2::new(50.0, 50.0), BulletKind::Bullet)];
        let mut rng = Pcg32::seed_from_u64(0);

        let impacts =
            resolve_projectile_hits(&mut shots, &mut [], &mut enemies, HitModel::Attrition, &mut rng);
        assert_eq!(impacts[0].ship_id, 2);
    }

    #[test]
    fn test_own_side_is_never_hit() {
        let mut players = vec![ship(1, ShipType::player(ShipClass::Fighter), Vec2::ZERO)];
        let mut shots = vec![shot(Faction::Player, Vec2::ZERO, BulletKind::Bullet)];
        let mut rng = Pcg32::seed_from_u64(0);

        let impacts =
            resolve_projectile_hits(&mut shots, &mut players, &mut [], HitModel::Attrition, &mut rng);
        assert!(impacts.is_empty());
        assert!(shots[0].active);
        assert_eq!(players[0].hull(), 60);
    }

    #[test]
    fn test_lethal_hit_reports_score() {
        let stats = ShipStats {
            hull: 10,
            ..ShipStats::DEFAULT
        };
        let mut enemies = vec![Ship::new(7, ShipType::enemy(ShipClass::Scout), Vec2::ZERO, stats)];
        let mut shots = vec![shot(Faction::Player, Vec2::ZERO, BulletKind::Bullet)];
        let mut rng = Pcg32::seed_from_u64(0);

        let impacts =
            resolve_projectile_hits(&mut shots, &mut [], &mut enemies, HitModel::Attrition, &mut rng);
        assert!(impacts[0].destroyed);
        assert_eq!(impacts[0].score_value, 100);
        assert_eq!(impacts[0].faction, Faction::Enemy);
    }

    #[test]
    fn test_chance_model_ignores_damage() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut destroyed = 0;
        for _ in 0..1000 {
            let ty = ShipType::enemy(ShipClass::Dreadnought);
            let mut enemies = vec![Ship::stationed(1, ty, Vec2::ZERO, Tuning::default().ship(ty))];
            let mut shots = vec![shot(Faction::Player, Vec2::ZERO, BulletKind::Heavy)];
            let impacts = resolve_projectile_hits(
                &mut shots,
                &mut [],
                &mut enemies,
                HitModel::Chance { destroy_chance: 0.2 },
                &mut rng,
            );
            assert_eq!(impacts.len(), 1);
            if impacts[0].destroyed {
                destroyed += 1;
                assert_eq!(enemies[0].hull(), 0);
            } else {
                // Survivors are untouched regardless of projectile damage
                assert_eq!(enemies[0].hull(), 300);
            }
        }
        assert!((120..280).contains(&destroyed), "destroyed {destroyed}");
    }

    #[test]
    fn test_ram_damages_both_each_call() {
        let mut players = vec![ship(1, ShipType::player(ShipClass::Fighter), Vec2::ZERO)];
        let mut enemies = vec![ship(2, ShipType::enemy(ShipClass::Bomber), Vec2::new(10.0, 0.0))];

        let rams = resolve_rams(&mut players, &mut enemies, 20);
        assert_eq!(rams.len(), 1);
        assert_eq!(players[0].hull(), 40);
        assert_eq!(enemies[0].hull(), 60);

        resolve_rams(&mut players, &mut enemies, 20);
        assert_eq!(players[0].hull(), 20);
        assert_eq!(enemies[0].hull(), 40);
    }

    #[test]
    fn test_ram_skips_dead_and_distant() {
        let mut dead = ship(1, ShipType::player(ShipClass::Fighter), Vec2::ZERO);
        dead.destroy();
        let far = ship(2, ShipType::player(ShipClass::Fighter), Vec2::new(500.0, 0.0));
        let mut players = vec![dead, far];
        let mut enemies = vec![ship(3, ShipType::enemy(ShipClass::Bomber), Vec2::ZERO)];

        assert!(resolve_rams(&mut players, &mut enemies, 20).is_empty());
        assert_eq!(enemies[0].hull(), 80);
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, ar in 0.0f32..60.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, br in 0.0f32..60.0,
        ) {
            let a = Disc(Vec2::new(ax, ay), ar);
            let b = Disc(Vec2::new(bx, by), br);
            prop_assert_eq!(check_collision(&a, &b), check_collision(&b, &a));
        }

        #[test]
        fn prop_one_impact_per_projectile(count in 1usize..6, shots_n in 1usize..6) {
            let mut enemies: Vec<Ship> = (0..count)
                .map(|i| ship(i as EntityId, ShipType::enemy(ShipClass::Frigate), Vec2::new(10.0, 10.0)))
                .collect();
            let mut shots: Vec<Projectile> = (0..shots_n)
                .map(|_| shot(Faction::Player, Vec2::new(10.0, 10.0), BulletKind::Bullet))
                .collect();
            let mut rng = Pcg32::seed_from_u64(1);
            let impacts = resolve_projectile_hits(
                &mut shots, &mut [], &mut enemies, HitModel::Attrition, &mut rng,
            );
            prop_assert_eq!(impacts.len(), shots_n);
            prop_assert!(shots.iter().all(|p| !p.active));
        }
    }
}
