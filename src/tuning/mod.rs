//! Data-driven game balance
//!
//! Stat tables are keyed by closed enums and validated once when loaded.
//! Lookups never fail: a ship type without an entry gets
//! [`ShipStats::DEFAULT`], an unknown bullet key gets laser stats.

pub mod bullets;
pub mod rules;
pub mod ships;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

pub use bullets::{BulletKind, BulletStats, builtin_bullet_stats};
pub use rules::{BattleRules, SurvivalRules};
pub use ships::{Faction, ShipClass, ShipStats, ShipType, builtin_ship_stats};

/// Error loading a tuning file
#[derive(Debug)]
pub enum TuningError {
    Json(serde_json::Error),
    UnknownShip(String),
    UnknownBullet(String),
    InvalidShip { key: String, reason: &'static str },
    InvalidBullet { key: String, reason: &'static str },
    InvalidRules { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Json(e) => write!(f, "malformed tuning file: {e}"),
            TuningError::UnknownShip(key) => write!(f, "unknown ship type `{key}`"),
            TuningError::UnknownBullet(key) => write!(f, "unknown bullet kind `{key}`"),
            TuningError::InvalidShip { key, reason } => {
                write!(f, "invalid stats for ship `{key}`: {reason}")
            }
            TuningError::InvalidBullet { key, reason } => {
                write!(f, "invalid stats for bullet `{key}`: {reason}")
            }
            TuningError::InvalidRules { field, reason } => {
                write!(f, "invalid rule `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Json(e)
    }
}

/// On-disk shape: string keys, every section optional
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct TuningFile {
    ships: BTreeMap<String, ShipStats>,
    bullets: BTreeMap<String, BulletStats>,
    survival: SurvivalRules,
    battle: BattleRules,
}

/// Validated stat tables and rules
#[derive(Debug, Clone)]
pub struct Tuning {
    ships: HashMap<ShipType, ShipStats>,
    bullets: HashMap<BulletKind, BulletStats>,
    pub survival: SurvivalRules,
    pub battle: BattleRules,
}

impl Default for Tuning {
    fn default() -> Self {
        let ships = [Faction::Player, Faction::Enemy]
            .into_iter()
            .flat_map(|f| ShipClass::ALL.into_iter().map(move |c| ShipType::new(f, c)))
            .map(|ty| (ty, builtin_ship_stats(ty)))
            .collect();
        let bullets = BulletKind::ALL
            .into_iter()
            .map(|k| (k, builtin_bullet_stats(k)))
            .collect();
        Self {
            ships,
            bullets,
            survival: SurvivalRules::default(),
            battle: BattleRules::default(),
        }
    }
}

impl Tuning {
    /// Load overrides on top of the built-in tables.
    ///
    /// Unknown keys and out-of-range stats are rejected here so that
    /// per-frame lookups never have to validate.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let file: TuningFile = serde_json::from_str(json)?;
        validate_survival(&file.survival)?;
        validate_battle(&file.battle)?;
        let mut tuning = Self {
            survival: file.survival,
            battle: file.battle,
            ..Self::default()
        };

        for (key, stats) in file.ships {
            let ty = ShipType::from_key(&key).ok_or_else(|| TuningError::UnknownShip(key.clone()))?;
            validate_ship(&stats).map_err(|reason| TuningError::InvalidShip { key, reason })?;
            tuning.ships.insert(ty, stats);
        }
        for (key, stats) in file.bullets {
            let kind =
                BulletKind::from_key(&key).ok_or_else(|| TuningError::UnknownBullet(key.clone()))?;
            validate_bullet(&stats).map_err(|reason| TuningError::InvalidBullet { key, reason })?;
            tuning.bullets.insert(kind, stats);
        }

        log::info!(
            "Loaded tuning: {} ship types, {} bullet kinds",
            tuning.ships.len(),
            tuning.bullets.len()
        );
        Ok(tuning)
    }

    /// Load a tuning file, keeping the built-in tables if it is rejected
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            log::warn!("Ignoring tuning file: {e}");
            Self::default()
        })
    }

    /// Tuning with no ship entries; every type resolves to the default tier
    pub fn without_ship_table() -> Self {
        Self {
            ships: HashMap::new(),
            ..Self::default()
        }
    }

    pub fn ship(&self, ty: ShipType) -> ShipStats {
        self.ships.get(&ty).copied().unwrap_or(ShipStats::DEFAULT)
    }

    /// Stats for a string key such as `"enemy-bomber"`
    pub fn ship_for_key(&self, key: &str) -> ShipStats {
        match ShipType::from_key(key) {
            Some(ty) => self.ship(ty),
            None => {
                log::debug!("No ship type `{key}`, using default tier");
                ShipStats::DEFAULT
            }
        }
    }

    pub fn bullet(&self, kind: BulletKind) -> BulletStats {
        self.bullets
            .get(&kind)
            .copied()
            .unwrap_or_else(|| builtin_bullet_stats(kind))
    }

    pub fn bullet_for_key(&self, key: &str) -> BulletStats {
        self.bullet(BulletKind::from_key(key).unwrap_or(BulletKind::Laser))
    }
}

/// Upper bound for any hull; boss promotion doubles it
pub const MAX_HULL: i32 = 1_000_000;
/// Upper bound for regular enemies in one wave
pub const MAX_WAVE_SIZE: u32 = 64;

fn validate_ship(stats: &ShipStats) -> Result<(), &'static str> {
    if stats.hull <= 0 {
        return Err("hull must be positive");
    }
    if stats.hull > MAX_HULL {
        return Err("hull is too large");
    }
    if !stats.speed.is_finite() || stats.speed < 0.0 {
        return Err("speed must be a non-negative number");
    }
    if stats.damage < 0 {
        return Err("damage must not be negative");
    }
    if !stats.fire_rate.is_finite() || stats.fire_rate <= 0.0 {
        return Err("fire rate must be positive");
    }
    if !stats.size.is_finite() || stats.size <= 0.0 {
        return Err("size must be positive");
    }
    Ok(())
}

fn rule(field: &'static str, reason: &'static str) -> TuningError {
    TuningError::InvalidRules { field, reason }
}

fn check_duration(field: &'static str, value: f64) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(rule(field, "must be a non-negative number"))
    }
}

fn check_chance(field: &'static str, value: f64) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(rule(field, "must be between 0 and 1"))
    }
}

fn validate_survival(rules: &SurvivalRules) -> Result<(), TuningError> {
    check_duration("survival.shot_cooldown_ms", rules.shot_cooldown_ms)?;
    check_duration("survival.special_cooldown_ms", rules.special_cooldown_ms)?;
    check_duration("survival.wave_delay_secs", rules.wave_delay_secs)?;
    check_chance("survival.enemy_fire_chance", rules.enemy_fire_chance)?;
    if !(0..=MAX_HULL).contains(&rules.ram_damage) {
        return Err(rule("survival.ram_damage", "must be between 0 and the hull cap"));
    }
    if !rules.player_speed.is_finite() || rules.player_speed < 0.0 {
        return Err(rule("survival.player_speed", "must be a non-negative number"));
    }
    if rules.base_wave_size > MAX_WAVE_SIZE {
        return Err(rule("survival.base_wave_size", "too many enemies per wave"));
    }
    if rules.max_wave_size == 0 || rules.max_wave_size > MAX_WAVE_SIZE {
        return Err(rule("survival.max_wave_size", "must be between 1 and 64"));
    }
    if rules.victory_wave == Some(0) {
        return Err(rule("survival.victory_wave", "must be at least 1"));
    }
    Ok(())
}

fn validate_battle(rules: &BattleRules) -> Result<(), TuningError> {
    check_duration("battle.shot_cooldown_ms", rules.shot_cooldown_ms)?;
    check_duration("battle.cycle_delay_ms", rules.cycle_delay_ms)?;
    check_duration("battle.ai_cooldown_ms", rules.ai_cooldown_ms)?;
    check_chance("battle.ai_fire_chance", rules.ai_fire_chance)?;
    check_chance("battle.destroy_chance", rules.destroy_chance)
}

fn validate_bullet(stats: &BulletStats) -> Result<(), &'static str> {
    if !stats.speed.is_finite() || stats.speed <= 0.0 {
        return Err("speed must be positive");
    }
    if stats.damage < 0 {
        return Err("damage must not be negative");
    }
    if !stats.radius.is_finite() || stats.radius <= 0.0 {
        return Err("radius must be positive");
    }
    if stats.life == 0 {
        return Err("life must be at least one frame");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_falls_back_to_default_tier() {
        let tuning = Tuning::default();
        let stats = tuning.ship_for_key("enemy-mothership");
        assert_eq!(stats, ShipStats::DEFAULT);
        assert_eq!((stats.hull, stats.speed, stats.damage), (50, 3.0, 15));
    }

    #[test]
    fn test_missing_entry_falls_back_to_default_tier() {
        let tuning = Tuning::without_ship_table();
        assert_eq!(
            tuning.ship(ShipType::enemy(ShipClass::Dreadnought)),
            ShipStats::DEFAULT
        );
    }

    #[test]
    fn test_unknown_bullet_key_is_laser() {
        let tuning = Tuning::default();
        assert_eq!(
            tuning.bullet_for_key("photon"),
            builtin_bullet_stats(BulletKind::Laser)
        );
    }

    #[test]
    fn test_override_ship() {
        let json = r#"{
            "ships": {
                "enemy-scout": { "hull": 10, "speed": 9.0, "damage": 1,
                                  "fire_rate": 2.0, "bullet": "rapid", "size": 50.0 }
            }
        }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.ship(ShipType::enemy(ShipClass::Scout)).hull, 10);
        // Untouched entries keep the built-in values
        assert_eq!(tuning.ship(ShipType::enemy(ShipClass::Fighter)).hull, 40);
    }

    #[test]
    fn test_rejects_unknown_ship_key() {
        let json = r#"{
            "ships": {
                "enemy-mothership": { "hull": 10, "speed": 1.0, "damage": 1,
                                       "fire_rate": 1.0, "bullet": "laser", "size": 50.0 }
            }
        }"#;
        let err = Tuning::from_json(json).unwrap_err();
        assert!(matches!(err, TuningError::UnknownShip(ref k) if k == "enemy-mothership"));
    }

    #[test]
    fn test_rejects_zero_hull() {
        let json = r#"{
            "ships": {
                "enemy-scout": { "hull": 0, "speed": 1.0, "damage": 1,
                                  "fire_rate": 1.0, "bullet": "laser", "size": 50.0 }
            }
        }"#;
        let err = Tuning::from_json(json).unwrap_err();
        assert!(matches!(err, TuningError::InvalidShip { .. }));
        assert!(err.to_string().contains("hull"));
    }

    #[test]
    fn test_rejects_hull_beyond_cap() {
        let json = r#"{
            "ships": {
                "enemy-fighter": { "hull": 2000000000, "speed": 1.0, "damage": 1,
                                    "fire_rate": 1.0, "bullet": "laser", "size": 50.0 }
            }
        }"#;
        let err = Tuning::from_json(json).unwrap_err();
        assert!(matches!(err, TuningError::InvalidShip { ref key, .. } if key == "enemy-fighter"));
    }

    #[test]
    fn test_rejects_oversized_wave() {
        let err = Tuning::from_json(r#"{ "survival": { "base_wave_size": 4294967295 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            TuningError::InvalidRules { field: "survival.base_wave_size", .. }
        ));
    }

    #[test]
    fn test_rejects_negative_cooldown() {
        let err = Tuning::from_json(r#"{ "battle": { "ai_cooldown_ms": -5.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("battle.ai_cooldown_ms"));
    }

    #[test]
    fn test_rejects_chance_above_one() {
        for json in [
            r#"{ "survival": { "enemy_fire_chance": 1.5 } }"#,
            r#"{ "battle": { "destroy_chance": -0.1 } }"#,
        ] {
            assert!(matches!(
                Tuning::from_json(json),
                Err(TuningError::InvalidRules { .. })
            ));
        }
    }

    #[test]
    fn test_boundary_rules_accepted() {
        let json = r#"{
            "survival": { "enemy_fire_chance": 1.0, "shot_cooldown_ms": 0.0,
                          "base_wave_size": 64, "max_wave_size": 64 },
            "battle": { "ai_fire_chance": 0.0, "destroy_chance": 1.0 }
        }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.survival.wave_size(u32::MAX), 64);
    }

    #[test]
    fn test_rejects_zero_life_bullet() {
        let json = r#"{ "bullets": { "ray": { "speed": 1.0, "damage": 1, "radius": 1.0, "life": 0 } } }"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(TuningError::InvalidBullet { .. })
        ));
    }

    #[test]
    fn test_malformed_json_keeps_defaults() {
        let tuning = Tuning::from_json_or_default("{ not json");
        assert_eq!(tuning.ship(ShipType::player(ShipClass::Frigate)).hull, 120);
    }

    #[test]
    fn test_json_error_has_source() {
        use std::error::Error;
        let err = Tuning::from_json("[").unwrap_err();
        assert!(err.source().is_some());
    }
}
