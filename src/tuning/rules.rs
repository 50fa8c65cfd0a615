//! Gameplay rules for the two simulations.
//!
//! Keep this separate from per-type stats: these are timings, chances and
//! wave sizing that apply to the whole match.

use serde::{Deserialize, Serialize};

/// Wave survival rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalRules {
    /// Minimum time between player volleys
    pub shot_cooldown_ms: f64,
    /// Minimum time between special (ray) attacks
    pub special_cooldown_ms: f64,
    /// Per living enemy, per frame
    pub enemy_fire_chance: f64,
    /// Gap between a wave clearing and the next one arriving
    pub wave_delay_secs: f64,
    /// Bonus per cleared wave, multiplied by the new wave number
    pub wave_bonus: u64,
    /// Damage both ships take each frame they overlap
    pub ram_damage: i32,
    /// Player formation speed (pixels per frame)
    pub player_speed: f32,
    pub base_wave_size: u32,
    pub max_wave_size: u32,
    /// A boss joins every N-th wave
    pub boss_every: u32,
    /// Clearing this wave wins the run; endless when unset
    pub victory_wave: Option<u32>,
}

impl Default for SurvivalRules {
    fn default() -> Self {
        Self {
            shot_cooldown_ms: 250.0,
            special_cooldown_ms: 500.0,
            enemy_fire_chance: 0.02,
            wave_delay_secs: 2.0,
            wave_bonus: 1000,
            ram_damage: 20,
            player_speed: 3.0,
            base_wave_size: 3,
            max_wave_size: 8,
            boss_every: 3,
            victory_wave: None,
        }
    }
}

impl SurvivalRules {
    /// Regular (non-boss) enemies in wave `wave`
    pub fn wave_size(&self, wave: u32) -> u32 {
        self.base_wave_size.saturating_add(wave).min(self.max_wave_size)
    }

    pub fn has_boss(&self, wave: u32) -> bool {
        self.boss_every > 0 && wave % self.boss_every == 0
    }
}

/// Fleet battle rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleRules {
    /// Selected ship fire cooldown
    pub shot_cooldown_ms: f64,
    /// Key repeat gate for cycling the selected ship
    pub cycle_delay_ms: f64,
    /// Global cooldown shared by all AI shooters
    pub ai_cooldown_ms: f64,
    /// Chance per frame that some AI ship fires once the cooldown allows
    pub ai_fire_chance: f64,
    /// Chance a hit destroys the ship outright, regardless of hull
    pub destroy_chance: f64,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            shot_cooldown_ms: 200.0,
            cycle_delay_ms: 200.0,
            ai_cooldown_ms: 300.0,
            ai_fire_chance: 0.3,
            destroy_chance: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_size_caps_at_eight() {
        let rules = SurvivalRules::default();
        assert_eq!(rules.wave_size(1), 4);
        assert_eq!(rules.wave_size(3), 6);
        assert_eq!(rules.wave_size(5), 8);
        assert_eq!(rules.wave_size(40), 8);
        assert_eq!(rules.wave_size(u32::MAX), 8);
    }

    #[test]
    fn test_boss_every_third_wave() {
        let rules = SurvivalRules::default();
        let bosses: Vec<u32> = (1..=9).filter(|&w| rules.has_boss(w)).collect();
        assert_eq!(bosses, vec![3, 6, 9]);
    }

    #[test]
    fn test_partial_rules_json_keeps_defaults() {
        let rules: SurvivalRules = serde_json::from_str(r#"{"ram_damage": 5}"#).unwrap();
        assert_eq!(rules.ram_damage, 5);
        assert_eq!(rules.shot_cooldown_ms, 250.0);
        assert_eq!(rules.victory_wave, None);
    }
}
