//! Player preferences
//!
//! Nothing here changes gameplay rules; these pick the starting fleet and
//! tune the cosmetic and audio layers.

use serde::{Deserialize, Serialize};

use crate::tuning::TuningError;

/// Starting formation for wave survival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FleetPreset {
    #[default]
    Balanced,
    Heavy,
    Fast,
}

impl FleetPreset {
    pub const ALL: [FleetPreset; 3] = [FleetPreset::Balanced, FleetPreset::Heavy, FleetPreset::Fast];

    pub fn as_str(&self) -> &'static str {
        match self {
            FleetPreset::Balanced => "balanced",
            FleetPreset::Heavy => "heavy",
            FleetPreset::Fast => "fast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "balanced" => Some(FleetPreset::Balanced),
            "heavy" => Some(FleetPreset::Heavy),
            "fast" => Some(FleetPreset::Fast),
            _ => None,
        }
    }
}

/// Effects quality levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    pub fn starfield_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Wave survival starting fleet
    pub preset: FleetPreset,
    pub quality: QualityPreset,

    // === Effects ===
    /// Explosion particle bursts
    pub particles: bool,
    /// Scrolling star background
    pub starfield: bool,

    // === Audio ===
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: FleetPreset::Balanced,
            quality: QualityPreset::Medium,

            particles: true,
            starfield: true,

            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            log::warn!("Ignoring settings: {e}");
            Self::default()
        })
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn starfield_enabled(&self) -> bool {
        self.starfield && self.quality.starfield_enabled()
    }

    /// Volume the audio sink should play at; zero when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "preset": "heavy", "muted": true }"#).unwrap();
        assert_eq!(settings.preset, FleetPreset::Heavy);
        assert!(settings.muted);
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_volumes_are_clamped() {
        let settings = Settings::from_json(r#"{ "master_volume": 3.0, "sfx_volume": -1.0 }"#).unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_bad_json_falls_back() {
        let settings = Settings::from_json_or_default(r#"{ "preset": "turtle" }"#);
        assert_eq!(settings.preset, FleetPreset::Balanced);
    }

    #[test]
    fn test_particle_cap() {
        let mut settings = Settings::default();
        assert_eq!(settings.max_particles(), 500);
        settings.quality = QualityPreset::Low;
        assert_eq!(settings.max_particles(), 100);
        assert!(!settings.starfield_enabled());
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_preset_names() {
        for preset in FleetPreset::ALL {
            assert_eq!(FleetPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(FleetPreset::from_str("HEAVY"), Some(FleetPreset::Heavy));
        assert_eq!(FleetPreset::from_str("armada"), None);
    }
}
