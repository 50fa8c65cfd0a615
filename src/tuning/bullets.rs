//! Projectile kinds and their stat table
//!
//! Slower, heavier payloads get longer life budgets so they can still cross
//! the whole screen.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletKind {
    /// Wave survival standard shot
    Bullet,
    /// Wave survival special attack
    Ray,
    Laser,
    Plasma,
    Rapid,
    Missile,
    Heavy,
}

impl BulletKind {
    pub const ALL: [BulletKind; 7] = [
        BulletKind::Bullet,
        BulletKind::Ray,
        BulletKind::Laser,
        BulletKind::Plasma,
        BulletKind::Rapid,
        BulletKind::Missile,
        BulletKind::Heavy,
    ];

    pub fn key(self) -> &'static str {
        match self {
            BulletKind::Bullet => "bullet",
            BulletKind::Ray => "ray",
            BulletKind::Laser => "laser",
            BulletKind::Plasma => "plasma",
            BulletKind::Rapid => "rapid",
            BulletKind::Missile => "missile",
            BulletKind::Heavy => "heavy",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// Fleet battle rounds leave a short trail behind them
    pub fn has_trail(self) -> bool {
        !matches!(self, BulletKind::Bullet | BulletKind::Ray)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulletStats {
    /// Pixels per frame
    pub speed: f32,
    pub damage: i32,
    pub radius: f32,
    /// Frames before the projectile expires
    pub life: u32,
}

impl BulletStats {
    const fn new(speed: f32, damage: i32, radius: f32, life: u32) -> Self {
        Self {
            speed,
            damage,
            radius,
            life,
        }
    }
}

/// Built-in stat table
pub fn builtin_bullet_stats(kind: BulletKind) -> BulletStats {
    match kind {
        BulletKind::Bullet => BulletStats::new(8.0, 15, 4.0, 120),
        BulletKind::Ray => BulletStats::new(12.0, 30, 8.0, 60),
        BulletKind::Laser => BulletStats::new(15.0, 15, 3.0, 300),
        BulletKind::Plasma => BulletStats::new(12.0, 25, 6.0, 350),
        BulletKind::Rapid => BulletStats::new(18.0, 10, 2.0, 250),
        BulletKind::Missile => BulletStats::new(10.0, 30, 8.0, 400),
        BulletKind::Heavy => BulletStats::new(8.0, 40, 10.0, 450),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_vs_bullet() {
        let ray = builtin_bullet_stats(BulletKind::Ray);
        let bullet = builtin_bullet_stats(BulletKind::Bullet);
        assert_eq!((ray.speed, ray.damage, ray.radius, ray.life), (12.0, 30, 8.0, 60));
        assert_eq!(
            (bullet.speed, bullet.damage, bullet.radius, bullet.life),
            (8.0, 15, 4.0, 120)
        );
    }

    #[test]
    fn test_slow_rounds_live_long_enough_to_cross() {
        // Every fleet round must be able to cover at least 2000 px
        for kind in BulletKind::ALL.into_iter().filter(|k| k.has_trail()) {
            let stats = builtin_bullet_stats(kind);
            assert!(stats.speed * stats.life as f32 >= 2000.0, "{kind:?}");
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&BulletKind::Missile).unwrap();
        assert_eq!(json, "\"missile\"");
        let kind: BulletKind = serde_json::from_str("\"heavy\"").unwrap();
        assert_eq!(kind, BulletKind::Heavy);
    }

    #[test]
    fn test_from_key() {
        assert_eq!(BulletKind::from_key("plasma"), Some(BulletKind::Plasma));
        assert_eq!(BulletKind::from_key("photon"), None);
    }
}
