//! Ship kinds and their stat table

use serde::{Deserialize, Serialize};

use super::bullets::BulletKind;

/// Which side a ship or projectile fights for.
///
/// Fleet battle calls the sides Blue (player) and Red (enemy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    pub fn key(self) -> &'static str {
        match self {
            Faction::Player => "player",
            Faction::Enemy => "enemy",
        }
    }
}

/// Hull classes shared by both factions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipClass {
    Fighter,
    Bomber,
    Scout,
    Frigate,
    Battlecruiser,
    Dreadnought,
    Support,
    Torpedo,
}

impl ShipClass {
    pub const ALL: [ShipClass; 8] = [
        ShipClass::Fighter,
        ShipClass::Bomber,
        ShipClass::Scout,
        ShipClass::Frigate,
        ShipClass::Battlecruiser,
        ShipClass::Dreadnought,
        ShipClass::Support,
        ShipClass::Torpedo,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ShipClass::Fighter => "fighter",
            ShipClass::Bomber => "bomber",
            ShipClass::Scout => "scout",
            ShipClass::Frigate => "frigate",
            ShipClass::Battlecruiser => "battlecruiser",
            ShipClass::Dreadnought => "dreadnought",
            ShipClass::Support => "support",
            ShipClass::Torpedo => "torpedo",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// A ship type: faction plus hull class.
///
/// String keys look like `"enemy-frigate"`; a bare class key means the
/// player's version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipType {
    pub faction: Faction,
    pub class: ShipClass,
}

impl ShipType {
    pub const fn new(faction: Faction, class: ShipClass) -> Self {
        Self { faction, class }
    }

    pub const fn player(class: ShipClass) -> Self {
        Self::new(Faction::Player, class)
    }

    pub const fn enemy(class: ShipClass) -> Self {
        Self::new(Faction::Enemy, class)
    }

    pub fn key(&self) -> String {
        format!("{}-{}", self.faction.key(), self.class.key())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.split_once('-') {
            Some(("player", class)) => ShipClass::from_key(class).map(Self::player),
            Some(("enemy", class)) => ShipClass::from_key(class).map(Self::enemy),
            Some(_) => None,
            None => ShipClass::from_key(key).map(Self::player),
        }
    }
}

/// Per-type ship stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    pub hull: i32,
    /// Pixels per frame
    pub speed: f32,
    /// Damage dealt by this ship's shots
    pub damage: i32,
    /// Relative fire rate; weights how often the fleet AI picks this ship
    pub fire_rate: f32,
    /// Bullet kind fired in fleet battle
    pub bullet: BulletKind,
    /// Sprite footprint in fleet battle (pixels)
    pub size: f32,
}

impl ShipStats {
    /// Tier used for any type the table has no entry for
    pub const DEFAULT: ShipStats = ShipStats::new(50, 3.0, 15, 0.5, BulletKind::Laser, 80.0);

    const fn new(
        hull: i32,
        speed: f32,
        damage: i32,
        fire_rate: f32,
        bullet: BulletKind,
        size: f32,
    ) -> Self {
        Self {
            hull,
            speed,
            damage,
            fire_rate,
            bullet,
            size,
        }
    }
}

/// Built-in stat table
pub fn builtin_ship_stats(ty: ShipType) -> ShipStats {
    use BulletKind::*;
    use ShipClass::*;

    match (ty.faction, ty.class) {
        (Faction::Player, Fighter) => ShipStats::new(60, 4.0, 15, 0.8, Laser, 70.0),
        (Faction::Player, Frigate) => ShipStats::new(120, 2.0, 25, 0.4, Plasma, 85.0),
        (Faction::Player, Scout) => ShipStats::new(40, 6.0, 10, 1.2, Rapid, 65.0),
        // Capital hulls only ever appear in fleet battle, where hull is not depleted
        (Faction::Player, Battlecruiser) => ShipStats::new(50, 3.0, 15, 0.2, Heavy, 100.0),
        (Faction::Player, Bomber) => ShipStats::new(50, 3.0, 15, 0.3, Missile, 80.0),
        (Faction::Player, Dreadnought) => ShipStats::new(50, 3.0, 15, 0.15, Heavy, 120.0),
        (Faction::Player, Support) => ShipStats::new(50, 3.0, 15, 0.6, Plasma, 75.0),
        (Faction::Player, Torpedo) => ShipStats::new(50, 3.0, 15, 0.4, Missile, 70.0),

        (Faction::Enemy, Fighter) => ShipStats::new(40, 3.0, 12, 0.7, Laser, 70.0),
        (Faction::Enemy, Bomber) => ShipStats::new(80, 2.0, 20, 0.3, Missile, 80.0),
        (Faction::Enemy, Scout) => ShipStats::new(30, 5.0, 8, 1.0, Rapid, 65.0),
        (Faction::Enemy, Frigate) => ShipStats::new(100, 2.0, 18, 0.5, Plasma, 85.0),
        (Faction::Enemy, Battlecruiser) => ShipStats::new(200, 1.0, 35, 0.2, Heavy, 100.0),
        (Faction::Enemy, Dreadnought) => ShipStats::new(300, 1.0, 40, 0.15, Heavy, 120.0),
        (Faction::Enemy, Support) => ShipStats::new(150, 2.0, 15, 0.6, Plasma, 75.0),
        (Faction::Enemy, Torpedo) => ShipStats::new(60, 3.0, 30, 0.4, Missile, 70.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_type_keys() {
        let ty = ShipType::enemy(ShipClass::Battlecruiser);
        assert_eq!(ty.key(), "enemy-battlecruiser");
        assert_eq!(ShipType::from_key("enemy-battlecruiser"), Some(ty));
        assert_eq!(
            ShipType::from_key("player-scout"),
            Some(ShipType::player(ShipClass::Scout))
        );
    }

    #[test]
    fn test_bare_class_key_is_player() {
        assert_eq!(
            ShipType::from_key("frigate"),
            Some(ShipType::player(ShipClass::Frigate))
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert_eq!(ShipType::from_key("enemy-mothership"), None);
        assert_eq!(ShipType::from_key("pirate-fighter"), None);
        assert_eq!(ShipType::from_key(""), None);
    }

    #[test]
    fn test_every_key_round_trips() {
        for faction in [Faction::Player, Faction::Enemy] {
            for class in ShipClass::ALL {
                let ty = ShipType::new(faction, class);
                assert_eq!(ShipType::from_key(&ty.key()), Some(ty));
            }
        }
    }

    #[test]
    fn test_builtin_enemy_fighter() {
        let stats = builtin_ship_stats(ShipType::enemy(ShipClass::Fighter));
        assert_eq!(stats.hull, 40);
        assert_eq!(stats.damage, 12);
        assert_eq!(stats.bullet, BulletKind::Laser);
    }
}
