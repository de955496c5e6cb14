//! Raid configuration.
//!
//! [`RaidConfig`] carries the administrator-controlled difficulty tier and
//! the balance constants used by [`crate::difficulty`]. Configs are plain
//! serde data and load from RON files; fixed-point fields are stored as raw
//! bits like every other data file in the game.
//!
//! # Example RON
//!
//! ```ron
//! RaidConfig(
//!     horde_difficulty: 5,
//!     max_mobs_per_world: 200,
//!     balance: RaidBalance(
//!         follow_range: 150323855360,    // Fixed-point for 35.0
//!         movement_speed: 858993459,     // Fixed-point for 0.2
//!         attack_damage: 8589934592,     // Fixed-point for 2.0
//!         armor_per_point: 1073741824,   // Fixed-point for 0.25
//!         chief_armor: 85899345920,      // Fixed-point for 20.0
//!         base_health: 85899345920,      // Fixed-point for 20.0
//!         health_multiplier_percent: 20,
//!     ),
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RaidError, Result};
use crate::math::{fixed_serde, Fixed};

/// Difficulty tier at and above which raiders hit twice as hard.
pub const HARD_DIFFICULTY: i32 = 10;

/// Difficulty tier above which raid chiefs wear doubled armor.
pub const ELEVATED_DIFFICULTY: i32 = 5;

/// Default difficulty tier for a fresh config.
pub const DEFAULT_DIFFICULTY: i32 = 5;

/// Default cap on live entities per world.
pub const DEFAULT_MAX_MOBS_PER_WORLD: usize = 200;

/// Balance constants for raider attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidBalance {
    /// Range at which raiders notice targets.
    #[serde(with = "fixed_serde")]
    pub follow_range: Fixed,
    /// Base movement speed.
    #[serde(with = "fixed_serde")]
    pub movement_speed: Fixed,
    /// Base attack damage before difficulty doubling.
    #[serde(with = "fixed_serde")]
    pub attack_damage: Fixed,
    /// Armor granted per difficulty point to regular raiders.
    #[serde(with = "fixed_serde")]
    pub armor_per_point: Fixed,
    /// Flat armor for raid chiefs.
    #[serde(with = "fixed_serde")]
    pub chief_armor: Fixed,
    /// Health floor for every raider.
    #[serde(with = "fixed_serde")]
    pub base_health: Fixed,
    /// Percentage of a settlement's raid level that is added to health.
    ///
    /// An integer so whole raid levels scale without fixed-point rounding.
    pub health_multiplier_percent: u32,
}

impl Default for RaidBalance {
    fn default() -> Self {
        Self {
            follow_range: Fixed::from_num(35),
            movement_speed: Fixed::from_num(1) / Fixed::from_num(5),
            attack_damage: Fixed::from_num(2),
            armor_per_point: Fixed::from_num(1) / Fixed::from_num(4),
            chief_armor: Fixed::from_num(20),
            base_health: Fixed::from_num(20),
            health_multiplier_percent: 20,
        }
    }
}

/// Administrator-facing raid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidConfig {
    /// Global raid harshness. Not range-checked.
    #[serde(default = "default_difficulty")]
    pub horde_difficulty: i32,
    /// Live entity cap per world; instantiation fails once it is reached.
    #[serde(default = "default_max_mobs")]
    pub max_mobs_per_world: usize,
    /// Attribute balance constants.
    #[serde(default)]
    pub balance: RaidBalance,
}

const fn default_difficulty() -> i32 {
    DEFAULT_DIFFICULTY
}

const fn default_max_mobs() -> usize {
    DEFAULT_MAX_MOBS_PER_WORLD
}

impl Default for RaidConfig {
    fn default() -> Self {
        Self {
            horde_difficulty: DEFAULT_DIFFICULTY,
            max_mobs_per_world: DEFAULT_MAX_MOBS_PER_WORLD,
            balance: RaidBalance::default(),
        }
    }
}

impl RaidConfig {
    /// Create a default config with the given difficulty tier.
    #[must_use]
    pub fn with_difficulty(horde_difficulty: i32) -> Self {
        Self {
            horde_difficulty,
            ..Self::default()
        }
    }

    /// Load a config from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let load_error = |message: String| {
            tracing::warn!(path = %path.display(), %message, "Failed to load raid config");
            RaidError::ConfigLoad {
                path: path.display().to_string(),
                message,
            }
        };
        let contents = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        ron::from_str(&contents).map_err(|e| load_error(e.to_string()))
    }

    /// Load from a RON string (useful for embedded configs).
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        ron::from_str(ron).map_err(|e| RaidError::ConfigLoad {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize to a pretty RON string.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| RaidError::Persistence(format!("Failed to encode config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_balance_values() {
        let balance = RaidBalance::default();
        assert_eq!(balance.follow_range, Fixed::from_num(35));
        assert_eq!(balance.attack_damage, Fixed::from_num(2));
        assert_eq!(balance.armor_per_point, Fixed::from_num(0.25));
        assert_eq!(balance.base_health, Fixed::from_num(20));
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = RaidConfig::from_ron_str("(horde_difficulty: 10)").unwrap();
        assert_eq!(config.horde_difficulty, 10);
        assert_eq!(config.max_mobs_per_world, DEFAULT_MAX_MOBS_PER_WORLD);
        assert_eq!(config.balance, RaidBalance::default());
    }

    #[test]
    fn test_ron_round_trip() {
        let mut config = RaidConfig::with_difficulty(7);
        config.balance.chief_armor = Fixed::from_num(12);

        let text = config.to_ron_string().unwrap();
        let loaded = RaidConfig::from_ron_str(&text).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_ron_is_config_error() {
        let err = RaidConfig::from_ron_str("(horde_difficulty: \"high\")").unwrap_err();
        assert!(matches!(err, RaidError::ConfigLoad { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RaidConfig::load("/nonexistent/raid_config.ron").unwrap_err();
        assert!(matches!(err, RaidError::ConfigLoad { .. }));
    }
}
