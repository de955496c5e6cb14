//! Scenario loading and configuration.
//!
//! Scenarios describe a raid to replay headlessly: the raid config, the
//! settlement under attack, fortifications standing before the raid, spawn
//! waves and barracks torn down afterwards.

use std::path::Path;

use raid_core::config::RaidConfig;
use raid_core::error::RaidError;
use raid_core::math::BlockPos;
use raid_core::world::DEFAULT_SURFACE_LEVEL;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// A spawn wave names a mob kind the catalog does not know.
    #[error("Unknown mob kind '{0}'")]
    UnknownMobKind(String),
    /// The raid core rejected an operation.
    #[error(transparent)]
    Raid(#[from] RaidError),
}

/// The settlement under attack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementSetup {
    /// Settlement identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Whole-number raid level.
    pub raid_level: i32,
}

impl Default for SettlementSetup {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Haven".to_string(),
            raid_level: 0,
        }
    }
}

/// A tower built around a barracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerPlacement {
    /// Tower hut position (x, y, z).
    pub position: (i32, i32, i32),
    /// Tower level.
    #[serde(default)]
    pub level: u32,
}

impl TowerPlacement {
    /// Create a tower placement.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32, level: u32) -> Self {
        Self {
            position: (x, y, z),
            level,
        }
    }

    /// Position as a block position.
    #[must_use]
    pub const fn block_pos(&self) -> BlockPos {
        BlockPos::new(self.position.0, self.position.1, self.position.2)
    }
}

/// A barracks standing before the raid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarracksPlacement {
    /// Hut position (x, y, z).
    pub position: (i32, i32, i32),
    /// Schematic style.
    pub style: String,
    /// Barracks level.
    #[serde(default)]
    pub level: u32,
    /// Towers registered to this barracks.
    #[serde(default)]
    pub towers: Vec<TowerPlacement>,
}

impl BarracksPlacement {
    /// Position as a block position.
    #[must_use]
    pub const fn block_pos(&self) -> BlockPos {
        BlockPos::new(self.position.0, self.position.1, self.position.2)
    }
}

/// One batch of raiders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnWave {
    /// Mob kind string ID (e.g., "chief_barbarian").
    pub kind: String,
    /// Number of raiders.
    pub count: u32,
    /// Spawn column (x, z); the height comes from the ground.
    pub origin: (i32, i32),
    /// Whether the raiders attack the scenario settlement.
    #[serde(default = "default_true")]
    pub attack_settlement: bool,
}

impl SpawnWave {
    /// Create a wave attacking the settlement.
    #[must_use]
    pub fn new(kind: &str, count: u32, x: i32, z: i32) -> Self {
        Self {
            kind: kind.to_string(),
            count,
            origin: (x, z),
            attack_settlement: true,
        }
    }

    /// Origin as a block position at height 0.
    #[must_use]
    pub const fn block_pos(&self) -> BlockPos {
        BlockPos::new(self.origin.0, 0, self.origin.1)
    }
}

const fn default_true() -> bool {
    true
}

const fn default_surface_level() -> i32 {
    DEFAULT_SURFACE_LEVEL
}

/// A complete raid scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Raid configuration.
    #[serde(default)]
    pub config: RaidConfig,
    /// Settlement under attack.
    #[serde(default)]
    pub settlement: SettlementSetup,
    /// Flat terrain height.
    #[serde(default = "default_surface_level")]
    pub surface_level: i32,
    /// Fortifications built before the raid.
    #[serde(default)]
    pub fortifications: Vec<BarracksPlacement>,
    /// Spawn waves, run in order.
    #[serde(default)]
    pub waves: Vec<SpawnWave>,
    /// Barracks positions destroyed after the waves.
    #[serde(default)]
    pub destroy: Vec<(i32, i32, i32)>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::barbarian_assault()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let scenario: Scenario = ron::from_str(&contents)?;
        Ok(scenario)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// Barbarian raid on a settlement defended by one barracks and two
    /// towers.
    #[must_use]
    pub fn barbarian_assault() -> Self {
        Self {
            name: "Barbarian Assault".to_string(),
            description: "Mixed barbarian wave against a fortified settlement".to_string(),
            config: RaidConfig::with_difficulty(10),
            settlement: SettlementSetup {
                id: 1,
                name: "Haven".to_string(),
                raid_level: 100,
            },
            surface_level: DEFAULT_SURFACE_LEVEL,
            fortifications: vec![BarracksPlacement {
                position: (0, 65, 0),
                style: "medievaloak".to_string(),
                level: 3,
                towers: vec![
                    TowerPlacement::new(1, 65, 2, 2),
                    TowerPlacement::new(5, 65, 9, 2),
                ],
            }],
            waves: vec![
                SpawnWave::new("barbarian", 6, 40, 40),
                SpawnWave::new("archer_barbarian", 4, 42, 40),
                SpawnWave::new("chief_barbarian", 1, 41, 41),
            ],
            destroy: Vec::new(),
        }
    }

    /// Pirate landing that burns the barracks down afterwards.
    #[must_use]
    pub fn pirate_landing() -> Self {
        Self {
            name: "Pirate Landing".to_string(),
            description: "Pirates with captains; the barracks falls".to_string(),
            config: RaidConfig::with_difficulty(6),
            settlement: SettlementSetup {
                id: 2,
                name: "Saltmarsh".to_string(),
                raid_level: 40,
            },
            surface_level: 62,
            fortifications: vec![BarracksPlacement {
                position: (-10, 63, 4),
                style: "caledonia".to_string(),
                level: 1,
                towers: vec![TowerPlacement::new(-14, 63, 4, 1)],
            }],
            waves: vec![
                SpawnWave::new("pirate", 5, -60, 4),
                SpawnWave::new("archer_pirate", 3, -60, 6),
                SpawnWave::new("captain_pirate", 2, -61, 5),
            ],
            destroy: vec![(-10, 63, 4)],
        }
    }

    /// Look up a built-in scenario by name.
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "barbarian_assault" => Some(Self::barbarian_assault()),
            "pirate_landing" => Some(Self::pirate_landing()),
            _ => None,
        }
    }
}
