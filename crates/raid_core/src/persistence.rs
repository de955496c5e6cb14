//! Persisted structure records and colony save files.
//!
//! Records carry exactly the fields a structure needs to come back after a
//! reload. Loading never touches blocks; it only rebuilds the arena and
//! repairs missing tower back-references.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::barracks::Barracks;
use crate::error::{RaidError, Result};
use crate::math::BlockPos;
use crate::structures::{BarracksTower, BuildingBase, Structure, StructureManager};

/// Save file format version for compatibility.
pub const SAVE_VERSION: u32 = 1;

/// Persisted building data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingRecord {
    /// Hut position.
    pub position: BlockPos,
    /// Building level.
    pub level: u32,
    /// Schematic style.
    pub style: String,
}

impl From<&BuildingBase> for BuildingRecord {
    fn from(base: &BuildingBase) -> Self {
        Self {
            position: base.position,
            level: base.level,
            style: base.style.clone(),
        }
    }
}

impl From<&BuildingRecord> for BuildingBase {
    fn from(record: &BuildingRecord) -> Self {
        Self {
            position: record.position,
            level: record.level,
            style: record.style.clone(),
        }
    }
}

/// One tracked tower inside a barracks record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowerTag {
    /// Tower hut position.
    pub pos: BlockPos,
}

/// Persisted barracks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarracksRecord {
    /// Building data.
    pub base: BuildingRecord,
    /// Tracked towers.
    pub towers: Vec<TowerTag>,
}

/// Persisted barracks tower.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowerRecord {
    /// Building data.
    pub base: BuildingRecord,
    /// Owning barracks position.
    pub barracks: Option<BlockPos>,
}

impl TowerRecord {
    /// Rebuild the tower.
    #[must_use]
    pub fn to_tower(&self) -> BarracksTower {
        BarracksTower {
            base: BuildingBase::from(&self.base),
            barracks: self.barracks,
        }
    }
}

impl From<&BarracksTower> for TowerRecord {
    fn from(tower: &BarracksTower) -> Self {
        Self {
            base: BuildingRecord::from(&tower.base),
            barracks: tower.barracks,
        }
    }
}

/// Any persisted structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureRecord {
    /// A barracks.
    Barracks(BarracksRecord),
    /// A barracks tower.
    Tower(TowerRecord),
}

impl From<&Structure> for StructureRecord {
    fn from(structure: &Structure) -> Self {
        match structure {
            Structure::Barracks(barracks) => Self::Barracks(barracks.to_record()),
            Structure::Tower(tower) => Self::Tower(TowerRecord::from(tower)),
        }
    }
}

impl StructureRecord {
    /// Rebuild the structure without side effects.
    #[must_use]
    pub fn to_structure(&self) -> Structure {
        match self {
            Self::Barracks(record) => Structure::Barracks(Barracks::from_record(record)),
            Self::Tower(record) => Structure::Tower(record.to_tower()),
        }
    }
}

/// All fortifications of a colony.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColonySave {
    /// Save format version.
    pub version: u32,
    /// Structures in position order.
    pub structures: Vec<StructureRecord>,
}

impl ColonySave {
    /// Capture every structure in an arena.
    #[must_use]
    pub fn capture(manager: &StructureManager) -> Self {
        Self {
            version: SAVE_VERSION,
            structures: manager
                .iter()
                .map(|(_, structure)| StructureRecord::from(structure))
                .collect(),
        }
    }

    /// Rebuild the arena and repair tower back-references.
    ///
    /// # Errors
    /// Returns an error if the save was written by another format version or
    /// holds two structures at one position.
    pub fn restore(&self) -> Result<StructureManager> {
        self.check_version()?;
        let mut manager = StructureManager::new();
        for record in &self.structures {
            let structure = record.to_structure();
            let pos = structure.base().position;
            if manager.barracks(pos).is_some() || manager.tower(pos).is_some() {
                tracing::warn!(at = %pos, "Save holds two structures at one position");
                return Err(RaidError::Persistence(format!("Duplicate structure at {pos}")));
            }
            manager.insert(structure);
        }
        manager.relink();
        Ok(manager)
    }

    fn check_version(&self) -> Result<()> {
        if self.version != SAVE_VERSION {
            tracing::warn!(found = self.version, expected = SAVE_VERSION, "Rejected save");
            return Err(RaidError::VersionMismatch {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }

    /// Encode as bincode.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| RaidError::Persistence(format!("Failed to serialize save: {e}")))
    }

    /// Decode from bincode.
    ///
    /// # Errors
    /// Returns an error if the bytes are not a save of this version.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let save: Self = bincode::deserialize(bytes)
            .map_err(|e| RaidError::Persistence(format!("Failed to deserialize save: {e}")))?;
        save.check_version()?;
        Ok(save)
    }

    /// Encode as pretty RON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| RaidError::Persistence(format!("Failed to encode save: {e}")))
    }

    /// Decode from RON.
    ///
    /// # Errors
    /// Returns an error if the text is not a save of this version.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let save: Self = ron::from_str(text)
            .map_err(|e| RaidError::Persistence(format!("Failed to parse save: {e}")))?;
        save.check_version()?;
        Ok(save)
    }

    /// Write a bincode save file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| RaidError::Persistence(format!("Failed to write save file: {e}")))
    }

    /// Read a bincode save file.
    ///
    /// # Errors
    /// Returns an error if file reading or deserialization fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| RaidError::Persistence(format!("Failed to read save file: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Block, BlockState, BlockWorld, Facing};

    fn colony() -> (StructureManager, BlockPos) {
        let mut manager = StructureManager::new();
        let mut blocks = BlockWorld::new();
        let pos = BlockPos::new(0, 64, 0);
        manager
            .place_barracks(pos, "oak", Facing::North, &mut blocks)
            .unwrap();
        for tower in [BlockPos::new(1, 64, 2), BlockPos::new(5, 64, 9)] {
            manager.register_block_position(
                pos,
                BlockState::new(Block::BarracksTowerSubstitution, Facing::North),
                tower,
                &mut blocks,
            );
        }
        (manager, pos)
    }

    #[test]
    fn test_bincode_round_trip() {
        let (manager, _) = colony();
        let save = ColonySave::capture(&manager);

        let bytes = save.to_bytes().unwrap();
        let restored = ColonySave::from_bytes(&bytes).unwrap().restore().unwrap();

        assert_eq!(restored, manager);
    }

    #[test]
    fn test_ron_round_trip() {
        let (manager, _) = colony();
        let text = ColonySave::capture(&manager).to_ron_string().unwrap();
        let restored = ColonySave::from_ron_str(&text).unwrap().restore().unwrap();
        assert_eq!(restored, manager);
    }

    #[test]
    fn test_restore_relinks_unbound_towers() {
        let (manager, pos) = colony();
        let mut save = ColonySave::capture(&manager);
        for record in &mut save.structures {
            if let StructureRecord::Tower(tower) = record {
                tower.barracks = None;
            }
        }

        let restored = save.restore().unwrap();
        assert_eq!(restored.tower(BlockPos::new(1, 64, 2)).unwrap().barracks, Some(pos));
        assert_eq!(restored.tower(BlockPos::new(5, 64, 9)).unwrap().barracks, Some(pos));
    }

    #[test]
    fn test_restore_without_tower_records_keeps_positions() {
        let (manager, pos) = colony();
        let mut save = ColonySave::capture(&manager);
        save.structures
            .retain(|record| matches!(record, StructureRecord::Barracks(_)));

        let restored = save.restore().unwrap();
        let barracks = restored.barracks(pos).unwrap();
        assert_eq!(barracks.towers().len(), 2);
        // Unresolvable towers contribute nothing.
        assert_eq!(barracks.claim_radius(5, &restored), 1);
    }

    #[test]
    fn test_restore_rebinds_tower_of_missing_barracks() {
        let (manager, pos) = colony();
        let tower_pos = BlockPos::new(1, 64, 2);
        let mut save = ColonySave::capture(&manager);
        for record in &mut save.structures {
            if let StructureRecord::Tower(tower) = record {
                if tower.base.position == tower_pos {
                    tower.barracks = Some(BlockPos::new(50, 64, 50));
                }
            }
        }

        let mut restored = save.restore().unwrap();
        assert_eq!(restored.tower(tower_pos).unwrap().barracks, Some(pos));

        let mut blocks = BlockWorld::new();
        restored.destroy(pos, &mut blocks).unwrap();
        assert!(restored.tower(tower_pos).is_none());
        assert!(restored.is_empty());
    }

    #[test]
    fn test_restore_rejects_duplicate_positions() {
        let (manager, _) = colony();
        let mut save = ColonySave::capture(&manager);
        let first = save.structures[0].clone();
        save.structures.push(first);

        let err = save.restore().unwrap_err();
        assert!(matches!(err, RaidError::Persistence(_)));
    }

    #[test]
    fn test_version_mismatch() {
        let (manager, _) = colony();
        let mut save = ColonySave::capture(&manager);
        save.version = SAVE_VERSION + 1;

        let bytes = bincode::serialize(&save).unwrap();
        let err = ColonySave::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            RaidError::VersionMismatch { expected: SAVE_VERSION, found } if found == SAVE_VERSION + 1
        ));
        assert!(save.restore().is_err());
    }

    #[test]
    fn test_garbage_bytes_fail() {
        let err = ColonySave::from_bytes(&[0xff, 0x01]).unwrap_err();
        assert!(matches!(err, RaidError::Persistence(_)));
    }
}
