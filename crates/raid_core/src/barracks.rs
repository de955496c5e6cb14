//! The barracks: a primary fortification aggregating towers.

use serde::{Deserialize, Serialize};

use crate::math::BlockPos;
use crate::persistence::{BarracksRecord, BuildingRecord, TowerTag};
use crate::structures::{BuildingBase, Structure, StructureLookup};
use crate::world::{BlockState, BlockWorld};

/// Lifecycle of a barracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BarracksState {
    /// Created but not yet placed in the world.
    #[default]
    Unbuilt,
    /// Standing in the world.
    Active,
    /// Torn down. Terminal; a rebuild creates a new barracks.
    Destroyed,
}

/// A barracks and the tower positions it tracks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Barracks {
    /// Shared building data.
    pub base: BuildingBase,
    state: BarracksState,
    towers: Vec<BlockPos>,
}

impl Barracks {
    /// Highest level a barracks can reach.
    pub const MAX_LEVEL: u32 = 5;

    /// Create an unbuilt level 0 barracks.
    #[must_use]
    pub fn new(position: BlockPos, style: impl Into<String>) -> Self {
        Self {
            base: BuildingBase::new(position, style),
            state: BarracksState::Unbuilt,
            towers: Vec::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> BarracksState {
        self.state
    }

    /// Whether the barracks is standing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == BarracksState::Active
    }

    /// Tracked tower positions in insertion order.
    #[must_use]
    pub fn towers(&self) -> &[BlockPos] {
        &self.towers
    }

    /// Mark the barracks as placed. Returns `false` unless it was unbuilt.
    pub fn on_placed(&mut self) -> bool {
        if self.state != BarracksState::Unbuilt {
            return false;
        }
        self.state = BarracksState::Active;
        true
    }

    /// Set the level, capped at [`Self::MAX_LEVEL`].
    pub fn set_level(&mut self, level: u32) {
        self.base.level = level.min(Self::MAX_LEVEL);
    }

    /// Track a tower position. Returns `false` if it was already tracked.
    pub fn add_tower(&mut self, pos: BlockPos) -> bool {
        if self.towers.contains(&pos) {
            return false;
        }
        self.towers.push(pos);
        true
    }

    /// Defense radius the barracks would claim at `new_level`.
    ///
    /// Tower levels count only for positions that resolve to a tower;
    /// stale positions contribute nothing. Never below 1.
    #[must_use]
    pub fn claim_radius(&self, new_level: u32, lookup: &impl StructureLookup) -> u32 {
        let tower_levels: u32 = self
            .towers
            .iter()
            .filter_map(|&pos| match lookup.resolve(pos) {
                Some(Structure::Tower(tower)) => Some(tower.base.level),
                _ => None,
            })
            .fold(0, u32::saturating_add);

        (new_level.saturating_add(tower_levels) / Self::MAX_LEVEL).max(1)
    }

    /// Tear the barracks down: every tracked tower block becomes air.
    ///
    /// Calling this again after destruction does nothing.
    pub fn on_destroyed(&mut self, blocks: &mut BlockWorld) {
        if self.state == BarracksState::Destroyed {
            return;
        }
        for &pos in &self.towers {
            blocks.set_block_state(pos, BlockState::AIR);
        }
        self.state = BarracksState::Destroyed;
    }

    /// Persisted form of this barracks.
    #[must_use]
    pub fn to_record(&self) -> BarracksRecord {
        BarracksRecord {
            base: BuildingRecord::from(&self.base),
            towers: self.towers.iter().map(|&pos| TowerTag { pos }).collect(),
        }
    }

    /// Rebuild a standing barracks from its persisted form.
    ///
    /// No blocks are touched. Duplicate tower entries collapse to one.
    #[must_use]
    pub fn from_record(record: &BarracksRecord) -> Self {
        let mut barracks = Self::new(record.base.position, record.base.style.clone());
        barracks.state = BarracksState::Active;
        barracks.deserialize_into(record);
        barracks
    }

    /// Overwrite this barracks' level, style and tower set from a record.
    pub fn deserialize_into(&mut self, record: &BarracksRecord) {
        self.base = BuildingBase::from(&record.base);
        self.towers.clear();
        for tag in &record.towers {
            self.add_tower(tag.pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{BarracksTower, StructureManager};
    use crate::world::{Block, Facing};

    fn tower_at(manager: &mut StructureManager, pos: BlockPos, level: u32) {
        let mut tower = BarracksTower::new(pos, "oak");
        tower.base.level = level;
        manager.insert(Structure::Tower(tower));
    }

    #[test]
    fn test_lifecycle() {
        let mut barracks = Barracks::new(BlockPos::ORIGIN, "oak");
        assert_eq!(barracks.state(), BarracksState::Unbuilt);
        assert!(barracks.on_placed());
        assert!(!barracks.on_placed());
        assert!(barracks.is_active());

        barracks.on_destroyed(&mut BlockWorld::new());
        assert_eq!(barracks.state(), BarracksState::Destroyed);
        assert!(!barracks.on_placed());
    }

    #[test]
    fn test_add_tower_is_set() {
        let mut barracks = Barracks::new(BlockPos::ORIGIN, "oak");
        let pos = BlockPos::new(1, 64, 2);
        assert!(barracks.add_tower(pos));
        assert!(!barracks.add_tower(pos));
        assert_eq!(barracks.towers(), &[pos]);
    }

    #[test]
    fn test_set_level_caps() {
        let mut barracks = Barracks::new(BlockPos::ORIGIN, "oak");
        barracks.set_level(9);
        assert_eq!(barracks.base.level, Barracks::MAX_LEVEL);
    }

    #[test]
    fn test_claim_radius_sums_tower_levels() {
        let mut manager = StructureManager::new();
        let mut barracks = Barracks::new(BlockPos::ORIGIN, "oak");
        for (i, level) in [2, 2].into_iter().enumerate() {
            let pos = BlockPos::new(i32::try_from(i).unwrap() + 1, 64, 0);
            tower_at(&mut manager, pos, level);
            barracks.add_tower(pos);
        }

        // (3 + 2 + 2) / 5 = 1
        assert_eq!(barracks.claim_radius(3, &manager), 1);
        // (8 + 2 + 2) / 5 = 2
        assert_eq!(barracks.claim_radius(8, &manager), 2);
    }

    #[test]
    fn test_claim_radius_without_towers() {
        let manager = StructureManager::new();
        let barracks = Barracks::new(BlockPos::ORIGIN, "oak");
        assert_eq!(barracks.claim_radius(10, &manager), 2);
        assert_eq!(barracks.claim_radius(0, &manager), 1);
        assert_eq!(barracks.claim_radius(4, &manager), 1);
    }

    #[test]
    fn test_claim_radius_skips_stale_towers() {
        let mut manager = StructureManager::new();
        let mut barracks = Barracks::new(BlockPos::ORIGIN, "oak");
        let live = BlockPos::new(1, 64, 0);
        tower_at(&mut manager, live, 5);
        barracks.add_tower(live);
        barracks.add_tower(BlockPos::new(9, 64, 9));

        assert_eq!(barracks.claim_radius(5, &manager), 2);
    }

    #[test]
    fn test_on_destroyed_clears_tower_blocks() {
        let mut blocks = BlockWorld::new();
        let mut barracks = Barracks::new(BlockPos::ORIGIN, "oak");
        barracks.on_placed();
        let pos = BlockPos::new(3, 64, 3);
        blocks.set_block_state(pos, BlockState::new(Block::BarracksTowerHut, Facing::South));
        barracks.add_tower(pos);

        barracks.on_destroyed(&mut blocks);
        assert_eq!(blocks.block_state(pos), BlockState::AIR);

        blocks.set_block_state(pos, BlockState::new(Block::Solid, Facing::North));
        barracks.on_destroyed(&mut blocks);
        assert_eq!(blocks.block_state(pos).block, Block::Solid);
    }

    #[test]
    fn test_record_round_trip() {
        let mut barracks = Barracks::new(BlockPos::new(0, 64, 0), "oak");
        barracks.on_placed();
        barracks.set_level(3);
        barracks.add_tower(BlockPos::new(1, 64, 2));
        barracks.add_tower(BlockPos::new(5, 64, 9));

        let record = barracks.to_record();
        assert_eq!(record.towers.len(), 2);
        assert_eq!(Barracks::from_record(&record), barracks);
    }

    #[test]
    fn test_deserialize_into_replaces_towers() {
        let mut barracks = Barracks::new(BlockPos::ORIGIN, "oak");
        barracks.add_tower(BlockPos::new(7, 7, 7));
        let record = BarracksRecord {
            base: BuildingRecord {
                position: BlockPos::ORIGIN,
                level: 2,
                style: "birch".to_string(),
            },
            towers: vec![
                TowerTag { pos: BlockPos::new(1, 64, 2) },
                TowerTag { pos: BlockPos::new(1, 64, 2) },
            ],
        };

        barracks.deserialize_into(&record);

        assert_eq!(barracks.towers(), &[BlockPos::new(1, 64, 2)]);
        assert_eq!(barracks.base.level, 2);
        assert_eq!(barracks.base.style, "birch");
    }
}
