//! Fortification structures and the position-keyed arena holding them.
//!
//! A barracks tracks its towers by position, and every tower points back
//! at its barracks by position. Neither side owns the other: both live in
//! [`StructureManager`] and are looked up through it. A position that no
//! longer resolves simply contributes nothing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::barracks::Barracks;
use crate::error::{RaidError, Result};
use crate::math::BlockPos;
use crate::world::{Block, BlockState, BlockWorld, Facing};

// ============================================================================
// Structure Records
// ============================================================================

/// Data shared by every colony building.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingBase {
    /// Position of the hut block.
    pub position: BlockPos,
    /// Building level.
    pub level: u32,
    /// Schematic style name.
    pub style: String,
}

impl BuildingBase {
    /// Create a level 0 building.
    #[must_use]
    pub fn new(position: BlockPos, style: impl Into<String>) -> Self {
        Self {
            position,
            level: 0,
            style: style.into(),
        }
    }
}

/// A tower belonging to a barracks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarracksTower {
    /// Shared building data.
    pub base: BuildingBase,
    /// Position of the owning barracks, if bound.
    pub barracks: Option<BlockPos>,
}

impl BarracksTower {
    /// Create an unbound level 0 tower.
    #[must_use]
    pub fn new(position: BlockPos, style: impl Into<String>) -> Self {
        Self {
            base: BuildingBase::new(position, style),
            barracks: None,
        }
    }
}

/// Any structure held by the arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Structure {
    /// A barracks.
    Barracks(Barracks),
    /// A barracks tower.
    Tower(BarracksTower),
}

impl Structure {
    /// Shared building data.
    #[must_use]
    pub fn base(&self) -> &BuildingBase {
        match self {
            Self::Barracks(barracks) => &barracks.base,
            Self::Tower(tower) => &tower.base,
        }
    }

    /// The tower inside, if this is one.
    #[must_use]
    pub fn as_tower(&self) -> Option<&BarracksTower> {
        match self {
            Self::Tower(tower) => Some(tower),
            Self::Barracks(_) => None,
        }
    }

    /// The barracks inside, if this is one.
    #[must_use]
    pub fn as_barracks(&self) -> Option<&Barracks> {
        match self {
            Self::Barracks(barracks) => Some(barracks),
            Self::Tower(_) => None,
        }
    }
}

/// Resolves a position to the structure recorded there.
pub trait StructureLookup {
    /// Structure at `pos`, if any.
    fn resolve(&self, pos: BlockPos) -> Option<&Structure>;
}

/// Outcome of [`StructureManager::register_block_position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TowerRegistration {
    /// A new tower position was added to the barracks.
    Registered,
    /// The barracks already tracked this tower.
    AlreadyTracked,
    /// Not a tower block, or no live barracks to attach to.
    Ignored,
    /// The position belongs to another live barracks or a non-tower structure.
    Rejected,
}

// ============================================================================
// Structure Manager
// ============================================================================

/// Arena of colony structures keyed by hut position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureManager {
    structures: BTreeMap<BlockPos, Structure>,
}

impl StructureLookup for StructureManager {
    fn resolve(&self, pos: BlockPos) -> Option<&Structure> {
        self.structures.get(&pos)
    }
}

impl StructureManager {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of structures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    /// Check if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Iterate structures in position order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, &Structure)> + '_ {
        self.structures.iter().map(|(&pos, s)| (pos, s))
    }

    /// Barracks at a position.
    #[must_use]
    pub fn barracks(&self, pos: BlockPos) -> Option<&Barracks> {
        self.structures.get(&pos).and_then(Structure::as_barracks)
    }

    /// Mutable barracks at a position.
    pub fn barracks_mut(&mut self, pos: BlockPos) -> Option<&mut Barracks> {
        match self.structures.get_mut(&pos) {
            Some(Structure::Barracks(barracks)) => Some(barracks),
            _ => None,
        }
    }

    /// Tower at a position.
    #[must_use]
    pub fn tower(&self, pos: BlockPos) -> Option<&BarracksTower> {
        self.structures.get(&pos).and_then(Structure::as_tower)
    }

    /// Mutable tower at a position.
    pub fn tower_mut(&mut self, pos: BlockPos) -> Option<&mut BarracksTower> {
        match self.structures.get_mut(&pos) {
            Some(Structure::Tower(tower)) => Some(tower),
            _ => None,
        }
    }

    /// Whether a barracks that has not been destroyed stands at `pos`.
    #[must_use]
    pub fn is_live_barracks(&self, pos: BlockPos) -> bool {
        self.barracks(pos).is_some_and(Barracks::is_active)
    }

    /// Insert a structure as-is, replacing whatever was at its position.
    ///
    /// No blocks are touched and no links are checked; used when restoring
    /// saved state.
    pub fn insert(&mut self, structure: Structure) {
        self.structures.insert(structure.base().position, structure);
    }

    /// Build a new barracks at `pos` and place its hut block.
    pub fn place_barracks(
        &mut self,
        pos: BlockPos,
        style: impl Into<String>,
        facing: Facing,
        blocks: &mut BlockWorld,
    ) -> Result<()> {
        if self.structures.contains_key(&pos) {
            return Err(RaidError::PositionOccupied(pos));
        }

        let mut barracks = Barracks::new(pos, style);
        barracks.on_placed();
        blocks.set_block_state(pos, BlockState::new(Block::BarracksHut, facing));
        tracing::info!(at = %pos, style = %barracks.base.style, "Placed barracks");

        self.structures.insert(pos, Structure::Barracks(barracks));
        Ok(())
    }

    /// Hook run when a block is placed while building the barracks at
    /// `barracks_pos`.
    ///
    /// Tower-family blocks become tower huts (keeping their facing), get a
    /// tower record bound to the barracks, and are added to its tower set.
    pub fn register_block_position(
        &mut self,
        barracks_pos: BlockPos,
        placed: BlockState,
        pos: BlockPos,
        blocks: &mut BlockWorld,
    ) -> TowerRegistration {
        if !placed.block.is_tower_family() {
            return TowerRegistration::Ignored;
        }
        let Some(style) = self
            .barracks(barracks_pos)
            .filter(|b| b.is_active())
            .map(|b| b.base.style.clone())
        else {
            return TowerRegistration::Ignored;
        };

        match self.structures.get(&pos) {
            Some(Structure::Barracks(_)) => {
                tracing::warn!(at = %pos, barracks = %barracks_pos, "Tower position holds a barracks");
                return TowerRegistration::Rejected;
            }
            Some(Structure::Tower(tower)) => {
                if let Some(owner) = tower.barracks {
                    if owner != barracks_pos && self.is_live_barracks(owner) {
                        tracing::warn!(
                            at = %pos,
                            owner = %owner,
                            barracks = %barracks_pos,
                            "Tower already belongs to another barracks"
                        );
                        return TowerRegistration::Rejected;
                    }
                }
            }
            None => {}
        }

        if blocks.block_state(pos).block != Block::BarracksTowerHut {
            blocks.set_block_state(pos, BlockState::new(Block::BarracksTowerHut, placed.facing));
        }

        let tower = self
            .structures
            .entry(pos)
            .or_insert_with(|| Structure::Tower(BarracksTower::new(pos, style.clone())));
        if let Structure::Tower(tower) = tower {
            tower.base.style = style;
            tower.barracks = Some(barracks_pos);
        }

        let added = self
            .barracks_mut(barracks_pos)
            .is_some_and(|barracks| barracks.add_tower(pos));
        tracing::debug!(at = %pos, barracks = %barracks_pos, added, "Registered tower");
        if added {
            TowerRegistration::Registered
        } else {
            TowerRegistration::AlreadyTracked
        }
    }

    /// Claim radius of the barracks at `pos` if it were at `new_level`.
    #[must_use]
    pub fn claim_radius(&self, pos: BlockPos, new_level: u32) -> Option<u32> {
        self.barracks(pos)
            .map(|barracks| barracks.claim_radius(new_level, self))
    }

    /// Destroy the barracks at `pos`.
    ///
    /// Clears its tower blocks and hut block, removes tower records bound to
    /// it and the barracks itself. Returns the destroyed barracks, or `None`
    /// if there was no barracks at `pos`.
    pub fn destroy(&mut self, pos: BlockPos, blocks: &mut BlockWorld) -> Option<Barracks> {
        if self.barracks(pos).is_none() {
            return None;
        }
        let Some(Structure::Barracks(mut barracks)) = self.structures.remove(&pos) else {
            return None;
        };

        barracks.on_destroyed(blocks);
        let before = self.structures.len();
        self.structures.retain(|_, structure| {
            structure
                .as_tower()
                .map_or(true, |tower| tower.barracks != Some(pos))
        });
        blocks.set_block_state(pos, BlockState::AIR);

        tracing::info!(
            at = %pos,
            towers = barracks.towers().len(),
            removed = before - self.structures.len(),
            "Destroyed barracks"
        );
        Some(barracks)
    }

    /// Bind towers to the barracks that track them when their own
    /// back-reference is missing or names no live barracks.
    ///
    /// Towers bound to a different live barracks are left alone. Returns the
    /// number of towers repaired.
    pub fn relink(&mut self) -> usize {
        let links: Vec<(BlockPos, BlockPos)> = self
            .structures
            .values()
            .filter_map(Structure::as_barracks)
            .flat_map(|b| b.towers().iter().map(move |&tower| (tower, b.base.position)))
            .collect();

        let mut repaired = 0;
        for (tower_pos, barracks_pos) in links {
            let owner = match self.structures.get(&tower_pos) {
                Some(Structure::Tower(tower)) => tower.barracks,
                _ => continue,
            };
            if owner == Some(barracks_pos) || owner.is_some_and(|o| self.is_live_barracks(o)) {
                continue;
            }
            if let Some(tower) = self.tower_mut(tower_pos) {
                tower.barracks = Some(barracks_pos);
                repaired += 1;
            }
        }
        if repaired > 0 {
            tracing::debug!(repaired, "Relinked towers");
        }
        repaired
    }
}
