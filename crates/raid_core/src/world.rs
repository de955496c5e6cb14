//! World storage: entities, blocks and terrain height per dimension.
//!
//! Entities live in an [`EntityStorage`] keyed by [`EntityId`], iterated
//! in sorted ID order wherever order matters. Blocks live in a sparse
//! [`BlockWorld`]; anything not stored is air.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{RaidError, Result};
use crate::math::{BlockPos, Vec3Fixed};
use crate::mob::RaidMob;
use crate::mob_kind::{MobCatalog, MobKindId};
use crate::settlement::SettlementId;

/// Unique identifier for entities.
pub type EntityId = u64;

/// Default terrain surface height for columns without an explicit height.
pub const DEFAULT_SURFACE_LEVEL: i32 = 64;

/// Identifier of a world dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DimensionId(pub u32);

impl DimensionId {
    /// The main surface dimension.
    pub const OVERWORLD: Self = Self(0);
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Blocks
// ============================================================================

/// Horizontal facing of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Facing north.
    #[default]
    North,
    /// Facing east.
    East,
    /// Facing south.
    South,
    /// Facing west.
    West,
}

/// Block types relevant to raids and fortifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Block {
    /// Empty space.
    #[default]
    Air,
    /// Any ordinary solid block.
    Solid,
    /// Hut block of a barracks.
    BarracksHut,
    /// Hut block of a barracks tower.
    BarracksTowerHut,
    /// Placeholder placed by a barracks schematic where a tower hut goes.
    BarracksTowerSubstitution,
}

impl Block {
    /// Whether this block belongs to the barracks tower family.
    #[must_use]
    pub const fn is_tower_family(self) -> bool {
        matches!(self, Self::BarracksTowerHut | Self::BarracksTowerSubstitution)
    }
}

/// A block together with its facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockState {
    /// Block type.
    pub block: Block,
    /// Facing.
    pub facing: Facing,
}

impl BlockState {
    /// Empty space.
    pub const AIR: Self = Self {
        block: Block::Air,
        facing: Facing::North,
    };

    /// Create a block state.
    #[must_use]
    pub const fn new(block: Block, facing: Facing) -> Self {
        Self { block, facing }
    }
}

/// Sparse block map plus a terrain height map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockWorld {
    blocks: HashMap<BlockPos, BlockState>,
    heights: HashMap<(i32, i32), i32>,
    surface_level: i32,
}

impl BlockWorld {
    /// Create a flat world at [`DEFAULT_SURFACE_LEVEL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_surface_level(DEFAULT_SURFACE_LEVEL)
    }

    /// Create a flat world at the given surface height.
    #[must_use]
    pub fn with_surface_level(surface_level: i32) -> Self {
        Self {
            blocks: HashMap::new(),
            heights: HashMap::new(),
            surface_level,
        }
    }

    /// Block at a position; air if nothing is stored.
    #[must_use]
    pub fn block_state(&self, pos: BlockPos) -> BlockState {
        self.blocks.get(&pos).copied().unwrap_or(BlockState::AIR)
    }

    /// Replace the block at a position. Returns `true` if anything changed.
    pub fn set_block_state(&mut self, pos: BlockPos, state: BlockState) -> bool {
        if state.block == Block::Air {
            return self.blocks.remove(&pos).is_some();
        }
        self.blocks.insert(pos, state) != Some(state)
    }

    /// Height of the topmost ground block in a column.
    #[must_use]
    pub fn ground_height(&self, x: i32, z: i32) -> i32 {
        self.heights.get(&(x, z)).copied().unwrap_or(self.surface_level)
    }

    /// Override the ground height of one column.
    pub fn set_ground_height(&mut self, x: i32, z: i32, y: i32) {
        self.heights.insert((x, z), y);
    }

    /// Number of non-air blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Non-air blocks in position order.
    #[must_use]
    pub fn sorted_blocks(&self) -> Vec<(BlockPos, BlockState)> {
        let mut blocks: Vec<_> = self.blocks.iter().map(|(&p, &s)| (p, s)).collect();
        blocks.sort_unstable_by_key(|(pos, _)| *pos);
        blocks
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A settlement inhabitant. Never removed by raider cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citizen {
    /// Display name.
    pub name: String,
    /// Home settlement.
    pub settlement: SettlementId,
    /// World position.
    pub position: Vec3Fixed,
}

/// Anything that lives in a world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    /// A hostile raider.
    Raider(RaidMob),
    /// A settlement inhabitant.
    Citizen(Citizen),
}

impl Entity {
    /// The raider inside this entity, if it is one.
    #[must_use]
    pub fn as_raider(&self) -> Option<&RaidMob> {
        match self {
            Self::Raider(mob) => Some(mob),
            Self::Citizen(_) => None,
        }
    }

    /// Whether this entity belongs to the raid-mob family.
    #[must_use]
    pub fn is_raider(&self) -> bool {
        matches!(self, Self::Raider(_))
    }
}

/// Storage for all entities in a world.
///
/// Uses a `HashMap` for O(1) entity lookup by ID, with deterministic
/// iteration via sorted keys when order matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStorage {
    entities: HashMap<EntityId, Entity>,
    next_id: EntityId,
}

impl Default for EntityStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStorage {
    /// Create empty entity storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            next_id: 1,
        }
    }

    /// Insert a new entity and return its ID.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity by ID.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Get an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if storage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get sorted entity IDs for deterministic iteration.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

// ============================================================================
// World
// ============================================================================

/// One loaded dimension: its entities and blocks.
#[derive(Debug, Clone)]
pub struct RaidWorld {
    dimension: DimensionId,
    loaded: bool,
    max_entities: usize,
    catalog: Arc<MobCatalog>,
    entities: EntityStorage,
    blocks: BlockWorld,
}

impl RaidWorld {
    /// Create a loaded, flat, empty world.
    ///
    /// `catalog` lists the mob kinds that can be built here and
    /// `max_entities` caps the live entity count.
    #[must_use]
    pub fn new(dimension: DimensionId, catalog: Arc<MobCatalog>, max_entities: usize) -> Self {
        Self {
            dimension,
            loaded: true,
            max_entities,
            catalog,
            entities: EntityStorage::new(),
            blocks: BlockWorld::new(),
        }
    }

    /// Replace the block map.
    #[must_use]
    pub fn with_blocks(mut self, blocks: BlockWorld) -> Self {
        self.blocks = blocks;
        self
    }

    /// Dimension of this world.
    #[must_use]
    pub const fn dimension(&self) -> DimensionId {
        self.dimension
    }

    /// Whether the world accepts new entities.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Mark the world loaded or unloaded.
    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    /// Entity storage.
    #[must_use]
    pub fn entities(&self) -> &EntityStorage {
        &self.entities
    }

    /// Block map.
    #[must_use]
    pub fn blocks(&self) -> &BlockWorld {
        &self.blocks
    }

    /// Mutable block map.
    pub fn blocks_mut(&mut self) -> &mut BlockWorld {
        &mut self.blocks
    }

    /// Height of the topmost ground block in a column.
    #[must_use]
    pub fn ground_height(&self, x: i32, z: i32) -> i32 {
        self.blocks.ground_height(x, z)
    }

    /// Build a new, unregistered raider of `kind`.
    ///
    /// Returns `None` if the kind is unknown here or the world is at its
    /// entity cap.
    #[must_use]
    pub fn create_mob(&self, kind: MobKindId) -> Option<RaidMob> {
        if self.entities.len() >= self.max_entities {
            return None;
        }
        let info = self.catalog.get(kind)?;
        Some(RaidMob::new(info.id, info.role))
    }

    /// Hand a raider over to the world.
    pub fn add_mob(&mut self, mob: RaidMob) -> Result<EntityId> {
        self.add_entity(Entity::Raider(mob))
    }

    /// Hand a citizen over to the world.
    pub fn add_citizen(&mut self, citizen: Citizen) -> Result<EntityId> {
        self.add_entity(Entity::Citizen(citizen))
    }

    fn add_entity(&mut self, entity: Entity) -> Result<EntityId> {
        if !self.loaded {
            return Err(RaidError::WorldUnavailable(self.dimension));
        }
        Ok(self.entities.insert(entity))
    }

    /// Look up a raider by entity ID.
    #[must_use]
    pub fn raider(&self, id: EntityId) -> Option<&RaidMob> {
        self.entities.get(id).and_then(Entity::as_raider)
    }

    /// IDs of all raiders, sorted.
    #[must_use]
    pub fn raider_ids(&self) -> Vec<EntityId> {
        self.entities
            .sorted_ids()
            .into_iter()
            .filter(|&id| self.entities.get(id).is_some_and(Entity::is_raider))
            .collect()
    }

    /// IDs of raiders attacking a settlement, sorted.
    #[must_use]
    pub fn raiders_of(&self, settlement: SettlementId) -> Vec<EntityId> {
        self.raider_ids()
            .into_iter()
            .filter(|&id| {
                self.raider(id)
                    .is_some_and(|mob| mob.settlement == Some(settlement))
            })
            .collect()
    }

    /// Remove every raider in this world and return how many were removed.
    pub fn remove_all_raiders(&mut self) -> usize {
        let ids = self.raider_ids();
        for &id in &ids {
            self.entities.remove(id);
        }
        tracing::info!(
            dimension = %self.dimension,
            removed = ids.len(),
            "Removed raiders"
        );
        ids.len()
    }

    /// Hash of entities and blocks, for determinism checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        let ids = self.entities.sorted_ids();
        ids.len().hash(&mut hasher);
        for id in ids {
            id.hash(&mut hasher);
            self.entities.get(id).hash(&mut hasher);
        }

        self.blocks.sorted_blocks().hash(&mut hasher);

        hasher.finish()
    }
}

/// All worlds of a running game, by dimension.
#[derive(Debug, Clone, Default)]
pub struct WorldRegistry {
    worlds: BTreeMap<DimensionId, RaidWorld>,
}

impl WorldRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a world.
    pub fn insert(&mut self, world: RaidWorld) {
        self.worlds.insert(world.dimension(), world);
    }

    /// World for a dimension.
    #[must_use]
    pub fn get(&self, dimension: DimensionId) -> Option<&RaidWorld> {
        self.worlds.get(&dimension)
    }

    /// Mutable world for a dimension.
    pub fn get_mut(&mut self, dimension: DimensionId) -> Option<&mut RaidWorld> {
        self.worlds.get_mut(&dimension)
    }

    /// Remove every raider in one dimension. Unknown dimensions remove none.
    pub fn remove_raiders_in(&mut self, dimension: DimensionId) -> usize {
        self.worlds
            .get_mut(&dimension)
            .map_or(0, RaidWorld::remove_all_raiders)
    }
}
