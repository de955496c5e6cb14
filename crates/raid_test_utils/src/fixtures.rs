//! Test fixtures and helpers.
//!
//! Pre-built worlds, settlements and fortifications for consistent
//! testing.

use std::sync::Arc;

use fixed::types::I32F32;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use raid_core::math::BlockPos;
use raid_core::mob_kind::MobCatalog;
use raid_core::settlement::{Settlement, SettlementId};
use raid_core::structures::StructureManager;
use raid_core::world::{Block, BlockState, BlockWorld, DimensionId, Facing, RaidWorld};

/// Style used by fixture structures.
pub const TEST_STYLE: &str = "medievaloak";

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Seeded RNG for reproducible tests.
#[must_use]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Loaded overworld with the stock mob catalog.
#[must_use]
pub fn test_world(max_entities: usize) -> RaidWorld {
    RaidWorld::new(
        DimensionId::OVERWORLD,
        Arc::new(MobCatalog::with_defaults()),
        max_entities,
    )
}

/// Settlement #1 with the given raid level.
#[must_use]
pub fn test_settlement(raid_level: i32) -> Settlement {
    Settlement::new(SettlementId::new(1), "Testholm", fixed(raid_level))
}

/// A placed barracks with towers at the given positions and levels.
///
/// Towers are registered through the placement hook, so blocks and back
/// references are set exactly as in a live game.
///
/// # Panics
///
/// Panics if `barracks` collides with a tower position.
#[must_use]
pub fn barracks_with_towers(
    barracks: BlockPos,
    towers: &[(BlockPos, u32)],
) -> (StructureManager, BlockWorld) {
    let mut manager = StructureManager::new();
    let mut blocks = BlockWorld::new();
    manager
        .place_barracks(barracks, TEST_STYLE, Facing::North, &mut blocks)
        .expect("fixture barracks position is free");

    for &(pos, level) in towers {
        manager.register_block_position(
            barracks,
            BlockState::new(Block::BarracksTowerSubstitution, Facing::North),
            pos,
            &mut blocks,
        );
        if let Some(tower) = manager.tower_mut(pos) {
            tower.base.level = level;
        }
    }

    (manager, blocks)
}
