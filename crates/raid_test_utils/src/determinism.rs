//! Determinism testing utilities.
//!
//! Provides a harness for verifying that raids produce identical results
//! given identical inputs.
//!
//! # Testing Strategy
//!
//! Sources of non-determinism in a raid include:
//!
//! - **Floating-point math**: attributes and positions use
//!   [`raid_core::math::Fixed`] throughout.
//!
//! - **HashMap iteration order**: entities are always walked in sorted ID
//!   order and structures live in a position-ordered map.
//!
//! - **System randomness**: yaw and captain variants come from a seeded
//!   `ChaCha8Rng` handed in by the caller.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use raid_core::ai::MobAiRegistry;
use raid_core::config::RaidConfig;
use raid_core::math::BlockPos;
use raid_core::mob_kind::MobKindId;
use raid_core::persistence::ColonySave;
use raid_core::settlement::Settlement;
use raid_core::spawner::RaidSpawner;
use raid_core::structures::StructureManager;
use raid_core::world::RaidWorld;

use crate::fixtures::{seeded_rng, test_world};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Raid is non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a setup-and-act function several times and compare state hashes.
pub fn verify_determinism<S, Run, HashFn>(runs: usize, run: Run, hash: HashFn) -> DeterminismResult
where
    Run: Fn() -> S,
    HashFn: Fn(&S) -> u64,
{
    let hashes: Vec<u64> = (0..runs).map(|_| hash(&run())).collect();
    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
    }
}

/// Spawn one seeded batch into a fresh test world.
///
/// # Panics
///
/// Panics if the test world rejects registration, which it never does
/// while loaded.
#[must_use]
pub fn seeded_raid(
    seed: u64,
    kind: MobKindId,
    count: u32,
    config: &RaidConfig,
    settlement: Option<&Settlement>,
) -> RaidWorld {
    let ai = MobAiRegistry::with_defaults();
    let spawner = RaidSpawner::new(&ai, config);
    let mut world = test_world(config.max_mobs_per_world);
    let mut rng = seeded_rng(seed);
    spawner
        .spawn_batch(
            Some(kind),
            count,
            Some(BlockPos::ORIGIN),
            Some(&mut world),
            settlement,
            &mut rng,
        )
        .expect("test world is loaded");
    world
}

/// Check that two identically seeded batches leave identical worlds.
#[must_use]
pub fn verify_spawn_determinism(seed: u64, kind: MobKindId, count: u32) -> bool {
    let config = RaidConfig::default();
    verify_determinism(
        2,
        || seeded_raid(seed, kind, count, &config, None),
        RaidWorld::state_hash,
    )
    .is_deterministic
}

/// Verify that a bincode save round trip preserves a fortification arena.
#[must_use]
pub fn verify_save_round_trip(manager: &StructureManager) -> bool {
    let Ok(bytes) = ColonySave::capture(manager).to_bytes() else {
        return false;
    };
    ColonySave::from_bytes(&bytes)
        .and_then(|save| save.restore())
        .is_ok_and(|restored| &restored == manager)
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for raid testing.
pub mod strategies {
    use proptest::prelude::*;
    use raid_core::math::{BlockPos, Fixed};
    use raid_core::mob_kind::MobRole;

    /// Generate a difficulty tier, including out-of-range values.
    ///
    /// Range: -5 to 30
    pub fn arb_difficulty() -> impl Strategy<Value = i32> {
        -5i32..30i32
    }

    /// Generate a non-negative raid level with a fractional part.
    pub fn arb_raid_level() -> impl Strategy<Value = Fixed> {
        (0i32..5000i32, 0u32..100u32)
            .prop_map(|(whole, hundredths)| {
                Fixed::from_num(whole) + Fixed::from_num(hundredths) / Fixed::from_num(100)
            })
    }

    /// Generate any raid role.
    pub fn arb_role() -> impl Strategy<Value = MobRole> {
        prop::sample::select(MobRole::ALL.to_vec())
    }

    /// Generate a block position near the origin.
    pub fn arb_block_pos() -> impl Strategy<Value = BlockPos> {
        (-64i32..64i32, 0i32..128i32, -64i32..64i32).prop_map(|(x, y, z)| BlockPos::new(x, y, z))
    }

    /// Generate a list of tower positions, possibly with duplicates.
    pub fn arb_tower_positions(max_len: usize) -> impl Strategy<Value = Vec<BlockPos>> {
        proptest::collection::vec(arb_block_pos(), 0..max_len)
    }
}
