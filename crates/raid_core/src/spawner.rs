//! Batch spawning of raiders.
//!
//! A batch places every unit on the same column, one block above the
//! ground. Each unit is built completely (equipment, attributes, AI,
//! position, settlement) before it is handed to the world, so the world
//! never holds a half-initialized raider.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::MobAiRegistry;
use crate::config::RaidConfig;
use crate::difficulty::apply_attributes;
use crate::error::Result;
use crate::loadout::equip;
use crate::math::{BlockPos, Fixed, Vec3Fixed};
use crate::mob_kind::MobKindId;
use crate::settlement::Settlement;
use crate::world::{EntityId, RaidWorld};

/// Full turn in degrees.
const FULL_TURN_DEGREES: i64 = 360;

/// Outcome of a batch spawn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnReport {
    /// Entity IDs of registered raiders, in spawn order.
    pub spawned: Vec<EntityId>,
    /// Units the world could not build.
    pub skipped: u32,
}

impl SpawnReport {
    /// Number of raiders registered.
    #[must_use]
    pub fn spawned_count(&self) -> usize {
        self.spawned.len()
    }
}

/// Spawns raiders using shared read-only registries.
#[derive(Debug, Clone, Copy)]
pub struct RaidSpawner<'a> {
    ai: &'a MobAiRegistry,
    config: &'a RaidConfig,
}

impl<'a> RaidSpawner<'a> {
    /// Create a spawner.
    #[must_use]
    pub const fn new(ai: &'a MobAiRegistry, config: &'a RaidConfig) -> Self {
        Self { ai, config }
    }

    /// Spawn `count` raiders of `kind` at `origin`.
    ///
    /// A missing kind, origin or world is a no-op. Units the world cannot
    /// build are skipped and counted. Registration into an unloaded world
    /// aborts the batch with [`crate::error::RaidError::WorldUnavailable`];
    /// units registered before that stay in the world.
    pub fn spawn_batch<R: Rng + ?Sized>(
        &self,
        kind: Option<MobKindId>,
        count: u32,
        origin: Option<BlockPos>,
        world: Option<&mut RaidWorld>,
        settlement: Option<&Settlement>,
        rng: &mut R,
    ) -> Result<SpawnReport> {
        let mut report = SpawnReport::default();
        let (Some(kind), Some(origin), Some(world)) = (kind, origin, world) else {
            tracing::debug!(?kind, ?origin, "Spawn request incomplete, ignoring");
            return Ok(report);
        };
        if count == 0 {
            return Ok(report);
        }

        let ground = world.ground_height(origin.x, origin.z);
        let position = Vec3Fixed::standing_at(origin.x, ground.saturating_add(1), origin.z);

        for index in 0..count {
            let Some(mut mob) = world.create_mob(kind) else {
                tracing::debug!(index, kind = kind.as_u16(), "Could not build raider, skipping");
                report.skipped += 1;
                continue;
            };

            equip(&mut mob, rng);
            apply_attributes(&mut mob, settlement, self.config);
            self.ai.install(&mut mob);
            mob.set_position_and_rotation(position, random_yaw(rng), Fixed::ZERO);
            mob.set_settlement(settlement.map(|s| s.id));

            let id = world.add_mob(mob)?;
            report.spawned.push(id);
        }

        tracing::info!(
            kind = kind.as_u16(),
            requested = count,
            spawned = report.spawned.len(),
            skipped = report.skipped,
            at = %origin.with_y(ground + 1),
            "Spawned raid batch"
        );
        Ok(report)
    }
}

/// Uniform yaw in `[0, 360)` degrees.
fn random_yaw<R: Rng + ?Sized>(rng: &mut R) -> Fixed {
    Fixed::from_bits(rng.gen_range(0..FULL_TURN_DEGREES << 32))
}
