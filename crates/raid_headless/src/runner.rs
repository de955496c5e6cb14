//! Scenario runner.
//!
//! Builds a world and a fortification arena from a [`Scenario`], runs its
//! spawn waves with a seeded RNG, and summarizes the outcome as a
//! serializable [`RaidReport`].

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use raid_core::ai::MobAiRegistry;
use raid_core::math::{BlockPos, Fixed};
use raid_core::mob_kind::MobCatalog;
use raid_core::persistence::ColonySave;
use raid_core::settlement::{Settlement, SettlementId};
use raid_core::spawner::RaidSpawner;
use raid_core::structures::{StructureManager, TowerRegistration};
use raid_core::world::{Block, BlockState, BlockWorld, DimensionId, Facing, RaidWorld};
use serde::{Deserialize, Serialize};

use crate::scenario::{BarracksPlacement, Scenario, ScenarioError};

/// Summary of one raider in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaiderSummary {
    /// Entity ID.
    pub entity: u64,
    /// Mob kind string ID.
    pub kind: String,
    /// Role name.
    pub role: String,
    /// Maximum health.
    pub max_health: f64,
    /// Armor.
    pub armor: f64,
    /// Attack damage.
    pub attack_damage: f64,
    /// Position (x, y, z).
    pub position: (f64, f64, f64),
    /// Number of worn items.
    pub items: usize,
}

/// Summary of one barracks in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FortificationSummary {
    /// Hut position (x, y, z).
    pub position: (i32, i32, i32),
    /// Barracks level.
    pub level: u32,
    /// Number of tracked towers.
    pub towers: usize,
    /// Claim radius at the current level.
    pub claim_radius: u32,
}

/// Outcome of a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaidReport {
    /// Scenario name.
    pub scenario: String,
    /// Seed used.
    pub seed: u64,
    /// Raiders registered across all waves.
    pub spawned: usize,
    /// Units the world could not build.
    pub skipped: u32,
    /// Raiders attacking the settlement.
    pub attacking_settlement: usize,
    /// Surviving raiders, in entity order.
    pub raiders: Vec<RaiderSummary>,
    /// Barracks still standing, in position order.
    pub fortifications: Vec<FortificationSummary>,
    /// Barracks destroyed after the waves.
    pub destroyed: usize,
    /// Combined world and fortification hash.
    pub state_hash: u64,
}

/// Final state of a run, kept for inspection and saving.
#[derive(Debug, Clone)]
pub struct RaidOutcome {
    /// Report for output.
    pub report: RaidReport,
    /// The world after the raid.
    pub world: RaidWorld,
    /// Fortifications after the raid.
    pub structures: StructureManager,
}

/// Result of running a scenario several times with one seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Scenario name.
    pub scenario: String,
    /// Seed used.
    pub seed: u64,
    /// Hash from each run.
    pub hashes: Vec<u64>,
    /// Whether every run matched.
    pub deterministic: bool,
}

/// Runs scenarios against the stock catalog and AI registry.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    catalog: Arc<MobCatalog>,
    ai: MobAiRegistry,
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRunner {
    /// Runner with the stock mob kinds and behaviors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(MobCatalog::with_defaults()),
            ai: MobAiRegistry::with_defaults(),
        }
    }

    /// Run a scenario once.
    ///
    /// # Errors
    /// Returns an error for unknown mob kinds, occupied barracks positions
    /// or an unavailable world.
    pub fn run(&self, scenario: &Scenario, seed: u64) -> Result<RaidOutcome, ScenarioError> {
        tracing::info!(scenario = %scenario.name, seed, "Running scenario");

        let mut world = RaidWorld::new(
            DimensionId::OVERWORLD,
            Arc::clone(&self.catalog),
            scenario.config.max_mobs_per_world,
        )
        .with_blocks(BlockWorld::with_surface_level(scenario.surface_level));
        let settlement = Settlement::new(
            SettlementId::new(scenario.settlement.id),
            scenario.settlement.name.clone(),
            Fixed::from_num(scenario.settlement.raid_level),
        );

        let mut structures = StructureManager::new();
        for placement in &scenario.fortifications {
            build_fortification(&mut structures, world.blocks_mut(), placement)?;
        }

        let spawner = RaidSpawner::new(&self.ai, &scenario.config);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut spawned = 0;
        let mut skipped = 0;
        for wave in &scenario.waves {
            let kind = self
                .catalog
                .find(&wave.kind)
                .ok_or_else(|| ScenarioError::UnknownMobKind(wave.kind.clone()))?;
            let report = spawner.spawn_batch(
                Some(kind),
                wave.count,
                Some(wave.block_pos()),
                Some(&mut world),
                wave.attack_settlement.then_some(&settlement),
                &mut rng,
            )?;
            spawned += report.spawned_count();
            skipped += report.skipped;
        }

        let mut destroyed = 0;
        for &(x, y, z) in &scenario.destroy {
            if structures
                .destroy(BlockPos::new(x, y, z), world.blocks_mut())
                .is_some()
            {
                destroyed += 1;
            }
        }

        let report = RaidReport {
            scenario: scenario.name.clone(),
            seed,
            spawned,
            skipped,
            attacking_settlement: world.raiders_of(settlement.id).len(),
            raiders: self.summarize_raiders(&world),
            fortifications: summarize_fortifications(&structures),
            destroyed,
            state_hash: combined_hash(&world, &structures),
        };
        tracing::info!(
            spawned = report.spawned,
            skipped = report.skipped,
            destroyed = report.destroyed,
            hash = report.state_hash,
            "Scenario finished"
        );

        Ok(RaidOutcome {
            report,
            world,
            structures,
        })
    }

    /// Run a scenario `runs` times with one seed and compare hashes.
    ///
    /// # Errors
    /// Returns the first run error.
    pub fn verify(
        &self,
        scenario: &Scenario,
        seed: u64,
        runs: u32,
    ) -> Result<VerifyReport, ScenarioError> {
        let hashes = (0..runs)
            .map(|_| self.run(scenario, seed).map(|o| o.report.state_hash))
            .collect::<Result<Vec<_>, _>>()?;
        let deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
        if !deterministic {
            tracing::warn!(scenario = %scenario.name, ?hashes, "Runs diverged");
        }

        Ok(VerifyReport {
            scenario: scenario.name.clone(),
            seed,
            hashes,
            deterministic,
        })
    }

    fn summarize_raiders(&self, world: &RaidWorld) -> Vec<RaiderSummary> {
        world
            .raider_ids()
            .into_iter()
            .filter_map(|id| world.raider(id).map(|mob| (id, mob)))
            .map(|(id, mob)| RaiderSummary {
                entity: id,
                kind: self
                    .catalog
                    .get(mob.kind)
                    .map_or_else(|| "unknown".to_string(), |info| info.string_id.clone()),
                role: mob.role.short_name().to_string(),
                max_health: mob.attributes.max_health.to_num(),
                armor: mob.attributes.armor.to_num(),
                attack_damage: mob.attributes.attack_damage.to_num(),
                position: (
                    mob.position.x.to_num(),
                    mob.position.y.to_num(),
                    mob.position.z.to_num(),
                ),
                items: mob.equipment.len(),
            })
            .collect()
    }
}

/// Place a barracks and register its towers through the placement hook.
fn build_fortification(
    structures: &mut StructureManager,
    blocks: &mut BlockWorld,
    placement: &BarracksPlacement,
) -> Result<(), ScenarioError> {
    let pos = placement.block_pos();
    structures.place_barracks(pos, placement.style.clone(), Facing::North, blocks)?;
    if let Some(barracks) = structures.barracks_mut(pos) {
        barracks.set_level(placement.level);
    }

    for tower in &placement.towers {
        let tower_pos = tower.block_pos();
        let result = structures.register_block_position(
            pos,
            BlockState::new(Block::BarracksTowerSubstitution, Facing::North),
            tower_pos,
            blocks,
        );
        if result == TowerRegistration::Rejected {
            tracing::warn!(at = %tower_pos, barracks = %pos, "Scenario tower rejected");
            continue;
        }
        if let Some(record) = structures.tower_mut(tower_pos) {
            record.base.level = tower.level;
        }
    }
    Ok(())
}

fn summarize_fortifications(structures: &StructureManager) -> Vec<FortificationSummary> {
    structures
        .iter()
        .filter_map(|(pos, structure)| structure.as_barracks().map(|b| (pos, b)))
        .map(|(pos, barracks)| FortificationSummary {
            position: (pos.x, pos.y, pos.z),
            level: barracks.base.level,
            towers: barracks.towers().len(),
            claim_radius: barracks.claim_radius(barracks.base.level, structures),
        })
        .collect()
}

/// Hash of world state and fortification records.
#[must_use]
pub fn combined_hash(world: &RaidWorld, structures: &StructureManager) -> u64 {
    let mut hasher = DefaultHasher::new();
    world.state_hash().hash(&mut hasher);
    ColonySave::capture(structures).hash(&mut hasher);
    hasher.finish()
}
