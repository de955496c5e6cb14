//! # Raid Core
//!
//! Deterministic raid and fortification logic for a colony-defense
//! simulation.
//!
//! This crate contains:
//! - Raider creation: difficulty-scaled attributes, role loadouts, AI goals
//! - Batch spawning into a world
//! - The barracks/tower fortification graph and its claim radius
//! - Save records for fortifications
//!
//! Randomness always comes from a caller-supplied RNG and all attribute
//! math is fixed-point, so a seeded run is reproducible.
//!
//! ## Crate Structure
//!
//! - [`difficulty`] - Attribute formulas
//! - [`loadout`] - Equipment bundles per role
//! - [`ai`] - Goal sets per role
//! - [`spawner`] - Batch spawning
//! - [`world`] - Entity and block storage
//! - [`structures`] / [`barracks`] - Fortification graph
//! - [`persistence`] - Save records and files

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ai;
pub mod barracks;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod loadout;
pub mod math;
pub mod mob;
pub mod mob_kind;
pub mod persistence;
pub mod settlement;
pub mod spawner;
pub mod structures;
pub mod world;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ai::{AiGoal, GoalSelector, MobAiRegistry};
    pub use crate::barracks::{Barracks, BarracksState};
    pub use crate::config::{RaidBalance, RaidConfig};
    pub use crate::difficulty::{apply_attributes, compute_attributes, MobAttributes};
    pub use crate::error::{RaidError, Result};
    pub use crate::loadout::{equip, EquipmentSlot, ItemId};
    pub use crate::math::{BlockPos, Fixed, Vec3Fixed};
    pub use crate::mob::RaidMob;
    pub use crate::mob_kind::{MobCatalog, MobKindId, MobRole};
    pub use crate::persistence::{BarracksRecord, ColonySave, StructureRecord};
    pub use crate::settlement::{Settlement, SettlementId};
    pub use crate::spawner::{RaidSpawner, SpawnReport};
    pub use crate::structures::{
        BarracksTower, Structure, StructureLookup, StructureManager, TowerRegistration,
    };
    pub use crate::world::{
        Block, BlockState, BlockWorld, DimensionId, EntityId, Facing, RaidWorld, WorldRegistry,
    };
}
