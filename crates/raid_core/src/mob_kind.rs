//! Raid-mob identity.
//!
//! - [`MobKindId`]: numeric ID for fast, deterministic runtime use
//! - [`MobRole`]: closed set of combat roles that drive loadouts and armor
//! - [`MobCatalog`]: maps between IDs, string IDs and roles
//!
//! The catalog is built once when the game starts and is never mutated
//! while a simulation runs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Numeric identifier for a raid-mob kind.
///
/// Assigned in registration order, so the same catalog always yields the
/// same IDs.
///
/// # Example
///
/// ```
/// use raid_core::mob_kind::MobKindId;
///
/// let id = MobKindId::new(3);
/// assert_eq!(id.as_u16(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct MobKindId(u16);

impl MobKindId {
    /// Sentinel value indicating no mob kind.
    pub const NONE: Self = Self(u16::MAX);

    /// Create a new mob kind ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Check if this is a valid ID (not NONE).
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u16::MAX
    }
}

/// Combat role of a raid-mob kind.
///
/// Each kind has exactly one role. A raid chief is its own variant rather
/// than a melee raider with extras, so a chief can never pick up the plain
/// melee loadout or armor formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MobRole {
    /// Axe-wielding barbarian.
    Melee,
    /// Bow-wielding raider of either faction.
    Archer,
    /// Barbarian chief with a unique weapon and chainmail.
    ChiefMelee,
    /// Scimitar-wielding pirate.
    PirateRegular,
    /// Pirate captain with a cosmetic armor variant.
    PirateCaptain,
}

impl MobRole {
    /// All roles, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Melee,
        Self::Archer,
        Self::ChiefMelee,
        Self::PirateRegular,
        Self::PirateCaptain,
    ];

    /// Short name used in logs and reports.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Melee => "melee",
            Self::Archer => "archer",
            Self::ChiefMelee => "chief",
            Self::PirateRegular => "pirate",
            Self::PirateCaptain => "captain",
        }
    }

    /// Whether this role fights at range.
    #[must_use]
    pub const fn is_ranged(self) -> bool {
        matches!(self, Self::Archer)
    }
}

/// Metadata about a mob kind, stored in the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MobKindInfo {
    /// Numeric ID (index in catalog).
    pub id: MobKindId,
    /// String ID (e.g., "chief_barbarian").
    pub string_id: String,
    /// Combat role.
    pub role: MobRole,
}

/// Central catalog of raid-mob kinds.
///
/// # Thread Safety
///
/// The catalog is immutable after construction, so it can be
/// safely shared across threads (wrapped in Arc if needed).
#[derive(Default, Debug, Clone)]
pub struct MobCatalog {
    /// Lookup by numeric ID (O(1) array index).
    by_id: Vec<MobKindInfo>,
    /// Lookup by string ID → numeric ID.
    by_string: HashMap<String, MobKindId>,
}

impl MobCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the stock barbarian and pirate raiders.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.register("barbarian", MobRole::Melee);
        catalog.register("archer_barbarian", MobRole::Archer);
        catalog.register("chief_barbarian", MobRole::ChiefMelee);
        catalog.register("pirate", MobRole::PirateRegular);
        catalog.register("archer_pirate", MobRole::Archer);
        catalog.register("captain_pirate", MobRole::PirateCaptain);
        catalog
    }

    /// Register a mob kind and return its assigned numeric ID.
    ///
    /// Registering an existing string ID returns the existing ID unchanged.
    /// Returns [`MobKindId::NONE`] once every ID is taken.
    pub fn register(&mut self, string_id: &str, role: MobRole) -> MobKindId {
        if let Some(&existing) = self.by_string.get(string_id) {
            return existing;
        }

        let Some(id) = u16::try_from(self.by_id.len())
            .ok()
            .map(MobKindId::new)
            .filter(|id| id.is_valid())
        else {
            tracing::warn!(string_id, "Mob catalog is full");
            return MobKindId::NONE;
        };
        self.by_id.push(MobKindInfo {
            id,
            string_id: string_id.to_string(),
            role,
        });
        self.by_string.insert(string_id.to_string(), id);

        id
    }

    /// Get kind info by numeric ID. O(1) array lookup.
    #[inline]
    #[must_use]
    pub fn get(&self, id: MobKindId) -> Option<&MobKindInfo> {
        if !id.is_valid() {
            return None;
        }
        self.by_id.get(id.0 as usize)
    }

    /// Find a kind's numeric ID by string ID.
    #[must_use]
    pub fn find(&self, string_id: &str) -> Option<MobKindId> {
        self.by_string.get(string_id).copied()
    }

    /// Get the role for a mob kind.
    #[inline]
    #[must_use]
    pub fn role(&self, id: MobKindId) -> Option<MobRole> {
        self.get(id).map(|info| info.role)
    }

    /// Total number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
