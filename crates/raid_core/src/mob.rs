//! Raid-mob entity data.
//!
//! A [`RaidMob`] is plain data. The spawner fills it in completely before
//! the world ever sees it.

use serde::{Deserialize, Serialize};

use crate::ai::GoalSelector;
use crate::difficulty::MobAttributes;
use crate::loadout::Equipment;
use crate::math::{fixed_serde, Fixed, Vec3Fixed};
use crate::mob_kind::{MobKindId, MobRole};
use crate::settlement::SettlementId;

/// A hostile raider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaidMob {
    /// Kind this raider was built from.
    pub kind: MobKindId,
    /// Combat role, copied from the kind.
    pub role: MobRole,
    /// Current combat attributes.
    pub attributes: MobAttributes,
    /// Current health.
    #[serde(with = "fixed_serde")]
    pub health: Fixed,
    /// Worn items.
    pub equipment: Equipment,
    /// Installed AI goals.
    pub goals: GoalSelector,
    /// World position.
    pub position: Vec3Fixed,
    /// Horizontal facing in degrees, `[0, 360)`.
    #[serde(with = "fixed_serde")]
    pub yaw: Fixed,
    /// Vertical facing in degrees.
    #[serde(with = "fixed_serde")]
    pub pitch: Fixed,
    /// Settlement this raider is attacking.
    pub settlement: Option<SettlementId>,
}

impl RaidMob {
    /// Create an unequipped raider at the origin with zeroed attributes.
    #[must_use]
    pub fn new(kind: MobKindId, role: MobRole) -> Self {
        Self {
            kind,
            role,
            attributes: MobAttributes::default(),
            health: Fixed::ZERO,
            equipment: Equipment::new(),
            goals: GoalSelector::default(),
            position: Vec3Fixed::ZERO,
            yaw: Fixed::ZERO,
            pitch: Fixed::ZERO,
            settlement: None,
        }
    }

    /// Set position and facing.
    pub fn set_position_and_rotation(&mut self, position: Vec3Fixed, yaw: Fixed, pitch: Fixed) {
        self.position = position;
        self.yaw = yaw;
        self.pitch = pitch;
    }

    /// Attach this raider to a settlement, or detach it with `None`.
    pub fn set_settlement(&mut self, settlement: Option<SettlementId>) {
        self.settlement = settlement;
    }
}
