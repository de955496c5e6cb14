//! Difficulty scaling for raider attributes.
//!
//! Maps the configured difficulty tier and a settlement's raid level to
//! concrete combat attributes. The tier scales the two armor formulas
//! differently: chiefs double a flat value above [`ELEVATED_DIFFICULTY`],
//! everyone else gains armor linearly per tier point.
//!
//! Nothing here validates the tier. Out-of-range tiers still give
//! non-negative attributes: health is floored at the base value and armor
//! is floored at zero.

use serde::{Deserialize, Serialize};

use crate::config::{RaidBalance, RaidConfig, ELEVATED_DIFFICULTY, HARD_DIFFICULTY};
use crate::math::{fixed_serde, Fixed};
use crate::mob::RaidMob;
use crate::mob_kind::MobRole;
use crate::settlement::Settlement;

/// Full attribute set of a raider.
///
/// Always recomputed as a whole, never patched field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MobAttributes {
    /// Range at which targets are tracked.
    #[serde(with = "fixed_serde")]
    pub follow_range: Fixed,
    /// Movement speed.
    #[serde(with = "fixed_serde")]
    pub movement_speed: Fixed,
    /// Damage per hit.
    #[serde(with = "fixed_serde")]
    pub attack_damage: Fixed,
    /// Armor points.
    #[serde(with = "fixed_serde")]
    pub armor: Fixed,
    /// Maximum health.
    #[serde(with = "fixed_serde")]
    pub max_health: Fixed,
}

/// Compute the attributes for a raider.
///
/// `raid_level` is `None` when the raider has no owning settlement, in
/// which case health stays at the base value.
///
/// # Example
///
/// ```
/// use raid_core::config::RaidBalance;
/// use raid_core::difficulty::compute_attributes;
/// use raid_core::math::Fixed;
/// use raid_core::mob_kind::MobRole;
///
/// let balance = RaidBalance::default();
/// let attrs = compute_attributes(MobRole::ChiefMelee, None, 10, &balance);
/// assert_eq!(attrs.attack_damage, balance.attack_damage * Fixed::from_num(2));
/// assert_eq!(attrs.max_health, balance.base_health);
/// ```
#[must_use]
pub fn compute_attributes(
    role: MobRole,
    raid_level: Option<Fixed>,
    difficulty: i32,
    balance: &RaidBalance,
) -> MobAttributes {
    MobAttributes {
        follow_range: balance.follow_range,
        movement_speed: balance.movement_speed,
        attack_damage: attack_damage(difficulty, balance),
        armor: armor(role, difficulty, balance),
        max_health: max_health(raid_level, difficulty, balance),
    }
}

/// Attack damage, doubled on hard difficulty.
#[must_use]
pub fn attack_damage(difficulty: i32, balance: &RaidBalance) -> Fixed {
    if difficulty >= HARD_DIFFICULTY {
        balance.attack_damage * Fixed::from_num(2)
    } else {
        balance.attack_damage
    }
}

/// Armor for a role.
#[must_use]
pub fn armor(role: MobRole, difficulty: i32, balance: &RaidBalance) -> Fixed {
    match role {
        MobRole::ChiefMelee if difficulty > ELEVATED_DIFFICULTY => {
            balance.chief_armor * Fixed::from_num(2)
        }
        MobRole::ChiefMelee => balance.chief_armor,
        MobRole::Melee | MobRole::Archer | MobRole::PirateRegular | MobRole::PirateCaptain => {
            balance
                .armor_per_point
                .saturating_mul(Fixed::from_num(difficulty))
                .max(Fixed::ZERO)
        }
    }
}

/// Maximum health from the owning settlement's raid level.
///
/// The raid level is scaled and truncated to whole points before it is
/// added to the base, then the sum is scaled by a tenth of the tier.
#[must_use]
pub fn max_health(raid_level: Option<Fixed>, difficulty: i32, balance: &RaidBalance) -> Fixed {
    let Some(raid_level) = raid_level else {
        return balance.base_health;
    };

    let effective_level = (raid_level
        .max(Fixed::ZERO)
        .saturating_mul(Fixed::from_num(balance.health_multiplier_percent))
        / Fixed::from_num(100))
    .floor();
    let scaled = balance
        .base_health
        .saturating_add(effective_level)
        .saturating_mul(Fixed::from_num(difficulty))
        / Fixed::from_num(10);

    scaled.max(balance.base_health)
}

/// Recompute a raider's attributes and heal it to the new maximum.
///
/// The difficulty tier is read from `config` on every call.
pub fn apply_attributes(mob: &mut RaidMob, settlement: Option<&Settlement>, config: &RaidConfig) {
    let raid_level = settlement.map(Settlement::raid_level);
    mob.attributes = compute_attributes(
        mob.role,
        raid_level,
        config.horde_difficulty,
        &config.balance,
    );
    mob.health = mob.attributes.max_health;
}
