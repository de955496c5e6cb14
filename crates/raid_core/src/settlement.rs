//! Settlements raided by mobs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed};

/// Unique identifier for a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SettlementId(pub u32);

impl SettlementId {
    /// Create a new settlement ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A settlement under threat.
///
/// The raid level is computed elsewhere from the whole colony and handed
/// to this crate as a single number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Settlement identifier.
    pub id: SettlementId,
    /// Display name.
    pub name: String,
    /// Current threat magnitude. Never negative.
    #[serde(with = "fixed_serde")]
    raid_level: Fixed,
}

impl Settlement {
    /// Create a settlement with the given raid level.
    ///
    /// Negative raid levels are clamped to zero.
    #[must_use]
    pub fn new(id: SettlementId, name: impl Into<String>, raid_level: Fixed) -> Self {
        Self {
            id,
            name: name.into(),
            raid_level: raid_level.max(Fixed::ZERO),
        }
    }

    /// Current raid level.
    #[must_use]
    pub fn raid_level(&self) -> Fixed {
        self.raid_level
    }

    /// Update the raid level. Negative values are clamped to zero.
    pub fn set_raid_level(&mut self, raid_level: Fixed) {
        self.raid_level = raid_level.max(Fixed::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_raid_level_clamped() {
        let mut settlement = Settlement::new(SettlementId::new(1), "Haven", Fixed::from_num(-3));
        assert_eq!(settlement.raid_level(), Fixed::ZERO);

        settlement.set_raid_level(Fixed::from_num(12));
        assert_eq!(settlement.raid_level(), Fixed::from_num(12));

        settlement.set_raid_level(Fixed::from_num(-1));
        assert_eq!(settlement.raid_level(), Fixed::ZERO);
    }

    #[test]
    fn test_settlement_id_display() {
        assert_eq!(SettlementId::new(4).to_string(), "#4");
    }
}
