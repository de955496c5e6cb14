//! Role-based equipment loadouts.
//!
//! Every raid role maps to a fixed bundle of items, except pirate captains
//! whose armor set is one of two cosmetic variants picked by a coin flip.
//! The flip uses the caller's RNG so a seeded raid always dresses its
//! captains the same way.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::mob::RaidMob;
use crate::mob_kind::MobRole;

/// Equipment slot on a raider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipmentSlot {
    /// Weapon hand.
    MainHand,
    /// Helmet.
    Head,
    /// Chestplate.
    Chest,
    /// Leggings.
    Legs,
    /// Boots.
    Feet,
}

/// Item identifiers used by raid loadouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemId {
    /// Basic barbarian axe.
    StoneAxe,
    /// Archer bow.
    Bow,
    /// Unique weapon of a barbarian chief.
    ChiefSword,
    /// Pirate sword.
    Scimitar,
    /// Chainmail helmet.
    ChainmailHelmet,
    /// Chainmail chestplate.
    ChainmailChestplate,
    /// Chainmail leggings.
    ChainmailLeggings,
    /// Chainmail boots.
    ChainmailBoots,
    /// Pirate captain hat, first variant.
    PirateHelmet1,
    /// Pirate captain coat, first variant.
    PirateChest1,
    /// Pirate captain trousers, first variant.
    PirateLegs1,
    /// Pirate captain boots, first variant.
    PirateBoots1,
    /// Pirate captain hat, second variant.
    PirateHelmet2,
    /// Pirate captain coat, second variant.
    PirateChest2,
    /// Pirate captain trousers, second variant.
    PirateLegs2,
    /// Pirate captain boots, second variant.
    PirateBoots2,
}

/// Ordered slot-to-item assignment applied by [`equip`].
pub type EquipmentBundle = &'static [(EquipmentSlot, ItemId)];

/// Items currently worn by a raider.
///
/// Slots that no bundle touched stay empty; applying a bundle overwrites
/// only the slots it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Equipment {
    slots: BTreeMap<EquipmentSlot, ItemId>,
}

impl Equipment {
    /// Create an empty equipment set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Item in a slot, if any.
    #[must_use]
    pub fn get(&self, slot: EquipmentSlot) -> Option<ItemId> {
        self.slots.get(&slot).copied()
    }

    /// Put an item in a slot, replacing whatever was there.
    pub fn set(&mut self, slot: EquipmentSlot, item: ItemId) {
        self.slots.insert(slot, item);
    }

    /// Apply every assignment in a bundle.
    pub fn apply(&mut self, bundle: EquipmentBundle) {
        for &(slot, item) in bundle {
            self.set(slot, item);
        }
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EquipmentSlot, ItemId)> + '_ {
        self.slots.iter().map(|(&slot, &item)| (slot, item))
    }
}

const MELEE: EquipmentBundle = &[(EquipmentSlot::MainHand, ItemId::StoneAxe)];

const ARCHER: EquipmentBundle = &[(EquipmentSlot::MainHand, ItemId::Bow)];

const CHIEF: EquipmentBundle = &[
    (EquipmentSlot::MainHand, ItemId::ChiefSword),
    (EquipmentSlot::Head, ItemId::ChainmailHelmet),
    (EquipmentSlot::Chest, ItemId::ChainmailChestplate),
    (EquipmentSlot::Legs, ItemId::ChainmailLeggings),
    (EquipmentSlot::Feet, ItemId::ChainmailBoots),
];

const PIRATE: EquipmentBundle = &[(EquipmentSlot::MainHand, ItemId::Scimitar)];

const CAPTAIN_FIRST: EquipmentBundle = &[
    (EquipmentSlot::MainHand, ItemId::Scimitar),
    (EquipmentSlot::Head, ItemId::PirateHelmet1),
    (EquipmentSlot::Chest, ItemId::PirateChest1),
    (EquipmentSlot::Legs, ItemId::PirateLegs1),
    (EquipmentSlot::Feet, ItemId::PirateBoots1),
];

const CAPTAIN_SECOND: EquipmentBundle = &[
    (EquipmentSlot::MainHand, ItemId::Scimitar),
    (EquipmentSlot::Head, ItemId::PirateHelmet2),
    (EquipmentSlot::Chest, ItemId::PirateChest2),
    (EquipmentSlot::Legs, ItemId::PirateLegs2),
    (EquipmentSlot::Feet, ItemId::PirateBoots2),
];

/// Pick the bundle for a role.
///
/// Only [`MobRole::PirateCaptain`] consumes randomness: exactly one fair
/// coin flip per call.
pub fn bundle_for<R: Rng + ?Sized>(role: MobRole, rng: &mut R) -> EquipmentBundle {
    match role {
        MobRole::Melee => MELEE,
        MobRole::Archer => ARCHER,
        MobRole::ChiefMelee => CHIEF,
        MobRole::PirateRegular => PIRATE,
        MobRole::PirateCaptain => {
            if rng.gen_bool(0.5) {
                CAPTAIN_FIRST
            } else {
                CAPTAIN_SECOND
            }
        }
    }
}

/// Dress a raider according to its role.
pub fn equip<R: Rng + ?Sized>(mob: &mut RaidMob, rng: &mut R) {
    let bundle = bundle_for(mob.role, rng);
    mob.equipment.apply(bundle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mob_kind::MobKindId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn mob(role: MobRole) -> RaidMob {
        RaidMob::new(MobKindId::new(0), role)
    }

    #[test]
    fn test_melee_gets_axe_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut raider = mob(MobRole::Melee);
        equip(&mut raider, &mut rng);

        assert_eq!(raider.equipment.get(EquipmentSlot::MainHand), Some(ItemId::StoneAxe));
        assert_eq!(raider.equipment.len(), 1);
    }

    #[test]
    fn test_archer_gets_bow() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut raider = mob(MobRole::Archer);
        equip(&mut raider, &mut rng);

        assert_eq!(raider.equipment.get(EquipmentSlot::MainHand), Some(ItemId::Bow));
    }

    #[test]
    fn test_chief_full_set() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut raider = mob(MobRole::ChiefMelee);
        equip(&mut raider, &mut rng);

        let worn: Vec<_> = raider.equipment.iter().collect();
        assert_eq!(worn, CHIEF.to_vec());
    }

    #[test]
    fn test_pirate_keeps_other_slots() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut raider = mob(MobRole::PirateRegular);
        raider.equipment.set(EquipmentSlot::Head, ItemId::ChainmailHelmet);

        equip(&mut raider, &mut rng);

        assert_eq!(raider.equipment.get(EquipmentSlot::MainHand), Some(ItemId::Scimitar));
        assert_eq!(raider.equipment.get(EquipmentSlot::Head), Some(ItemId::ChainmailHelmet));
    }

    #[test]
    fn test_equip_twice_overwrites() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut raider = mob(MobRole::ChiefMelee);
        equip(&mut raider, &mut rng);
        let first = raider.equipment.clone();
        equip(&mut raider, &mut rng);

        assert_eq!(raider.equipment, first);
        assert_eq!(raider.equipment.len(), 5);
    }

    #[test]
    fn test_captain_variants_roughly_even() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut first = 0;
        let mut second = 0;

        for _ in 0..1000 {
            let mut captain = mob(MobRole::PirateCaptain);
            equip(&mut captain, &mut rng);
            assert_eq!(captain.equipment.get(EquipmentSlot::MainHand), Some(ItemId::Scimitar));
            match captain.equipment.get(EquipmentSlot::Head) {
                Some(ItemId::PirateHelmet1) => first += 1,
                Some(ItemId::PirateHelmet2) => second += 1,
                other => panic!("unexpected captain helmet {other:?}"),
            }
        }

        assert_eq!(first + second, 1000);
        assert!((400..=600).contains(&first), "first variant count {first}");
    }

    #[test]
    fn test_captain_variant_is_seed_deterministic() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(
                bundle_for(MobRole::PirateCaptain, &mut a),
                bundle_for(MobRole::PirateCaptain, &mut b)
            );
        }
    }

    #[test]
    fn test_fixed_roles_do_not_consume_randomness() {
        let mut a = ChaCha8Rng::seed_from_u64(3);
        let mut b = ChaCha8Rng::seed_from_u64(3);
        let _ = bundle_for(MobRole::Melee, &mut a);
        let _ = bundle_for(MobRole::ChiefMelee, &mut a);
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }
}
