//! Integration tests for raid spawning and fortifications.

use proptest::prelude::*;
use raid_core::prelude::*;
use raid_test_utils::determinism::strategies::{
    arb_block_pos, arb_difficulty, arb_raid_level, arb_role, arb_tower_positions,
};
use raid_test_utils::determinism::{compute_hash, verify_save_round_trip, verify_spawn_determinism};
use raid_test_utils::fixtures::{
    barracks_with_towers, fixed, seeded_rng, test_settlement, test_world,
};

// ============================================================================
// Spawning
// ============================================================================

#[test]
fn test_spawn_five_chiefs_for_settlement() {
    let ai = MobAiRegistry::with_defaults();
    let config = RaidConfig::with_difficulty(10);
    let spawner = RaidSpawner::new(&ai, &config);
    let settlement = test_settlement(100);
    let mut world = test_world(50);
    let mut rng = seeded_rng(7);

    let report = spawner
        .spawn_batch(
            Some(MobKindId::new(2)),
            5,
            Some(BlockPos::new(10, 0, -3)),
            Some(&mut world),
            Some(&settlement),
            &mut rng,
        )
        .unwrap();

    assert_eq!(report.spawned_count(), 5);
    assert_eq!(report.skipped, 0);
    assert_eq!(world.raiders_of(settlement.id), report.spawned);

    for &id in &report.spawned {
        let mob = world.raider(id).unwrap();
        assert_eq!(mob.role, MobRole::ChiefMelee);
        assert_eq!(mob.equipment.get(EquipmentSlot::MainHand), Some(ItemId::ChiefSword));
        assert_eq!(mob.equipment.get(EquipmentSlot::Feet), Some(ItemId::ChainmailBoots));
        assert_eq!(mob.settlement, Some(settlement.id));
        assert_eq!(mob.attributes.max_health, fixed(40));
        assert_eq!(mob.health, fixed(40));
        assert_eq!(mob.attributes.armor, fixed(40));
        assert!(mob.goals.contains(AiGoal::BreakDoors));
        assert_eq!(mob.position, Vec3Fixed::standing_at(10, 65, -3));
    }
}

#[test]
fn test_spawn_zero_is_noop() {
    let ai = MobAiRegistry::with_defaults();
    let config = RaidConfig::default();
    let spawner = RaidSpawner::new(&ai, &config);
    let mut world = test_world(50);
    let before = world.state_hash();
    let mut rng = seeded_rng(7);

    let report = spawner
        .spawn_batch(
            Some(MobKindId::new(0)),
            0,
            Some(BlockPos::ORIGIN),
            Some(&mut world),
            None,
            &mut rng,
        )
        .unwrap();

    assert_eq!(report, SpawnReport::default());
    assert_eq!(world.state_hash(), before);
}

#[test]
fn test_spawned_yaws_differ_per_unit() {
    let ai = MobAiRegistry::with_defaults();
    let config = RaidConfig::default();
    let spawner = RaidSpawner::new(&ai, &config);
    let mut world = test_world(50);
    let mut rng = seeded_rng(99);

    let report = spawner
        .spawn_batch(
            Some(MobKindId::new(0)),
            8,
            Some(BlockPos::ORIGIN),
            Some(&mut world),
            None,
            &mut rng,
        )
        .unwrap();

    let mut yaws: Vec<Fixed> = report
        .spawned
        .iter()
        .map(|&id| world.raider(id).unwrap().yaw)
        .collect();
    yaws.sort();
    yaws.dedup();
    assert!(yaws.len() > 1);
}

#[test]
fn test_spawn_is_deterministic() {
    for kind in 0..6 {
        assert!(verify_spawn_determinism(1234, MobKindId::new(kind), 12));
    }
}

#[test]
fn test_remove_raiders_in_dimension() {
    let ai = MobAiRegistry::with_defaults();
    let config = RaidConfig::default();
    let spawner = RaidSpawner::new(&ai, &config);
    let mut registry = WorldRegistry::new();
    registry.insert(test_world(50));
    let mut rng = seeded_rng(3);

    spawner
        .spawn_batch(
            Some(MobKindId::new(3)),
            4,
            Some(BlockPos::ORIGIN),
            registry.get_mut(DimensionId::OVERWORLD),
            None,
            &mut rng,
        )
        .unwrap();

    assert_eq!(registry.remove_raiders_in(DimensionId::OVERWORLD), 4);
    assert!(registry
        .get(DimensionId::OVERWORLD)
        .unwrap()
        .entities()
        .is_empty());
}

// ============================================================================
// Fortifications
// ============================================================================

#[test]
fn test_claim_radius_examples() {
    let barracks = BlockPos::new(0, 64, 0);
    let (manager, _) = barracks_with_towers(
        barracks,
        &[(BlockPos::new(1, 64, 2), 2), (BlockPos::new(5, 64, 9), 2)],
    );
    assert_eq!(manager.claim_radius(barracks, 3), Some(1));

    let (lonely, _) = barracks_with_towers(barracks, &[]);
    assert_eq!(lonely.claim_radius(barracks, 10), Some(2));
}

#[test]
fn test_duplicate_tower_registration() {
    let barracks = BlockPos::new(0, 64, 0);
    let tower = BlockPos::new(1, 64, 2);
    let (mut manager, mut blocks) = barracks_with_towers(barracks, &[(tower, 0)]);

    let result = manager.register_block_position(
        barracks,
        BlockState::new(Block::BarracksTowerHut, Facing::North),
        tower,
        &mut blocks,
    );

    assert_eq!(result, TowerRegistration::AlreadyTracked);
    assert_eq!(manager.barracks(barracks).unwrap().towers().len(), 1);
}

#[test]
fn test_record_round_trip_preserves_tower_set() {
    let barracks = BlockPos::new(0, 64, 0);
    let towers = [BlockPos::new(1, 64, 2), BlockPos::new(5, 64, 9)];
    let (manager, _) = barracks_with_towers(barracks, &[(towers[0], 0), (towers[1], 0)]);

    let record = manager.barracks(barracks).unwrap().to_record();
    let restored = Barracks::from_record(&record);

    assert_eq!(restored.towers(), &towers);
    assert!(verify_save_round_trip(&manager));
}

#[test]
fn test_destroy_twice() {
    let barracks = BlockPos::new(0, 64, 0);
    let (mut manager, mut blocks) = barracks_with_towers(
        barracks,
        &[(BlockPos::new(1, 64, 2), 1), (BlockPos::new(5, 64, 9), 1)],
    );

    let first = manager.destroy(barracks, &mut blocks);
    let hash_after_first = compute_hash(&blocks.sorted_blocks());
    let second = manager.destroy(barracks, &mut blocks);

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(blocks.block_count(), 0);
    assert_eq!(compute_hash(&blocks.sorted_blocks()), hash_after_first);
}

#[test]
fn test_rebuild_after_destroy_is_fresh() {
    let barracks = BlockPos::new(0, 64, 0);
    let (mut manager, mut blocks) = barracks_with_towers(barracks, &[(BlockPos::new(1, 64, 2), 1)]);
    manager.destroy(barracks, &mut blocks);

    manager
        .place_barracks(barracks, "birch", Facing::South, &mut blocks)
        .unwrap();
    let rebuilt = manager.barracks(barracks).unwrap();

    assert_eq!(rebuilt.state(), BarracksState::Active);
    assert!(rebuilt.towers().is_empty());
    assert_eq!(rebuilt.base.style, "birch");
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_health_never_below_base(
        role in arb_role(),
        level in arb_raid_level(),
        tier in arb_difficulty(),
    ) {
        let balance = RaidBalance::default();
        let attrs = compute_attributes(role, Some(level), tier, &balance);
        prop_assert!(attrs.max_health >= balance.base_health);
        prop_assert!(attrs.armor >= Fixed::ZERO);
    }

    #[test]
    fn prop_attack_damage_doubles_on_hard(role in arb_role(), tier in arb_difficulty()) {
        let balance = RaidBalance::default();
        let attrs = compute_attributes(role, None, tier, &balance);
        if tier >= 10 {
            prop_assert_eq!(attrs.attack_damage, balance.attack_damage * fixed(2));
        } else {
            prop_assert_eq!(attrs.attack_damage, balance.attack_damage);
        }
        prop_assert_eq!(attrs.max_health, balance.base_health);
    }

    #[test]
    fn prop_chief_armor_doubles_above_elevated(tier in arb_difficulty()) {
        let balance = RaidBalance::default();
        let armor = compute_attributes(MobRole::ChiefMelee, None, tier, &balance).armor;
        let expected = if tier > 5 { balance.chief_armor * fixed(2) } else { balance.chief_armor };
        prop_assert_eq!(armor, expected);
    }

    #[test]
    fn prop_claim_radius_at_least_one(level in 0u32..50, towers in arb_tower_positions(8)) {
        let barracks = BlockPos::new(1000, 64, 1000);
        let entries: Vec<_> = towers.iter().map(|&pos| (pos, 1)).collect();
        let (manager, _) = barracks_with_towers(barracks, &entries);
        let radius = manager.claim_radius(barracks, level).unwrap();
        prop_assert!(radius >= 1);
    }

    #[test]
    fn prop_tower_set_has_no_duplicates(towers in arb_tower_positions(12)) {
        let barracks = BlockPos::new(1000, 64, 1000);
        let entries: Vec<_> = towers.iter().map(|&pos| (pos, 0)).collect();
        let (manager, _) = barracks_with_towers(barracks, &entries);
        let mut tracked = manager.barracks(barracks).unwrap().towers().to_vec();
        let len = tracked.len();
        tracked.sort();
        tracked.dedup();
        prop_assert_eq!(tracked.len(), len);
        prop_assert!(verify_save_round_trip(&manager));
    }

    #[test]
    fn prop_destroy_clears_all_blocks(towers in arb_tower_positions(8), pos in arb_block_pos()) {
        let barracks = BlockPos::new(pos.x, 200, pos.z);
        let entries: Vec<_> = towers.iter().map(|&pos| (pos, 0)).collect();
        let (mut manager, mut blocks) = barracks_with_towers(barracks, &entries);

        prop_assert!(manager.destroy(barracks, &mut blocks).is_some());
        prop_assert_eq!(blocks.block_count(), 0);
        prop_assert!(manager.is_empty());
    }
}
