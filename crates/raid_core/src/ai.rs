//! AI task installation for raiders.
//!
//! The behaviors themselves live outside this crate. Here we only know
//! which goals each role gets and at which priority, and how to put that
//! set onto a freshly created raider.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::mob::RaidMob;
use crate::mob_kind::MobRole;

/// Priority of a goal; lower runs first.
pub type GoalPriority = u8;

/// Behavior goals understood by the external AI runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiGoal {
    /// Stay afloat in water.
    Swim,
    /// Close in and strike with the main-hand weapon.
    MeleeAttack,
    /// Keep distance and shoot.
    RangedAttack,
    /// March toward the raided settlement.
    WalkToSettlement,
    /// Break doors on the way.
    BreakDoors,
    /// Idle look-around.
    LookAround,
    /// Pick the nearest citizen as a target.
    TargetNearestCitizen,
    /// Retaliate against whoever hurt this raider.
    TargetAttacker,
    /// Target players near the raid.
    TargetPlayers,
}

/// Prioritized goals installed on a raider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GoalSelector {
    /// Movement and action goals.
    pub goals: Vec<(GoalPriority, AiGoal)>,
    /// Targeting goals.
    pub targets: Vec<(GoalPriority, AiGoal)>,
}

impl GoalSelector {
    /// Check if nothing has been installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty() && self.targets.is_empty()
    }

    /// Check if a goal is installed in either list.
    #[must_use]
    pub fn contains(&self, goal: AiGoal) -> bool {
        self.goals
            .iter()
            .chain(self.targets.iter())
            .any(|&(_, g)| g == goal)
    }
}

/// Registry of goal sets per role.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct MobAiRegistry {
    sets: HashMap<MobRole, GoalSelector>,
}

impl MobAiRegistry {
    /// Create an empty registry. Raiders of unregistered roles get no goals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the stock raider behaviors for every role.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for role in MobRole::ALL {
            let attack = if role.is_ranged() {
                AiGoal::RangedAttack
            } else {
                AiGoal::MeleeAttack
            };
            let mut goals = vec![(0, AiGoal::Swim), (1, attack)];
            if role == MobRole::ChiefMelee {
                goals.push((2, AiGoal::BreakDoors));
            }
            goals.push((3, AiGoal::WalkToSettlement));
            goals.push((6, AiGoal::LookAround));

            registry.register(
                role,
                GoalSelector {
                    goals,
                    targets: vec![
                        (1, AiGoal::TargetAttacker),
                        (2, AiGoal::TargetPlayers),
                        (3, AiGoal::TargetNearestCitizen),
                    ],
                },
            );
        }
        registry
    }

    /// Set the goal set for a role, replacing any previous one.
    pub fn register(&mut self, role: MobRole, selector: GoalSelector) {
        self.sets.insert(role, selector);
    }

    /// Goal set for a role.
    #[must_use]
    pub fn get(&self, role: MobRole) -> Option<&GoalSelector> {
        self.sets.get(&role)
    }

    /// Install the role's goal set on a raider, replacing its current goals.
    pub fn install(&self, mob: &mut RaidMob) {
        mob.goals = self.get(mob.role).cloned().unwrap_or_default();
    }
}
