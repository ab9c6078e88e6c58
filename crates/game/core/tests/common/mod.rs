//! Shared fixture for engine scenario tests.
#![allow(dead_code)]

use encounter_core::ability::Ability;
use encounter_core::encounter::{Hunt, Monster};
use encounter_core::quest::{Objective, QuestTemplate};
use encounter_core::{
    AbilityCategory, AbilityId, ActorId, ActorProfile, Affinity, Caller, Command, CommandContext,
    CoreStats, Element, Engine, EngineConfig, EngineState, ExecuteError, HuntId, Identity, ItemId,
    ItemStats, MonsterId, ObjectiveKind, OracleSnapshot, PartyId, PartyRoster, QuestId, QuestMode,
    Receipt, Roles, Timestamp,
};

pub const OPERATOR: Identity = Identity(1);
pub const ALICE: Identity = Identity(10);
pub const BOB: Identity = Identity(20);
pub const CAROL: Identity = Identity(30);

/// Owned by ALICE, deals 60 with the shared blade.
pub const HERO: ActorId = ActorId(1);
/// Owned by BOB, deals 50 with the shared blade.
pub const SIDEKICK: ActorId = ActorId(2);
/// Owned by CAROL.
pub const SCOUT: ActorId = ActorId(3);
pub const RANGER: ActorId = ActorId(4);

pub const BLADE: ItemId = ItemId(100);
pub const BOSS: MonsterId = MonsterId(1);
pub const WOLF: MonsterId = MonsterId(2);

pub const HEROES: PartyId = PartyId(1);
pub const SCOUTS: PartyId = PartyId(2);

pub fn owner(identity: Identity) -> Caller {
    Caller::player(identity)
}

pub fn operator() -> Caller {
    Caller::with_roles(OPERATOR, Roles::ADMIN | Roles::VALIDATOR)
}

fn fighter(id: ActorId, power: u64) -> ActorProfile {
    ActorProfile::new(id, 10, CoreStats::new(power, 5, 5), Affinity::Finesse).with_item(BLADE)
}

pub fn boss(health: u64) -> Monster {
    Monster {
        id: BOSS,
        name: "Crypt Warden".into(),
        level: 20,
        health,
        damage: 40,
        defense: 10,
        base_reward: 1_000,
        element: Element::Earth,
        boss: true,
        required_items: Vec::new(),
        active: true,
        defensive_pool: Vec::new(),
        loot: None,
    }
}

pub fn wolf() -> Monster {
    Monster {
        id: WOLF,
        name: "Grey Wolf".into(),
        level: 2,
        health: 30,
        damage: 4,
        defense: 0,
        base_reward: 0,
        element: Element::Air,
        boss: false,
        required_items: Vec::new(),
        active: true,
        defensive_pool: Vec::new(),
        loot: None,
    }
}

pub fn wolf_hunt(id: HuntId) -> Hunt {
    Hunt {
        id,
        monster: WOLF,
        kills_required: 3,
        time_limit: 300,
        reward_per_kill: 5,
        completion_bonus: 50,
        active: true,
    }
}

pub fn damage_ability(id: u32, element: Element, power: u64) -> Ability {
    Ability {
        id: AbilityId(id),
        name: format!("{element:?} strike"),
        category: AbilityCategory::Damage,
        element,
        power,
        duration: 0,
        cooldown: 0,
        area: false,
        charge_required: 0,
        prerequisites: Vec::new(),
        active: true,
    }
}

pub fn quest(id: QuestId, mode: QuestMode, base_reward: u64) -> QuestTemplate {
    QuestTemplate {
        id,
        name: "Clear the crypt".into(),
        min_level: 1,
        min_stats: CoreStats::default(),
        base_reward,
        cooldown: 3_600,
        mode,
        objectives: vec![Objective::new(ObjectiveKind::KillMonsters, 3)],
        active: true,
    }
}

/// Engine state plus the collaborator snapshot it executes against.
pub struct World {
    pub state: EngineState,
    pub oracles: OracleSnapshot,
}

impl World {
    pub fn new() -> Self {
        let oracles = OracleSnapshot::new()
            .with_item(ItemStats::weapon(BLADE, Affinity::Power, CoreStats::default()))
            .with_actor(ALICE, fighter(HERO, 50))
            .with_actor(BOB, fighter(SIDEKICK, 40))
            .with_actor(CAROL, fighter(SCOUT, 30))
            .with_actor(CAROL, fighter(RANGER, 30))
            .with_party(PartyRoster {
                id: HEROES,
                members: vec![HERO, SIDEKICK],
                owner: ALICE,
                active: true,
                max_size: 4,
            })
            .with_party(PartyRoster {
                id: SCOUTS,
                members: vec![SCOUT, RANGER],
                owner: CAROL,
                active: true,
                max_size: 4,
            });
        Self {
            state: EngineState::new(EngineConfig::default()),
            oracles,
        }
    }

    pub fn run(
        &mut self,
        caller: Caller,
        now: u64,
        command: impl Into<Command>,
    ) -> Result<Receipt, ExecuteError> {
        let ctx = CommandContext::new(caller, Timestamp(now));
        Engine::new(&mut self.state).execute(self.oracles.env(), &ctx, &command.into())
    }

    /// Runs an administrative command that must succeed.
    pub fn admin(&mut self, command: impl Into<Command>) -> Receipt {
        self.run(operator(), 0, command).expect("admin command")
    }
}
