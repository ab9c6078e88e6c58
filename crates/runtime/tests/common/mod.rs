//! Shared fixture for runtime tests.
#![allow(dead_code)]

use std::sync::Arc;

use encounter_content::{ContentCatalog, RoleSettings, WorldRoster};
use encounter_core::env::OwnedActor;
use encounter_core::{
    ActorId, ActorProfile, Affinity, CoreStats, Element, EngineEvent, FightId, Hunt, HuntId,
    Identity, ItemId, ItemStats, Monster, MonsterId, PartyId, PartyRoster, Receipt,
};
use encounter_runtime::{
    InMemoryJournal, InMemoryMinter, JournalRepository, ManualClock, OracleManager,
    RewardMinter, Runtime, RuntimeConfig,
};

pub const OPERATOR: Identity = Identity(1);
pub const ALICE: Identity = Identity(10);
pub const BOB: Identity = Identity(20);

pub const HERO: ActorId = ActorId(1);
pub const SIDEKICK: ActorId = ActorId(2);
pub const BLADE: ItemId = ItemId(100);
pub const BOSS: MonsterId = MonsterId(1);
pub const WOLF: MonsterId = MonsterId(2);
pub const HUNT: HuntId = HuntId(1);
pub const HEROES: PartyId = PartyId(1);

fn fighter(owner: Identity, id: ActorId, power: u64) -> OwnedActor {
    OwnedActor {
        owner,
        profile: ActorProfile::new(id, 10, CoreStats::new(power, 5, 5), Affinity::Finesse)
            .with_item(BLADE),
    }
}

pub fn roster() -> WorldRoster {
    WorldRoster {
        actors: vec![fighter(ALICE, HERO, 50), fighter(BOB, SIDEKICK, 40)],
        items: vec![ItemStats::weapon(BLADE, Affinity::Power, CoreStats::default())],
        parties: vec![PartyRoster {
            id: HEROES,
            members: vec![HERO, SIDEKICK],
            owner: ALICE,
            active: true,
            max_size: 4,
        }],
    }
}

fn monster(id: MonsterId, health: u64, boss: bool) -> Monster {
    Monster {
        id,
        name: format!("monster-{}", id.0),
        level: 10,
        health,
        damage: 10,
        defense: 0,
        base_reward: if boss { 1_000 } else { 0 },
        element: Element::Earth,
        boss,
        required_items: Vec::new(),
        active: true,
        defensive_pool: Vec::new(),
        loot: None,
    }
}

/// A 110 health boss and a three-kill wolf hunt.
pub fn catalog() -> ContentCatalog {
    ContentCatalog {
        monsters: vec![monster(BOSS, 110, true), monster(WOLF, 30, false)],
        hunts: vec![Hunt {
            id: HUNT,
            monster: WOLF,
            kills_required: 3,
            time_limit: 300,
            reward_per_kill: 5,
            completion_bonus: 50,
            active: true,
        }],
        ..ContentCatalog::new()
    }
}

pub fn config() -> RuntimeConfig {
    RuntimeConfig {
        roles: RoleSettings {
            admins: vec![OPERATOR],
            validators: vec![OPERATOR],
        },
        ..RuntimeConfig::default()
    }
}

/// Runtime plus handles on its collaborators.
pub struct Harness {
    pub runtime: Runtime,
    pub clock: ManualClock,
    pub minter: Arc<InMemoryMinter>,
    pub journal: InMemoryJournal,
}

impl Harness {
    pub async fn start() -> Self {
        let clock = ManualClock::starting_at(0);
        let minter = Arc::new(InMemoryMinter::new());
        let journal = InMemoryJournal::new();
        let runtime = start_runtime(clock.clone(), minter.clone(), journal.clone()).await;
        Self {
            runtime,
            clock,
            minter,
            journal,
        }
    }
}

/// Builds a runtime over the fixture roster and installs the catalog.
pub async fn start_runtime(
    clock: ManualClock,
    minter: Arc<dyn RewardMinter>,
    journal: impl JournalRepository + 'static,
) -> Runtime {
    let runtime = Runtime::builder()
        .config(config())
        .oracles(OracleManager::from(roster()))
        .clock(clock)
        .minter(minter)
        .journal(journal)
        .build()
        .await
        .expect("runtime builds");

    runtime
        .handle()
        .install_catalog(OPERATOR, &catalog())
        .await
        .expect("catalog installs");

    runtime
}

pub fn fight_of(receipt: &Receipt) -> FightId {
    match receipt.events.as_slice() {
        [EngineEvent::FightStarted { fight, .. }] => *fight,
        other => panic!("unexpected events {other:?}"),
    }
}
