mod common;

use common::*;
use encounter_core::action::{CreateAbility, CreateMonster, UpdateMonster};
use encounter_core::encounter::{DefensiveMove, LootEntry, LootTable};
use encounter_core::{
    AbilityCategory, AbilityId, ActorId, Attack, Caller, EncounterError, EngineEvent,
    ExecuteError, ExpireBossFight, FightId, FightPhase, ItemId, RewardGrant, RewardSource,
    StartBossFight, TargetRef, Timestamp, TransitionPhase, TransitionPhaseError,
};

fn world_with_boss(health: u64) -> World {
    let mut world = World::new();
    world.admin(CreateMonster { monster: boss(health) });
    world
}

fn open_fight(world: &mut World, now: u64, duration: u64) -> FightId {
    let receipt = world
        .run(
            owner(ALICE),
            now,
            StartBossFight {
                actor: HERO,
                monster: BOSS,
                duration,
            },
        )
        .expect("fight opens");
    match receipt.events.as_slice() {
        [EngineEvent::FightStarted { fight, .. }] => *fight,
        other => panic!("unexpected events {other:?}"),
    }
}

fn encounter_error(error: ExecuteError) -> (TransitionPhase, EncounterError) {
    match error {
        ExecuteError::Encounter(TransitionPhaseError { phase, error }) => (phase, error),
        other => panic!("expected encounter error, got {other:?}"),
    }
}

#[test]
fn two_attackers_split_the_pool_by_contribution() {
    let mut world = world_with_boss(110);
    let fight = open_fight(&mut world, 100, 600);

    let first = world
        .run(owner(ALICE), 110, Attack::new(fight, HERO))
        .expect("hero attacks");
    assert!(first.grants.is_empty());
    assert!(matches!(
        first.events.as_slice(),
        [EngineEvent::AttackLanded { damage: 60, cumulative: 60, .. }]
    ));

    let second = world
        .run(owner(BOB), 120, Attack::new(fight, SIDEKICK))
        .expect("sidekick lands the killing blow");
    assert!(second.events.contains(&EngineEvent::FightSealed {
        fight,
        phase: FightPhase::Defeated,
        pool: 1_020,
    }));
    assert_eq!(second.tokens_for(HERO), 556);
    assert_eq!(second.tokens_for(SIDEKICK), 463);

    let sealed = world.state.encounters.fight(fight).expect("fight");
    assert_eq!(sealed.phase(), FightPhase::Defeated);
    assert_eq!(sealed.cumulative_damage(), 110);
    assert_eq!(sealed.participants(), &[HERO, SIDEKICK]);
}

#[test]
fn defeated_fight_rejects_further_attacks() {
    let mut world = world_with_boss(60);
    let fight = open_fight(&mut world, 0, 600);
    world
        .run(owner(ALICE), 10, Attack::new(fight, HERO))
        .expect("one-shot");

    let error = world
        .run(owner(BOB), 20, Attack::new(fight, SIDEKICK))
        .expect_err("sealed");
    assert_eq!(
        encounter_error(error),
        (TransitionPhase::PreValidate, EncounterError::FightNotActive(fight))
    );
}

#[test]
fn expiry_seals_without_rewards() {
    let mut world = world_with_boss(10_000);
    let fight = open_fight(&mut world, 0, 60);
    world
        .run(owner(ALICE), 5, Attack::new(fight, HERO))
        .expect("hit");

    let early = world
        .run(owner(CAROL), 59, ExpireBossFight { fight })
        .expect_err("window still open");
    assert!(matches!(
        encounter_error(early).1,
        EncounterError::FightStillActive { .. }
    ));

    let receipt = world
        .run(owner(CAROL), 60, ExpireBossFight { fight })
        .expect("anyone may expire");
    assert!(receipt.grants.is_empty());
    assert_eq!(
        receipt.events,
        vec![EngineEvent::FightSealed {
            fight,
            phase: FightPhase::Expired,
            pool: 0,
        }]
    );

    let late = world
        .run(owner(BOB), 61, Attack::new(fight, SIDEKICK))
        .expect_err("expired");
    assert_eq!(encounter_error(late).1, EncounterError::FightNotActive(fight));

    let again = world
        .run(owner(CAROL), 70, ExpireBossFight { fight })
        .expect_err("already sealed");
    assert_eq!(encounter_error(again).1, EncounterError::FightNotActive(fight));
}

#[test]
fn attack_at_window_end_is_rejected() {
    let mut world = world_with_boss(10_000);
    let fight = open_fight(&mut world, 0, 60);
    let error = world
        .run(owner(ALICE), 60, Attack::new(fight, HERO))
        .expect_err("window is half-open");
    assert_eq!(encounter_error(error).1, EncounterError::FightNotActive(fight));
}

#[test]
fn combat_cooldown_blocks_rapid_attacks_and_rolls_back() {
    let mut world = world_with_boss(10_000);
    let fight = open_fight(&mut world, 0, 600);
    world
        .run(owner(ALICE), 10, Attack::new(fight, HERO))
        .expect("first hit");

    let before = world.state.clone();
    let error = world
        .run(owner(ALICE), 20, Attack::new(fight, HERO))
        .expect_err("cooldown");
    assert!(matches!(
        encounter_error(error).1,
        EncounterError::CombatOnCooldown(_)
    ));
    assert_eq!(world.state, before);

    world
        .run(owner(ALICE), 40, Attack::new(fight, HERO))
        .expect("cooldown elapsed");
    assert_eq!(
        world.state.encounters.fight(fight).expect("fight").damage_of(HERO),
        120
    );
}

#[test]
fn opening_requires_equipped_items_and_a_boss() {
    let mut world = World::new();
    let mut gated = boss(500);
    gated.required_items = vec![ItemId(777)];
    world.admin(CreateMonster { monster: gated });

    let error = world
        .run(
            owner(ALICE),
            0,
            StartBossFight {
                actor: HERO,
                monster: BOSS,
                duration: 60,
            },
        )
        .expect_err("key missing");
    assert_eq!(
        encounter_error(error).1,
        EncounterError::MissingRequiredItem {
            actor: HERO,
            item: ItemId(777),
        }
    );

    world.admin(CreateMonster { monster: wolf() });
    let error = world
        .run(
            owner(ALICE),
            0,
            StartBossFight {
                actor: HERO,
                monster: WOLF,
                duration: 60,
            },
        )
        .expect_err("not a boss");
    assert_eq!(encounter_error(error).1, EncounterError::NotABoss(WOLF));
}

#[test]
fn monster_in_an_active_fight_cannot_be_edited() {
    let mut world = world_with_boss(500);
    open_fight(&mut world, 0, 600);

    let error = world
        .run(operator(), 1, UpdateMonster { monster: boss(900) })
        .expect_err("in use");
    assert!(matches!(error, ExecuteError::Admin(_)));
    assert_eq!(world.state.encounters.monster(BOSS).expect("boss").health, 500);
}

#[test]
fn nonce_advances_only_on_commit() {
    let mut world = world_with_boss(500);
    let start = world.state.nonce();
    let fight = open_fight(&mut world, 0, 600);
    assert_eq!(world.state.nonce(), start + 1);

    world
        .run(owner(ALICE), 700, Attack::new(fight, HERO))
        .expect_err("window closed");
    assert_eq!(world.state.nonce(), start + 1);
}

fn curse(id: u32, duration: u64) -> encounter_core::Ability {
    encounter_core::Ability {
        category: AbilityCategory::Debuff,
        duration,
        ..damage_ability(id, encounter_core::Element::Dark, 30)
    }
}

#[test]
fn boss_retaliates_with_a_status_effect_on_the_attacker() {
    let mut world = World::new();
    world.admin(CreateAbility { ability: curse(7, 60) });
    let mut warden = boss(10_000);
    warden.defensive_pool = vec![DefensiveMove { ability: AbilityId(7), weight: 3 }];
    world.admin(CreateMonster { monster: warden });
    let fight = open_fight(&mut world, 100, 600);

    let receipt = world
        .run(owner(ALICE), 110, Attack::new(fight, HERO))
        .expect("hero attacks");
    assert!(matches!(
        receipt.events.as_slice(),
        [EngineEvent::AttackLanded { retaliation: Some(AbilityId(7)), damage: 60, .. }]
    ));

    let effects: Vec<_> = world
        .state
        .casting
        .effects_on(TargetRef::Actor(HERO))
        .expect("hero is affected")
        .active_at(Timestamp(110))
        .copied()
        .collect();
    assert_eq!(effects.len(), 1);
    assert_eq!(effects[0].ability, AbilityId(7));
    assert_eq!(effects[0].category, AbilityCategory::Debuff);
    assert_eq!(effects[0].power, 30);
    assert_eq!(effects[0].expires_at(), Timestamp(170));
    assert!(world.state.casting.effects_on(TargetRef::Actor(SIDEKICK)).is_none());
}

#[test]
fn retaliation_with_an_instant_ability_is_skipped() {
    let mut world = World::new();
    world.admin(CreateAbility {
        ability: damage_ability(8, encounter_core::Element::Dark, 30),
    });
    let mut warden = boss(10_000);
    warden.defensive_pool = vec![DefensiveMove { ability: AbilityId(8), weight: 1 }];
    world.admin(CreateMonster { monster: warden });
    let fight = open_fight(&mut world, 0, 600);

    let receipt = world
        .run(owner(ALICE), 10, Attack::new(fight, HERO))
        .expect("attack still lands");
    assert!(matches!(
        receipt.events.as_slice(),
        [EngineEvent::AttackLanded { retaliation: None, .. }]
    ));
    assert!(world.state.casting.effects_on(TargetRef::Actor(HERO)).is_none());
}

#[test]
fn defeat_rolls_loot_for_every_participant() {
    let mut world = World::new();
    let mut warden = boss(110);
    warden.loot = Some(LootTable {
        drop_chance_bps: 10_000,
        entries: vec![LootEntry { item: ItemId(900), weight: 1 }],
    });
    world.admin(CreateMonster { monster: warden });
    let fight = open_fight(&mut world, 0, 600);

    world
        .run(owner(ALICE), 10, Attack::new(fight, HERO))
        .expect("hero attacks");
    let receipt = world
        .run(owner(BOB), 20, Attack::new(fight, SIDEKICK))
        .expect("killing blow");

    let items: Vec<_> = receipt
        .grants
        .iter()
        .filter(|grant| matches!(grant, RewardGrant::Item { .. }))
        .copied()
        .collect();
    let source = RewardSource::BossFight(fight);
    assert_eq!(
        items,
        vec![
            RewardGrant::Item { recipient: HERO, item: ItemId(900), source },
            RewardGrant::Item { recipient: SIDEKICK, item: ItemId(900), source },
        ]
    );
    assert_eq!(receipt.tokens_for(HERO), 556);
    assert_eq!(receipt.tokens_for(SIDEKICK), 463);
}

#[test]
fn shares_never_exceed_the_pool_and_the_ledger_stays_consistent() {
    // Damage per hit: hero 60, sidekick 50, scout 40, ranger 40.
    let roster: [(Caller, ActorId); 4] = [
        (owner(ALICE), HERO),
        (owner(BOB), SIDEKICK),
        (owner(CAROL), SCOUT),
        (owner(CAROL), RANGER),
    ];

    for health in [1, 97, 150, 199, 451, 1_234] {
        let mut world = world_with_boss(health);
        let fight = open_fight(&mut world, 0, 100_000);

        let mut settled = None;
        for round in 0u64..200 {
            let (caller, actor) = roster[(round % 4) as usize];
            let receipt = world
                .run(caller, 10 + round * 10, Attack::new(fight, actor))
                .expect("attack lands");

            let state = world.state.encounters.fight(fight).expect("fight");
            let ledger: u64 = state
                .participants()
                .iter()
                .map(|participant| state.damage_of(*participant))
                .sum();
            assert_eq!(ledger, state.cumulative_damage(), "health {health}");

            if state.phase() == FightPhase::Defeated {
                settled = Some(receipt);
                break;
            }
        }

        let receipt = settled.unwrap_or_else(|| panic!("health {health} never defeated"));
        let pool = receipt
            .events
            .iter()
            .find_map(|event| match event {
                EngineEvent::FightSealed { pool, .. } => Some(*pool),
                _ => None,
            })
            .expect("sealed");
        let paid: u64 = receipt.grants.iter().map(RewardGrant::amount).sum();
        let participants = world
            .state
            .encounters
            .fight(fight)
            .expect("fight")
            .participant_count() as u64;

        assert!(paid <= pool, "health {health}: paid {paid} of {pool}");
        assert!(pool - paid < participants.max(1), "health {health}: remainder too large");
    }
}
