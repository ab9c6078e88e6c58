mod common;

use common::*;
use encounter_core::action::CreateQuest;
use encounter_core::quest::Objective;
use encounter_core::{
    CompleteQuest, EngineEvent, ExecuteError, ObjectiveKind, QuestError, QuestGroup, QuestId,
    QuestMode, Receipt, StartQuest, TransitionPhaseError, UpdateQuestProgress,
};

const SOLO: QuestId = QuestId(1);
const DUO: QuestId = QuestId(2);
const RAID: QuestId = QuestId(3);

fn quest_error(error: ExecuteError) -> QuestError {
    match error {
        ExecuteError::Quest(TransitionPhaseError { error, .. }) => error,
        other => panic!("expected quest error, got {other:?}"),
    }
}

fn report(world: &mut World, now: u64, quest: QuestId, group: QuestGroup, delta: u64) -> Result<Receipt, ExecuteError> {
    world.run(
        operator(),
        now,
        UpdateQuestProgress {
            quest,
            group,
            kind: ObjectiveKind::KillMonsters,
            delta,
        },
    )
}

fn world() -> World {
    let mut world = World::new();
    world.admin(CreateQuest { quest: quest(SOLO, QuestMode::Solo, 100) });
    world.admin(CreateQuest {
        quest: quest(DUO, QuestMode::Party { max_size: 2, bonus_pct: 50 }, 100),
    });
    world.admin(CreateQuest {
        quest: quest(
            RAID,
            QuestMode::Raid {
                max_size: 2,
                bonus_pct: 0,
                max_parties: 1,
                raid_bonus_pct: 10,
            },
            100,
        ),
    });
    world
}

#[test]
fn solo_quest_completes_once_when_objectives_are_met() {
    let mut world = world();
    let group = QuestGroup::Solo(HERO);
    world
        .run(owner(ALICE), 0, StartQuest { actor: HERO, quest: SOLO, party: None })
        .expect("start");

    let partial = report(&mut world, 10, SOLO, group, 2).expect("progress");
    assert!(partial.grants.is_empty());

    let error = world
        .run(owner(ALICE), 11, CompleteQuest { actor: HERO, quest: SOLO, group })
        .expect_err("one kill short");
    assert_eq!(
        quest_error(error),
        QuestError::ObjectivesIncomplete { quest: SOLO, group }
    );

    let done = report(&mut world, 20, SOLO, group, 1).expect("final kill");
    assert!(done.events.contains(&EngineEvent::QuestCompleted {
        quest: SOLO,
        group,
        reward_per_participant: 100,
    }));
    assert_eq!(done.tokens_for(HERO), 100);

    let late = report(&mut world, 30, SOLO, group, 5).expect("ignored");
    assert!(late.events.is_empty());
    assert!(late.grants.is_empty());

    let error = world
        .run(owner(ALICE), 31, CompleteQuest { actor: HERO, quest: SOLO, group })
        .expect_err("already paid");
    assert_eq!(
        quest_error(error),
        QuestError::QuestAlreadyCompleted { quest: SOLO, group }
    );

    let error = world
        .run(owner(ALICE), 40, StartQuest { actor: HERO, quest: SOLO, party: None })
        .expect_err("cooldown");
    assert!(matches!(quest_error(error), QuestError::CharacterOnCooldown(_)));
}

#[test]
fn full_party_earns_the_party_bonus() {
    let mut world = world();
    let group = QuestGroup::Party(HEROES);
    let started = world
        .run(owner(ALICE), 0, StartQuest { actor: HERO, quest: DUO, party: Some(HEROES) })
        .expect("start");
    assert!(started.events.contains(&EngineEvent::QuestStarted {
        quest: DUO,
        group,
        participants: vec![HERO, SIDEKICK],
        mask: 0b110,
    }));

    let done = report(&mut world, 5, DUO, group, 3).expect("complete");
    assert_eq!(done.tokens_for(HERO), 150);
    assert_eq!(done.tokens_for(SIDEKICK), 150);
}

#[test]
fn member_cannot_join_twice_through_another_group() {
    let mut world = world();
    world
        .run(owner(ALICE), 0, StartQuest { actor: HERO, quest: DUO, party: None })
        .expect("solo entry into party quest");

    let error = world
        .run(owner(BOB), 1, StartQuest { actor: SIDEKICK, quest: DUO, party: Some(HEROES) })
        .expect_err("hero already in");
    assert_eq!(
        quest_error(error),
        QuestError::AlreadyInTeam {
            actor: HERO,
            quest: DUO,
            group: QuestGroup::Solo(HERO),
        }
    );
}

#[test]
fn raid_needs_a_party_and_caps_live_parties() {
    let mut world = world();
    let error = world
        .run(owner(ALICE), 0, StartQuest { actor: HERO, quest: RAID, party: None })
        .expect_err("solo raid");
    assert_eq!(quest_error(error), QuestError::PartyRequired(RAID));

    world
        .run(owner(ALICE), 0, StartQuest { actor: HERO, quest: RAID, party: Some(HEROES) })
        .expect("first party");
    let error = world
        .run(owner(CAROL), 1, StartQuest { actor: SCOUT, quest: RAID, party: Some(SCOUTS) })
        .expect_err("raid full");
    assert_eq!(
        quest_error(error),
        QuestError::RaidFull { quest: RAID, max_parties: 1 }
    );

    let done = report(&mut world, 2, RAID, QuestGroup::Party(HEROES), 3).expect("complete");
    // 100 base, full party bonus 0%, one live party at 10%.
    assert_eq!(done.tokens_for(HERO), 110);
}

#[test]
fn solo_quest_rejects_parties_and_non_members() {
    let mut world = world();
    let error = world
        .run(owner(ALICE), 0, StartQuest { actor: HERO, quest: SOLO, party: Some(HEROES) })
        .expect_err("solo only");
    assert_eq!(quest_error(error), QuestError::PartyNotSupported(SOLO));

    let error = world
        .run(owner(CAROL), 0, StartQuest { actor: SCOUT, quest: DUO, party: Some(HEROES) })
        .expect_err("scout is not a hero");
    assert_eq!(
        quest_error(error),
        QuestError::NotPartyMember { actor: SCOUT, party: HEROES }
    );
}

#[test]
fn reports_must_name_a_declared_objective() {
    let mut world = world();
    let group = QuestGroup::Solo(HERO);
    world
        .run(owner(ALICE), 0, StartQuest { actor: HERO, quest: SOLO, party: None })
        .expect("start");
    let error = world
        .run(
            operator(),
            1,
            UpdateQuestProgress {
                quest: SOLO,
                group,
                kind: ObjectiveKind::Explore,
                delta: 1,
            },
        )
        .expect_err("unknown objective");
    assert_eq!(
        quest_error(error),
        QuestError::UnknownObjective { quest: SOLO, kind: ObjectiveKind::Explore }
    );

    let error = report(&mut world, 2, SOLO, QuestGroup::Solo(SIDEKICK), 1).expect_err("never joined");
    assert_eq!(
        quest_error(error),
        QuestError::QuestNotActive { quest: SOLO, group: QuestGroup::Solo(SIDEKICK) }
    );
}

#[test]
fn requirements_gate_admission() {
    let mut world = World::new();
    let mut strict = quest(SOLO, QuestMode::Solo, 100);
    strict.min_level = 50;
    strict.objectives = vec![Objective::new(ObjectiveKind::DefeatBoss, 1)];
    world.admin(CreateQuest { quest: strict });

    let error = world
        .run(owner(ALICE), 0, StartQuest { actor: HERO, quest: SOLO, party: None })
        .expect_err("too low");
    assert_eq!(
        quest_error(error),
        QuestError::RequirementsNotMet { actor: HERO, quest: SOLO }
    );
}
