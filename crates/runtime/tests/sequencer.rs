mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::*;
use encounter_core::action::CreateMonster;
use encounter_core::{
    Attack, EncounterError, ErrorCategory, ExecuteError, GameError, Identity, ItemId, RecordKill,
    RewardSource, Roles, StartBossFight, StartHunt, TransitionPhaseError,
};
use encounter_runtime::{
    CommandEvent, Event, InMemoryJournal, InMemoryMinter, JournalEntry, JournalOutcome,
    JournalRepository, ManualClock, MinterError, RepositoryError, RewardEvent, RewardMinter,
    Runtime, RuntimeError, Topic,
};

const SETUP_COMMANDS: u64 = 3;

#[tokio::test]
async fn boss_rewards_are_minted_after_commit() {
    let harness = Harness::start().await;
    let handle = harness.runtime.handle();

    harness.clock.set(100);
    let opened = handle
        .execute(
            ALICE,
            StartBossFight {
                actor: HERO,
                monster: BOSS,
                duration: 600,
            },
        )
        .await
        .expect("fight opens");
    let fight = fight_of(&opened);

    harness.clock.set(110);
    handle
        .execute(ALICE, Attack::new(fight, HERO))
        .await
        .expect("hero attacks");
    assert_eq!(harness.minter.balance(ALICE), Ok(0));

    harness.clock.set(120);
    let killing_blow = handle
        .execute(BOB, Attack::new(fight, SIDEKICK))
        .await
        .expect("sidekick finishes");
    assert_eq!(killing_blow.tokens_for(HERO), 556);

    // Shares are paid to the identities owning the actors.
    assert_eq!(harness.minter.balance(ALICE), Ok(556));
    assert_eq!(harness.minter.balance(BOB), Ok(463));
    assert_eq!(harness.minter.balance(Identity(HERO.0.into())), Ok(0));
    assert_eq!(harness.minter.total_supply(), Ok(1_019));

    let entries = handle.journal().await.expect("journal");
    let last = entries.last().expect("entries");
    assert_eq!(last.sequence, SETUP_COMMANDS + 2);
    match &last.outcome {
        JournalOutcome::Committed {
            receipt,
            state_root,
        } => {
            assert_eq!(receipt, &killing_blow);
            assert_eq!(state_root.as_ref().map(String::len), Some(64));
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    harness.runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn rejected_command_leaves_state_and_balances_untouched() {
    let harness = Harness::start().await;
    let handle = harness.runtime.handle();
    let before = handle.query_state().await.expect("state");

    let error = handle
        .execute(
            ALICE,
            CreateMonster {
                monster: catalog().monsters[0].clone(),
            },
        )
        .await
        .expect_err("alice is no admin");
    assert!(matches!(
        error,
        RuntimeError::Rejected(ExecuteError::Unauthorized {
            required: Roles::ADMIN,
            ..
        })
    ));
    assert_eq!(error.category(), ErrorCategory::Authorization);

    let after = handle.query_state().await.expect("state");
    assert_eq!(after, before);
    assert_eq!(after.nonce(), SETUP_COMMANDS);
    assert_eq!(harness.minter.total_supply(), Ok(0));

    let entries = harness.journal.entries().expect("entries");
    assert_eq!(entries.len() as u64, SETUP_COMMANDS + 1);
    assert!(matches!(
        &entries[SETUP_COMMANDS as usize].outcome,
        JournalOutcome::Rejected { code, category: ErrorCategory::Authorization, .. }
            if code == "UNAUTHORIZED"
    ));
}

#[tokio::test]
async fn journal_keeps_submission_order_across_outcomes() {
    let harness = Harness::start().await;
    let handle = harness.runtime.handle();

    handle
        .execute(ALICE, StartHunt { hunt: HUNT, actor: HERO })
        .await
        .expect("start");
    handle
        .execute(BOB, RecordKill { hunt: HUNT, actor: HERO })
        .await
        .expect_err("bob does not own the hero");
    handle
        .execute(ALICE, RecordKill { hunt: HUNT, actor: HERO })
        .await
        .expect("kill");

    let entries = handle.journal().await.expect("journal");
    let sequences: Vec<_> = entries.iter().map(|entry| entry.sequence).collect();
    assert_eq!(sequences, (0..SETUP_COMMANDS + 3).collect::<Vec<_>>());

    let tail: Vec<_> = entries[SETUP_COMMANDS as usize..]
        .iter()
        .map(|entry| (entry.command.name(), entry.outcome.is_committed()))
        .collect();
    assert_eq!(
        tail,
        vec![("StartHunt", true), ("RecordKill", false), ("RecordKill", true)]
    );

    // Nonces only advance on commit.
    let nonces: Vec<_> = entries
        .iter()
        .filter_map(|entry| entry.outcome.receipt().map(|receipt| receipt.nonce))
        .collect();
    assert_eq!(nonces, (0..SETUP_COMMANDS + 2).collect::<Vec<_>>());

    let exported = handle.export_journal().await.expect("export");
    assert!(exported.contains("\"RecordKill\""));
}

#[tokio::test]
async fn sequencer_stamps_commands_with_the_clock() {
    let harness = Harness::start().await;
    let handle = harness.runtime.handle();

    harness.clock.set(1_000);
    handle
        .execute(ALICE, StartHunt { hunt: HUNT, actor: HERO })
        .await
        .expect("start");

    harness.clock.advance(300);
    let error = handle
        .execute(ALICE, RecordKill { hunt: HUNT, actor: HERO })
        .await
        .expect_err("deadline reached");
    assert!(matches!(
        error.rejection(),
        Some(ExecuteError::Encounter(TransitionPhaseError {
            error: EncounterError::HuntExpired { .. },
            ..
        }))
    ));
    assert_eq!(error.category(), ErrorCategory::Timing);
}

#[tokio::test]
async fn events_follow_command_outcomes() {
    let harness = Harness::start().await;
    let handle = harness.runtime.handle();
    let mut commands = handle.subscribe(Topic::Commands);
    let mut rewards = handle.subscribe(Topic::Rewards);

    handle
        .execute(ALICE, StartHunt { hunt: HUNT, actor: HERO })
        .await
        .expect("start");
    handle
        .execute(ALICE, RecordKill { hunt: HUNT, actor: HERO })
        .await
        .expect("kill");
    handle
        .execute(BOB, StartHunt { hunt: HUNT, actor: HERO })
        .await
        .expect_err("not the owner");

    let mut seen = Vec::new();
    for _ in 0..3 {
        match commands.recv().await.expect("command event") {
            Event::Command(CommandEvent::Committed { command, .. }) => seen.push((command, true)),
            Event::Command(CommandEvent::Rejected { command, code, .. }) => {
                assert_eq!(code, "NOT_OWNER");
                seen.push((command, false));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert_eq!(
        seen,
        vec![
            ("StartHunt".to_string(), true),
            ("RecordKill".to_string(), true),
            ("StartHunt".to_string(), false),
        ]
    );

    match rewards.recv().await.expect("reward event") {
        Event::Reward(RewardEvent::Paid { owner, grant, .. }) => {
            assert_eq!(owner, ALICE);
            assert_eq!(grant.recipient(), HERO);
            assert_eq!(grant.amount(), 5);
            assert_eq!(grant.source(), RewardSource::HuntKill(HUNT));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

/// Refuses everything.
struct ClosedMint;

impl RewardMinter for ClosedMint {
    fn mint_reward(&self, _: Identity, _: u64, _: RewardSource) -> Result<(), MinterError> {
        Err(MinterError::Refused("mint paused".into()))
    }

    fn mint_item(
        &self,
        _: Identity,
        _: ItemId,
        _: u64,
        _: RewardSource,
    ) -> Result<(), MinterError> {
        Err(MinterError::Refused("mint paused".into()))
    }
}

#[tokio::test]
async fn refused_grants_are_journaled_as_unpaid_without_rollback() {
    let journal = InMemoryJournal::new();
    let runtime = start_runtime(ManualClock::starting_at(0), Arc::new(ClosedMint), journal.clone()).await;
    let handle = runtime.handle();
    let mut rewards = handle.subscribe(Topic::Rewards);

    handle
        .execute(ALICE, StartHunt { hunt: HUNT, actor: HERO })
        .await
        .expect("start");
    let receipt = handle
        .execute(ALICE, RecordKill { hunt: HUNT, actor: HERO })
        .await
        .expect("kill still commits");
    assert_eq!(receipt.tokens_for(HERO), 5);

    let state = handle.query_state().await.expect("state");
    assert_eq!(
        state.encounters.progress(HUNT, HERO).map(|progress| progress.kills),
        Some(1)
    );

    // The commit is journaled first, then a settlement entry for the refusal.
    let entries = journal.entries().expect("entries");
    let [committed, unpaid] = &entries[entries.len() - 2..] else {
        panic!("expected a commit and its settlement");
    };
    assert_eq!(committed.outcome.receipt(), Some(&receipt));
    assert_eq!(unpaid.sequence, committed.sequence + 1);
    assert_eq!(unpaid.command.name(), "RecordKill");
    assert!(matches!(
        unpaid.outcome,
        JournalOutcome::Unpaid { nonce, .. } if nonce == receipt.nonce
    ));
    assert_eq!(unpaid.outcome.unpaid(), receipt.grants.as_slice());
    assert!(matches!(
        rewards.recv().await.expect("reward event"),
        Event::Reward(RewardEvent::Failed { owner: Some(ALICE), .. })
    ));

    // The settlement entry takes a sequence number; the next command follows it.
    handle
        .execute(BOB, RecordKill { hunt: HUNT, actor: HERO })
        .await
        .expect_err("not the owner");
    let entries = journal.entries().expect("entries");
    assert_eq!(
        entries.last().map(|entry| entry.sequence),
        Some(unpaid.sequence + 1)
    );
}

/// In-memory journal whose appends can be switched off.
#[derive(Clone, Default)]
struct SwitchedJournal {
    inner: InMemoryJournal,
    failing: Arc<AtomicBool>,
}

impl SwitchedJournal {
    fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl JournalRepository for SwitchedJournal {
    fn append(&mut self, entry: &JournalEntry) -> Result<u64, RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Io(std::io::Error::other("disk full")));
        }
        self.inner.append(entry)
    }

    fn entries(&self) -> Result<Vec<JournalEntry>, RepositoryError> {
        self.inner.entries()
    }

    fn len(&self) -> Result<u64, RepositoryError> {
        self.inner.len()
    }
}

#[tokio::test]
async fn unjournaled_commit_is_undone_and_pays_nothing() {
    let journal = SwitchedJournal::default();
    let minter = Arc::new(InMemoryMinter::new());
    let runtime = start_runtime(ManualClock::starting_at(0), minter.clone(), journal.clone()).await;
    let handle = runtime.handle();
    let mut commands = handle.subscribe(Topic::Commands);
    let mut rewards = handle.subscribe(Topic::Rewards);

    handle
        .execute(ALICE, StartHunt { hunt: HUNT, actor: HERO })
        .await
        .expect("start");
    assert!(matches!(
        commands.recv().await.expect("commit event"),
        Event::Command(CommandEvent::Committed { .. })
    ));

    journal.fail(true);
    let error = handle
        .execute(ALICE, RecordKill { hunt: HUNT, actor: HERO })
        .await
        .expect_err("journal is down");
    assert!(matches!(error, RuntimeError::Repository(RepositoryError::Io(_))));
    assert_eq!(error.category(), ErrorCategory::Internal);

    let state = handle.query_state().await.expect("state");
    assert_eq!(state.nonce(), SETUP_COMMANDS + 1);
    assert_eq!(
        state.encounters.progress(HUNT, HERO).map(|progress| progress.kills),
        Some(0)
    );
    assert_eq!(minter.total_supply(), Ok(0));
    assert!(commands.try_recv().is_err());
    assert!(rewards.try_recv().is_err());

    // Rejections still reach the caller while the journal is down.
    let error = handle
        .execute(BOB, RecordKill { hunt: HUNT, actor: HERO })
        .await
        .expect_err("not the owner");
    assert_eq!(
        error.rejection().map(GameError::error_code),
        Some("NOT_OWNER")
    );

    journal.fail(false);
    let receipt = handle
        .execute(ALICE, RecordKill { hunt: HUNT, actor: HERO })
        .await
        .expect("kill once the journal is back");
    assert_eq!(receipt.nonce, SETUP_COMMANDS + 1);
    assert_eq!(minter.balance(ALICE), Ok(5));

    let sequences: Vec<_> = journal
        .entries()
        .expect("entries")
        .iter()
        .map(|entry| entry.sequence)
        .collect();
    assert_eq!(sequences, (0..SETUP_COMMANDS + 2).collect::<Vec<_>>());
}

#[tokio::test]
async fn builder_requires_oracles() {
    let result = Runtime::builder().config(config()).build().await;
    assert!(matches!(result, Err(RuntimeError::MissingOracles)));
}
