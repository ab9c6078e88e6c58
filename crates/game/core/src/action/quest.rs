//! Quest commands: start, validator progress reports, completion.

use crate::action::{Access, CommandContext, Roles, Transition};
use crate::cooldown::CooldownKey;
use crate::encounter::{RewardGrant, RewardSource};
use crate::engine::{EngineEvent, Receipt};
use crate::env::{Env, OracleError};
use crate::quest::{
    GroupProgress, ObjectiveKind, Participation, QuestError, QuestGroup, QuestMode, completion_reward,
};
use crate::state::{ActorId, EngineState, PartyId, QuestId, Timestamp};

/// Joins a quest alone or with a party.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartQuest {
    pub actor: ActorId,
    pub quest: QuestId,
    pub party: Option<PartyId>,
}

impl StartQuest {
    /// Resolves the joining group and its members, checking every admission rule.
    fn admission(
        &self,
        state: &EngineState,
        env: &Env<'_>,
        now: Timestamp,
    ) -> Result<(QuestGroup, Vec<ActorId>), QuestError> {
        let template = state.quests.template(self.quest)?;
        if !template.active {
            return Err(QuestError::QuestInactive(self.quest));
        }

        let (group, members) = match (self.party, template.mode) {
            (Some(_), QuestMode::Solo) => return Err(QuestError::PartyNotSupported(self.quest)),
            (None, QuestMode::Raid { .. }) => return Err(QuestError::PartyRequired(self.quest)),
            (None, _) => (QuestGroup::Solo(self.actor), vec![self.actor]),
            (Some(party), mode) => {
                let roster = env.party(party).map_err(|error| match error {
                    OracleError::PartyNotFound(party) => QuestError::PartyNotFound(party),
                    other => QuestError::Oracle(other),
                })?;
                if !roster.active {
                    return Err(QuestError::PartyInactive(party));
                }
                if !roster.contains(self.actor) {
                    return Err(QuestError::NotPartyMember {
                        actor: self.actor,
                        party,
                    });
                }
                if roster.members.len() > mode.max_size() as usize {
                    return Err(QuestError::PartyTooLarge {
                        party,
                        members: roster.members.len(),
                        max: mode.max_size(),
                    });
                }
                (QuestGroup::Party(party), roster.members)
            }
        };

        let instance = state.quests.instance(self.quest);
        for member in &members {
            let profile = env.active_actor(*member)?;
            if !template.admits(&profile) {
                return Err(QuestError::RequirementsNotMet {
                    actor: *member,
                    quest: self.quest,
                });
            }
            state
                .cooldowns
                .check(*member, CooldownKey::Quest(self.quest), template.cooldown, now)
                .map_err(QuestError::CharacterOnCooldown)?;
            if let Some(other) = instance.and_then(|instance| instance.live_group_of(*member, group)) {
                return Err(QuestError::AlreadyInTeam {
                    actor: *member,
                    quest: self.quest,
                    group: other,
                });
            }
        }

        if let Some(instance) = instance {
            if instance.is_live(group) {
                return Err(QuestError::QuestAlreadyActive {
                    quest: self.quest,
                    group,
                });
            }
            if let QuestMode::Raid { max_parties, .. } = template.mode
                && instance.live_groups() >= max_parties as usize
            {
                return Err(QuestError::RaidFull {
                    quest: self.quest,
                    max_parties,
                });
            }
        }

        Ok((group, members))
    }
}

impl Transition for StartQuest {
    type Error = QuestError;

    fn access(&self) -> Access {
        Access::Owner(self.actor)
    }

    fn pre_validate(&self, state: &EngineState, env: &Env<'_>, ctx: &CommandContext) -> Result<(), Self::Error> {
        self.admission(state, env, ctx.now).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        env: &Env<'_>,
        ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let (group, members) = self.admission(state, env, ctx.now)?;
        let participation: Participation = members.iter().copied().collect();
        let mask = participation.mask();

        let (template, instance) = state.quests.instance_with_template(self.quest)?;
        instance.join(GroupProgress::new(template, group, participation, ctx.now));

        tracing::debug!(quest = %self.quest, %group, members = members.len(), "quest started");
        receipt.emit(EngineEvent::QuestStarted {
            quest: self.quest,
            group,
            participants: members,
            mask,
        });
        Ok(())
    }
}

/// Validator report of objective progress for one group.
///
/// Reports against a completed group are accepted and ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateQuestProgress {
    pub quest: QuestId,
    pub group: QuestGroup,
    pub kind: ObjectiveKind,
    pub delta: u64,
}

impl Transition for UpdateQuestProgress {
    type Error = QuestError;

    fn access(&self) -> Access {
        Access::Role(Roles::VALIDATOR)
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        let template = state.quests.template(self.quest)?;
        state
            .quests
            .instance(self.quest)
            .and_then(|instance| instance.group(self.group))
            .ok_or(QuestError::QuestNotActive {
                quest: self.quest,
                group: self.group,
            })?;
        if template.objective_index(self.kind).is_none() {
            return Err(QuestError::UnknownObjective {
                quest: self.quest,
                kind: self.kind,
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let (template, instance) = state.quests.instance_with_template(self.quest)?;
        let entry = instance
            .group_mut(self.group)
            .ok_or(QuestError::QuestNotActive {
                quest: self.quest,
                group: self.group,
            })?;

        if entry.is_completed() {
            tracing::debug!(quest = %self.quest, group = %self.group, "progress after completion ignored");
            return Ok(());
        }

        let value = entry
            .advance(template, self.kind, self.delta)
            .ok_or(QuestError::UnknownObjective {
                quest: self.quest,
                kind: self.kind,
            })?;
        let satisfied = entry.is_satisfied(template);

        receipt.emit(EngineEvent::QuestProgressed {
            quest: self.quest,
            group: self.group,
            kind: self.kind,
            value,
        });

        if satisfied {
            complete_group(state, self.quest, self.group, ctx.now, receipt)?;
        }
        Ok(())
    }
}

/// Player-initiated completion of a group whose objectives are all met.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompleteQuest {
    pub actor: ActorId,
    pub quest: QuestId,
    pub group: QuestGroup,
}

impl Transition for CompleteQuest {
    type Error = QuestError;

    fn access(&self) -> Access {
        Access::Owner(self.actor)
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        let template = state.quests.template(self.quest)?;
        let entry = state
            .quests
            .instance(self.quest)
            .and_then(|instance| instance.group(self.group))
            .ok_or(QuestError::QuestNotActive {
                quest: self.quest,
                group: self.group,
            })?;
        if !entry.participation().contains(self.actor) {
            return Err(QuestError::NotParticipant {
                actor: self.actor,
                quest: self.quest,
                group: self.group,
            });
        }
        if !entry.is_satisfied(template) {
            return Err(QuestError::ObjectivesIncomplete {
                quest: self.quest,
                group: self.group,
            });
        }
        if entry.is_completed() {
            return Err(QuestError::QuestAlreadyCompleted {
                quest: self.quest,
                group: self.group,
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        complete_group(state, self.quest, self.group, ctx.now, receipt)
    }
}

/// Marks a group completed, stamps every participant's quest cooldown, then
/// emits one grant per participant.
fn complete_group(
    state: &mut EngineState,
    quest: QuestId,
    group: QuestGroup,
    now: Timestamp,
    receipt: &mut Receipt,
) -> Result<(), QuestError> {
    let (template, instance) = state.quests.instance_with_template(quest)?;
    let live_parties = instance.live_groups();
    let entry = instance
        .group_mut(group)
        .ok_or(QuestError::QuestNotActive { quest, group })?;
    if entry.is_completed() {
        return Err(QuestError::QuestAlreadyCompleted { quest, group });
    }
    entry.mark_completed();

    let participants: Vec<ActorId> = entry.participation().iter().collect();
    let reward = completion_reward(template, participants.len(), live_parties);

    for participant in &participants {
        state
            .cooldowns
            .stamp(*participant, CooldownKey::Quest(quest), now);
    }

    tracing::info!(%quest, %group, participants = participants.len(), reward, "quest completed");
    receipt.emit(EngineEvent::QuestCompleted {
        quest,
        group,
        reward_per_participant: reward,
    });
    for recipient in participants {
        receipt.grant(RewardGrant::Token {
            recipient,
            amount: reward,
            source: RewardSource::Quest(quest),
        });
    }
    Ok(())
}
