//! Running quest state: groups, objective progress and participation.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::EngineConfig;
use crate::quest::{ObjectiveKind, QuestTemplate};
use crate::state::{ActorId, PartyId, QuestId, Timestamp};

/// Who runs a quest together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuestGroup {
    Solo(ActorId),
    Party(PartyId),
}

impl fmt::Display for QuestGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestGroup::Solo(actor) => write!(f, "solo({actor})"),
            QuestGroup::Party(party) => write!(f, "{party}"),
        }
    }
}

/// Participants of one group.
///
/// The member set is authoritative. The mask folds ids onto
/// `PARTICIPATION_WORD_BITS` bits (`id mod 64`) and is kept for reporting;
/// distinct actors can share a bit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participation {
    members: BTreeSet<ActorId>,
    mask: u64,
}

impl Participation {
    pub fn bit_for(actor: ActorId) -> u64 {
        1u64 << (actor.0 % EngineConfig::PARTICIPATION_WORD_BITS)
    }

    pub fn insert(&mut self, actor: ActorId) -> bool {
        self.mask |= Self::bit_for(actor);
        self.members.insert(actor)
    }

    pub fn contains(&self, actor: ActorId) -> bool {
        self.members.contains(&actor)
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.members.iter().copied()
    }
}

impl FromIterator<ActorId> for Participation {
    fn from_iter<I: IntoIterator<Item = ActorId>>(iter: I) -> Self {
        let mut participation = Participation::default();
        for actor in iter {
            participation.insert(actor);
        }
        participation
    }
}

/// Progress of one group through a quest.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupProgress {
    pub group: QuestGroup,
    pub joined_at: Timestamp,
    /// Indexed like the template's objectives.
    progress: Vec<u64>,
    participation: Participation,
    completed: bool,
}

impl GroupProgress {
    pub fn new(
        template: &QuestTemplate,
        group: QuestGroup,
        participation: Participation,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            group,
            joined_at,
            progress: vec![0; template.objectives.len()],
            participation,
            completed: false,
        }
    }

    pub fn participation(&self) -> &Participation {
        &self.participation
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn progress(&self) -> &[u64] {
        &self.progress
    }

    pub fn value_of(&self, template: &QuestTemplate, kind: ObjectiveKind) -> Option<u64> {
        template
            .objective_index(kind)
            .and_then(|index| self.progress.get(index).copied())
    }

    /// Adds `delta` to an objective, saturating. Returns the new value, or
    /// `None` when the template has no such objective.
    pub fn advance(&mut self, template: &QuestTemplate, kind: ObjectiveKind, delta: u64) -> Option<u64> {
        let index = template.objective_index(kind)?;
        let slot = self.progress.get_mut(index)?;
        *slot = slot.saturating_add(delta);
        Some(*slot)
    }

    /// Every declared objective has reached its target.
    pub fn is_satisfied(&self, template: &QuestTemplate) -> bool {
        template
            .objectives
            .iter()
            .zip(&self.progress)
            .all(|(objective, value)| *value >= objective.target)
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
    }
}

/// All groups that have joined a quest, in join order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveQuestInstance {
    pub quest: QuestId,
    groups: Vec<GroupProgress>,
}

impl ActiveQuestInstance {
    pub fn new(quest: QuestId) -> Self {
        Self {
            quest,
            groups: Vec::new(),
        }
    }

    /// True while any group is still running.
    pub fn is_active(&self) -> bool {
        self.groups.iter().any(|group| !group.completed)
    }

    pub fn groups(&self) -> &[GroupProgress] {
        &self.groups
    }

    pub fn group(&self, group: QuestGroup) -> Option<&GroupProgress> {
        self.groups.iter().find(|entry| entry.group == group)
    }

    pub fn group_mut(&mut self, group: QuestGroup) -> Option<&mut GroupProgress> {
        self.groups.iter_mut().find(|entry| entry.group == group)
    }

    /// Joined groups that have not completed.
    pub fn live_groups(&self) -> usize {
        self.groups.iter().filter(|group| !group.completed).count()
    }

    pub fn is_live(&self, group: QuestGroup) -> bool {
        self.group(group).is_some_and(|entry| !entry.completed)
    }

    /// Returns the live group, other than `except`, that `actor` belongs to.
    pub fn live_group_of(&self, actor: ActorId, except: QuestGroup) -> Option<QuestGroup> {
        self.groups
            .iter()
            .filter(|entry| entry.group != except && !entry.completed)
            .find(|entry| entry.participation.contains(actor))
            .map(|entry| entry.group)
    }

    /// Adds a group. A completed earlier run of the same group is dropped.
    pub fn join(&mut self, progress: GroupProgress) {
        self.groups.retain(|entry| entry.group != progress.group);
        self.groups.push(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::{Objective, QuestMode};
    use crate::state::CoreStats;

    fn template() -> QuestTemplate {
        QuestTemplate {
            id: QuestId(1),
            name: "Patrol".into(),
            min_level: 1,
            min_stats: CoreStats::default(),
            base_reward: 100,
            cooldown: 0,
            mode: QuestMode::Party {
                max_size: 4,
                bonus_pct: 10,
            },
            objectives: vec![
                Objective::new(ObjectiveKind::KillMonsters, 3),
                Objective::new(ObjectiveKind::Explore, 1),
            ],
            active: true,
        }
    }

    #[test]
    fn mask_folds_ids_modulo_word_bits() {
        let participation: Participation = [ActorId(1), ActorId(65), ActorId(3)].into_iter().collect();
        assert_eq!(participation.len(), 3);
        assert_eq!(participation.mask(), 0b1010);
        assert!(participation.contains(ActorId(65)));
        assert!(!participation.contains(ActorId(129)));
    }

    #[test]
    fn all_objectives_must_be_met() {
        let template = template();
        let mut group = GroupProgress::new(
            &template,
            QuestGroup::Party(PartyId(1)),
            Participation::default(),
            Timestamp(0),
        );
        assert_eq!(group.advance(&template, ObjectiveKind::KillMonsters, 5), Some(5));
        assert!(!group.is_satisfied(&template));
        assert_eq!(group.advance(&template, ObjectiveKind::Explore, 1), Some(1));
        assert!(group.is_satisfied(&template));
        assert_eq!(group.advance(&template, ObjectiveKind::DefeatBoss, 1), None);
    }

    #[test]
    fn progress_saturates() {
        let template = template();
        let mut group = GroupProgress::new(&template, QuestGroup::Solo(ActorId(1)), Participation::default(), Timestamp(0));
        group.advance(&template, ObjectiveKind::KillMonsters, u64::MAX);
        assert_eq!(group.advance(&template, ObjectiveKind::KillMonsters, 1), Some(u64::MAX));
    }

    #[test]
    fn rejoining_replaces_a_completed_run() {
        let template = template();
        let group = QuestGroup::Solo(ActorId(7));
        let mut instance = ActiveQuestInstance::new(template.id);
        let members: Participation = [ActorId(7)].into_iter().collect();
        instance.join(GroupProgress::new(&template, group, members.clone(), Timestamp(0)));
        assert_eq!(instance.live_group_of(ActorId(7), QuestGroup::Solo(ActorId(8))), Some(group));
        assert_eq!(instance.live_group_of(ActorId(7), group), None);

        instance.group_mut(group).unwrap().mark_completed();
        assert!(!instance.is_active());
        assert_eq!(instance.live_groups(), 0);

        instance.join(GroupProgress::new(&template, group, members, Timestamp(10)));
        assert_eq!(instance.groups().len(), 1);
        assert!(instance.is_live(group));
    }
}
