//! In-memory oracle snapshot.
//!
//! [`OracleSnapshot`] captures collaborator data (actors with their owners,
//! item stats and party rosters) in ordered maps and implements every oracle
//! trait over it. Runtimes, tools and tests use it wherever a live
//! collaborator is unavailable.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{ActorOracle, ActorProfile, Env, ItemOracle, ItemStats, PartyOracle, PartyRoster};
use crate::state::{ActorId, Identity, ItemId, PartyId};

/// Actor profile paired with the identity that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OwnedActor {
    pub owner: Identity,
    pub profile: ActorProfile,
}

/// Complete snapshot of collaborator data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OracleSnapshot {
    pub actors: BTreeMap<ActorId, OwnedActor>,
    pub items: BTreeMap<ItemId, ItemStats>,
    pub parties: BTreeMap<PartyId, PartyRoster>,
}

impl OracleSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an actor owned by `owner` (builder pattern).
    #[must_use]
    pub fn with_actor(mut self, owner: Identity, profile: ActorProfile) -> Self {
        self.put_actor(owner, profile);
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: ItemStats) -> Self {
        self.put_item(item);
        self
    }

    #[must_use]
    pub fn with_party(mut self, party: PartyRoster) -> Self {
        self.put_party(party);
        self
    }

    pub fn put_actor(&mut self, owner: Identity, profile: ActorProfile) {
        self.actors.insert(profile.id, OwnedActor { owner, profile });
    }

    pub fn put_item(&mut self, item: ItemStats) {
        self.items.insert(item.id, item);
    }

    pub fn put_party(&mut self, party: PartyRoster) {
        self.parties.insert(party.id, party);
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut ActorProfile> {
        self.actors.get_mut(&id).map(|entry| &mut entry.profile)
    }

    /// Borrows the snapshot as a fully populated [`Env`].
    pub fn env(&self) -> Env<'_> {
        Env::with_all(self, self, self)
    }
}

impl ActorOracle for OracleSnapshot {
    fn actor(&self, id: ActorId) -> Option<ActorProfile> {
        self.actors.get(&id).map(|entry| entry.profile.clone())
    }

    fn owner_of(&self, id: ActorId) -> Option<Identity> {
        self.actors.get(&id).map(|entry| entry.owner)
    }
}

impl ItemOracle for OracleSnapshot {
    fn item_stats(&self, id: ItemId) -> Option<ItemStats> {
        self.items.get(&id).cloned()
    }
}

impl PartyOracle for OracleSnapshot {
    fn party(&self, id: PartyId) -> Option<PartyRoster> {
        self.parties.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::OracleError;
    use crate::state::{Affinity, CoreStats};

    #[test]
    fn snapshot_env_resolves_all_collaborators() {
        let mut profile = ActorProfile::new(ActorId(1), 3, CoreStats::default(), Affinity::Power);
        profile = profile.with_item(ItemId(9));
        let snapshot = OracleSnapshot::new()
            .with_actor(Identity(7), profile)
            .with_item(ItemStats::weapon(ItemId(9), Affinity::Power, CoreStats::default()))
            .with_party(PartyRoster {
                id: PartyId(4),
                members: vec![ActorId(1)],
                owner: Identity(7),
                active: true,
                max_size: 4,
            });

        let env = snapshot.env();
        assert_eq!(env.owner_of(ActorId(1)), Ok(Identity(7)));
        assert!(env.party(PartyId(4)).is_ok_and(|roster| roster.contains(ActorId(1))));
        let profile = env.active_actor(ActorId(1)).expect("actor");
        assert!(env.equipped_weapon(&profile).expect("items").is_some());
        assert_eq!(
            env.active_actor(ActorId(2)),
            Err(OracleError::ActorNotFound(ActorId(2)))
        );
    }

    #[test]
    fn inactive_actor_is_rejected() {
        let mut snapshot = OracleSnapshot::new().with_actor(
            Identity(1),
            ActorProfile::new(ActorId(1), 1, CoreStats::default(), Affinity::Finesse),
        );
        if let Some(profile) = snapshot.actor_mut(ActorId(1)) {
            profile.active = false;
        }
        assert_eq!(
            snapshot.env().active_actor(ActorId(1)),
            Err(OracleError::ActorInactive(ActorId(1)))
        );
    }
}
