//! Collaborator data the engine reads through its oracles.

use encounter_core::env::OwnedActor;
use encounter_core::{ItemStats, OracleSnapshot, PartyRoster};

/// Actors, items and parties known to a deployment.
///
/// Rosters are never engine state: they are frozen into an
/// [`OracleSnapshot`] and served read-only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldRoster {
    pub actors: Vec<OwnedActor>,
    pub items: Vec<ItemStats>,
    pub parties: Vec<PartyRoster>,
}

impl WorldRoster {
    /// Freezes the roster. Later entries win on duplicate ids.
    pub fn into_snapshot(self) -> OracleSnapshot {
        let mut snapshot = OracleSnapshot::new();
        for actor in self.actors {
            snapshot.put_actor(actor.owner, actor.profile);
        }
        for item in self.items {
            snapshot.put_item(item);
        }
        for party in self.parties {
            snapshot.put_party(party);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use encounter_core::{
        ActorId, ActorOracle, ActorProfile, Affinity, CoreStats, Identity, ItemId, ItemOracle,
        PartyId, PartyOracle,
    };

    use super::*;

    #[test]
    fn snapshot_serves_every_roster_entry() {
        let profile = ActorProfile::new(ActorId(1), 5, CoreStats::new(10, 0, 0), Affinity::Power)
            .with_item(ItemId(7));
        let roster = WorldRoster {
            actors: vec![OwnedActor {
                owner: Identity(42),
                profile: profile.clone(),
            }],
            items: vec![ItemStats::weapon(ItemId(7), Affinity::Power, CoreStats::default())],
            parties: vec![PartyRoster {
                id: PartyId(3),
                members: vec![ActorId(1)],
                owner: Identity(42),
                active: true,
                max_size: 4,
            }],
        };

        let snapshot = roster.into_snapshot();
        assert_eq!(snapshot.actor(ActorId(1)), Some(profile));
        assert_eq!(snapshot.owner_of(ActorId(1)), Some(Identity(42)));
        assert!(snapshot.item_stats(ItemId(7)).is_some_and(|item| item.is_weapon()));
        assert!(snapshot.party(PartyId(3)).is_some_and(|party| party.contains(ActorId(1))));
    }
}
