//! Collaborator roster loader.

use std::collections::BTreeSet;
use std::path::Path;

use encounter_core::env::OwnedActor;
use encounter_core::{ItemStats, PartyRoster};

use crate::loaders::{LoadResult, read_ron};
use crate::roster::WorldRoster;

/// Loader for actors, items and parties from three RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// RON formats: `Vec<OwnedActor>`, `Vec<ItemStats>`, `Vec<PartyRoster>`.
    ///
    /// Party members must name actors in the same roster.
    pub fn load(actors: &Path, items: &Path, parties: &Path) -> LoadResult<WorldRoster> {
        let actors: Vec<OwnedActor> = read_ron(actors, "actor roster")?;
        let items: Vec<ItemStats> = read_ron(items, "item catalog")?;
        let parties: Vec<PartyRoster> = read_ron(parties, "party roster")?;

        let known: BTreeSet<_> = actors.iter().map(|actor| actor.profile.id).collect();
        for party in &parties {
            if let Some(stranger) = party.members.iter().find(|member| !known.contains(member)) {
                anyhow::bail!("Party {} lists unknown actor {}", party.id.0, stranger.0);
            }
        }

        Ok(WorldRoster {
            actors,
            items,
            parties,
        })
    }
}
