use crate::state::{ActorId, Identity, PartyId};

/// Membership lookup provided by the party collaborator.
pub trait PartyOracle: Send + Sync {
    fn party(&self, id: PartyId) -> Option<PartyRoster>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyRoster {
    pub id: PartyId,
    pub members: Vec<ActorId>,
    pub owner: Identity,
    pub active: bool,
    pub max_size: u32,
}

impl PartyRoster {
    pub fn contains(&self, actor: ActorId) -> bool {
        self.members.contains(&actor)
    }
}
