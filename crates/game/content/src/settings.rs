//! Deployment settings: engine tuning plus the role directory.

use encounter_core::{Caller, EngineConfig, Identity, Roles};

/// Identities holding elevated roles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoleSettings {
    pub admins: Vec<Identity>,
    pub validators: Vec<Identity>,
}

impl RoleSettings {
    pub fn roles_of(&self, identity: Identity) -> Roles {
        let mut roles = Roles::empty();
        if self.admins.contains(&identity) {
            roles |= Roles::ADMIN;
        }
        if self.validators.contains(&identity) {
            roles |= Roles::VALIDATOR;
        }
        roles
    }

    /// Resolves an identity into a caller carrying its configured roles.
    pub fn caller(&self, identity: Identity) -> Caller {
        Caller::with_roles(identity, self.roles_of(identity))
    }
}

/// Everything `config.toml` configures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentConfig {
    pub engine: EngineConfig,
    pub roles: RoleSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_additive() {
        let settings = RoleSettings {
            admins: vec![Identity(1)],
            validators: vec![Identity(1), Identity(2)],
        };
        assert_eq!(settings.roles_of(Identity(1)), Roles::ADMIN | Roles::VALIDATOR);
        assert_eq!(settings.roles_of(Identity(2)), Roles::VALIDATOR);
        assert_eq!(settings.caller(Identity(3)), Caller::player(Identity(3)));
    }
}
