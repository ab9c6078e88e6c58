//! Administrative content bundled for installation.

use std::collections::BTreeSet;

use encounter_core::action::{
    CreateAbility, CreateHunt, CreateMonster, CreateQuest, RegisterCombo,
};
use encounter_core::{Ability, AbilityId, ComboRule, Command, Hunt, Monster, QuestTemplate};

/// Every definition an engine is seeded with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentCatalog {
    pub abilities: Vec<Ability>,
    pub monsters: Vec<Monster>,
    pub combos: Vec<ComboRule>,
    pub hunts: Vec<Hunt>,
    pub quests: Vec<QuestTemplate>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of definitions across all kinds.
    pub fn len(&self) -> usize {
        self.abilities.len()
            + self.monsters.len()
            + self.combos.len()
            + self.hunts.len()
            + self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Admin commands that install the catalog.
    ///
    /// Abilities come first (defensive pools and prerequisites reference
    /// them), then monsters (hunts reference them), combos, hunts and quests.
    pub fn admin_commands(&self) -> Vec<Command> {
        let abilities = self
            .abilities_by_prerequisite()
            .into_iter()
            .map(|ability| Command::from(CreateAbility { ability: ability.clone() }));
        let monsters = self
            .monsters
            .iter()
            .map(|monster| Command::from(CreateMonster { monster: monster.clone() }));
        let combos = self
            .combos
            .iter()
            .map(|rule| Command::from(RegisterCombo { rule: rule.clone() }));
        let hunts = self
            .hunts
            .iter()
            .map(|hunt| Command::from(CreateHunt { hunt: hunt.clone() }));
        let quests = self
            .quests
            .iter()
            .map(|quest| Command::from(CreateQuest { quest: quest.clone() }));

        abilities
            .chain(monsters)
            .chain(combos)
            .chain(hunts)
            .chain(quests)
            .collect()
    }

    /// Abilities ordered so each one follows its prerequisites.
    ///
    /// Entries whose prerequisites never resolve keep file order at the end;
    /// the engine rejects them on install.
    fn abilities_by_prerequisite(&self) -> Vec<&Ability> {
        let mut placed: BTreeSet<AbilityId> = BTreeSet::new();
        let mut pending: Vec<&Ability> = self.abilities.iter().collect();
        let mut ordered = Vec::with_capacity(pending.len());

        loop {
            let before = pending.len();
            pending.retain(|ability| {
                if ability.prerequisites.iter().all(|id| placed.contains(id)) {
                    placed.insert(ability.id);
                    ordered.push(*ability);
                    false
                } else {
                    true
                }
            });
            if pending.is_empty() || pending.len() == before {
                break;
            }
        }

        ordered.extend(pending);
        ordered
    }
}

#[cfg(test)]
mod tests {
    use encounter_core::{AbilityCategory, Element, HuntId, MonsterId, Multiplier};

    use super::*;

    fn ability(id: u32, prerequisites: &[u32]) -> Ability {
        Ability {
            id: AbilityId(id),
            name: format!("ability-{id}"),
            category: AbilityCategory::Damage,
            element: Element::Fire,
            power: 10,
            duration: 0,
            cooldown: 0,
            area: false,
            charge_required: 0,
            prerequisites: prerequisites.iter().copied().map(AbilityId).collect(),
            active: true,
        }
    }

    fn created_ability(command: &Command) -> Option<AbilityId> {
        match command {
            Command::CreateAbility(create) => Some(create.ability.id),
            _ => None,
        }
    }

    #[test]
    fn prerequisites_are_installed_first() {
        let catalog = ContentCatalog {
            abilities: vec![ability(3, &[2]), ability(2, &[1]), ability(1, &[])],
            ..ContentCatalog::new()
        };
        let order: Vec<_> = catalog
            .admin_commands()
            .iter()
            .filter_map(created_ability)
            .collect();
        assert_eq!(order, vec![AbilityId(1), AbilityId(2), AbilityId(3)]);
    }

    #[test]
    fn unresolved_prerequisites_keep_file_order_at_the_end() {
        let catalog = ContentCatalog {
            abilities: vec![ability(5, &[9]), ability(1, &[]), ability(6, &[5])],
            ..ContentCatalog::new()
        };
        let order: Vec<_> = catalog
            .admin_commands()
            .iter()
            .filter_map(created_ability)
            .collect();
        assert_eq!(order, vec![AbilityId(1), AbilityId(5), AbilityId(6)]);
    }

    #[test]
    fn kinds_are_installed_in_dependency_order() {
        let catalog = ContentCatalog {
            abilities: vec![ability(1, &[])],
            monsters: vec![Monster {
                id: MonsterId(1),
                name: "Wolf".into(),
                level: 1,
                health: 10,
                damage: 1,
                defense: 0,
                base_reward: 10,
                element: Element::Air,
                boss: false,
                required_items: Vec::new(),
                active: true,
                defensive_pool: Vec::new(),
                loot: None,
            }],
            combos: vec![
                ComboRule::new(&[Element::Fire, Element::Air], Multiplier::from_bps(12_000), 30)
                    .expect("rule"),
            ],
            hunts: vec![Hunt {
                id: HuntId(1),
                monster: MonsterId(1),
                kills_required: 1,
                time_limit: 60,
                reward_per_kill: 1,
                completion_bonus: 0,
                active: true,
            }],
            quests: Vec::new(),
        };
        assert_eq!(catalog.len(), 4);

        let names: Vec<_> = catalog.admin_commands().iter().map(Command::name).collect();
        assert_eq!(
            names,
            vec!["CreateAbility", "CreateMonster", "RegisterCombo", "CreateHunt"]
        );
    }
}
