//! Ability and combo loaders.

use std::path::Path;

use encounter_core::{Ability, ComboRule};

use crate::loaders::{Definition, LoadResult, load_definitions, read_ron};

impl Definition for Ability {
    const KIND: &'static str = "ability";

    fn id(&self) -> u32 {
        self.id.0
    }

    fn validate(&self) -> Result<(), &'static str> {
        Ability::validate(self)
    }
}

/// Loader for ability definitions from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// RON format: `Vec<Ability>`.
    pub fn load(path: &Path) -> LoadResult<Vec<Ability>> {
        load_definitions(path)
    }
}

/// Loader for combo rules from RON files.
pub struct ComboLoader;

impl ComboLoader {
    /// RON format: `Vec<ComboRule>`. Rules have no id; duplicates are allowed
    /// and the first registered match wins at cast time.
    pub fn load(path: &Path) -> LoadResult<Vec<ComboRule>> {
        let rules: Vec<ComboRule> = read_ron(path, "combo")?;
        for (index, rule) in rules.iter().enumerate() {
            rule.validate()
                .map_err(|reason| anyhow::anyhow!("Invalid combo #{}: {}", index, reason))?;
        }
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use encounter_core::{AbilityId, Element, Multiplier};

    use super::*;
    use crate::loaders::testing::write;

    const ABILITIES: &str = r#"[
        (
            id: 1,
            name: "Ember",
            category: Damage,
            element: Fire,
            power: 40,
            duration: 0,
            cooldown: 10,
            area: false,
            charge_required: 0,
            prerequisites: [],
            active: true,
        ),
        (
            id: 2,
            name: "Scorch",
            category: DamageOverTime,
            element: Fire,
            power: 15,
            duration: 30,
            cooldown: 20,
            area: false,
            charge_required: 1,
            prerequisites: [1],
            active: true,
        ),
    ]"#;

    #[test]
    fn loads_abilities() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "abilities.ron", ABILITIES);

        let abilities = AbilityLoader::load(&path).expect("load");
        assert_eq!(abilities.len(), 2);
        assert_eq!(abilities[1].prerequisites, vec![AbilityId(1)]);
    }

    #[test]
    fn rejects_status_ability_without_duration() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "abilities.ron", &ABILITIES.replace("duration: 30", "duration: 0"));

        let error = AbilityLoader::load(&path).expect_err("invalid");
        assert!(error.to_string().contains("ability 2"), "{error}");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "abilities.ron", &ABILITIES.replace("id: 2", "id: 1"));

        let error = AbilityLoader::load(&path).expect_err("duplicate");
        assert!(error.to_string().contains("Duplicate ability id 1"), "{error}");
    }

    #[test]
    fn loads_combo_rules() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            &dir,
            "combos.ron",
            "[(elements: [Fire, Earth], bonus: 15000, window: 60)]",
        );

        let rules = ComboLoader::load(&path).expect("load");
        assert_eq!(rules[0].elements.as_slice(), &[Element::Fire, Element::Earth]);
        assert_eq!(rules[0].bonus, Multiplier::from_bps(15_000));
    }

    #[test]
    fn rejects_single_element_combo() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(&dir, "combos.ron", "[(elements: [Fire], bonus: 15000, window: 60)]");

        assert!(ComboLoader::load(&path).is_err());
    }
}
