//! Class progression record of a character.

use serde::{Deserialize, Serialize};

use super::character_class::CharacterClass;
use crate::ids::{ArchetypeId, CharacterClassId, SpellbookId};

/// One class a character has levels in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassAssignment {
    class: CharacterClass,
    level: u32,
    /// Spellbook this class advances, if it casts
    spellbook: Option<SpellbookId>,
}

impl ClassAssignment {
    pub fn new(class: CharacterClass, level: u32) -> Self {
        Self {
            class,
            level,
            spellbook: None,
        }
    }

    pub fn with_spellbook(mut self, spellbook: SpellbookId) -> Self {
        self.spellbook = Some(spellbook);
        self
    }

    pub fn class(&self) -> &CharacterClass {
        &self.class
    }

    pub fn class_id(&self) -> CharacterClassId {
        self.class.id
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn spellbook(&self) -> Option<SpellbookId> {
        self.spellbook
    }

    pub fn is_mythic(&self) -> bool {
        self.class.is_mythic
    }

    pub fn is_prestige(&self) -> bool {
        self.class.is_prestige
    }

    /// Point this class at another spellbook.
    pub fn set_spellbook(&mut self, spellbook: Option<SpellbookId>) {
        self.spellbook = spellbook;
    }
}

/// The ordered class assignments and mythic rank of a character.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    /// Classes in the order they were acquired
    #[serde(default)]
    classes: Vec<ClassAssignment>,
    #[serde(default)]
    mythic_level: u32,
    #[serde(default)]
    archetypes: Vec<ArchetypeId>,
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, assignment: ClassAssignment) -> Self {
        self.classes.push(assignment);
        self
    }

    pub fn with_mythic_level(mut self, mythic_level: u32) -> Self {
        self.mythic_level = mythic_level;
        self
    }

    pub fn with_archetype(mut self, archetype: ArchetypeId) -> Self {
        self.archetypes.push(archetype);
        self
    }

    pub fn classes(&self) -> &[ClassAssignment] {
        &self.classes
    }

    pub fn mythic_level(&self) -> u32 {
        self.mythic_level
    }

    pub fn has_archetype(&self, archetype: ArchetypeId) -> bool {
        self.archetypes.contains(&archetype)
    }

    /// The assignment for `class`, if the character has levels in it.
    pub fn assignment(&self, class: CharacterClassId) -> Option<&ClassAssignment> {
        self.classes.iter().find(|a| a.class_id() == class)
    }

    /// Whether any assignment still references `spellbook`.
    pub fn references_spellbook(&self, spellbook: SpellbookId) -> bool {
        self.classes.iter().any(|a| a.spellbook == Some(spellbook))
    }

    /// Re-point every assignment using `from` to `to`. Returns how many moved.
    pub fn retarget_spellbook(&mut self, from: SpellbookId, to: SpellbookId) -> usize {
        let mut moved = 0;
        for assignment in self.classes.iter_mut().filter(|a| a.spellbook == Some(from)) {
            assignment.set_spellbook(Some(to));
            moved += 1;
        }
        moved
    }
}

/// The host's mythic-origin classes.
///
/// Levels in these classes are mythic rank credit rather than caster levels
/// of their own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionRoot {
    pub mythic_starting_class: CharacterClassId,
    pub mythic_companion_class: CharacterClassId,
}

impl ProgressionRoot {
    pub fn new(
        mythic_starting_class: CharacterClassId,
        mythic_companion_class: CharacterClassId,
    ) -> Self {
        Self {
            mythic_starting_class,
            mythic_companion_class,
        }
    }

    pub fn is_mythic_origin(&self, class: CharacterClassId) -> bool {
        class == self.mythic_starting_class || class == self.mythic_companion_class
    }
}
