//! Character aggregate as seen by the spell engine.
//!
//! Only the parts of the save state the engine reads or adjusts are modeled:
//! the progression record, the spellbook instances, and the "bonus known
//! spell" facts granted by classes and archetypes.

use serde::{Deserialize, Serialize};

use super::progression::Progression;
use super::spellbook::Spellbook;
use crate::ids::{ArchetypeId, CharacterClassId, CharacterId, SpellId, SpellbookId};

/// A fact granting a known spell to a class (optionally only for an archetype).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KnownSpellGrant {
    pub spell: SpellId,
    pub character_class: CharacterClassId,
    pub archetype: Option<ArchetypeId>,
}

impl KnownSpellGrant {
    pub fn new(spell: SpellId, character_class: CharacterClassId) -> Self {
        Self {
            spell,
            character_class,
            archetype: None,
        }
    }

    pub fn for_archetype(mut self, archetype: ArchetypeId) -> Self {
        self.archetype = Some(archetype);
        self
    }
}

/// A character in the loaded save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    id: CharacterId,
    name: String,
    #[serde(default)]
    progression: Progression,
    #[serde(default)]
    spellbooks: Vec<Spellbook>,
    #[serde(default)]
    known_spell_grants: Vec<KnownSpellGrant>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            progression: Progression::default(),
            spellbooks: Vec::new(),
            known_spell_grants: Vec::new(),
        }
    }

    // Builder-style methods

    pub fn with_progression(mut self, progression: Progression) -> Self {
        self.progression = progression;
        self
    }

    /// Add a spellbook; a spellbook with the same id is replaced.
    pub fn with_spellbook(mut self, spellbook: Spellbook) -> Self {
        self.spellbooks.retain(|sb| sb.id() != spellbook.id());
        self.spellbooks.push(spellbook);
        self
    }

    pub fn with_known_spell_grant(mut self, grant: KnownSpellGrant) -> Self {
        self.known_spell_grants.push(grant);
        self
    }

    // Read-only accessors

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn known_spell_grants(&self) -> &[KnownSpellGrant] {
        &self.known_spell_grants
    }

    pub fn spellbook(&self, id: SpellbookId) -> Option<&Spellbook> {
        self.spellbooks.iter().find(|sb| sb.id() == id)
    }

    // Mutation methods

    pub fn progression_mut(&mut self) -> &mut Progression {
        &mut self.progression
    }

    pub fn spellbook_mut(&mut self, id: SpellbookId) -> Option<&mut Spellbook> {
        self.spellbooks.iter_mut().find(|sb| sb.id() == id)
    }

    /// Detach a spellbook from the character and hand it back.
    pub fn remove_spellbook(&mut self, id: SpellbookId) -> Option<Spellbook> {
        let index = self.spellbooks.iter().position(|sb| sb.id() == id)?;
        Some(self.spellbooks.remove(index))
    }
}
