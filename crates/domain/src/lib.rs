extern crate self as spellwright_domain;

pub mod entities;
pub mod error;
pub mod ids;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    Character, CharacterClass, ClassAssignment, ClassFeature, ExternalGrant, KnownSpell,
    KnownSpellGrant, LevelEntry, Progression, ProgressionRoot, SpellDescriptor, SpellLevel,
    SpellProgression, SpellProgressionRule, Spellbook, SpellbookBlueprint, SpellbookType,
    MAX_SPELL_LEVEL,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{
    ArchetypeId, CharacterClassId, CharacterId, FeatureId, ItemId, SpellId, SpellListId,
    SpellbookId,
};
