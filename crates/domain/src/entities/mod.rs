//! Domain entities - Save-state objects with identity

mod character;
mod character_class;
mod progression;
mod spell;
mod spellbook;

pub use character::{Character, KnownSpellGrant};
pub use character_class::{CharacterClass, ClassFeature, LevelEntry, SpellProgressionRule};
pub use progression::{ClassAssignment, Progression, ProgressionRoot};
pub use spell::{SpellDescriptor, SpellLevel, MAX_SPELL_LEVEL};
pub use spellbook::{
    ExternalGrant, KnownSpell, SpellProgression, Spellbook, SpellbookBlueprint, SpellbookType,
};
