//! Spell descriptors and spell levels.
//!
//! Descriptors are read-only content supplied by the host's content database.
//! A descriptor does not know which lists it belongs to; spell lists are
//! queried per level through the content port.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::SpellId;

/// Highest spell level any spellbook can reach.
pub const MAX_SPELL_LEVEL: u8 = 9;

/// An ability descriptor as exposed by the host content database.
///
/// Only descriptors with `is_spell` set are spells; the rest are other
/// activatable abilities that share the same blueprint type in the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct SpellDescriptor {
    /// Unique identifier for this ability
    pub id: SpellId,
    /// Display name
    pub name: String,
    /// Whether this ability is a spell
    #[serde(default = "default_is_spell")]
    pub is_spell: bool,
}

fn default_is_spell() -> bool {
    true
}

impl SpellDescriptor {
    /// Create a spell descriptor.
    pub fn spell(id: SpellId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_spell: true,
        }
    }

    /// Create a non-spell ability descriptor.
    pub fn ability(id: SpellId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_spell: false,
        }
    }
}

/// Spell level representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SpellLevel {
    /// Cantrip / orison (level 0)
    Cantrip,
    /// Leveled spell (1-9)
    Level(u8),
}

impl SpellLevel {
    /// Convert to numeric level (cantrip = 0).
    pub fn as_number(&self) -> u8 {
        match self {
            SpellLevel::Cantrip => 0,
            SpellLevel::Level(n) => *n,
        }
    }

    fn from_clamped(level: u8) -> Self {
        match level.min(MAX_SPELL_LEVEL) {
            0 => SpellLevel::Cantrip,
            n => SpellLevel::Level(n),
        }
    }
}

impl TryFrom<u8> for SpellLevel {
    type Error = DomainError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if level > MAX_SPELL_LEVEL {
            return Err(DomainError::validation(format!(
                "spell level {level} is above the maximum of {MAX_SPELL_LEVEL}"
            )));
        }
        Ok(SpellLevel::from_clamped(level))
    }
}

impl From<SpellLevel> for u8 {
    fn from(level: SpellLevel) -> Self {
        level.as_number()
    }
}

impl std::fmt::Display for SpellLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpellLevel::Cantrip => write!(f, "cantrip"),
            SpellLevel::Level(n) => write!(f, "level {n}"),
        }
    }
}
