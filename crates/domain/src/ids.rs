//! Identifier newtypes.
//!
//! Host save data keys everything by GUID; each kind of id gets its own type
//! so a spellbook id can never be passed where a spell id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Save-state entity IDs
define_id!(CharacterId);
define_id!(SpellbookId);

// Content (blueprint) IDs
define_id!(CharacterClassId);
define_id!(ArchetypeId);
define_id!(SpellListId);
define_id!(SpellId);
define_id!(FeatureId);

// Item IDs (source of item-granted spells)
define_id!(ItemId);
