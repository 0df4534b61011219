//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Content lookups (spell lists, spellbook definitions, abilities)
//! - The host's character-build routines (auto-learn on level-up, spellbook deletion)

mod character_build;
mod content;
mod error;

pub use character_build::{SpellLearnerPort, SpellbookRetirementPort};
pub use content::SpellContentPort;
pub use error::PortError;

#[cfg(test)]
pub use character_build::{MockSpellLearnerPort, MockSpellbookRetirementPort};
#[cfg(test)]
pub use content::MockSpellContentPort;
