//! Character-build ports: operations the host performs on the save state.

use spellwright_domain::{CharacterId, SpellLevel, Spellbook};

use super::error::PortError;

// =============================================================================
// Character Build Subsystem
// =============================================================================

/// The host's "learn spells gained on level-up" routine.
#[cfg_attr(test, mockall::automock)]
pub trait SpellLearnerPort: Send + Sync {
    /// Learn the spells a spellbook gains when its maximum spell level rises
    /// from `from` to `to`, following the host's class rules.
    ///
    /// Implementations must not re-add spells that are already known.
    fn learn_spells_on_raise(
        &self,
        spellbook: &mut Spellbook,
        from: SpellLevel,
        to: SpellLevel,
    ) -> Result<(), PortError>;
}

/// The host's spellbook deletion routine.
#[cfg_attr(test, mockall::automock)]
pub trait SpellbookRetirementPort: Send + Sync {
    /// Release a spellbook that was detached from `character`.
    fn retire_spellbook(
        &self,
        character: CharacterId,
        spellbook: &Spellbook,
    ) -> Result<(), PortError>;
}
