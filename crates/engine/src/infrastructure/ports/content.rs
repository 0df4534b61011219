//! Content database port.

use spellwright_domain::{SpellDescriptor, SpellLevel, SpellListId, SpellbookBlueprint};

// =============================================================================
// Content Database
// =============================================================================

/// Read-only access to the host's loaded game content.
#[cfg_attr(test, mockall::automock)]
pub trait SpellContentPort: Send + Sync {
    /// Every spellbook definition in the loaded content.
    fn spellbook_blueprints(&self) -> Vec<SpellbookBlueprint>;

    /// Spells a list offers at `level`.
    fn spells_in_list(&self, list: SpellListId, level: SpellLevel) -> Vec<SpellDescriptor>;

    /// Every ability descriptor, spells and non-spells alike.
    fn all_abilities(&self) -> Vec<SpellDescriptor>;
}
