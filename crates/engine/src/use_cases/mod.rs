//! Use cases - Spell progression operations.
//!
//! Each module covers one engine capability. Use cases work on borrowed
//! save-state entities and reach the host only through ports.

pub mod caster_level;
pub mod classify;
pub mod merge;
pub mod reconcile;

// Re-export main types
pub use caster_level::{
    compute_caster_levels, real_caster_level, CasterLevelCalculator, CasterLevelError,
    CasterLevelTable,
};
pub use classify::{
    bonus_known_spells, count_externally_added_spells, count_real_spells_learned,
    count_real_spells_learned_for_class, is_externally_granted,
};
pub use merge::{mergeable_classes, MergeError, SpellbookMerger};
pub use reconcile::{SpellbookError, SpellbookReconciler};
