//! Spellbook merging.
//!
//! Folds a standalone mythic spellbook (the one a mythic path grants) into
//! another spellbook of the same character. The target becomes a mythic
//! spellbook, gains the mythic spell list, catches up to the character's
//! mythic level and takes over every class that cast from the source. The
//! source is then removed and handed back to the host.

use std::sync::Arc;

use spellwright_domain::{
    Character, CharacterClassId, ClassAssignment, SpellbookId, SpellbookType,
};

use super::reconcile::{SpellbookError, SpellbookReconciler};
use crate::infrastructure::ports::{PortError, SpellbookRetirementPort};

/// Errors from merging spellbooks.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Character has no spellbook {0}")]
    InvalidReference(SpellbookId),
    #[error("Class {0} does not cast from a standalone mythic spellbook")]
    NotMythic(CharacterClassId),
    #[error("Cannot merge spellbook {0} into itself")]
    SameSpellbook(SpellbookId),
    #[error("Failed to raise mythic level: {0}")]
    Step(#[from] SpellbookError),
    #[error("Failed to retire spellbook: {0}")]
    Port(#[from] PortError),
}

pub struct SpellbookMerger {
    reconciler: Arc<SpellbookReconciler>,
    retirement: Arc<dyn SpellbookRetirementPort>,
}

impl SpellbookMerger {
    pub fn new(
        reconciler: Arc<SpellbookReconciler>,
        retirement: Arc<dyn SpellbookRetirementPort>,
    ) -> Self {
        Self {
            reconciler,
            retirement,
        }
    }

    /// Merge the mythic spellbook of `source_class` into `target`.
    ///
    /// All preconditions are checked before anything changes. After that the
    /// steps run in order and stop at the first failure, leaving the steps
    /// already taken in place.
    pub fn merge_mythic_spellbook(
        &self,
        character: &mut Character,
        target: SpellbookId,
        source_class: CharacterClassId,
    ) -> Result<(), MergeError> {
        let source = validate(character, target, source_class)?;

        let retargeted = character.progression_mut().retarget_spellbook(source, target);
        let mythic_list = character
            .spellbook(source)
            .and_then(|sb| sb.blueprint().mythic_spell_list);
        let goal = character.progression().mythic_level();

        let target_book = character
            .spellbook_mut(target)
            .ok_or(MergeError::InvalidReference(target))?;
        target_book.set_kind(SpellbookType::Mythic);
        if let Some(list) = mythic_list {
            target_book.add_special_list(list);
        }
        while target_book.mythic_level() < goal {
            self.reconciler.raise_mythic_level(target_book)?;
        }
        let mythic_level = target_book.mythic_level();

        if let Some(retired) = character.remove_spellbook(source) {
            self.retirement.retire_spellbook(character.id(), &retired)?;
        }

        tracing::info!(
            character = %character.name(),
            target_spellbook = %target,
            source_spellbook = %source,
            retargeted,
            mythic_level,
            "Merged mythic spellbook"
        );
        Ok(())
    }
}

/// Resolve the source spellbook and check every merge precondition.
fn validate(
    character: &Character,
    target: SpellbookId,
    source_class: CharacterClassId,
) -> Result<SpellbookId, MergeError> {
    character
        .spellbook(target)
        .ok_or(MergeError::InvalidReference(target))?;

    let source = character
        .progression()
        .assignment(source_class)
        .and_then(ClassAssignment::spellbook)
        .ok_or(MergeError::NotMythic(source_class))?;
    let source_book = character
        .spellbook(source)
        .ok_or(MergeError::InvalidReference(source))?;

    if !source_book.is_standalone_mythic() {
        return Err(MergeError::NotMythic(source_class));
    }
    if source == target {
        return Err(MergeError::SameSpellbook(target));
    }
    Ok(source)
}

/// Classes casting from a standalone mythic spellbook tied to a class.
///
/// These are the classes whose spellbook can be merged into another one.
pub fn mergeable_classes(character: &Character) -> Vec<&ClassAssignment> {
    character
        .progression()
        .classes()
        .iter()
        .filter(|assignment| {
            assignment
                .spellbook()
                .and_then(|id| character.spellbook(id))
                .is_some_and(|sb| {
                    sb.is_standalone_mythic() && sb.blueprint().character_class.is_some()
                })
        })
        .collect()
}
