//! Known-spell reconciliation.
//!
//! Keeps a spellbook's known spells consistent with its level. Raising a
//! level delegates to the host's auto-learn routine when the highest
//! castable spell level rises. Lowering a level forgets everything known at
//! the spell level that became uncastable. The two are deliberately not
//! inverses: spells forgotten on the way down are not restored on the way
//! back up, only whatever the host auto-learns.
//!
//! Clamping (never below 0, never above the class maximum) is left to the
//! caller.

use std::sync::Arc;

use spellwright_domain::{KnownSpell, SpellDescriptor, SpellId, SpellLevel, Spellbook};

use crate::entities::SpellCatalog;
use crate::infrastructure::ports::{PortError, SpellContentPort, SpellLearnerPort};
use crate::infrastructure::settings::EngineSettings;

/// Errors from known-spell reconciliation.
#[derive(Debug, thiserror::Error)]
pub enum SpellbookError {
    #[error("Caster level can only step by +1 or -1, got {0}")]
    InconsistentLevelStep(i32),
    #[error(transparent)]
    Port(#[from] PortError),
}

/// Level stepping and known-spell bookkeeping for spellbooks.
pub struct SpellbookReconciler {
    learner: Arc<dyn SpellLearnerPort>,
    content: Arc<dyn SpellContentPort>,
    catalog: Arc<SpellCatalog>,
    settings: EngineSettings,
}

impl SpellbookReconciler {
    pub fn new(
        learner: Arc<dyn SpellLearnerPort>,
        content: Arc<dyn SpellContentPort>,
        catalog: Arc<SpellCatalog>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            learner,
            content,
            catalog,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Raise the base level by one, auto-learning if a spell level opened up.
    ///
    /// Not atomic: the level is raised before the host learns, so if the
    /// learner fails the error is returned and the base level stays raised.
    pub fn raise_level(&self, spellbook: &mut Spellbook) -> Result<(), SpellbookError> {
        let old_max = spellbook.max_spell_level();
        spellbook.set_base_level(spellbook.base_level().saturating_add(1));
        self.learn_if_raised(spellbook, old_max)
    }

    /// Lower the base level by one, forgetting every spell known at the old
    /// maximum spell level if it is no longer castable. Spells also known at
    /// other levels stay known there.
    ///
    /// Returns the number of spells forgotten.
    pub fn lower_level(&self, spellbook: &mut Spellbook) -> usize {
        let old_max = spellbook.max_spell_level();
        spellbook.set_base_level(spellbook.base_level().saturating_sub(1));
        let new_max = spellbook.max_spell_level();

        let mut removed = 0;
        if new_max < old_max {
            removed = Self::remove_spells_of_level(spellbook, old_max);
        }
        tracing::debug!(
            spellbook = %spellbook.blueprint().name,
            base_level = spellbook.base_level(),
            max_spell_level = %new_max,
            removed,
            "Lowered spellbook level"
        );
        removed
    }

    /// Step the base level by `delta`, which must be +1 or -1.
    ///
    /// Any other delta is rejected before the spellbook is touched.
    pub fn step_level(&self, spellbook: &mut Spellbook, delta: i32) -> Result<(), SpellbookError> {
        match delta {
            1 => self.raise_level(spellbook),
            -1 => {
                self.lower_level(spellbook);
                Ok(())
            }
            other => Err(SpellbookError::InconsistentLevelStep(other)),
        }
    }

    /// Raise the mythic level by one, auto-learning if a spell level opened up.
    ///
    /// Like [`raise_level`](Self::raise_level), the mythic level stays raised
    /// when the learner fails.
    pub fn raise_mythic_level(&self, spellbook: &mut Spellbook) -> Result<(), SpellbookError> {
        let old_max = spellbook.max_spell_level();
        spellbook.set_mythic_level(spellbook.mythic_level().saturating_add(1));
        self.learn_if_raised(spellbook, old_max)
    }

    /// Learn every spell offered at `level`.
    ///
    /// Spells come from the spellbook's own list, or from every spell list in
    /// the game (normal and mythic) when `show_from_all_spellbooks` is set.
    /// Returns the number of spells newly learned.
    pub fn add_all_spells_of_level(&self, spellbook: &mut Spellbook, level: SpellLevel) -> usize {
        let offered: Vec<SpellId> = if self.settings.show_from_all_spellbooks {
            self.catalog
                .all_spells_at_level(level)
                .iter()
                .map(|spell| spell.id)
                .collect()
        } else {
            self.content
                .spells_in_list(spellbook.blueprint().spell_list, level)
                .into_iter()
                .map(|spell| spell.id)
                .collect()
        };
        let added = Self::add_spells(spellbook, level, offered);
        tracing::info!(
            spellbook = %spellbook.blueprint().name,
            level = %level,
            added,
            all_spellbooks = self.settings.show_from_all_spellbooks,
            "Added all spells of level"
        );
        added
    }

    /// Spells of the spellbook's own list at `level` that it does not know yet.
    pub fn learnable_spells_of_level(
        &self,
        spellbook: &Spellbook,
        level: SpellLevel,
    ) -> Vec<SpellDescriptor> {
        self.content
            .spells_in_list(spellbook.blueprint().spell_list, level)
            .into_iter()
            .filter(|spell| !spellbook.is_known(spell.id))
            .collect()
    }

    /// Learn each of `spells` at `level` unless already known.
    pub fn add_spells(
        spellbook: &mut Spellbook,
        level: SpellLevel,
        spells: impl IntoIterator<Item = SpellId>,
    ) -> usize {
        spells
            .into_iter()
            .filter(|spell| Self::add_if_unknown(spellbook, level, *spell))
            .count()
    }

    /// Learn `spell` at `level` unless it is known at any level.
    pub fn add_if_unknown(spellbook: &mut Spellbook, level: SpellLevel, spell: SpellId) -> bool {
        if spellbook.is_known(spell) {
            return false;
        }
        spellbook.add_known(level, KnownSpell::learned(spell))
    }

    /// Forget every spell known at `level`.
    ///
    /// Works from a snapshot of the level, so each spell is removed exactly
    /// once. Entries for the same spell at other levels are left alone.
    pub fn remove_spells_of_level(spellbook: &mut Spellbook, level: SpellLevel) -> usize {
        let snapshot: Vec<SpellId> = spellbook
            .known_spells(level)
            .iter()
            .map(KnownSpell::spell)
            .collect();
        snapshot
            .into_iter()
            .filter(|spell| spellbook.remove_known(level, *spell))
            .count()
    }

    fn learn_if_raised(
        &self,
        spellbook: &mut Spellbook,
        old_max: SpellLevel,
    ) -> Result<(), SpellbookError> {
        let new_max = spellbook.max_spell_level();
        if new_max > old_max {
            self.learner
                .learn_spells_on_raise(spellbook, old_max, new_max)?;
        }
        tracing::debug!(
            spellbook = %spellbook.blueprint().name,
            base_level = spellbook.base_level(),
            mythic_level = spellbook.mythic_level(),
            max_spell_level = %new_max,
            "Raised spellbook level"
        );
        Ok(())
    }
}
