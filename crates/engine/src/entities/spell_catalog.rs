//! Spell catalog - memoized lookup of every spell available at a level.
//!
//! The catalog is created once game content has loaded and is shared by
//! reference. Results are cached per level for the life of the catalog.
//! Nothing invalidates them automatically: whoever reloads content (a mod or
//! ruleset change) must call [`SpellCatalog::clear`] or keep serving stale
//! spell lists.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use spellwright_domain::{DomainError, SpellDescriptor, SpellLevel};

use crate::infrastructure::ports::SpellContentPort;

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogLevel {
    /// Every spell regardless of level
    AllLevels,
    /// Spells offered at one spell level by any spell list
    Level(SpellLevel),
}

impl CatalogLevel {
    /// Parse the host's raw level convention where -1 means all levels.
    pub fn from_raw(level: i32) -> Result<Self, DomainError> {
        if level == -1 {
            return Ok(CatalogLevel::AllLevels);
        }
        let level = u8::try_from(level)
            .map_err(|_| DomainError::validation(format!("invalid catalog level {level}")))?;
        Ok(CatalogLevel::Level(SpellLevel::try_from(level)?))
    }
}

impl From<SpellLevel> for CatalogLevel {
    fn from(level: SpellLevel) -> Self {
        CatalogLevel::Level(level)
    }
}

/// Memoized view over every spell list in the loaded content.
pub struct SpellCatalog {
    content: Arc<dyn SpellContentPort>,
    entries: DashMap<CatalogLevel, Arc<[SpellDescriptor]>>,
}

impl SpellCatalog {
    pub fn new(content: Arc<dyn SpellContentPort>) -> Self {
        Self {
            content,
            entries: DashMap::new(),
        }
    }

    /// All spells at `level`, computed on first use and cached afterwards.
    ///
    /// Per-level results are the deduplicated union of every spellbook's
    /// spell list followed by every mythic spell list. Empty results are not
    /// cached so a lookup made before content finishes loading is retried.
    pub fn all_spells_at_level(&self, level: impl Into<CatalogLevel>) -> Arc<[SpellDescriptor]> {
        let level = level.into();
        if let Some(hit) = self.entries.get(&level) {
            return Arc::clone(hit.value());
        }

        let spells: Arc<[SpellDescriptor]> = self.compute(level).into();
        if !spells.is_empty() {
            self.entries.insert(level, Arc::clone(&spells));
        }
        spells
    }

    /// Drop every cached lookup.
    pub fn clear(&self) {
        let dropped = self.entries.len();
        self.entries.clear();
        tracing::info!(dropped, "Cleared spell catalog cache");
    }

    /// Number of cached levels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn compute(&self, level: CatalogLevel) -> Vec<SpellDescriptor> {
        match level {
            CatalogLevel::AllLevels => self
                .content
                .all_abilities()
                .into_iter()
                .filter(|ability| ability.is_spell)
                .collect(),
            CatalogLevel::Level(level) => {
                let blueprints = self.content.spellbook_blueprints();
                let normal = blueprints
                    .iter()
                    .flat_map(|bp| self.content.spells_in_list(bp.spell_list, level));
                let mythic: Vec<SpellDescriptor> = blueprints
                    .iter()
                    .filter_map(|bp| bp.mythic_spell_list)
                    .flat_map(|list| self.content.spells_in_list(list, level))
                    .collect();

                let mut seen = HashSet::new();
                let spells: Vec<SpellDescriptor> = normal
                    .chain(mythic)
                    .filter(|spell| seen.insert(spell.id))
                    .collect();
                tracing::debug!(
                    level = %level,
                    spellbooks = blueprints.len(),
                    spells = spells.len(),
                    "Built spell catalog entry"
                );
                spells
            }
        }
    }
}
