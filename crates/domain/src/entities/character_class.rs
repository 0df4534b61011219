//! Character class definitions and their spell progression rules.
//!
//! A class carries a small set of tagged rule objects that adjust how its
//! levels count toward caster level. New policies are added as new
//! [`SpellProgressionRule`] variants.

use serde::{Deserialize, Serialize};

use crate::ids::{CharacterClassId, FeatureId, SpellbookId};

/// A character class as defined by the host content database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CharacterClass {
    /// Unique identifier for this class
    pub id: CharacterClassId,
    /// Display name of the class
    pub name: String,
    /// Whether this is a mythic path
    #[serde(default)]
    pub is_mythic: bool,
    /// Whether this is a prestige class
    #[serde(default)]
    pub is_prestige: bool,
    /// Caster level adjustment rules
    #[serde(default)]
    pub spell_rules: Vec<SpellProgressionRule>,
}

impl CharacterClass {
    /// Create a base (non-mythic, non-prestige) class with no rules.
    pub fn new(id: CharacterClassId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_mythic: false,
            is_prestige: false,
            spell_rules: Vec::new(),
        }
    }

    /// Mark this class as a mythic path.
    pub fn mythic(mut self) -> Self {
        self.is_mythic = true;
        self
    }

    /// Mark this class as a prestige class.
    pub fn prestige(mut self) -> Self {
        self.is_prestige = true;
        self
    }

    /// Attach a spell progression rule.
    pub fn with_rule(mut self, rule: SpellProgressionRule) -> Self {
        self.spell_rules.push(rule);
        self
    }

    /// Number of configured skip-level thresholds crossed at `level`.
    ///
    /// Each crossed threshold costs one caster level.
    pub fn skipped_levels(&self, level: u32) -> u32 {
        self.spell_rules
            .iter()
            .filter_map(|rule| match rule {
                SpellProgressionRule::SkipLevels(thresholds) => Some(thresholds),
                SpellProgressionRule::PrestigeStart(_) => None,
            })
            .flatten()
            .filter(|threshold| level >= **threshold)
            .count() as u32
    }

    /// The class level from which caster levels start counting.
    ///
    /// Always 1 for non-prestige classes. Prestige classes start at the first
    /// level entry that offers a spellbook replacement through a feature
    /// selection, or 1 when no entry does.
    pub fn caster_level_start(&self) -> u32 {
        if !self.is_prestige {
            return 1;
        }
        self.spell_rules
            .iter()
            .find_map(|rule| match rule {
                SpellProgressionRule::PrestigeStart(entries) => entries
                    .iter()
                    .find(|entry| entry.offers_spellbook_replacement())
                    .map(|entry| entry.level),
                SpellProgressionRule::SkipLevels(_) => None,
            })
            .unwrap_or(1)
    }
}

/// A rule adjusting how class levels count toward caster level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum SpellProgressionRule {
    /// Class levels at which no caster level is gained
    SkipLevels(Vec<u32>),
    /// Level entries of a prestige class progression
    PrestigeStart(Vec<LevelEntry>),
}

/// Features granted at one level of a class progression.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LevelEntry {
    pub level: u32,
    #[serde(default)]
    pub features: Vec<ClassFeature>,
}

impl LevelEntry {
    pub fn new(level: u32, features: Vec<ClassFeature>) -> Self {
        Self { level, features }
    }

    /// Whether a feature selection at this level offers a spellbook replacement.
    ///
    /// Only replacements reachable through a selection count; a bare
    /// replacement feature does not mark the start of spellcasting.
    pub fn offers_spellbook_replacement(&self) -> bool {
        self.features.iter().any(|feature| match feature {
            ClassFeature::Selection { options, .. } => options
                .iter()
                .any(|option| matches!(option, ClassFeature::ReplaceSpellbook { .. })),
            _ => false,
        })
    }
}

/// A feature in a class progression.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClassFeature {
    /// Any feature that does not affect spellcasting
    Plain { id: FeatureId },
    /// Advances an existing spellbook in place of this class's own
    ReplaceSpellbook { id: FeatureId, spellbook: SpellbookId },
    /// A choice among several features
    Selection {
        id: FeatureId,
        options: Vec<ClassFeature>,
    },
}
