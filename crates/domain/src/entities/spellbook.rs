//! Spellbooks and the spells known in them.
//!
//! A [`SpellbookBlueprint`] is the immutable definition shipped with the game
//! content. A [`Spellbook`] is the per-character instance living in the save
//! state: it tracks the base level, mythic level, auxiliary spell lists and the
//! known spells keyed by spell level.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::spell::{SpellLevel, MAX_SPELL_LEVEL};
use crate::error::DomainError;
use crate::ids::{CharacterClassId, ItemId, SpellId, SpellListId, SpellbookId};

/// Whether a spellbook follows the normal or the mythic progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpellbookType {
    #[default]
    Normal,
    Mythic,
}

impl SpellbookType {
    pub fn is_mythic(&self) -> bool {
        matches!(self, SpellbookType::Mythic)
    }
}

impl std::fmt::Display for SpellbookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpellbookType::Normal => write!(f, "normal"),
            SpellbookType::Mythic => write!(f, "mythic"),
        }
    }
}


/// How a spellbook turns caster level into the highest castable spell level.
///
/// Deserializing goes through [`SpellProgression::table`], so a table loaded
/// from host data obeys the same rules as one built in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "levels",
    rename_all = "camelCase",
    try_from = "RawSpellProgression"
)]
pub enum SpellProgression {
    /// Prepared nine-level casters: a new spell level every odd caster level
    Full,
    /// Spontaneous nine-level casters: a new spell level every even caster level
    Spontaneous,
    /// Four-level casters: first spells at caster level 4
    Partial,
    /// Explicit maximum spell level per caster level, starting at caster level 0
    Table(Vec<u8>),
}

/// Wire shape of [`SpellProgression`] before validation.
#[derive(Deserialize)]
#[serde(tag = "type", content = "levels", rename_all = "camelCase")]
enum RawSpellProgression {
    Full,
    Spontaneous,
    Partial,
    Table(Vec<u8>),
}

impl TryFrom<RawSpellProgression> for SpellProgression {
    type Error = DomainError;

    fn try_from(raw: RawSpellProgression) -> Result<Self, Self::Error> {
        match raw {
            RawSpellProgression::Full => Ok(SpellProgression::Full),
            RawSpellProgression::Spontaneous => Ok(SpellProgression::Spontaneous),
            RawSpellProgression::Partial => Ok(SpellProgression::Partial),
            RawSpellProgression::Table(levels) => SpellProgression::table(levels),
        }
    }
}

impl SpellProgression {
    /// Build a table progression.
    ///
    /// The table must be non-empty, never exceed level 9, and rise by at most
    /// one spell level per caster level.
    pub fn table(levels: Vec<u8>) -> Result<Self, DomainError> {
        if levels.is_empty() {
            return Err(DomainError::validation("spell progression table is empty"));
        }
        for (caster_level, pair) in levels.windows(2).enumerate() {
            let (prev, next) = (pair[0], pair[1]);
            if next < prev || next - prev > 1 {
                return Err(DomainError::validation(format!(
                    "spell progression table steps from {prev} to {next} at caster level {}",
                    caster_level + 1
                )));
            }
        }
        if levels.iter().any(|level| *level > MAX_SPELL_LEVEL) {
            return Err(DomainError::validation(
                "spell progression table exceeds spell level 9",
            ));
        }
        Ok(SpellProgression::Table(levels))
    }

    /// Highest spell level castable at `caster_level`.
    pub fn max_spell_level(&self, caster_level: i32) -> SpellLevel {
        let cl = caster_level.max(0) as u32;
        let raw = match self {
            SpellProgression::Full => (cl + 1) / 2,
            SpellProgression::Spontaneous if cl == 0 => 0,
            SpellProgression::Spontaneous => (cl / 2).max(1),
            SpellProgression::Partial if cl < 4 => 0,
            SpellProgression::Partial => ((cl - 1) / 3).min(4),
            SpellProgression::Table(levels) => levels
                .get(cl as usize)
                .or_else(|| levels.last())
                .copied()
                .map(u32::from)
                .unwrap_or(0),
        };
        let capped = raw.min(u32::from(MAX_SPELL_LEVEL)) as u8;
        SpellLevel::try_from(capped).unwrap_or(SpellLevel::Level(MAX_SPELL_LEVEL))
    }
}

/// Immutable spellbook definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellbookBlueprint {
    pub id: SpellbookId,
    pub name: String,
    /// Definition type; a blueprint of Mythic type is a standalone mythic spellbook
    #[serde(default)]
    pub kind: SpellbookType,
    /// Class this spellbook belongs to, if any
    pub character_class: Option<CharacterClassId>,
    #[serde(default)]
    pub caster_level_modifier: i32,
    pub progression: SpellProgression,
    /// Primary spell list
    pub spell_list: SpellListId,
    /// Spell list drawn from at mythic ranks
    pub mythic_spell_list: Option<SpellListId>,
}

impl SpellbookBlueprint {
    pub fn new(
        name: impl Into<String>,
        progression: SpellProgression,
        spell_list: SpellListId,
    ) -> Self {
        Self {
            id: SpellbookId::new(),
            name: name.into(),
            kind: SpellbookType::Normal,
            character_class: None,
            caster_level_modifier: 0,
            progression,
            spell_list,
            mythic_spell_list: None,
        }
    }

    pub fn with_kind(mut self, kind: SpellbookType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_class(mut self, class: CharacterClassId) -> Self {
        self.character_class = Some(class);
        self
    }

    pub fn with_caster_level_modifier(mut self, modifier: i32) -> Self {
        self.caster_level_modifier = modifier;
        self
    }

    pub fn with_mythic_spell_list(mut self, list: SpellListId) -> Self {
        self.mythic_spell_list = Some(list);
        self
    }

    pub fn is_mythic(&self) -> bool {
        self.kind.is_mythic()
    }
}

/// Flags recording how a known spell was obtained outside class progression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalGrant {
    #[serde(default)]
    pub temporary: bool,
    #[serde(default)]
    pub copied_from_scroll: bool,
    #[serde(default)]
    pub from_mythic_list: bool,
    /// Item that grants the spell (equipment, wand, staff...)
    pub source_item: Option<ItemId>,
    /// Spell merged in from a combined theurge list
    #[serde(default)]
    pub combined_theurge: bool,
}

impl ExternalGrant {
    /// Organically learned through class progression.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn temporary() -> Self {
        Self {
            temporary: true,
            ..Self::default()
        }
    }

    pub fn scroll() -> Self {
        Self {
            copied_from_scroll: true,
            ..Self::default()
        }
    }

    pub fn mythic_list() -> Self {
        Self {
            from_mythic_list: true,
            ..Self::default()
        }
    }

    pub fn item(item: ItemId) -> Self {
        Self {
            source_item: Some(item),
            ..Self::default()
        }
    }

    pub fn combined_theurge() -> Self {
        Self {
            combined_theurge: true,
            ..Self::default()
        }
    }

    /// True if any flag is set.
    pub fn is_external(&self) -> bool {
        self.temporary
            || self.copied_from_scroll
            || self.from_mythic_list
            || self.source_item.is_some()
            || self.combined_theurge
    }
}

/// A spell known in a spellbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownSpell {
    spell: SpellId,
    #[serde(default)]
    grant: ExternalGrant,
}

impl KnownSpell {
    /// A spell learned through class progression.
    pub fn learned(spell: SpellId) -> Self {
        Self {
            spell,
            grant: ExternalGrant::none(),
        }
    }

    /// A spell obtained some other way.
    pub fn granted(spell: SpellId, grant: ExternalGrant) -> Self {
        Self { spell, grant }
    }

    pub fn spell(&self) -> SpellId {
        self.spell
    }

    pub fn grant(&self) -> &ExternalGrant {
        &self.grant
    }

    pub fn is_external(&self) -> bool {
        self.grant.is_external()
    }
}

/// A character's spellbook instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spellbook {
    blueprint: SpellbookBlueprint,
    /// Runtime type; a merge can turn a normal spellbook mythic
    kind: SpellbookType,
    #[serde(default)]
    base_level: i32,
    #[serde(default)]
    mythic_level: u32,
    #[serde(default)]
    special_lists: BTreeSet<SpellListId>,
    /// Known spells by spell level (0-9)
    #[serde(default)]
    known: BTreeMap<u8, Vec<KnownSpell>>,
}

impl Spellbook {
    /// Create an empty spellbook at base level 0.
    pub fn new(blueprint: SpellbookBlueprint) -> Self {
        Self {
            kind: blueprint.kind,
            blueprint,
            base_level: 0,
            mythic_level: 0,
            special_lists: BTreeSet::new(),
            known: BTreeMap::new(),
        }
    }

    // Builder-style methods

    pub fn with_base_level(mut self, base_level: i32) -> Self {
        self.base_level = base_level;
        self
    }

    pub fn with_mythic_level(mut self, mythic_level: u32) -> Self {
        self.mythic_level = mythic_level;
        self
    }

    pub fn with_known(mut self, level: SpellLevel, spell: KnownSpell) -> Self {
        self.add_known(level, spell);
        self
    }

    // Read-only accessors

    pub fn id(&self) -> SpellbookId {
        self.blueprint.id
    }

    pub fn blueprint(&self) -> &SpellbookBlueprint {
        &self.blueprint
    }

    pub fn kind(&self) -> SpellbookType {
        self.kind
    }

    pub fn base_level(&self) -> i32 {
        self.base_level
    }

    pub fn mythic_level(&self) -> u32 {
        self.mythic_level
    }

    pub fn special_lists(&self) -> &BTreeSet<SpellListId> {
        &self.special_lists
    }

    /// Whether the definition itself is a mythic spellbook (not one made
    /// mythic by a merge).
    pub fn is_standalone_mythic(&self) -> bool {
        self.blueprint.is_mythic()
    }

    /// Effective caster level of this instance, never below 0.
    pub fn caster_level(&self) -> i32 {
        let mythic_bonus = if self.kind.is_mythic() {
            i32::try_from(self.mythic_level)
                .unwrap_or(i32::MAX)
                .saturating_mul(2)
        } else {
            0
        };
        self.base_level
            .saturating_add(self.blueprint.caster_level_modifier)
            .saturating_add(mythic_bonus)
            .max(0)
    }

    /// Highest spell level castable at the current caster level.
    pub fn max_spell_level(&self) -> SpellLevel {
        self.blueprint.progression.max_spell_level(self.caster_level())
    }

    /// Known spells at `level`.
    pub fn known_spells(&self, level: SpellLevel) -> &[KnownSpell] {
        self.known
            .get(&level.as_number())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `spell` is known at any level.
    pub fn is_known(&self, spell: SpellId) -> bool {
        self.known
            .values()
            .any(|spells| spells.iter().any(|known| known.spell == spell))
    }

    // Mutation methods

    pub fn set_base_level(&mut self, base_level: i32) {
        self.base_level = base_level;
    }

    pub fn set_mythic_level(&mut self, mythic_level: u32) {
        self.mythic_level = mythic_level;
    }

    pub fn set_kind(&mut self, kind: SpellbookType) {
        self.kind = kind;
    }

    /// Attach an auxiliary spell list. Returns false if already attached.
    pub fn add_special_list(&mut self, list: SpellListId) -> bool {
        self.special_lists.insert(list)
    }

    /// Add a known spell at `level`. Returns false if that spell is already
    /// known at that level.
    pub fn add_known(&mut self, level: SpellLevel, spell: KnownSpell) -> bool {
        let spells = self.known.entry(level.as_number()).or_default();
        if spells.iter().any(|known| known.spell == spell.spell) {
            return false;
        }
        spells.push(spell);
        true
    }

    /// Forget `spell` at `level` only. Returns true if it was known there.
    pub fn remove_known(&mut self, level: SpellLevel, spell: SpellId) -> bool {
        let key = level.as_number();
        let Some(spells) = self.known.get_mut(&key) else {
            return false;
        };
        let before = spells.len();
        spells.retain(|known| known.spell != spell);
        let removed = spells.len() != before;
        if spells.is_empty() {
            self.known.remove(&key);
        }
        removed
    }
}
