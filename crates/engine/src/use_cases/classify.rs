//! External-grant classification.
//!
//! Tells spells a character learned through class progression apart from
//! spells that showed up some other way (scrolls, items, temporary effects,
//! mythic lists, combined theurge, class or archetype bonus grants). Only
//! the former count against the number of spells a class may learn.

use std::collections::HashSet;

use spellwright_domain::{Character, KnownSpell, SpellId, SpellLevel, Spellbook, SpellbookId};

/// Whether `spell` was obtained outside of class progression.
pub fn is_externally_granted(spell: &KnownSpell) -> bool {
    spell.grant().is_external()
}

/// Distinct spells at `level` that were learned organically, minus `ignore`.
pub fn count_real_spells_learned(
    spellbook: &Spellbook,
    level: SpellLevel,
    ignore: &HashSet<SpellId>,
) -> usize {
    spellbook
        .known_spells(level)
        .iter()
        .filter(|known| !is_externally_granted(known))
        .map(KnownSpell::spell)
        .filter(|spell| !ignore.contains(spell))
        .collect::<HashSet<_>>()
        .len()
}

/// Like [`count_real_spells_learned`], ignoring the spells the character's
/// classes and archetypes grant as bonus known spells for this spellbook.
pub fn count_real_spells_learned_for_class(
    character: &Character,
    spellbook: &Spellbook,
    level: SpellLevel,
) -> usize {
    let ignore = bonus_known_spells(character, spellbook);
    count_real_spells_learned(spellbook, level, &ignore)
}

/// Spells granted as bonus known spells to the class behind `spellbook`.
///
/// A grant applies when it names the class on the spellbook's definition and
/// either has no archetype or names an archetype the character has taken.
/// Other classes that cast from the spellbook (e.g. after a merge) do not
/// contribute their grants. A definition without a class yields nothing.
pub fn bonus_known_spells(character: &Character, spellbook: &Spellbook) -> HashSet<SpellId> {
    let Some(class) = spellbook.blueprint().character_class else {
        return HashSet::new();
    };

    character
        .known_spell_grants()
        .iter()
        .filter(|grant| grant.character_class == class)
        .filter(|grant| {
            grant
                .archetype
                .is_none_or(|archetype| character.progression().has_archetype(archetype))
        })
        .map(|grant| grant.spell)
        .collect()
}

/// Externally granted spells at `level` that a level change would drop.
///
/// Compares two snapshots of the same character taken before and after a
/// level change. Returns 0 when the spellbook already holds an external
/// spell at `level` after the change, or when the spellbook did not exist
/// before it. Otherwise returns the number of external spells at `level`
/// before the change.
pub fn count_externally_added_spells(
    before: &Character,
    after: &Character,
    spellbook: SpellbookId,
    level: SpellLevel,
) -> usize {
    let externals_in = |character: &Character| {
        character.spellbook(spellbook).map(|sb| {
            sb.known_spells(level)
                .iter()
                .filter(|known| is_externally_granted(known))
                .count()
        })
    };

    if externals_in(after).unwrap_or(0) > 0 {
        return 0;
    }
    externals_in(before).unwrap_or(0)
}
