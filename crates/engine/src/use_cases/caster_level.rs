//! Caster level calculation.
//!
//! Derives the caster level a character actually has in each spellbook from
//! the ordered class record. The computation runs in two phases:
//!
//! 1. Fold the class assignments, in acquisition order, into one contribution
//!    per spellcasting class plus a [`MythicLedger`] recording mythic rank
//!    credit and the first spellbook advanced by a mythic class (the anchor).
//! 2. Sum the contributions per spellbook and apply the ledger's late credit
//!    to the anchor.
//!
//! Mythic-origin levels gained before the anchor exists raise every later
//! mythic class contribution (and are doubled with it on a mythic spellbook).
//! Levels gained after the anchor exists go to the anchor unmodified. The
//! order of the class record therefore matters.

use std::collections::BTreeMap;

use spellwright_domain::{Character, ClassAssignment, ProgressionRoot, SpellbookId};

/// Caster level per spellbook.
pub type CasterLevelTable = BTreeMap<SpellbookId, i32>;

/// Errors that can occur while computing caster levels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CasterLevelError {
    #[error("Class {class} references spellbook {spellbook} that the character does not have")]
    InvalidReference {
        class: String,
        spellbook: SpellbookId,
    },
}

/// Mythic rank credit tracked across the fold.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct MythicLedger {
    /// Mythic-origin levels seen before the anchor was set
    pending: i32,
    /// First spellbook advanced by a mythic class
    anchor: Option<SpellbookId>,
    /// Mythic-origin levels seen after the anchor was set
    late: i32,
}

impl MythicLedger {
    fn credit(&mut self, levels: i32) {
        if self.anchor.is_none() {
            self.pending = self.pending.saturating_add(levels);
        } else {
            self.late = self.late.saturating_add(levels);
        }
    }

    fn anchor_at(&mut self, spellbook: SpellbookId) {
        self.anchor.get_or_insert(spellbook);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Contribution {
    spellbook: SpellbookId,
    caster_levels: i32,
}

/// Computes real caster levels from a character's class record.
#[derive(Debug, Clone)]
pub struct CasterLevelCalculator {
    root: ProgressionRoot,
    trace: bool,
}

impl CasterLevelCalculator {
    pub fn new(root: ProgressionRoot) -> Self {
        Self { root, trace: false }
    }

    /// Log every computed caster level at debug level.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    /// Caster level of every spellbook the character's classes advance.
    ///
    /// Values are never negative. Fails only when a class points at a
    /// spellbook the character does not have.
    pub fn compute(&self, character: &Character) -> Result<CasterLevelTable, CasterLevelError> {
        let (contributions, ledger) = self.collect(character)?;
        let table = settle(contributions, ledger);

        if self.trace {
            for (id, level) in &table {
                let name = character
                    .spellbook(*id)
                    .map(|sb| sb.blueprint().name.as_str())
                    .unwrap_or("?");
                tracing::debug!(
                    character = %character.name(),
                    spellbook = %name,
                    caster_level = level,
                    "Computed caster level"
                );
            }
        }
        Ok(table)
    }

    /// Caster level for one spellbook, 0 when no class advances it.
    pub fn real_caster_level(
        &self,
        character: &Character,
        spellbook: SpellbookId,
    ) -> Result<i32, CasterLevelError> {
        Ok(self
            .compute(character)?
            .get(&spellbook)
            .copied()
            .unwrap_or(0))
    }

    /// Phase one: per-class contributions and mythic credit, in class order.
    fn collect(
        &self,
        character: &Character,
    ) -> Result<(Vec<Contribution>, MythicLedger), CasterLevelError> {
        let mut ledger = MythicLedger::default();
        let mut contributions = Vec::new();

        for assignment in character.progression().classes() {
            let level = to_levels(assignment.level());
            if self.root.is_mythic_origin(assignment.class_id()) {
                ledger.credit(level);
            }

            let Some(spellbook_id) = assignment.spellbook() else {
                continue;
            };
            let spellbook = character.spellbook(spellbook_id).ok_or_else(|| {
                CasterLevelError::InvalidReference {
                    class: assignment.class().name.clone(),
                    spellbook: spellbook_id,
                }
            })?;
            let blueprint = spellbook.blueprint();

            let mut caster_levels = level.saturating_add(blueprint.caster_level_modifier);
            if assignment.is_mythic() {
                caster_levels = caster_levels.saturating_add(ledger.pending);
                ledger.anchor_at(spellbook_id);
            }
            caster_levels = caster_levels.saturating_add(class_adjustment(assignment));
            if blueprint.is_mythic() {
                caster_levels = caster_levels.saturating_mul(2);
            }

            contributions.push(Contribution {
                spellbook: spellbook_id,
                caster_levels,
            });
        }

        Ok((contributions, ledger))
    }
}

/// Skip-level penalties plus the prestige start offset.
fn class_adjustment(assignment: &ClassAssignment) -> i32 {
    let class = assignment.class();
    let skipped = to_levels(class.skipped_levels(assignment.level()));
    let start = to_levels(class.caster_level_start());
    1i32.saturating_sub(start).saturating_sub(skipped)
}

fn to_levels(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Phase two: sum per spellbook, apply late mythic credit, clamp at 0.
fn settle(contributions: Vec<Contribution>, ledger: MythicLedger) -> CasterLevelTable {
    let mut table = CasterLevelTable::new();
    for contribution in contributions {
        let level = table.entry(contribution.spellbook).or_insert(0);
        *level = level.saturating_add(contribution.caster_levels);
    }
    if let Some(anchor) = ledger.anchor {
        if let Some(level) = table.get_mut(&anchor) {
            *level = level.saturating_add(ledger.late);
        }
    }
    for level in table.values_mut() {
        *level = (*level).max(0);
    }
    table
}

/// Compute caster levels for `character` with default options.
pub fn compute_caster_levels(
    character: &Character,
    root: &ProgressionRoot,
) -> Result<CasterLevelTable, CasterLevelError> {
    CasterLevelCalculator::new(*root).compute(character)
}

/// Caster level of one spellbook with default options, 0 when no class advances it.
pub fn real_caster_level(
    character: &Character,
    root: &ProgressionRoot,
    spellbook: SpellbookId,
) -> Result<i32, CasterLevelError> {
    CasterLevelCalculator::new(*root).real_caster_level(character, spellbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spellwright_domain::{
        CharacterClass, CharacterClassId, ClassFeature, FeatureId, LevelEntry, Progression,
        SpellListId, SpellProgression, SpellProgressionRule, Spellbook, SpellbookBlueprint,
        SpellbookType,
    };

    struct Fixture {
        root: ProgressionRoot,
        mythic_starting: CharacterClass,
        mythic_companion: CharacterClass,
    }

    impl Fixture {
        fn new() -> Self {
            let mythic_starting =
                CharacterClass::new(CharacterClassId::new(), "Mythic Hero").mythic();
            let mythic_companion =
                CharacterClass::new(CharacterClassId::new(), "Mythic Companion").mythic();
            Self {
                root: ProgressionRoot::new(mythic_starting.id, mythic_companion.id),
                mythic_starting,
                mythic_companion,
            }
        }

        fn calculator(&self) -> CasterLevelCalculator {
            CasterLevelCalculator::new(self.root)
        }
    }

    fn base(name: &str) -> CharacterClass {
        CharacterClass::new(CharacterClassId::new(), name)
    }

    fn normal_book(name: &str) -> Spellbook {
        Spellbook::new(SpellbookBlueprint::new(name, SpellProgression::Full, SpellListId::new()))
    }

    fn mythic_book(name: &str) -> Spellbook {
        Spellbook::new(
            SpellbookBlueprint::new(name, SpellProgression::Full, SpellListId::new())
                .with_kind(SpellbookType::Mythic),
        )
    }

    fn character(books: Vec<Spellbook>, classes: Vec<ClassAssignment>) -> Character {
        let progression = classes
            .into_iter()
            .fold(Progression::new(), |p, c| p.with_class(c));
        books
            .into_iter()
            .fold(Character::new("Test").with_progression(progression), |c, sb| {
                c.with_spellbook(sb)
            })
    }

    #[test]
    fn no_classes_yields_empty_table() {
        let f = Fixture::new();
        let table = f.calculator().compute(&Character::new("Empty")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn single_class_counts_levels_plus_modifier() {
        let f = Fixture::new();
        let book = Spellbook::new(
            SpellbookBlueprint::new("Wizard", SpellProgression::Full, SpellListId::new())
                .with_caster_level_modifier(2),
        );
        let id = book.id();
        let ch = character(
            vec![book],
            vec![ClassAssignment::new(base("Wizard"), 5).with_spellbook(id)],
        );
        assert_eq!(f.calculator().compute(&ch).unwrap()[&id], 7);
    }

    #[test]
    fn huge_class_levels_saturate() {
        let f = Fixture::new();
        let s = mythic_book("S");
        let id = s.id();
        let ch = character(
            vec![s],
            vec![
                ClassAssignment::new(f.mythic_starting.clone(), u32::MAX),
                ClassAssignment::new(base("ClassA"), u32::MAX).with_spellbook(id),
                ClassAssignment::new(base("ClassB").mythic(), u32::MAX).with_spellbook(id),
            ],
        );
        assert_eq!(f.calculator().compute(&ch).unwrap()[&id], i32::MAX);
    }

    #[test]
    fn shared_normal_spellbook_sums_both_classes() {
        // (ClassA 5 + 0) + (ClassB mythic 3 + 0 mythic credit), no doubling.
        let f = Fixture::new();
        let s = normal_book("S");
        let id = s.id();
        let ch = character(
            vec![s],
            vec![
                ClassAssignment::new(base("ClassA"), 5).with_spellbook(id),
                ClassAssignment::new(base("ClassB").mythic(), 3).with_spellbook(id),
            ],
        );
        assert_eq!(f.calculator().compute(&ch).unwrap()[&id], 8);
    }

    #[test]
    fn shared_mythic_spellbook_doubles_every_contribution() {
        let f = Fixture::new();
        let s = mythic_book("S");
        let id = s.id();
        let ch = character(
            vec![s],
            vec![
                ClassAssignment::new(base("ClassA"), 5).with_spellbook(id),
                ClassAssignment::new(base("ClassB").mythic(), 3).with_spellbook(id),
            ],
        );
        assert_eq!(f.calculator().compute(&ch).unwrap()[&id], 5 * 2 + 3 * 2);
    }

    #[test]
    fn separate_mythic_spellbook_doubles_only_mythic_class() {
        let f = Fixture::new();
        let (s, m) = (normal_book("S"), mythic_book("M"));
        let (s_id, m_id) = (s.id(), m.id());
        let ch = character(
            vec![s, m],
            vec![
                ClassAssignment::new(base("ClassA"), 5).with_spellbook(s_id),
                ClassAssignment::new(base("ClassB").mythic(), 3).with_spellbook(m_id),
            ],
        );
        let table = f.calculator().compute(&ch).unwrap();
        assert_eq!(table[&s_id], 5);
        assert_eq!(table[&m_id], 6);
    }

    #[test]
    fn mythic_origin_levels_before_anchor_are_doubled_with_it() {
        let f = Fixture::new();
        let (wizard, angel) = (normal_book("Wizard"), mythic_book("Angel"));
        let (w_id, a_id) = (wizard.id(), angel.id());
        let ch = character(
            vec![wizard, angel],
            vec![
                ClassAssignment::new(f.mythic_starting.clone(), 2),
                ClassAssignment::new(base("Wizard"), 5).with_spellbook(w_id),
                ClassAssignment::new(base("Angel").mythic(), 3).with_spellbook(a_id),
            ],
        );
        let table = f.calculator().compute(&ch).unwrap();
        assert_eq!(table[&w_id], 5);
        assert_eq!(table[&a_id], (3 + 2) * 2);
    }

    #[test]
    fn mythic_origin_levels_after_anchor_go_straight_to_it() {
        let f = Fixture::new();
        let angel = mythic_book("Angel");
        let id = angel.id();
        let ch = character(
            vec![angel],
            vec![
                ClassAssignment::new(base("Angel").mythic(), 3).with_spellbook(id),
                ClassAssignment::new(f.mythic_companion.clone(), 2),
            ],
        );
        assert_eq!(f.calculator().compute(&ch).unwrap()[&id], 3 * 2 + 2);
    }

    #[test]
    fn anchor_is_first_mythic_spellbook() {
        let f = Fixture::new();
        let (first, second) = (mythic_book("Angel"), mythic_book("Lich"));
        let (first_id, second_id) = (first.id(), second.id());
        let ch = character(
            vec![first, second],
            vec![
                ClassAssignment::new(f.mythic_starting.clone(), 1),
                ClassAssignment::new(base("Angel").mythic(), 2).with_spellbook(first_id),
                ClassAssignment::new(base("Lich").mythic(), 2).with_spellbook(second_id),
                ClassAssignment::new(f.mythic_companion.clone(), 4),
            ],
        );
        let table = f.calculator().compute(&ch).unwrap();
        // Both mythic classes see the 1 pending level; the late 4 goes to the anchor only.
        assert_eq!(table[&first_id], (2 + 1) * 2 + 4);
        assert_eq!(table[&second_id], (2 + 1) * 2);
    }

    #[test]
    fn mythic_origin_without_mythic_spellbook_changes_nothing() {
        let f = Fixture::new();
        let wizard = normal_book("Wizard");
        let id = wizard.id();
        let ch = character(
            vec![wizard],
            vec![
                ClassAssignment::new(f.mythic_starting.clone(), 4),
                ClassAssignment::new(base("Wizard"), 6).with_spellbook(id),
            ],
        );
        assert_eq!(f.calculator().compute(&ch).unwrap()[&id], 6);
    }

    #[test]
    fn each_skip_threshold_costs_one_level() {
        let f = Fixture::new();
        let book = normal_book("Eldritch Knight");
        let id = book.id();
        let class =
            base("Eldritch Knight").with_rule(SpellProgressionRule::SkipLevels(vec![1, 5, 9]));
        let ch = character(
            vec![book],
            vec![ClassAssignment::new(class, 6).with_spellbook(id)],
        );
        assert_eq!(f.calculator().compute(&ch).unwrap()[&id], 6 - 2);
    }

    #[test]
    fn prestige_class_counts_from_first_replacement_selection() {
        let f = Fixture::new();
        let book = normal_book("Wizard");
        let id = book.id();
        let selection = ClassFeature::Selection {
            id: FeatureId::new(),
            options: vec![ClassFeature::ReplaceSpellbook {
                id: FeatureId::new(),
                spellbook: id,
            }],
        };
        let prestige = base("Arcane Trickster").prestige().with_rule(
            SpellProgressionRule::PrestigeStart(vec![
                LevelEntry::new(1, vec![ClassFeature::Plain { id: FeatureId::new() }]),
                LevelEntry::new(3, vec![selection]),
            ]),
        );
        let ch = character(
            vec![book],
            vec![
                ClassAssignment::new(base("Wizard"), 5).with_spellbook(id),
                ClassAssignment::new(prestige, 5).with_spellbook(id),
            ],
        );
        assert_eq!(f.calculator().compute(&ch).unwrap()[&id], 5 + (5 + 1 - 3));
    }

    #[test]
    fn negative_totals_clamp_to_zero() {
        let f = Fixture::new();
        let book = Spellbook::new(
            SpellbookBlueprint::new("Penalized", SpellProgression::Full, SpellListId::new())
                .with_caster_level_modifier(-4),
        );
        let id = book.id();
        let ch = character(
            vec![book],
            vec![ClassAssignment::new(base("Witch"), 1).with_spellbook(id)],
        );
        assert_eq!(f.calculator().compute(&ch).unwrap()[&id], 0);
    }

    #[test]
    fn dangling_spellbook_is_invalid_reference() {
        let f = Fixture::new();
        let missing = SpellbookId::new();
        let ch = character(
            vec![],
            vec![ClassAssignment::new(base("Cleric"), 3).with_spellbook(missing)],
        );
        let err = f.calculator().compute(&ch).unwrap_err();
        assert_eq!(
            err,
            CasterLevelError::InvalidReference {
                class: "Cleric".into(),
                spellbook: missing
            }
        );
    }

    #[test]
    fn non_casting_class_does_not_change_table() {
        let f = Fixture::new();
        let (wizard, cleric) = (normal_book("Wizard"), normal_book("Cleric"));
        let (w_id, c_id) = (wizard.id(), cleric.id());
        let casters = vec![
            ClassAssignment::new(base("Wizard"), 4).with_spellbook(w_id),
            ClassAssignment::new(base("Cleric"), 3).with_spellbook(c_id),
        ];
        let mut with_fighter = casters.clone();
        with_fighter.insert(1, ClassAssignment::new(base("Fighter"), 6));

        let without = character(vec![wizard.clone(), cleric.clone()], casters);
        let with = character(vec![wizard, cleric], with_fighter);

        let calc = f.calculator();
        assert_eq!(calc.compute(&without).unwrap(), calc.compute(&with).unwrap());
    }

    #[test]
    fn progression_without_mythic_classes_has_no_doubling() {
        let f = Fixture::new();
        let books: Vec<Spellbook> = (0..3).map(|i| normal_book(&format!("Book {i}"))).collect();
        let classes: Vec<ClassAssignment> = books
            .iter()
            .enumerate()
            .map(|(i, sb)| {
                ClassAssignment::new(base("Caster"), i as u32 + 2).with_spellbook(sb.id())
            })
            .collect();
        let expected: CasterLevelTable = classes
            .iter()
            .filter_map(|c| c.spellbook().map(|sb| (sb, c.level() as i32)))
            .collect();

        let ch = character(books, classes);
        assert_eq!(f.calculator().compute(&ch).unwrap(), expected);
    }

    #[test]
    fn real_caster_level_defaults_to_zero() {
        let f = Fixture::new();
        let wizard = normal_book("Wizard");
        let id = wizard.id();
        let ch = character(
            vec![wizard],
            vec![ClassAssignment::new(base("Wizard"), 9).with_spellbook(id)],
        );
        let calc = f.calculator().with_tracing(true);
        assert_eq!(calc.real_caster_level(&ch, id).unwrap(), 9);
        assert_eq!(calc.real_caster_level(&ch, SpellbookId::new()).unwrap(), 0);
    }

    #[test]
    fn free_function_matches_calculator() {
        let f = Fixture::new();
        let wizard = normal_book("Wizard");
        let id = wizard.id();
        let ch = character(
            vec![wizard],
            vec![ClassAssignment::new(base("Wizard"), 3).with_spellbook(id)],
        );
        assert_eq!(
            compute_caster_levels(&ch, &f.root).unwrap(),
            f.calculator().compute(&ch).unwrap()
        );
    }
}
