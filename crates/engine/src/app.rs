//! Engine state and composition.

use std::sync::Arc;

use spellwright_domain::{Character, ProgressionRoot};

use crate::entities::SpellCatalog;
use crate::infrastructure::{
    ports::{SpellContentPort, SpellLearnerPort, SpellbookRetirementPort},
    settings::EngineSettings,
};
use crate::use_cases::{
    CasterLevelCalculator, CasterLevelError, CasterLevelTable, SpellbookMerger,
    SpellbookReconciler,
};

/// Host collaborators the engine talks to.
pub struct EnginePorts {
    pub content: Arc<dyn SpellContentPort>,
    pub learner: Arc<dyn SpellLearnerPort>,
    pub retirement: Arc<dyn SpellbookRetirementPort>,
}

/// Main engine state.
///
/// Created once game content has loaded and kept for the life of the
/// session. Holds the spell catalog and every use case, wired to the host
/// ports.
pub struct SpellEngine {
    pub settings: EngineSettings,
    pub catalog: Arc<SpellCatalog>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub caster_levels: CasterLevelCalculator,
    pub reconciler: Arc<SpellbookReconciler>,
    pub merger: SpellbookMerger,
}

impl SpellEngine {
    /// Create a new engine with all dependencies wired up.
    pub fn new(ports: EnginePorts, root: ProgressionRoot, settings: EngineSettings) -> Self {
        let catalog = Arc::new(SpellCatalog::new(ports.content.clone()));

        let caster_levels =
            CasterLevelCalculator::new(root).with_tracing(settings.trace_caster_levels);
        let reconciler = Arc::new(SpellbookReconciler::new(
            ports.learner.clone(),
            ports.content.clone(),
            catalog.clone(),
            settings.clone(),
        ));
        let merger = SpellbookMerger::new(reconciler.clone(), ports.retirement.clone());

        tracing::info!(
            show_from_all_spellbooks = settings.show_from_all_spellbooks,
            trace_caster_levels = settings.trace_caster_levels,
            "Spell engine ready"
        );

        Self {
            settings,
            catalog,
            use_cases: UseCases {
                caster_levels,
                reconciler,
                merger,
            },
        }
    }

    /// Caster level of every spellbook `character`'s classes advance.
    pub fn caster_levels(
        &self,
        character: &Character,
    ) -> Result<CasterLevelTable, CasterLevelError> {
        self.use_cases.caster_levels.compute(character)
    }

    /// Forget cached catalog lookups after game content was reloaded.
    pub fn content_reloaded(&self) {
        self.catalog.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockSpellContentPort, MockSpellLearnerPort, MockSpellbookRetirementPort,
    };
    use spellwright_domain::{
        CharacterClass, CharacterClassId, ClassAssignment, KnownSpell, Progression, SpellId,
        SpellLevel, SpellListId, SpellProgression, Spellbook, SpellbookBlueprint, SpellbookType,
    };

    fn engine(
        content: MockSpellContentPort,
        learner: MockSpellLearnerPort,
        retirement: MockSpellbookRetirementPort,
    ) -> SpellEngine {
        let root = ProgressionRoot::new(CharacterClassId::new(), CharacterClassId::new());
        SpellEngine::new(
            EnginePorts {
                content: Arc::new(content),
                learner: Arc::new(learner),
                retirement: Arc::new(retirement),
            },
            root,
            EngineSettings::default().with_trace_caster_levels(true),
        )
    }

    #[test]
    fn merge_then_recompute_moves_mythic_class_onto_target() {
        let wizard = CharacterClass::new(CharacterClassId::new(), "Wizard");
        let angel = CharacterClass::new(CharacterClassId::new(), "Angel").mythic();
        let wizard_book = Spellbook::new(SpellbookBlueprint::new(
            "Wizard",
            SpellProgression::Full,
            SpellListId::new(),
        ))
        .with_base_level(5);
        let angel_book = Spellbook::new(
            SpellbookBlueprint::new("Angel", SpellProgression::Full, SpellListId::new())
                .with_kind(SpellbookType::Mythic)
                .with_class(angel.id),
        )
        .with_base_level(3);
        let (w_id, a_id) = (wizard_book.id(), angel_book.id());

        let mut character = Character::new("Arueshalae")
            .with_progression(
                Progression::new()
                    .with_class(ClassAssignment::new(wizard, 5).with_spellbook(w_id))
                    .with_class(ClassAssignment::new(angel.clone(), 3).with_spellbook(a_id))
                    .with_mythic_level(3),
            )
            .with_spellbook(wizard_book)
            .with_spellbook(angel_book);

        let mut learner = MockSpellLearnerPort::new();
        learner
            .expect_learn_spells_on_raise()
            .times(3)
            .returning(|_, _, _| Ok(()));
        let mut retirement = MockSpellbookRetirementPort::new();
        retirement
            .expect_retire_spellbook()
            .times(1)
            .returning(|_, _| Ok(()));
        let engine = engine(MockSpellContentPort::new(), learner, retirement);

        let before = engine.caster_levels(&character).unwrap();
        assert_eq!(before[&w_id], 5);
        assert_eq!(before[&a_id], 6);

        engine
            .use_cases
            .merger
            .merge_mythic_spellbook(&mut character, w_id, angel.id)
            .unwrap();

        // The target's definition is still a normal spellbook, so no doubling.
        let after = engine.caster_levels(&character).unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[&w_id], 5 + 3);
        assert_eq!(character.spellbook(w_id).unwrap().caster_level(), 5 + 2 * 3);
    }

    #[test]
    fn reloading_content_clears_catalog() {
        let list = SpellListId::new();
        let blueprints = vec![SpellbookBlueprint::new("Wizard", SpellProgression::Full, list)];
        let fireball = SpellId::new();

        let mut content = MockSpellContentPort::new();
        content
            .expect_spellbook_blueprints()
            .returning(move || blueprints.clone());
        content.expect_spells_in_list().returning(move |_, _| {
            vec![spellwright_domain::SpellDescriptor::spell(fireball, "Fireball")]
        });
        let engine = engine(
            content,
            MockSpellLearnerPort::new(),
            MockSpellbookRetirementPort::new(),
        );

        let mut sb = Spellbook::new(SpellbookBlueprint::new(
            "Wizard",
            SpellProgression::Full,
            list,
        ))
        .with_base_level(5)
        .with_known(SpellLevel::Level(3), KnownSpell::learned(SpellId::new()));

        engine.catalog.all_spells_at_level(SpellLevel::Level(3));
        assert_eq!(engine.catalog.len(), 1);
        engine.content_reloaded();
        assert!(engine.catalog.is_empty());

        let added = engine
            .use_cases
            .reconciler
            .add_all_spells_of_level(&mut sb, SpellLevel::Level(3));
        assert_eq!(added, 1);
        assert!(sb.is_known(fireball));
    }
}
