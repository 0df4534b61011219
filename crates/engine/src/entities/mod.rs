//! Entity modules - Engine-owned state built over domain data.

pub mod spell_catalog;

pub use spell_catalog::{CatalogLevel, SpellCatalog};
