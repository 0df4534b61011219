//! Spellwright Engine library.
//!
//! Caster-level derivation and spellbook reconciliation over a character's
//! save state.
//!
//! ## Structure
//!
//! - `entities/` - Engine-owned state (the spell catalog)
//! - `use_cases/` - Caster levels, known-spell reconciliation, classification, merging
//! - `infrastructure/` - Host ports and settings
//! - `app` - Engine composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

pub use app::SpellEngine;
