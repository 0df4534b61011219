//! Engine settings.
//!
//! Settings are owned by the host overlay (it persists them); the engine only
//! reads them. Environment variables can override individual fields, which is
//! handy when debugging a save without touching the overlay's settings file.

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`EngineSettings::show_from_all_spellbooks`].
pub const ENV_SHOW_FROM_ALL_SPELLBOOKS: &str = "SPELLWRIGHT_SHOW_FROM_ALL_SPELLBOOKS";
/// Environment variable overriding [`EngineSettings::trace_caster_levels`].
pub const ENV_TRACE_CASTER_LEVELS: &str = "SPELLWRIGHT_TRACE_CASTER_LEVELS";

/// Switches that change how the engine sources and reports spells.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// When adding every spell of a level, draw from all spell lists across
    /// all spellbooks (normal and mythic) instead of the spellbook's own list.
    pub show_from_all_spellbooks: bool,
    /// Log every computed caster level at debug level.
    pub trace_caster_levels: bool,
}

impl EngineSettings {
    pub fn with_show_from_all_spellbooks(mut self, enabled: bool) -> Self {
        self.show_from_all_spellbooks = enabled;
        self
    }

    pub fn with_trace_caster_levels(mut self, enabled: bool) -> Self {
        self.trace_caster_levels = enabled;
        self
    }

    /// Apply environment variable overrides to these settings.
    ///
    /// Supported environment variables:
    /// - SPELLWRIGHT_SHOW_FROM_ALL_SPELLBOOKS: true/false
    /// - SPELLWRIGHT_TRACE_CASTER_LEVELS: true/false
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (environment, tests).
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(enabled) = read_flag(&lookup, ENV_SHOW_FROM_ALL_SPELLBOOKS) {
            self.show_from_all_spellbooks = enabled;
        }
        if let Some(enabled) = read_flag(&lookup, ENV_TRACE_CASTER_LEVELS) {
            self.trace_caster_levels = enabled;
        }
        self
    }
}

fn read_flag(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Option<bool> {
    let val = lookup(key)?;
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => {
            tracing::info!(key, "Applied settings override: enabled");
            Some(true)
        }
        "0" | "false" | "no" | "off" => {
            tracing::info!(key, "Applied settings override: disabled");
            Some(false)
        }
        _ => {
            tracing::warn!(key, val = %val, "Settings override is not a boolean, ignoring");
            None
        }
    }
}
