//! Infrastructure boundaries.
//!
//! Port traits for the host collaborators and the engine's settings.

pub mod ports;
pub mod settings;
