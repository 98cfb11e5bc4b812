//! Configuration module.
//!
//! Handles the engine's tunables and loading them from TOML.

mod settings;

pub use settings::{ConfigError, EngineConfig, SuggestionSettings};
