//! # warden-config
//!
//! Configuration system for Warden. Loads `warden.toml`, applies
//! environment overrides, and validates that the file cannot smuggle in
//! values the control plane would reject.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{BudgetSection, LoggingConfig, ModeSection, WardenConfig, WhitelistSection};
