//! # warden-core
//!
//! Core types and error types for the Warden token budget governor.
//! This crate defines the shared vocabulary used by every other crate
//! in the workspace: modes and their verbosity profiles, budget scopes
//! and ranges, the token estimator, and the control-plane wire types.

pub mod error;
pub mod estimate;
pub mod mode;
pub mod response;
pub mod scope;

pub use error::{Result, WardenError};
pub use estimate::estimate_tokens;
pub use mode::{Mode, ModeProfile, Verbosity};
pub use response::{
    BudgetChange, BudgetCheck, EnforcedPayload, Enforcement, ErrorResponse, HookStatus,
    ModeChange, ModeDetection, SessionReset, StateSnapshot, Termination, TerminationReason,
    WardenRequest, WardenResponse, WasteFinding, WasteReport,
};
pub use scope::{Budgets, Scope, ScopeRange};
