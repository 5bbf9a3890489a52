use thiserror::Error;

use crate::scope::Scope;

/// Unified error type for the Warden governor.
///
/// Budget overrun is deliberately NOT represented here — it is a normal,
/// expected outcome of `enforce`, returned as a [`crate::Termination`]
/// value rather than an error.
#[derive(Error, Debug)]
pub enum WardenError {
    // ── Validation errors ──────────────────────────────────────
    #[error("invalid mode: {0}")]
    InvalidMode(String),

    #[error("invalid scope: {0}")]
    InvalidScope(String),

    #[error("budget out of range for {scope}: {value} (allowed {min}..={max})")]
    BudgetOutOfRange {
        scope: Scope,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("malformed whitelist entry: {entry:?}")]
    MalformedWhitelist { entry: String },

    #[error("invalid termination reason: {0}")]
    InvalidReason(String),

    // ── Authorization ──────────────────────────────────────────
    #[error("denied: {0}")]
    Denied(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl WardenError {
    /// Whether this error class triggers the fail-closed reset when it
    /// escapes a mutating control-plane operation.
    ///
    /// Denials and read-only validation failures leave state untouched;
    /// everything that could have interrupted a write does not.
    pub fn is_fail_closed(&self) -> bool {
        match self {
            Self::InvalidMode(_)
            | Self::BudgetOutOfRange { .. }
            | Self::MalformedWhitelist { .. }
            | Self::Other(_) => true,
            Self::InvalidScope(_)
            | Self::InvalidReason(_)
            | Self::Denied(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Serialization(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, WardenError>;
