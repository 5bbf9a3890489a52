use std::collections::BTreeSet;

use warden_config::WardenConfig;
use warden_core::{Budgets, Mode, Scope, StateSnapshot};

/// The single mutable record of governance configuration and usage
/// counters. Exclusive owner of all governance data; mutated only
/// through the governor's own operations.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyState {
    /// Whether the enforcement pipeline runs at all. May only be false
    /// while `mode == Design`.
    pub hook_enabled: bool,
    pub mode: Mode,
    pub budgets: Budgets,
    /// Path fragments whose context lines survive redaction. Sorted so
    /// the state hash is deterministic.
    pub whitelist: BTreeSet<String>,
    /// Tokens consumed this session. Only increases, except on explicit
    /// session reset or fail-closed recovery.
    pub session_used: u64,
}

impl Default for PolicyState {
    fn default() -> Self {
        Self {
            hook_enabled: true,
            mode: Mode::Execution,
            budgets: Budgets::default(),
            whitelist: BTreeSet::new(),
            session_used: 0,
        }
    }
}

impl PolicyState {
    /// The minimum-safe record: hook enabled, EXECUTION mode, every
    /// budget at its floor, empty whitelist, zero usage. This is the
    /// fail-closed recovery target — a whole-record replacement, not a
    /// best-effort repair.
    pub fn min_safe() -> Self {
        Self {
            hook_enabled: true,
            mode: Mode::Execution,
            budgets: Budgets::floor(),
            whitelist: BTreeSet::new(),
            session_used: 0,
        }
    }

    /// Initial state from a validated config file.
    pub fn from_config(config: &WardenConfig) -> Self {
        let mode = config.mode.default.parse().unwrap_or(Mode::Execution);
        Self {
            hook_enabled: config.mode.hook_enabled || mode == Mode::Execution,
            mode,
            budgets: Budgets::from(&config.budgets),
            whitelist: config.whitelist.fragments.iter().cloned().collect(),
            session_used: 0,
        }
    }

    /// Short deterministic digest over (hook_enabled, mode, budgets,
    /// sorted whitelist). Lets callers detect state changes without
    /// diffing the full record. Usage counters are excluded.
    pub fn state_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[self.hook_enabled as u8]);
        hasher.update(self.mode.as_str().as_bytes());
        for scope in Scope::ALL {
            hasher.update(&self.budgets.get(scope).to_le_bytes());
        }
        for fragment in &self.whitelist {
            hasher.update(fragment.as_bytes());
            hasher.update(&[0]);
        }
        let hex = hasher.finalize().to_hex();
        hex.as_str()[..16].to_string()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            hook_enabled: self.hook_enabled,
            mode: self.mode,
            budgets: self.budgets,
            whitelist: self.whitelist.iter().cloned().collect(),
            session_used: self.session_used,
            state_hash: self.state_hash(),
        }
    }
}
