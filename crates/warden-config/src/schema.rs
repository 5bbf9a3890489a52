use serde::{Deserialize, Serialize};
use std::str::FromStr;

use warden_core::{Budgets, Mode, Scope};

/// Root configuration — maps to `warden.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub mode: ModeSection,
    pub budgets: BudgetSection,
    pub whitelist: WhitelistSection,
    pub logging: LoggingConfig,
}

// ── Mode ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeSection {
    /// Startup mode: "EXECUTION" or "DESIGN".
    pub default: String,
    /// Whether the enforcement hook starts enabled.
    pub hook_enabled: bool,
}

impl Default for ModeSection {
    fn default() -> Self {
        Self {
            default: Mode::Execution.as_str().to_string(),
            hook_enabled: true,
        }
    }
}

// ── Budgets ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSection {
    /// Max tokens per single output.
    pub request: u64,
    /// Max tokens per skill invocation.
    pub skill: u64,
    /// Max tokens per MCP tool call.
    pub mcp: u64,
    /// Max tokens per session.
    pub session: u64,
}

impl Default for BudgetSection {
    fn default() -> Self {
        let b = Budgets::default();
        Self {
            request: b.request,
            skill: b.skill,
            mcp: b.mcp,
            session: b.session,
        }
    }
}

impl From<&BudgetSection> for Budgets {
    fn from(s: &BudgetSection) -> Self {
        Self {
            request: s.request,
            skill: s.skill,
            mcp: s.mcp,
            session: s.session,
        }
    }
}

// ── Whitelist ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitelistSection {
    /// Path fragments whose context lines survive redaction.
    /// Empty means "allow everything", not "allow nothing".
    pub fragments: Vec<String>,
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    pub level: String,
    /// Output format: "pretty" or "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

impl WardenConfig {
    /// Validate the config. Returns warnings on success, an error
    /// message on hard failure.
    pub fn validate(&self) -> Result<Vec<String>, String> {
        let mut warnings = Vec::new();

        Mode::from_str(&self.mode.default)
            .map_err(|_| format!("mode.default: invalid mode {:?}", self.mode.default))?;

        let budgets = Budgets::from(&self.budgets);
        for scope in Scope::ALL {
            let range = scope.range();
            let value = budgets.get(scope);
            if value < range.min || value > range.max {
                return Err(format!(
                    "budgets.{scope}: {value} outside allowed range {}..={}",
                    range.min, range.max
                ));
            }
        }

        for entry in &self.whitelist.fragments {
            if entry.is_empty() || entry.contains("..") {
                return Err(format!("whitelist.fragments: malformed entry {entry:?}"));
            }
        }

        if !self.mode.hook_enabled && self.mode.default.eq_ignore_ascii_case("EXECUTION") {
            return Err(
                "mode.hook_enabled = false requires mode.default = \"DESIGN\"".to_string(),
            );
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => warnings.push(format!(
                "logging.format: unknown format {other:?}, falling back to pretty"
            )),
        }

        Ok(warnings)
    }
}
