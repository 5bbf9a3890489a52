use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WardenError;

/// The four nested budget boundaries, innermost first:
/// a single output, one skill invocation, one MCP tool call,
/// and the whole process-lifetime session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Request,
    Skill,
    Mcp,
    Session,
}

/// Inclusive `[min, max]` bounds a scope's budget must stay within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScopeRange {
    pub min: u64,
    pub max: u64,
}

impl Scope {
    pub const ALL: [Scope; 4] = [Self::Request, Self::Skill, Self::Mcp, Self::Session];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Skill => "skill",
            Self::Mcp => "mcp",
            Self::Session => "session",
        }
    }

    /// Valid budget range for this scope. Out-of-range values are
    /// rejected, never clamped.
    pub fn range(&self) -> ScopeRange {
        match self {
            Self::Request => ScopeRange { min: 50, max: 10_000 },
            Self::Skill => ScopeRange { min: 100, max: 50_000 },
            Self::Mcp => ScopeRange { min: 100, max: 50_000 },
            Self::Session => ScopeRange { min: 1_000, max: 500_000 },
        }
    }

    pub fn default_budget(&self) -> u64 {
        match self {
            Self::Request => 2_000,
            Self::Skill => 5_000,
            Self::Mcp => 3_000,
            Self::Session => 100_000,
        }
    }
}

impl FromStr for Scope {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "request" => Ok(Self::Request),
            "skill" => Ok(Self::Skill),
            "mcp" => Ok(Self::Mcp),
            "session" => Ok(Self::Session),
            other => Err(WardenError::InvalidScope(other.to_string())),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-scope maximum token counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Budgets {
    pub request: u64,
    pub skill: u64,
    pub mcp: u64,
    pub session: u64,
}

impl Default for Budgets {
    fn default() -> Self {
        Self {
            request: Scope::Request.default_budget(),
            skill: Scope::Skill.default_budget(),
            mcp: Scope::Mcp.default_budget(),
            session: Scope::Session.default_budget(),
        }
    }
}

impl Budgets {
    /// Every budget at its scope floor — the most restrictive valid record.
    pub fn floor() -> Self {
        Self {
            request: Scope::Request.range().min,
            skill: Scope::Skill.range().min,
            mcp: Scope::Mcp.range().min,
            session: Scope::Session.range().min,
        }
    }

    pub fn get(&self, scope: Scope) -> u64 {
        match scope {
            Scope::Request => self.request,
            Scope::Skill => self.skill,
            Scope::Mcp => self.mcp,
            Scope::Session => self.session,
        }
    }

    pub fn set(&mut self, scope: Scope, value: u64) {
        match scope {
            Scope::Request => self.request = value,
            Scope::Skill => self.skill = value,
            Scope::Mcp => self.mcp = value,
            Scope::Session => self.session = value,
        }
    }
}
