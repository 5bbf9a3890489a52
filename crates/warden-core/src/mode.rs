use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WardenError;

/// The two verbosity profiles the governor can run under:
///
/// - **EXECUTION**: execution-oriented work. Minimal output, no prose,
///   no alternatives, no chain-of-thought. The fail-closed default.
/// - **DESIGN**: exploratory work. Expansive output allowed.
///
/// No third value is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Execution,
    Design,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Execution => "EXECUTION",
            Self::Design => "DESIGN",
        }
    }

    /// The verbosity profile for this mode. Pure constant table.
    pub fn profile(&self) -> ModeProfile {
        match self {
            Self::Execution => EXECUTION_PROFILE,
            Self::Design => DESIGN_PROFILE,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::Execution
    }
}

impl FromStr for Mode {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXECUTION" => Ok(Self::Execution),
            "DESIGN" => Ok(Self::Design),
            other => Err(WardenError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Minimal,
    Expansive,
}

/// Verbosity flags derived from the active mode. Derived, never stored:
/// the mapping from mode to profile is a constant table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeProfile {
    pub verbosity_level: Verbosity,
    pub allow_prose: bool,
    pub allow_explanation: bool,
    pub allow_alternatives: bool,
    pub allow_exploration: bool,
    pub allow_chain_of_thought: bool,
}

pub const EXECUTION_PROFILE: ModeProfile = ModeProfile {
    verbosity_level: Verbosity::Minimal,
    allow_prose: false,
    allow_explanation: false,
    allow_alternatives: false,
    allow_exploration: false,
    allow_chain_of_thought: false,
};

pub const DESIGN_PROFILE: ModeProfile = ModeProfile {
    verbosity_level: Verbosity::Expansive,
    allow_prose: true,
    allow_explanation: true,
    allow_alternatives: true,
    allow_exploration: true,
    allow_chain_of_thought: true,
};
