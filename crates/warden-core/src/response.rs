use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::WardenError;
use crate::mode::{Mode, ModeProfile};
use crate::scope::{Budgets, Scope};

/// One control-plane request, as submitted by an external caller.
///
/// Every tool in the surrounding repository routes its output through
/// this surface before (or instead of) doing its own work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WardenRequest {
    EnableHook {
        whitelist: Vec<String>,
    },
    DisableHook,
    SetMode {
        mode: String,
    },
    DetectMode {
        task: String,
        #[serde(default, rename = "override")]
        override_mode: Option<String>,
    },
    SetBudget {
        #[serde(default)]
        request: Option<u64>,
        #[serde(default)]
        skill: Option<u64>,
        #[serde(default)]
        mcp: Option<u64>,
        #[serde(default)]
        session: Option<u64>,
    },
    GetState,
    GetProfile,
    Enforce {
        payload: String,
        #[serde(default)]
        context_paths: Option<Vec<String>>,
        #[serde(default)]
        est_tokens: Option<u64>,
    },
    CheckBudget {
        scope: String,
        tokens: u64,
    },
    Terminate {
        reason: String,
        #[serde(default)]
        scope: Option<String>,
        #[serde(default)]
        budget: Option<u64>,
        #[serde(default)]
        used: Option<u64>,
    },
    Audit {
        messages: Vec<String>,
    },
    ResetSession,
}

/// One control-plane response. Untagged: each operation's payload shape
/// is its own contract.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WardenResponse {
    Hook(HookStatus),
    Mode(ModeChange),
    Detect(ModeDetection),
    Budgets(BudgetChange),
    State(StateSnapshot),
    Profile(ModeProfile),
    Enforce(Enforcement),
    Check(BudgetCheck),
    Terminated(Termination),
    Audit(WasteReport),
    Session(SessionReset),
    Error(ErrorResponse),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookStatus {
    pub enabled: bool,
    pub whitelist: Vec<String>,
    pub state_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeChange {
    pub mode: Mode,
    pub profile: ModeProfile,
    pub state_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeDetection {
    pub mode: Mode,
    pub profile: ModeProfile,
    /// True when the mode came from keyword scoring rather than an
    /// explicit override.
    pub auto: bool,
    pub state_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetChange {
    pub budgets: Budgets,
    pub state_hash: String,
}

/// Full read-only view of the policy record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub hook_enabled: bool,
    pub mode: Mode,
    pub budgets: Budgets,
    pub whitelist: Vec<String>,
    pub session_used: u64,
    pub state_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetCheck {
    pub allowed: bool,
    pub scope: Scope,
    pub budget: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<u64>,
    pub remaining: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReset {
    pub session_used: u64,
    pub state_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fail_closed: bool,
}

impl From<&WardenError> for ErrorResponse {
    fn from(err: &WardenError) -> Self {
        match err {
            WardenError::Denied(reason) => Self {
                error: "DENIED".to_string(),
                reason: Some(reason.clone()),
                fail_closed: false,
            },
            other => Self {
                error: other.to_string(),
                reason: None,
                fail_closed: other.is_fail_closed(),
            },
        }
    }
}

// ── Enforcement results ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminationReason {
    BudgetExceeded,
    SessionBudgetExceeded,
    EnforcementFailure,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetExceeded => "BUDGET_EXCEEDED",
            Self::SessionBudgetExceeded => "SESSION_BUDGET_EXCEEDED",
            Self::EnforcementFailure => "ENFORCEMENT_FAILURE",
        }
    }
}

impl FromStr for TerminationReason {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUDGET_EXCEEDED" => Ok(Self::BudgetExceeded),
            "SESSION_BUDGET_EXCEEDED" => Ok(Self::SessionBudgetExceeded),
            "ENFORCEMENT_FAILURE" => Ok(Self::EnforcementFailure),
            other => Err(WardenError::InvalidReason(other.to_string())),
        }
    }
}

/// Structured hard-stop signal. A termination is a normal result, not
/// an error: it is never retried and never downgraded to truncated
/// output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Termination {
    #[serde(rename = "TERMINATED")]
    pub terminated: bool,
    pub reason: TerminationReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<u64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fail_closed: bool,
}

impl Termination {
    pub fn request_overrun(budget: u64, estimated: u64) -> Self {
        Self {
            terminated: true,
            reason: TerminationReason::BudgetExceeded,
            scope: Some(Scope::Request),
            budget: Some(budget),
            estimated: Some(estimated),
            used: None,
            fail_closed: false,
        }
    }

    pub fn session_overrun(budget: u64, used: u64) -> Self {
        Self {
            terminated: true,
            reason: TerminationReason::SessionBudgetExceeded,
            scope: Some(Scope::Session),
            budget: Some(budget),
            estimated: None,
            used: Some(used),
            fail_closed: false,
        }
    }

    pub fn enforcement_failure() -> Self {
        Self {
            terminated: true,
            reason: TerminationReason::EnforcementFailure,
            scope: None,
            budget: None,
            estimated: None,
            used: None,
            fail_closed: true,
        }
    }
}

/// A payload that cleared every pipeline step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnforcedPayload {
    pub payload: String,
    pub mode: Mode,
    pub ctx_stripped: usize,
    pub prose_stripped: usize,
    pub est_tokens: u64,
    pub budget_remaining: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_paths: Option<Vec<String>>,
}

/// Outcome of one `enforce` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Enforcement {
    /// Hook disabled: payload passes through untouched, flagged as such.
    Unenforced { payload: String, enforced: bool },
    Allowed(EnforcedPayload),
    Terminated(Termination),
}

impl Enforcement {
    pub fn unenforced(payload: impl Into<String>) -> Self {
        Self::Unenforced {
            payload: payload.into(),
            enforced: false,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }

    pub fn as_allowed(&self) -> Option<&EnforcedPayload> {
        match self {
            Self::Allowed(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_terminated(&self) -> Option<&Termination> {
        match self {
            Self::Terminated(t) => Some(t),
            _ => None,
        }
    }
}

// ── Audit report ───────────────────────────────────────────────

/// Per-message waste findings. Only messages with a non-zero score
/// appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteFinding {
    pub index: usize,
    pub weight: u64,
    pub patterns: Vec<String>,
}

/// Read-only waste report over a batch of already-delivered messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteReport {
    pub total: u64,
    pub findings: Vec<WasteFinding>,
    pub message_count: usize,
}
