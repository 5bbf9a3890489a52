//! The Warden service: owns the policy record behind a single lock and
//! exposes the control plane. Every mutating operation runs inside a
//! centralized error boundary that fails closed — on an internal fault
//! the whole record is replaced by the minimum-safe configuration.

use parking_lot::RwLock;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use warden_config::WardenConfig;
use warden_core::{
    BudgetChange, BudgetCheck, Enforcement, ErrorResponse, HookStatus, Mode, ModeChange,
    ModeDetection, ModeProfile, Result, Scope, SessionReset, StateSnapshot, Termination,
    TerminationReason, WardenError, WardenRequest, WardenResponse, WasteReport,
};

use crate::audit;
use crate::classifier;
use crate::ledger;
use crate::pipeline::{self, EnforceRequest};
use crate::state::PolicyState;

/// Governs a single logical session. State lives behind one
/// `RwLock`; `enforce` holds the write lock across its whole pipeline,
/// so check-and-consume is atomic.
#[derive(Debug, Clone)]
pub struct Warden {
    state: Arc<RwLock<PolicyState>>,
}

impl Default for Warden {
    fn default() -> Self {
        Self::new()
    }
}

impl Warden {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(PolicyState::default())),
        }
    }

    pub fn from_config(config: &WardenConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(PolicyState::from_config(config))),
        }
    }

    /// Run a mutating operation inside the fail-closed boundary: if it
    /// errors out mid-write, the record is replaced wholesale with
    /// [`PolicyState::min_safe`]. Denials and read-only validation
    /// failures pass through without touching state.
    fn mutate<T>(&self, op: &'static str, f: impl FnOnce(&mut PolicyState) -> Result<T>) -> Result<T> {
        let mut state = self.state.write();
        match f(&mut state) {
            Ok(value) => Ok(value),
            Err(err) => {
                if err.is_fail_closed() {
                    warn!(op, error = %err, "internal fault, resetting to minimum-safe policy");
                    *state = PolicyState::min_safe();
                }
                Err(err)
            }
        }
    }

    // ── Control plane ──────────────────────────────────────────

    /// Enable the enforcement hook with a fresh whitelist. Entries with
    /// path-traversal segments are malformed and fail closed.
    pub fn enable_hook(&self, whitelist: Vec<String>) -> Result<HookStatus> {
        self.mutate("enable_hook", |state| {
            for entry in &whitelist {
                if entry.is_empty() || entry.contains("..") {
                    return Err(WardenError::MalformedWhitelist {
                        entry: entry.clone(),
                    });
                }
            }
            state.whitelist = whitelist.into_iter().collect();
            state.hook_enabled = true;
            info!(fragments = state.whitelist.len(), "enforcement hook enabled");
            Ok(HookStatus {
                enabled: true,
                whitelist: state.whitelist.iter().cloned().collect(),
                state_hash: state.state_hash(),
            })
        })
    }

    /// Disable the enforcement hook. Standing authorization rule:
    /// permitted only while in DESIGN mode.
    pub fn disable_hook(&self) -> Result<HookStatus> {
        self.mutate("disable_hook", |state| {
            if state.mode != Mode::Design {
                return Err(WardenError::Denied(
                    "hook disable is only permitted in DESIGN mode".to_string(),
                ));
            }
            state.hook_enabled = false;
            warn!("enforcement hook disabled");
            Ok(HookStatus {
                enabled: false,
                whitelist: state.whitelist.iter().cloned().collect(),
                state_hash: state.state_hash(),
            })
        })
    }

    /// Set the mode explicitly. An invalid mode string fails closed.
    pub fn set_mode(&self, mode: &str) -> Result<ModeChange> {
        self.mutate("set_mode", |state| {
            let mode = Mode::from_str(mode)?;
            Self::apply_mode(state, mode);
            Ok(ModeChange {
                mode,
                profile: mode.profile(),
                state_hash: state.state_hash(),
            })
        })
    }

    /// Classify the task text (or take a valid explicit override) and
    /// switch to the resulting mode.
    pub fn detect_mode(&self, task: &str, override_mode: Option<&str>) -> Result<ModeDetection> {
        self.mutate("detect_mode", |state| {
            let override_mode = override_mode.and_then(|s| match Mode::from_str(s) {
                Ok(m) => Some(m),
                Err(_) => {
                    warn!(supplied = s, "ignoring invalid mode override");
                    None
                }
            });
            let (mode, auto) = classifier::resolve(task, override_mode);
            Self::apply_mode(state, mode);
            Ok(ModeDetection {
                mode,
                profile: mode.profile(),
                auto,
                state_hash: state.state_hash(),
            })
        })
    }

    /// Update one or more scope budgets. Any out-of-range value fails
    /// closed.
    pub fn set_budget(
        &self,
        request: Option<u64>,
        skill: Option<u64>,
        mcp: Option<u64>,
        session: Option<u64>,
    ) -> Result<BudgetChange> {
        self.mutate("set_budget", |state| {
            let updates = [
                (Scope::Request, request),
                (Scope::Skill, skill),
                (Scope::Mcp, mcp),
                (Scope::Session, session),
            ];
            for (scope, value) in updates {
                if let Some(value) = value {
                    ledger::set_budget(state, scope, value)?;
                }
            }
            Ok(BudgetChange {
                budgets: state.budgets,
                state_hash: state.state_hash(),
            })
        })
    }

    pub fn get_state(&self) -> StateSnapshot {
        self.state.read().snapshot()
    }

    pub fn get_profile(&self) -> ModeProfile {
        self.state.read().mode.profile()
    }

    /// The primary data-plane entry point. Termination is a normal
    /// outcome; an internal fault resets to minimum-safe and answers
    /// with an `ENFORCEMENT_FAILURE` termination.
    pub fn enforce(&self, req: &EnforceRequest<'_>) -> Enforcement {
        let mut state = self.state.write();
        match pipeline::enforce(&mut state, req) {
            Ok(outcome) => {
                if let Some(t) = outcome.as_terminated() {
                    warn!(reason = t.reason.as_str(), "enforcement terminated output");
                }
                outcome
            }
            Err(err) => {
                warn!(error = %err, "enforcement fault, resetting to minimum-safe policy");
                *state = PolicyState::min_safe();
                Enforcement::Terminated(Termination::enforcement_failure())
            }
        }
    }

    /// Read-only budget probe.
    pub fn check_budget(&self, scope: &str, tokens: u64) -> Result<BudgetCheck> {
        let scope = Scope::from_str(scope)?;
        Ok(ledger::check(&self.state.read(), scope, tokens))
    }

    /// Explicit termination constructor — echoes its arguments, no
    /// logic.
    pub fn terminate(
        &self,
        reason: &str,
        scope: Option<&str>,
        budget: Option<u64>,
        used: Option<u64>,
    ) -> Result<Termination> {
        let reason = TerminationReason::from_str(reason)?;
        let scope = scope.map(Scope::from_str).transpose()?;
        Ok(Termination {
            terminated: true,
            reason,
            scope,
            budget,
            estimated: None,
            used,
            fail_closed: false,
        })
    }

    /// Offline waste report. Never touches policy state.
    pub fn audit(&self, messages: &[String]) -> WasteReport {
        audit::scan(messages)
    }

    /// Explicit session reset — the one legal decrease of the session
    /// counter besides fail-closed recovery.
    pub fn reset_session(&self) -> SessionReset {
        let mut state = self.state.write();
        state.session_used = 0;
        info!("session usage reset");
        SessionReset {
            session_used: 0,
            state_hash: state.state_hash(),
        }
    }

    /// Mode switches force the hook back on when leaving DESIGN: the
    /// `(disabled, EXECUTION)` state is not allowed to exist.
    fn apply_mode(state: &mut PolicyState, mode: Mode) {
        if mode == Mode::Execution && !state.hook_enabled {
            state.hook_enabled = true;
            info!("hook re-enabled on switch to EXECUTION");
        }
        state.mode = mode;
        info!(%mode, "mode set");
    }

    // ── Request dispatch ───────────────────────────────────────

    /// Serve one structured control-plane request.
    pub fn handle(&self, request: WardenRequest) -> WardenResponse {
        match request {
            WardenRequest::EnableHook { whitelist } => {
                self.respond(self.enable_hook(whitelist).map(WardenResponse::Hook))
            }
            WardenRequest::DisableHook => {
                self.respond(self.disable_hook().map(WardenResponse::Hook))
            }
            WardenRequest::SetMode { mode } => {
                self.respond(self.set_mode(&mode).map(WardenResponse::Mode))
            }
            WardenRequest::DetectMode {
                task,
                override_mode,
            } => self.respond(
                self.detect_mode(&task, override_mode.as_deref())
                    .map(WardenResponse::Detect),
            ),
            WardenRequest::SetBudget {
                request,
                skill,
                mcp,
                session,
            } => self.respond(
                self.set_budget(request, skill, mcp, session)
                    .map(WardenResponse::Budgets),
            ),
            WardenRequest::GetState => WardenResponse::State(self.get_state()),
            WardenRequest::GetProfile => WardenResponse::Profile(self.get_profile()),
            WardenRequest::Enforce {
                payload,
                context_paths,
                est_tokens,
            } => WardenResponse::Enforce(self.enforce(&EnforceRequest {
                payload: &payload,
                context_paths: context_paths.as_deref(),
                est_tokens,
            })),
            WardenRequest::CheckBudget { scope, tokens } => {
                self.respond(self.check_budget(&scope, tokens).map(WardenResponse::Check))
            }
            WardenRequest::Terminate {
                reason,
                scope,
                budget,
                used,
            } => self.respond(
                self.terminate(&reason, scope.as_deref(), budget, used)
                    .map(WardenResponse::Terminated),
            ),
            WardenRequest::Audit { messages } => WardenResponse::Audit(self.audit(&messages)),
            WardenRequest::ResetSession => WardenResponse::Session(self.reset_session()),
        }
    }

    fn respond(&self, result: Result<WardenResponse>) -> WardenResponse {
        result.unwrap_or_else(|err| WardenResponse::Error(ErrorResponse::from(&err)))
    }
}
