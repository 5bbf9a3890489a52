//! The enforcement pipeline — the policy gate every payload passes
//! through. The step order is a contract: bypass check, context-path
//! redaction, prose redaction, token estimation, request-budget check,
//! session consume + check. Reordering changes observable behavior.

use warden_core::{
    estimate_tokens, EnforcedPayload, Enforcement, Result, Scope, Termination,
};

use crate::filter;
use crate::ledger;
use crate::state::PolicyState;

/// One candidate output payload submitted for enforcement.
#[derive(Debug, Clone, Default)]
pub struct EnforceRequest<'a> {
    pub payload: &'a str,
    /// Paths the caller intends to attach as context; filtered against
    /// the whitelist alongside the payload.
    pub context_paths: Option<&'a [String]>,
    /// Authoritative when supplied; otherwise the estimator runs over
    /// the filtered payload.
    pub est_tokens: Option<u64>,
}

/// Run the pipeline under the caller's exclusive borrow of the state,
/// making check-and-consume a single atomic step.
///
/// A `Termination` is a normal `Ok` outcome; `Err` means an internal
/// fault and obliges the caller to fail closed.
pub fn enforce(state: &mut PolicyState, req: &EnforceRequest<'_>) -> Result<Enforcement> {
    // Step 1: the only bypass path, reachable only in DESIGN mode.
    if !state.hook_enabled {
        return Ok(Enforcement::unenforced(req.payload));
    }

    // Step 2: context-path redaction against the current whitelist.
    let (filtered, ctx_stripped) = filter::redact_context(req.payload, &state.whitelist);
    let (context_paths, paths_stripped) = match req.context_paths {
        Some(paths) => {
            let (kept, dropped) = filter::filter_paths(paths, &state.whitelist);
            (Some(kept), dropped)
        }
        None => (None, 0),
    };

    // Step 3: prose redaction under the active mode profile.
    let (filtered, prose_stripped) = filter::redact_prose(&filtered, &state.mode.profile());

    // Step 4: token estimate; an explicit caller estimate is authoritative.
    let est_tokens = req
        .est_tokens
        .unwrap_or_else(|| estimate_tokens(&filtered));

    // Step 5: request-scope check. Overrun is a hard stop with no
    // further mutation, not degraded output.
    let request_check = ledger::check(state, Scope::Request, est_tokens);
    if !request_check.allowed {
        return Ok(Enforcement::Terminated(Termination::request_overrun(
            request_check.budget,
            est_tokens,
        )));
    }

    // Step 6: consume, then session check. The counter has already been
    // incremented at this point: session overdraft is session-ending,
    // not retryable.
    ledger::consume(state, est_tokens);
    if state.session_used > state.budgets.session {
        return Ok(Enforcement::Terminated(Termination::session_overrun(
            state.budgets.session,
            state.session_used,
        )));
    }

    // Step 7: filtered payload plus accounting.
    Ok(Enforcement::Allowed(EnforcedPayload {
        payload: filtered,
        mode: state.mode,
        ctx_stripped: ctx_stripped + paths_stripped,
        prose_stripped,
        est_tokens,
        budget_remaining: state.budgets.session.saturating_sub(state.session_used),
        context_paths,
    }))
}
