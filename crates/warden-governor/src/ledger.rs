//! Budget ledger: get/set/check/consume over the four nested scopes.
//! Pure functions over [`PolicyState`]; the enforcement pipeline is the
//! sole caller of [`consume`].

use tracing::info;

use warden_core::{BudgetCheck, Result, Scope, WardenError};

use crate::state::PolicyState;

/// Replace a scope's budget. Values outside the scope's `[min, max]`
/// are rejected, never clamped.
pub fn set_budget(state: &mut PolicyState, scope: Scope, value: u64) -> Result<()> {
    let range = scope.range();
    if value < range.min || value > range.max {
        return Err(WardenError::BudgetOutOfRange {
            scope,
            value,
            min: range.min,
            max: range.max,
        });
    }
    state.budgets.set(scope, value);
    info!(%scope, value, "budget updated");
    Ok(())
}

/// Check whether `tokens` fits within a scope's budget, without
/// recording anything. For the session scope the check is against the
/// remaining headroom after what has already been consumed.
pub fn check(state: &PolicyState, scope: Scope, tokens: u64) -> BudgetCheck {
    let budget = state.budgets.get(scope);
    match scope {
        Scope::Session => {
            let remaining = budget.saturating_sub(state.session_used);
            BudgetCheck {
                allowed: tokens <= remaining,
                scope,
                budget,
                used: Some(state.session_used),
                remaining,
            }
        }
        _ => BudgetCheck {
            allowed: tokens <= budget,
            scope,
            budget,
            used: None,
            remaining: budget.saturating_sub(tokens),
        },
    }
}

/// Record consumed tokens against the session counter. Only the
/// enforcement pipeline calls this, and only after a passing request
/// check for the same payload — no overdraft is ever recorded for the
/// request scope.
pub fn consume(state: &mut PolicyState, tokens: u64) {
    state.session_used += tokens;
}
