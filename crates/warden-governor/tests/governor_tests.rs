#[cfg(test)]
mod tests {
    use warden_core::Scope;
    use warden_governor::{EnforceRequest, Warden};

    fn enforce_est(warden: &Warden, payload: &str, est: u64) -> warden_core::Enforcement {
        warden.enforce(&EnforceRequest {
            payload,
            context_paths: None,
            est_tokens: Some(est),
        })
    }

    // ── Mode control ───────────────────────────────────────────

    mod mode {
        use warden_core::{Mode, Verbosity};
        use warden_governor::Warden;

        #[test]
        fn test_set_mode_roundtrip() {
            let warden = Warden::new();
            for mode in ["EXECUTION", "DESIGN"] {
                let change = warden.set_mode(mode).unwrap();
                assert_eq!(change.mode.as_str(), mode);
                assert_eq!(warden.get_state().mode.as_str(), mode);
            }
        }

        #[test]
        fn test_set_mode_case_insensitive() {
            let warden = Warden::new();
            let change = warden.set_mode("design").unwrap();
            assert_eq!(change.mode, Mode::Design);
        }

        #[test]
        fn test_profiles_track_mode() {
            let warden = Warden::new();
            let profile = warden.get_profile();
            assert_eq!(profile.verbosity_level, Verbosity::Minimal);
            assert!(!profile.allow_prose);
            assert!(!profile.allow_chain_of_thought);

            warden.set_mode("DESIGN").unwrap();
            let profile = warden.get_profile();
            assert_eq!(profile.verbosity_level, Verbosity::Expansive);
            assert!(profile.allow_prose);
            assert!(profile.allow_alternatives);
        }

        #[test]
        fn test_detect_mode_execution_keywords() {
            let warden = Warden::new();
            let detection = warden.detect_mode("build a login page", None).unwrap();
            assert_eq!(detection.mode, Mode::Execution);
            assert!(detection.auto);
        }

        #[test]
        fn test_detect_mode_design_keywords() {
            let warden = Warden::new();
            let detection = warden
                .detect_mode("let's analyze the tradeoffs", None)
                .unwrap();
            assert_eq!(detection.mode, Mode::Design);
            assert!(detection.auto);
        }

        #[test]
        fn test_detect_mode_override_wins() {
            let warden = Warden::new();
            let detection = warden
                .detect_mode("build a login page", Some("DESIGN"))
                .unwrap();
            assert_eq!(detection.mode, Mode::Design);
            assert!(!detection.auto);
        }

        #[test]
        fn test_detect_mode_invalid_override_falls_back_to_scoring() {
            let warden = Warden::new();
            let detection = warden
                .detect_mode("build a login page", Some("YOLO"))
                .unwrap();
            assert_eq!(detection.mode, Mode::Execution);
            assert!(detection.auto);
        }
    }

    // ── Budget ledger ──────────────────────────────────────────

    mod ledger {
        use warden_core::WardenError;
        use warden_governor::Warden;

        #[test]
        fn test_boundary_values_accepted() {
            let warden = Warden::new();
            warden.set_budget(Some(50), None, None, None).unwrap();
            assert_eq!(warden.get_state().budgets.request, 50);
            warden.set_budget(Some(10_000), None, None, None).unwrap();
            assert_eq!(warden.get_state().budgets.request, 10_000);
        }

        #[test]
        fn test_check_at_exact_budget_allowed() {
            let warden = Warden::new();
            warden.set_budget(Some(100), None, None, None).unwrap();
            let check = warden.check_budget("request", 100).unwrap();
            assert!(check.allowed);
            assert_eq!(check.budget, 100);
            assert_eq!(check.remaining, 0);
            let check = warden.check_budget("request", 101).unwrap();
            assert!(!check.allowed);
        }

        #[test]
        fn test_session_check_subtracts_usage() {
            let warden = Warden::new();
            warden
                .set_budget(None, None, None, Some(1_000))
                .unwrap();
            let check = warden.check_budget("session", 1_000).unwrap();
            assert!(check.allowed);
            assert_eq!(check.used, Some(0));
            let check = warden.check_budget("session", 1_001).unwrap();
            assert!(!check.allowed);
        }

        #[test]
        fn test_invalid_scope_is_plain_error() {
            let warden = Warden::new();
            let before = warden.get_state();
            let err = warden.check_budget("galaxy", 10).unwrap_err();
            assert!(matches!(err, WardenError::InvalidScope(_)));
            // Read-only validation failure leaves state untouched.
            assert_eq!(warden.get_state().state_hash, before.state_hash);
        }

        #[test]
        fn test_multi_scope_update() {
            let warden = Warden::new();
            let change = warden
                .set_budget(Some(500), Some(2_000), Some(1_500), Some(50_000))
                .unwrap();
            assert_eq!(change.budgets.request, 500);
            assert_eq!(change.budgets.skill, 2_000);
            assert_eq!(change.budgets.mcp, 1_500);
            assert_eq!(change.budgets.session, 50_000);
        }
    }

    // ── Enforcement pipeline ───────────────────────────────────

    mod pipeline {
        use super::enforce_est;
        use warden_core::{Enforcement, Scope, TerminationReason};
        use warden_governor::{EnforceRequest, Warden};

        #[test]
        fn test_request_overrun_terminates_without_consuming() {
            let warden = Warden::new();
            warden.set_budget(Some(100), None, None, None).unwrap();

            let outcome = enforce_est(&warden, "payload", 150);
            let t = outcome.as_terminated().expect("expected termination");
            assert_eq!(t.reason, TerminationReason::BudgetExceeded);
            assert_eq!(t.scope, Some(Scope::Request));
            assert_eq!(t.budget, Some(100));
            assert_eq!(t.estimated, Some(150));
            assert_eq!(warden.get_state().session_used, 0);
        }

        #[test]
        fn test_session_overrun_is_session_ending() {
            let warden = Warden::new();
            warden
                .set_budget(None, None, None, Some(1_000))
                .unwrap();

            assert!(enforce_est(&warden, "first", 600).as_allowed().is_some());
            assert_eq!(warden.get_state().session_used, 600);

            let outcome = enforce_est(&warden, "second", 600);
            let t = outcome.as_terminated().expect("expected termination");
            assert_eq!(t.reason, TerminationReason::SessionBudgetExceeded);
            assert_eq!(t.budget, Some(1_000));
            // The counter was incremented before the session check.
            assert_eq!(t.used, Some(1_200));
            assert_eq!(warden.get_state().session_used, 1_200);
        }

        #[test]
        fn test_session_usage_is_monotone() {
            let warden = Warden::new();
            for est in [10, 20, 30] {
                enforce_est(&warden, "x", est);
            }
            assert_eq!(warden.get_state().session_used, 60);

            // Control-plane churn does not reduce the counter.
            warden.set_mode("DESIGN").unwrap();
            warden.set_budget(Some(300), None, None, None).unwrap();
            assert_eq!(warden.get_state().session_used, 60);

            // The explicit reset is the one legal decrease.
            let reset = warden.reset_session();
            assert_eq!(reset.session_used, 0);
            assert_eq!(warden.get_state().session_used, 0);
        }

        #[test]
        fn test_prose_stripped_in_execution_mode() {
            let warden = Warden::new();
            let outcome = warden.enforce(&EnforceRequest {
                payload: "Let me explain why this works\nreturn the value",
                context_paths: None,
                est_tokens: None,
            });
            let allowed = outcome.as_allowed().expect("expected allowed payload");
            assert_eq!(allowed.payload, "return the value");
            assert_eq!(allowed.prose_stripped, 1);
        }

        #[test]
        fn test_prose_survives_design_mode() {
            let warden = Warden::new();
            warden.set_mode("DESIGN").unwrap();
            let outcome = warden.enforce(&EnforceRequest {
                payload: "Let me explain why this works",
                context_paths: None,
                est_tokens: None,
            });
            let allowed = outcome.as_allowed().unwrap();
            assert_eq!(allowed.payload, "Let me explain why this works");
            assert_eq!(allowed.prose_stripped, 0);
        }

        #[test]
        fn test_context_redaction_uses_whitelist() {
            let warden = Warden::new();
            warden.enable_hook(vec!["src".to_string()]).unwrap();
            let outcome = warden.enforce(&EnforceRequest {
                payload: "cat /etc/passwd\nedit src/lib.rs",
                context_paths: None,
                est_tokens: None,
            });
            let allowed = outcome.as_allowed().unwrap();
            assert_eq!(allowed.payload, "edit src/lib.rs");
            assert_eq!(allowed.ctx_stripped, 1);
        }

        #[test]
        fn test_context_paths_filtered() {
            let warden = Warden::new();
            warden.enable_hook(vec!["src".to_string()]).unwrap();
            let paths = vec!["/etc/passwd".to_string(), "src/main.rs".to_string()];
            let outcome = warden.enforce(&EnforceRequest {
                payload: "ok",
                context_paths: Some(&paths),
                est_tokens: None,
            });
            let allowed = outcome.as_allowed().unwrap();
            assert_eq!(
                allowed.context_paths.as_deref(),
                Some(&["src/main.rs".to_string()][..])
            );
            assert_eq!(allowed.ctx_stripped, 1);
        }

        #[test]
        fn test_explicit_estimate_is_authoritative() {
            let warden = Warden::new();
            warden.set_budget(Some(100), None, None, None).unwrap();
            // Tiny payload, huge declared estimate: the declaration wins.
            let outcome = enforce_est(&warden, "x", 5_000);
            assert!(outcome.is_terminated());
        }

        #[test]
        fn test_enforce_is_deterministic() {
            let build = || {
                let w = Warden::new();
                w.set_budget(Some(200), None, None, None).unwrap();
                w.enable_hook(vec!["src".to_string()]).unwrap();
                w
            };
            let payload = "edit src/lib.rs\ncat /etc/shadow\nNote that this is fine";
            let a = build().enforce(&EnforceRequest {
                payload,
                context_paths: None,
                est_tokens: Some(42),
            });
            let b = build().enforce(&EnforceRequest {
                payload,
                context_paths: None,
                est_tokens: Some(42),
            });
            assert_eq!(a, b);
        }

        #[test]
        fn test_disabled_hook_passes_through() {
            let warden = Warden::new();
            warden.set_mode("DESIGN").unwrap();
            warden.disable_hook().unwrap();
            let outcome = warden.enforce(&EnforceRequest {
                payload: "cat /etc/passwd\nLet me explain",
                context_paths: None,
                est_tokens: None,
            });
            match outcome {
                Enforcement::Unenforced { payload, enforced } => {
                    assert_eq!(payload, "cat /etc/passwd\nLet me explain");
                    assert!(!enforced);
                }
                other => panic!("expected Unenforced, got {other:?}"),
            }
            // Pass-through consumes nothing.
            assert_eq!(warden.get_state().session_used, 0);
        }
    }

    // ── Hook authorization & state machine ─────────────────────

    mod hook {
        use warden_core::{Mode, WardenError};
        use warden_governor::Warden;

        #[test]
        fn test_disable_denied_in_execution_mode() {
            let warden = Warden::new();
            let err = warden.disable_hook().unwrap_err();
            assert!(matches!(err, WardenError::Denied(_)));
            // Denial leaves the record untouched.
            assert!(warden.get_state().hook_enabled);
            assert_eq!(warden.get_state().mode, Mode::Execution);
        }

        #[test]
        fn test_disable_allowed_in_design_mode() {
            let warden = Warden::new();
            warden.set_mode("DESIGN").unwrap();
            let status = warden.disable_hook().unwrap();
            assert!(!status.enabled);
            assert!(!warden.get_state().hook_enabled);
        }

        #[test]
        fn test_switch_to_execution_forces_reenable() {
            let warden = Warden::new();
            warden.set_mode("DESIGN").unwrap();
            warden.disable_hook().unwrap();

            warden.set_mode("EXECUTION").unwrap();
            let state = warden.get_state();
            assert_eq!(state.mode, Mode::Execution);
            assert!(state.hook_enabled, "(disabled, EXECUTION) must not exist");
        }

        #[test]
        fn test_detected_execution_also_forces_reenable() {
            let warden = Warden::new();
            warden.set_mode("DESIGN").unwrap();
            warden.disable_hook().unwrap();

            warden.detect_mode("fix the flaky test", None).unwrap();
            assert!(warden.get_state().hook_enabled);
        }

        #[test]
        fn test_enable_hook_replaces_whitelist() {
            let warden = Warden::new();
            warden.enable_hook(vec!["src".into(), "docs".into()]).unwrap();
            let status = warden
                .enable_hook(vec!["crates".into()])
                .unwrap();
            assert_eq!(status.whitelist, vec!["crates".to_string()]);
            assert_eq!(warden.get_state().whitelist, vec!["crates".to_string()]);
        }
    }

    // ── Fail-closed recovery ───────────────────────────────────

    mod fail_closed {
        use warden_core::{Mode, Scope, WardenError};
        use warden_governor::Warden;

        fn assert_min_safe(warden: &Warden) {
            let state = warden.get_state();
            assert!(state.hook_enabled);
            assert_eq!(state.mode, Mode::Execution);
            for scope in Scope::ALL {
                assert_eq!(state.budgets.get(scope), scope.range().min);
            }
            assert!(state.whitelist.is_empty());
            assert_eq!(state.session_used, 0);
        }

        #[test]
        fn test_corrupt_whitelist_resets_to_min_safe() {
            let warden = Warden::new();
            warden.set_mode("DESIGN").unwrap();
            warden.set_budget(Some(5_000), None, None, None).unwrap();

            let err = warden
                .enable_hook(vec!["../../etc".to_string()])
                .unwrap_err();
            assert!(matches!(err, WardenError::MalformedWhitelist { .. }));
            assert_min_safe(&warden);
        }

        #[test]
        fn test_invalid_mode_resets_to_min_safe() {
            let warden = Warden::new();
            warden.set_mode("DESIGN").unwrap();
            let err = warden.set_mode("TURBO").unwrap_err();
            assert!(matches!(err, WardenError::InvalidMode(_)));
            assert_min_safe(&warden);
        }

        #[test]
        fn test_out_of_range_budget_resets_to_min_safe() {
            let warden = Warden::new();
            let err = warden.set_budget(Some(10), None, None, None).unwrap_err();
            assert!(matches!(err, WardenError::BudgetOutOfRange { .. }));
            assert_min_safe(&warden);

            let warden = Warden::new();
            let err = warden
                .set_budget(None, None, None, Some(1_000_000))
                .unwrap_err();
            assert!(matches!(err, WardenError::BudgetOutOfRange { .. }));
            assert_min_safe(&warden);
        }

        #[test]
        fn test_recovery_is_never_more_permissive() {
            let warden = Warden::new();
            warden.set_mode("DESIGN").unwrap();
            warden.disable_hook().unwrap();

            warden.set_mode("NONSENSE").unwrap_err();
            // The reset flipped the hook back on and dropped to EXECUTION.
            assert_min_safe(&warden);
        }
    }

    // ── Explicit termination constructor ───────────────────────

    mod terminate {
        use warden_core::{Scope, TerminationReason, WardenError};
        use warden_governor::Warden;

        #[test]
        fn test_echoes_arguments() {
            let warden = Warden::new();
            let t = warden
                .terminate("BUDGET_EXCEEDED", Some("request"), Some(100), None)
                .unwrap();
            assert!(t.terminated);
            assert_eq!(t.reason, TerminationReason::BudgetExceeded);
            assert_eq!(t.scope, Some(Scope::Request));
            assert_eq!(t.budget, Some(100));
        }

        #[test]
        fn test_invalid_reason_rejected_without_reset() {
            let warden = Warden::new();
            warden.set_budget(Some(5_000), None, None, None).unwrap();
            let err = warden
                .terminate("COSMIC_RAY", None, None, None)
                .unwrap_err();
            assert!(matches!(err, WardenError::InvalidReason(_)));
            assert_eq!(warden.get_state().budgets.request, 5_000);
        }
    }

    // ── State hash ─────────────────────────────────────────────

    mod state_hash {
        use warden_governor::Warden;

        #[test]
        fn test_stable_across_reads() {
            let warden = Warden::new();
            assert_eq!(warden.get_state().state_hash, warden.get_state().state_hash);
            assert_eq!(warden.get_state().state_hash.len(), 16);
        }

        #[test]
        fn test_changes_on_mutation() {
            let warden = Warden::new();
            let before = warden.get_state().state_hash;
            warden.set_budget(Some(300), None, None, None).unwrap();
            assert_ne!(warden.get_state().state_hash, before);
        }

        #[test]
        fn test_usage_does_not_change_hash() {
            let warden = Warden::new();
            let before = warden.get_state().state_hash;
            super::enforce_est(&warden, "payload", 25);
            assert_eq!(warden.get_state().state_hash, before);
        }
    }

    // ── Audit scanner ──────────────────────────────────────────

    mod audit {
        use warden_governor::Warden;

        #[test]
        fn test_report_shape() {
            let warden = Warden::new();
            let messages = vec![
                "fn main() {}".to_string(),
                "Let me walk you through this. Note that it may vary.".to_string(),
                "I apologize for the confusion.".to_string(),
            ];
            let report = warden.audit(&messages);
            assert_eq!(report.message_count, 3);
            assert_eq!(report.findings.len(), 2);
            assert_eq!(report.findings[0].index, 1);
            // "let me"(2) + "note that"(1) + "i apologize"(3)
            assert_eq!(report.total, 6);
        }

        #[test]
        fn test_audit_never_mutates_state() {
            let warden = Warden::new();
            let before = warden.get_state();
            warden.audit(&["Let me basically apologize".to_string()]);
            let after = warden.get_state();
            assert_eq!(after.state_hash, before.state_hash);
            assert_eq!(after.session_used, before.session_used);
        }

        #[test]
        fn test_empty_batch() {
            let warden = Warden::new();
            let report = warden.audit(&[]);
            assert_eq!(report.total, 0);
            assert_eq!(report.message_count, 0);
            assert!(report.findings.is_empty());
        }
    }

    // ── Dispatch surface ───────────────────────────────────────

    mod dispatch {
        use warden_core::{WardenRequest, WardenResponse};
        use warden_governor::Warden;

        #[test]
        fn test_enforce_roundtrip_through_json() {
            let warden = Warden::new();
            let request: WardenRequest = serde_json::from_str(
                r#"{"op":"enforce","payload":"return the value","est_tokens":10}"#,
            )
            .unwrap();
            let response = warden.handle(request);
            let json = serde_json::to_string(&response).unwrap();
            assert!(json.contains("\"payload\":\"return the value\""));
            assert!(json.contains("\"est_tokens\":10"));
        }

        #[test]
        fn test_denied_disable_serializes_error() {
            let warden = Warden::new();
            let response = warden.handle(WardenRequest::DisableHook);
            match &response {
                WardenResponse::Error(e) => {
                    assert_eq!(e.error, "DENIED");
                    assert!(e.reason.is_some());
                }
                other => panic!("expected error response, got {other:?}"),
            }
            let json = serde_json::to_string(&response).unwrap();
            assert!(json.contains("\"error\":\"DENIED\""));
            // Denials are not fail-closed; the flag is omitted.
            assert!(!json.contains("fail_closed"));
        }

        #[test]
        fn test_termination_wire_shape() {
            let warden = Warden::new();
            warden.handle(WardenRequest::SetBudget {
                request: Some(100),
                skill: None,
                mcp: None,
                session: None,
            });
            let response = warden.handle(WardenRequest::Enforce {
                payload: "payload".to_string(),
                context_paths: None,
                est_tokens: Some(150),
            });
            let json = serde_json::to_string(&response).unwrap();
            assert!(json.contains("\"TERMINATED\":true"));
            assert!(json.contains("\"reason\":\"BUDGET_EXCEEDED\""));
            assert!(json.contains("\"scope\":\"request\""));
            assert!(json.contains("\"budget\":100"));
            assert!(json.contains("\"estimated\":150"));
        }
    }

    #[test]
    fn test_defaults_are_execution_and_enabled() {
        let warden = Warden::new();
        let state = warden.get_state();
        assert!(state.hook_enabled);
        assert_eq!(state.mode.as_str(), "EXECUTION");
        assert_eq!(state.session_used, 0);
        assert!(state.whitelist.is_empty());
        for scope in Scope::ALL {
            assert_eq!(state.budgets.get(scope), scope.default_budget());
        }
    }
}
