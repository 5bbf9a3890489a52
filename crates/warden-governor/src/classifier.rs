//! Heuristic mode classifier: scores task text against two disjoint
//! keyword sets and picks the stricter profile on a tie.

use warden_core::Mode;

/// Verbs that signal execution-oriented work.
const EXECUTION_KEYWORDS: &[&str] = &[
    "build", "fix", "implement", "add", "create", "write", "refactor", "update", "remove",
    "delete", "rename", "deploy", "migrate", "install", "run", "debug", "patch", "ship",
];

/// Verbs and nouns that signal exploratory, design-oriented work.
/// Must stay disjoint from the execution set.
const DESIGN_KEYWORDS: &[&str] = &[
    "design", "analyze", "plan", "explore", "compare", "evaluate", "brainstorm", "architect",
    "investigate", "consider", "research", "discuss", "sketch", "weigh", "tradeoff", "tradeoffs",
    "options", "alternatives",
];

/// Classify free-text task description into a mode.
///
/// Word-level scoring of the lowercased text; whichever keyword set
/// scores strictly higher wins. A tie (including 0-0) resolves to
/// EXECUTION, the fail-closed default.
pub fn classify(task: &str) -> Mode {
    let lowered = task.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let execution_score = words
        .iter()
        .filter(|w| EXECUTION_KEYWORDS.contains(w))
        .count();
    let design_score = words.iter().filter(|w| DESIGN_KEYWORDS.contains(w)).count();

    if design_score > execution_score {
        Mode::Design
    } else {
        Mode::Execution
    }
}

/// Resolve the mode for a task: an explicit valid override always wins.
/// Returns the mode and whether it was auto-detected.
pub fn resolve(task: &str, override_mode: Option<Mode>) -> (Mode, bool) {
    match override_mode {
        Some(mode) => (mode, false),
        None => (classify(task), true),
    }
}
