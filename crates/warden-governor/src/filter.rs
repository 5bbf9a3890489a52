//! Content filtering: two independent, composable passes. Redaction is
//! deletion — excess verbosity is dropped whole, never summarized.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use warden_core::ModeProfile;

/// Filesystem-like substrings: absolute, home-relative, dot-relative,
/// or bare `a/b` segment chains.
static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:~|\.{1,2})?/[\w.@+-]+(?:/[\w.@+-]+)*|\b[\w.@+-]+(?:/[\w.@+-]+)+")
        .expect("path regex is valid")
});

/// Discursive marker phrases. A line containing any of these is dropped
/// in full when the active profile disallows prose.
const PROSE_MARKERS: &[&str] = &[
    "let me",
    "here's",
    "here is",
    "alternatively",
    "note that",
    "it's worth",
    "it is worth",
    "in other words",
    "to summarize",
    "as you can see",
    "keep in mind",
    "we could",
    "one option",
    "first, let's",
    "basically",
    "essentially",
];

/// Context-path redaction: drop every line that references a
/// filesystem-like path unless the path contains a whitelisted
/// fragment. Lines without path-like substrings are never touched.
///
/// An empty whitelist means "allow everything", not "allow nothing" —
/// the pass is a no-op until a whitelist has been configured.
pub fn redact_context(text: &str, whitelist: &BTreeSet<String>) -> (String, usize) {
    if whitelist.is_empty() {
        return (text.to_string(), 0);
    }

    let mut kept = Vec::new();
    let mut dropped = 0usize;
    for line in text.lines() {
        let mut paths = PATH_RE.find_iter(line).peekable();
        if paths.peek().is_none() {
            kept.push(line);
            continue;
        }
        let allowed = paths.any(|m| whitelist.iter().any(|frag| m.as_str().contains(frag)));
        if allowed {
            kept.push(line);
        } else {
            dropped += 1;
        }
    }
    (kept.join("\n"), dropped)
}

/// Filter a caller-supplied list of context paths against the
/// whitelist. Same empty-whitelist semantics as [`redact_context`].
pub fn filter_paths(paths: &[String], whitelist: &BTreeSet<String>) -> (Vec<String>, usize) {
    if whitelist.is_empty() {
        return (paths.to_vec(), 0);
    }
    let kept: Vec<String> = paths
        .iter()
        .filter(|p| whitelist.iter().any(|frag| p.contains(frag)))
        .cloned()
        .collect();
    let dropped = paths.len() - kept.len();
    (kept, dropped)
}

/// Prose redaction: when the active profile disallows prose, drop in
/// full every line containing a discursive marker phrase.
pub fn redact_prose(text: &str, profile: &ModeProfile) -> (String, usize) {
    if profile.allow_prose {
        return (text.to_string(), 0);
    }

    let mut kept = Vec::new();
    let mut dropped = 0usize;
    for line in text.lines() {
        let lowered = line.to_lowercase();
        if PROSE_MARKERS.iter().any(|m| lowered.contains(m)) {
            dropped += 1;
        } else {
            kept.push(line);
        }
    }
    (kept.join("\n"), dropped)
}
