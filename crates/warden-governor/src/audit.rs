//! Offline waste audit: pattern-based report over a batch of
//! already-delivered messages. Purely diagnostic — never blocks,
//! terminates, or touches policy state.

use regex::Regex;
use std::sync::LazyLock;

use warden_core::{WasteFinding, WasteReport};

struct WastePattern {
    name: &'static str,
    re: Regex,
    weight: u64,
    category: &'static str,
}

macro_rules! waste_pattern {
    ($name:literal, $re:literal, $weight:literal, $category:literal) => {
        WastePattern {
            name: $name,
            re: Regex::new($re).expect("waste pattern is valid"),
            weight: $weight,
            category: $category,
        }
    };
}

static WASTE_PATTERNS: LazyLock<Vec<WastePattern>> = LazyLock::new(|| {
    vec![
        waste_pattern!("let-me", r"(?i)\blet me\b", 2, "preamble"),
        waste_pattern!("here-is", r"(?i)\bhere(?:'s| is)\b", 1, "preamble"),
        waste_pattern!("ill-now", r"(?i)\bi'll (?:now|go ahead)\b", 2, "preamble"),
        waste_pattern!("apology", r"(?i)\bi apologi[sz]e\b", 3, "apology"),
        waste_pattern!("as-an-ai", r"(?i)\bas an ai\b", 3, "meta"),
        waste_pattern!("to-summarize", r"(?i)\bto summari[sz]e\b", 2, "restatement"),
        waste_pattern!("in-summary", r"(?i)\bin summary\b", 2, "restatement"),
        waste_pattern!("note-that", r"(?i)\bnote that\b", 1, "hedging"),
        waste_pattern!("worth-noting", r"(?i)\bit(?:'s| is) worth noting\b", 2, "hedging"),
        waste_pattern!("basically", r"(?i)\bbasically\b", 1, "filler"),
        waste_pattern!("essentially", r"(?i)\bessentially\b", 1, "filler"),
        waste_pattern!("alternatively", r"(?i)\balternatively\b", 1, "exploration"),
    ]
});

/// Scan each message independently against the fixed pattern table.
/// Per-message score is Σ match-count × weight; the report's total is
/// the sum over all messages. Only messages with non-zero waste appear
/// in `findings`.
pub fn scan(messages: &[String]) -> WasteReport {
    let mut findings = Vec::new();
    let mut total = 0u64;

    for (index, message) in messages.iter().enumerate() {
        let mut weight = 0u64;
        let mut patterns = Vec::new();
        for pattern in WASTE_PATTERNS.iter() {
            let matches = pattern.re.find_iter(message).count() as u64;
            if matches > 0 {
                weight += matches * pattern.weight;
                patterns.push(format!("{}:{}", pattern.category, pattern.name));
            }
        }
        if weight > 0 {
            total += weight;
            findings.push(WasteFinding {
                index,
                weight,
                patterns,
            });
        }
    }

    WasteReport {
        total,
        findings,
        message_count: messages.len(),
    }
}
