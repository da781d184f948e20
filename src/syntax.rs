// src/syntax.rs
//! Advisory pre-flight scan of submitted source.
//!
//! This is a best-effort deny-list, not a sandbox. It catches obvious misuse
//! before a network round trip; isolation is entirely the remote backend's job.
//! The scan is pure and cheap enough to run on every (debounced) edit.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const EMPTY_SOURCE_ERROR: &str = "Code cannot be empty";

/// Outcome of a pre-check. `valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

struct Rule {
    pattern: Regex,
    message: &'static str,
}

fn rule(pattern: &str, message: &'static str) -> Rule {
    Rule {
        pattern: Regex::new(pattern).expect("deny-list pattern must compile"),
        message,
    }
}

static PYTHON_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![rule(
        r"(?m)^\s*(?:import|from)\s+(?:os|subprocess)\b",
        "System imports are not allowed for security reasons",
    )]
});

static JAVASCRIPT_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        rule(
            r#"require\s*\(\s*['"](?:node:)?fs(?:/promises)?['"]\s*\)"#,
            "File system access is not allowed",
        ),
        rule(
            r#"import\s+.*\bfrom\s+['"](?:node:)?fs(?:/promises)?['"]"#,
            "File system access is not allowed",
        ),
    ]
});

static C_FAMILY_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![rule(
        r"#\s*include\s*<(?:fstream|filesystem)>",
        "File system headers are not allowed",
    )]
});

// Applied to every language.
static DANGEROUS_CALLS: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        rule(r"\bsystem\s*\(", "Potentially unsafe code detected: system()"),
        rule(r"\bexec\s*\(", "Potentially unsafe code detected: exec()"),
        rule(r"\beval\s*\(", "Potentially unsafe code detected: eval()"),
        rule(r"\bsetTimeout\s*\(", "Potentially unsafe code detected: setTimeout()"),
        rule(r"\bsetInterval\s*\(", "Potentially unsafe code detected: setInterval()"),
    ]
});

fn language_rules(language: &str) -> &'static [Rule] {
    match language {
        "python" => PYTHON_RULES.as_slice(),
        "javascript" => JAVASCRIPT_RULES.as_slice(),
        "c" | "cpp" => C_FAMILY_RULES.as_slice(),
        _ => &[],
    }
}

/// Scans `source_code` and reports every applicable violation in rule order.
///
/// Unknown language keys only get the cross-language checks.
pub fn check_syntax(source_code: &str, language: &str) -> SyntaxReport {
    let mut errors = Vec::new();

    if source_code.trim().is_empty() {
        errors.push(EMPTY_SOURCE_ERROR.to_string());
    }

    for rule in language_rules(language).iter().chain(DANGEROUS_CALLS.iter()) {
        if rule.pattern.is_match(source_code) && !errors.iter().any(|e| e == rule.message) {
            errors.push(rule.message.to_string());
        }
    }

    SyntaxReport {
        valid: errors.is_empty(),
        errors,
    }
}
