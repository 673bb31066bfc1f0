//! Structured plans: the JSON contract between agents and the execute layer.
//!
//! Parsing is modeled as a result, never an exception: a dispatch reply
//! either carries a JSON plan or falls back to the raw text, and the
//! fallback still serializes to valid JSON with `action = "none"`. The
//! execute layer parses strictly and distinguishes malformed JSON, an
//! unknown action, and a known action with missing fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use otto_common::llm::strip_json_fences;

/// Most characters of raw text carried into a fallback explanation.
const FALLBACK_EXPLANATION_CAP: usize = 300;

/// Actions the execute layer understands.
pub const KNOWN_ACTIONS: [&str; 7] = [
    "none",
    "convert",
    "resize",
    "organize",
    "summarize",
    "rename",
    "run",
];

/// A fully-typed plan, one variant per action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Plan {
    None {
        #[serde(default)]
        explanation: String,
    },
    Convert {
        input_file: String,
        target_format: String,
        #[serde(default)]
        explanation: String,
    },
    Resize {
        input_file: String,
        width: u32,
        height: u32,
        #[serde(default)]
        explanation: String,
    },
    Organize {
        folder: String,
        plan: BTreeMap<String, Vec<String>>,
        #[serde(default)]
        explanation: String,
    },
    Summarize {
        files: Vec<String>,
        #[serde(default)]
        style: SummaryStyle,
        #[serde(default)]
        explanation: String,
    },
    Rename {
        renames: BTreeMap<String, String>,
        #[serde(default)]
        explanation: String,
    },
    Run {
        language: String,
        code: String,
        #[serde(default)]
        explanation: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    #[default]
    Brief,
    Detailed,
    Comparison,
    Explain,
}

impl SummaryStyle {
    /// Style-specific instruction prepended to the summarize prompt.
    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryStyle::Brief => "Summarize these files in 3 bullet points:",
            SummaryStyle::Detailed => {
                "Write a detailed summary of these files, covering every major section:"
            }
            SummaryStyle::Comparison => {
                "Compare these files: what they share, where they differ, and which to prefer:"
            }
            SummaryStyle::Explain => {
                "Explain what these files are and what they are for, in plain language:"
            }
        }
    }
}

/// Why an execute input was rejected.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Invalid JSON plan: {0}")]
    InvalidJson(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Plan is missing required fields: {0}")]
    MissingFields(String),
}

/// Strict parse for the execute layer.
pub fn parse_plan(input: &str) -> Result<Plan, PlanError> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| PlanError::InvalidJson(e.to_string()))?;

    let action = value
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| PlanError::InvalidJson("missing \"action\" field".to_string()))?;
    if !KNOWN_ACTIONS.contains(&action) {
        return Err(PlanError::UnknownAction(action.to_string()));
    }

    serde_json::from_value(value).map_err(|e| PlanError::MissingFields(e.to_string()))
}

/// What came back from a dispatch round trip: a JSON plan, or the raw text
/// when the model did not produce one. Extra fields the model added are
/// preserved on the JSON side.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    Plan(Value),
    Fallback(String),
}

impl ParsedReply {
    /// Lenient parse for the dispatch layer: strip code fences, accept any
    /// JSON object with a string `action`, otherwise keep the raw text.
    pub fn from_reply(reply: &str) -> ParsedReply {
        let cleaned = strip_json_fences(reply);
        match serde_json::from_str::<Value>(&cleaned) {
            Ok(value)
                if value.is_object() && value.get("action").map(Value::is_string) == Some(true) =>
            {
                ParsedReply::Plan(value)
            }
            _ => ParsedReply::Fallback(reply.trim().to_string()),
        }
    }

    /// The single line of JSON dispatch prints: always parseable, always
    /// carrying `action` and `explanation`.
    pub fn into_output_json(self) -> String {
        let value = match self {
            ParsedReply::Plan(mut value) => {
                if let Some(obj) = value.as_object_mut() {
                    obj.entry("explanation")
                        .or_insert_with(|| Value::String(String::new()));
                }
                value
            }
            ParsedReply::Fallback(text) => {
                let truncated: String = text.chars().take(FALLBACK_EXPLANATION_CAP).collect();
                serde_json::json!({
                    "action": "none",
                    "explanation": truncated,
                })
            }
        };
        value.to_string()
    }
}
