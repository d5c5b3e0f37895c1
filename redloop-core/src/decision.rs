//! Parsing of model output into agent decisions
//!
//! Every agent step the model outputs exactly one of:
//! `CALL_TOOL: <json>`, `FINAL_ANSWER: <text>`, or `ERROR: <text>`.

use serde::Deserialize;
use serde_json::Value;

/// Control tokens some models leak into output; stripped before parsing
const ILLEGAL_TOKENS: [&str; 4] = ["<|constrain|>", "<|thought|>", "<|commentary|>", "<|output|>"];

/// A structured tool call requested by the model
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub args: Value,
}

/// One parsed model decision
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Run a tool with the given arguments
    CallTool(ToolCall),
    /// Terminal report; ends the agent loop
    FinalAnswer(String),
    /// Agent-declared failure; ends the agent loop
    Error(String),
    /// Model returned nothing usable; the loop retries
    Empty,
}

impl Decision {
    /// Parse raw model text into a decision.
    ///
    /// Any non-empty text without a recognized prefix is treated as a final
    /// answer, matching the original loop semantics: the model stopping to
    /// talk is the stop signal.
    pub fn parse(raw: &str) -> Self {
        let text = strip_illegal_tokens(raw);
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Decision::Empty;
        }

        if let Some(rest) = trimmed.strip_prefix("CALL_TOOL:") {
            return match parse_tool_call(rest) {
                Ok(call) => Decision::CallTool(call),
                Err(e) => Decision::Error(format!("Malformed tool call: {}", e)),
            };
        }

        if let Some(rest) = trimmed.strip_prefix("FINAL_ANSWER:") {
            return Decision::FinalAnswer(rest.trim().to_string());
        }

        if let Some(rest) = trimmed.strip_prefix("ERROR:") {
            return Decision::Error(rest.trim().to_string());
        }

        Decision::FinalAnswer(trimmed.to_string())
    }
}

/// Remove known illegal control tokens from model output
pub fn strip_illegal_tokens(text: &str) -> String {
    let mut cleaned = text.to_string();
    for token in ILLEGAL_TOKENS {
        cleaned = cleaned.replace(token, "");
    }
    cleaned
}

fn parse_tool_call(json: &str) -> crate::Result<ToolCall> {
    let call: ToolCall = serde_json::from_str(json.trim())?;
    Ok(call)
}
