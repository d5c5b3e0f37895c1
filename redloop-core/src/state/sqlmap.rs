//! Phase machine and memory for the SQL-injection assessment agent
//!
//! An assessment walks init -> detect -> enum -> extract -> done. Transitions
//! out of detect and extract are driven by summary tags; enum always falls
//! through to extract on the next observation. Done absorbs everything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::parsers::SummaryTag;

/// Assessment phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Init,
    Detect,
    Enum,
    Extract,
    Done,
}

impl Phase {
    /// Advance the phase given the tags extracted from a summarized run.
    ///
    /// Init moves to detect on any observation, and the same observation's
    /// tags are then applied to detect, so an injectable first probe lands
    /// directly in enum.
    pub fn advance(self, tags: &[SummaryTag]) -> Self {
        let phase = match self {
            Self::Init => Self::Detect,
            other => other,
        };

        match phase {
            Self::Detect => {
                if tags.contains(&SummaryTag::Injectable) {
                    Self::Enum
                } else if tags.contains(&SummaryTag::NotInjectable) {
                    Self::Done
                } else {
                    Self::Detect
                }
            }
            Self::Enum => Self::Extract,
            Self::Extract => {
                if tags.contains(&SummaryTag::DataExtracted) {
                    Self::Done
                } else {
                    Self::Extract
                }
            }
            other => other,
        }
    }

    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

/// One observed tool run, recorded at the phase it was issued from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub iteration: usize,
    pub phase: Phase,
    pub tool_call: Value,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

/// Accumulated assessment state, injected into the model prompt each turn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqlmapState {
    pub target: Option<String>,
    pub phase: Phase,
    pub memory: Vec<AssessmentRecord>,
}

impl SqlmapState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a summarized run and advance the phase from its tags
    pub fn observe(&mut self, tool_call: Value, summary: String, tags: &[SummaryTag]) {
        if self.target.is_none() {
            self.target = tool_call
                .get("url")
                .or_else(|| tool_call.get("args").and_then(|a| a.get("url")))
                .and_then(Value::as_str)
                .map(str::to_string);
        }

        self.memory.push(AssessmentRecord {
            iteration: self.memory.len() + 1,
            phase: self.phase,
            tool_call,
            summary,
            timestamp: Utc::now(),
        });

        self.phase = self.phase.advance(tags);
    }

    /// JSON snapshot for prompt injection
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
