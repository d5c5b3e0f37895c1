//! Mutable state for the directory-enumeration agent

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::parsers::{Endpoint, GobusterScan};

/// One completed enumeration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub tool: String,
    pub tool_args: Value,
    /// Normalized banner metadata from the run
    pub metadata: std::collections::BTreeMap<String, String>,
    pub endpoints: Vec<Endpoint>,
    pub timestamp: DateTime<Utc>,
}

/// Accumulated enumeration state, injected into the model prompt each turn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GobusterState {
    pub target: Option<String>,
    pub memory: Vec<ScanRecord>,
}

impl GobusterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parsed run against the current target
    pub fn record(&mut self, tool: &str, tool_args: Value, scan: GobusterScan) {
        if self.target.is_none() {
            self.target = scan.metadata.get("url").cloned();
        }
        self.memory.push(ScanRecord {
            tool: tool.to_string(),
            tool_args,
            metadata: scan.metadata,
            endpoints: scan.endpoints,
            timestamp: Utc::now(),
        });
    }

    /// All endpoints found so far, across runs
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.memory.iter().flat_map(|r| r.endpoints.iter())
    }

    /// JSON snapshot for prompt injection
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
