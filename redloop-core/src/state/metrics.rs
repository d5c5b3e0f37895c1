//! Metrics tracking for tool calls and token usage

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Snapshot of run metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub tool_calls: u64,
    pub tokens_input: u64,
    pub tokens_output: u64,
}

/// Thread-safe metrics tracker shared between provider and executor
#[derive(Debug, Clone, Default)]
pub struct MetricsTracker {
    tool_calls: Arc<AtomicU64>,
    tokens_input: Arc<AtomicU64>,
    tokens_output: Arc<AtomicU64>,
}

impl MetricsTracker {
    /// Create a new metrics tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tool call
    pub fn record_tool_call(&self) {
        self.tool_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record estimated token usage
    pub fn record_tokens(&self, input: u64, output: u64) {
        self.tokens_input.fetch_add(input, Ordering::Relaxed);
        self.tokens_output.fetch_add(output, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> Metrics {
        Metrics {
            tool_calls: self.tool_calls.load(Ordering::Relaxed),
            tokens_input: self.tokens_input.load(Ordering::Relaxed),
            tokens_output: self.tokens_output.load(Ordering::Relaxed),
        }
    }
}
