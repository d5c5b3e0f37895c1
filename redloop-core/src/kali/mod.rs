//! Client for the remote Kali tool-execution service

pub mod protocol;

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{Error, Result};

pub use protocol::{JsonRpcRequest, JsonRpcResponse, ToolCallResult, ToolContent, ToolOutput};

/// Seam through which agents run tools.
///
/// Production uses [`KaliClient`]; tests substitute canned outputs.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Invoke a named tool with JSON arguments
    async fn execute(&self, tool: &str, args: Value) -> Result<ToolOutput>;
}

/// HTTP JSON-RPC client for the Kali tool service
pub struct KaliClient {
    http: reqwest::Client,
    base_url: String,
    next_id: AtomicU64,
}

impl KaliClient {
    /// Create a client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// The base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        let response = self
            .http
            .post(&self.base_url)
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ToolExecutor for KaliClient {
    async fn execute(&self, tool: &str, args: Value) -> Result<ToolOutput> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let target = args
            .get("target")
            .or_else(|| args.get("url"))
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let request = JsonRpcRequest::new("tools/call")
            .with_id(id)
            .with_params(json!({ "name": tool, "arguments": args }));

        debug!(tool, id, "calling remote tool");

        // Transport and service errors become failure-flagged outputs so the
        // model can see them and retry with adjusted arguments
        let response = match self.call(&request).await {
            Ok(r) => r,
            Err(e) => {
                warn!(tool, error = %e, "tool transport failed");
                return Ok(ToolOutput::failure(e.to_string(), target));
            }
        };

        if let Some(error) = response.error {
            warn!(tool, code = error.code, "tool service returned error");
            return Ok(ToolOutput::failure(
                format!("{} (code {})", error.message, error.code),
                target,
            ));
        }

        let result = response
            .result
            .ok_or_else(|| Error::Tool(format!("{}: response had neither result nor error", tool)))?;
        let result: ToolCallResult = serde_json::from_value(result)?;

        let mut output = ToolOutput::from_result(&result);
        if output.target.is_none() {
            output.target = target;
        }
        Ok(output)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_keeps_base_url() {
        let client = KaliClient::new("http://127.0.0.1:5000");
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
    }

    #[tokio::test]
    async fn test_unreachable_service_folds_into_failure_output() {
        // Port 9 (discard) is assumed closed; the transport error must become
        // a failure-flagged ToolOutput rather than an Err
        let client = KaliClient::new("http://127.0.0.1:9");
        let output = client
            .execute("nmap_scan", serde_json::json!({"target": "10.0.0.5"}))
            .await
            .unwrap();

        assert!(!output.success);
        assert!(!output.stderr.is_empty());
        assert_eq!(output.target.as_deref(), Some("10.0.0.5"));
    }
}
