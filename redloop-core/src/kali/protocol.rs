//! JSON-RPC wire types for the remote Kali tool service
//!
//! The service speaks MCP-flavored JSON-RPC 2.0: `tools/call` with a tool
//! name and arguments, returning text content items. The text payload is the
//! tool runner's result object (stdout / stderr / success).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: method.into(),
            params: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Tool call result as returned by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    #[serde(default)]
    pub content: Option<Vec<ToolContent>>,
    #[serde(rename = "isError", default)]
    pub is_error: Option<bool>,
}

/// Content item inside a tool call result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

/// Normalized tool output every agent consumes.
///
/// Transport and service failures fold into `success = false` with the
/// error in `stderr`, so the model always gets to see what went wrong.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolOutput {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub target: Option<String>,
}

impl ToolOutput {
    /// Build a failure-flagged output from an error message
    pub fn failure(error: impl Into<String>, target: Option<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: error.into(),
            success: false,
            target,
        }
    }

    /// Extract the normalized output from a raw tool call result.
    ///
    /// The text content usually carries the runner's JSON result object; if
    /// it is not JSON, the whole text is taken as stdout.
    pub fn from_result(result: &ToolCallResult) -> Self {
        let text = result
            .content
            .as_deref()
            .and_then(|items| items.first())
            .map(|ToolContent::Text { text }| text.clone())
            .unwrap_or_default();

        let mut output = match serde_json::from_str::<Value>(&text) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self {
                stdout: text,
                stderr: String::new(),
                success: true,
                target: None,
            },
        };

        if result.is_error == Some(true) {
            output.success = false;
        }
        output
    }

    /// Pull the result object out of whatever shape the runner wrapped it in
    fn from_value(value: &Value) -> Self {
        let object = value.get("result").unwrap_or(value);
        serde_json::from_value(object.clone()).unwrap_or_else(|_| Self {
            stdout: object.to_string(),
            stderr: String::new(),
            success: true,
            target: None,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_jsonrpc_request_serialization() {
        let req = JsonRpcRequest::new("tools/call")
            .with_id(1)
            .with_params(json!({"name": "nmap_scan"}));
        let encoded = serde_json::to_string(&req).unwrap();
        assert!(encoded.contains("\"method\":\"tools/call\""));
        assert!(encoded.contains("\"jsonrpc\":\"2.0\""));
    }

    #[test]
    fn test_tool_output_from_json_text() {
        let result = ToolCallResult {
            content: Some(vec![ToolContent::Text {
                text: json!({
                    "stdout": "Nmap scan report for 10.0.0.5",
                    "stderr": "",
                    "success": true,
                    "target": "10.0.0.5"
                })
                .to_string(),
            }]),
            is_error: None,
        };

        let output = ToolOutput::from_result(&result);
        assert!(output.success);
        assert_eq!(output.stdout, "Nmap scan report for 10.0.0.5");
        assert_eq!(output.target.as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn test_tool_output_from_wrapped_result() {
        let result = ToolCallResult {
            content: Some(vec![ToolContent::Text {
                text: json!({"result": {"stdout": "ok", "success": true}}).to_string(),
            }]),
            is_error: None,
        };

        let output = ToolOutput::from_result(&result);
        assert!(output.success);
        assert_eq!(output.stdout, "ok");
    }

    #[test]
    fn test_tool_output_from_plain_text() {
        let result = ToolCallResult {
            content: Some(vec![ToolContent::Text {
                text: "raw tool banner".to_string(),
            }]),
            is_error: None,
        };

        let output = ToolOutput::from_result(&result);
        assert!(output.success);
        assert_eq!(output.stdout, "raw tool banner");
    }

    #[test]
    fn test_tool_output_error_flag_wins() {
        let result = ToolCallResult {
            content: Some(vec![ToolContent::Text {
                text: json!({"stdout": "", "success": true}).to_string(),
            }]),
            is_error: Some(true),
        };

        assert!(!ToolOutput::from_result(&result).success);
    }

    #[test]
    fn test_tool_output_failure_constructor() {
        let output = ToolOutput::failure("connection refused", Some("10.0.0.5".into()));
        assert!(!output.success);
        assert_eq!(output.stderr, "connection refused");
        assert_eq!(output.target.as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn test_empty_content_is_empty_output() {
        let result = ToolCallResult {
            content: None,
            is_error: None,
        };
        let output = ToolOutput::from_result(&result);
        assert_eq!(output.stdout, "");
    }
}
