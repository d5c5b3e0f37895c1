//! sqlmap_scan tool arguments

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ToolDefinition;
use crate::Result;

/// Arguments for the sqlmap_scan tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlmapArgs {
    /// URL address of the target
    pub url: String,
    /// Data string to be sent through POST
    #[serde(default)]
    pub data: String,
    /// Any additional sqlmap arguments
    #[serde(default)]
    pub additional_args: String,
}

impl SqlmapArgs {
    /// Parse tool-call arguments as emitted by the model
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Payload for the remote tool service
    pub fn payload(&self) -> serde_json::Value {
        json!({
            "url": self.url,
            "data": self.data,
            "additional_args": self.additional_args,
        })
    }
}

/// Tool definition for sqlmap_scan
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "sqlmap_scan".to_string(),
        description: "Perform SQL injection testing.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "URL address of target."
                },
                "data": {
                    "type": "string",
                    "description": "Data string to be sent through POST."
                },
                "additional_args": {
                    "type": "string",
                    "description": "Any additional SQLmap arguments."
                }
            },
            "required": ["url"]
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_defaults() {
        let args = SqlmapArgs::from_value(&json!({"url": "http://10.0.0.5/login"})).unwrap();
        assert_eq!(args.url, "http://10.0.0.5/login");
        assert_eq!(args.data, "");
    }

    #[test]
    fn test_payload_shape() {
        let args = SqlmapArgs {
            url: "http://10.0.0.5".into(),
            data: "id=1".into(),
            additional_args: "--batch --level=1 --risk=1".into(),
        };
        let payload = args.payload();
        assert_eq!(payload["data"], "id=1");
        assert_eq!(payload["additional_args"], "--batch --level=1 --risk=1");
    }
}
