//! nmap_scan tool arguments

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ToolDefinition;
use crate::Result;

/// Arguments for the nmap_scan tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NmapArgs {
    /// IP address, hostname or CIDR (e.g. 192.168.56.0/24)
    pub target: String,
    /// Nmap scan type flags (e.g. -sn, -sS, -sV)
    #[serde(default = "default_scan_type")]
    pub scan_type: String,
    /// Comma-separated ports or ranges (e.g. "22,80,443")
    #[serde(default)]
    pub ports: String,
    /// Additional nmap arguments
    #[serde(default)]
    pub additional_args: String,
}

fn default_scan_type() -> String {
    "-sV".to_string()
}

impl NmapArgs {
    /// Parse tool-call arguments as emitted by the model
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Payload for the remote tool service
    pub fn payload(&self) -> serde_json::Value {
        json!({
            "target": self.target,
            "scan_type": self.scan_type,
            "ports": self.ports,
            "additional_args": self.additional_args,
        })
    }
}

/// Tool definition for nmap_scan
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "nmap_scan".to_string(),
        description: "Performs network or host scan in given network.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "target": {
                    "type": "string",
                    "description": "IP address, hostname or CIDR (e.g. 192.168.56.0/24)"
                },
                "scan_type": {
                    "type": "string",
                    "description": "Nmap scan type (e.g. -sn, -sS, -sV)"
                },
                "ports": {
                    "type": "string",
                    "description": "Comma-separated ports or ranges (e.g. '22,80,443')"
                },
                "additional_args": {
                    "type": "string",
                    "description": "Additional nmap args"
                }
            },
            "required": ["target"]
        }),
    }
}
