//! gobuster_scan tool arguments

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ToolDefinition;
use crate::Result;

/// Default wordlist on the Kali side
pub const DEFAULT_WORDLIST: &str = "/usr/share/wordlists/dirb/common.txt";

/// Arguments for the gobuster_scan tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GobusterArgs {
    /// URL address of the target
    pub url: String,
    /// Gobuster scan mode
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Wordlist path on the tool host
    #[serde(default = "default_wordlist")]
    pub wordlist: String,
    /// Additional gobuster arguments
    #[serde(default)]
    pub additional_args: String,
}

fn default_mode() -> String {
    "dir".to_string()
}

fn default_wordlist() -> String {
    DEFAULT_WORDLIST.to_string()
}

impl GobusterArgs {
    /// Parse tool-call arguments as emitted by the model
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Payload for the remote tool service
    pub fn payload(&self) -> serde_json::Value {
        json!({
            "url": self.url,
            "mode": self.mode,
            "wordlist": self.wordlist,
            "additional_args": self.additional_args,
        })
    }
}

/// Tool definition for gobuster_scan
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "gobuster_scan".to_string(),
        description: "Perform gobuster scan.".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "URL address of the target."
                },
                "mode": {
                    "type": "string",
                    "description": "Gobuster scan mode."
                },
                "additional_args": {
                    "type": "string",
                    "description": "Additional gobuster arguments."
                }
            },
            "required": ["url"]
        }),
    }
}
