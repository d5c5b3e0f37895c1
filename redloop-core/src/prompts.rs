//! System prompts for the tool agents and orchestrator roles

use serde::Deserialize;
use std::path::Path;

use crate::{Error, Result};

/// One role's prompt
#[derive(Debug, Clone, Deserialize)]
pub struct RolePrompt {
    pub prompt: String,
}

/// All role prompts
#[derive(Debug, Clone, Deserialize)]
pub struct Prompts {
    pub nmap: RolePrompt,
    pub gobuster: RolePrompt,
    pub sqlmap: RolePrompt,
    pub summarizer: RolePrompt,
    pub reasoner: RolePrompt,
    pub planner: RolePrompt,
    pub memory: RolePrompt,
    pub report: RolePrompt,
}

impl Prompts {
    /// Load prompts from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse prompts from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse prompts: {}", e)))
    }

    /// Load from default location (embedded)
    #[allow(clippy::expect_used)]
    pub fn default_prompts() -> Self {
        let content = include_str!("../prompts.toml");
        Self::parse(content).expect("Embedded prompts.toml should be valid")
    }

    /// Get the prompt for a specific role
    pub fn get(&self, role: &str) -> Option<&str> {
        match role {
            "nmap" => Some(&self.nmap.prompt),
            "gobuster" => Some(&self.gobuster.prompt),
            "sqlmap" => Some(&self.sqlmap.prompt),
            "summarizer" => Some(&self.summarizer.prompt),
            "reasoner" => Some(&self.reasoner.prompt),
            "planner" => Some(&self.planner.prompt),
            "memory" => Some(&self.memory.prompt),
            "report" => Some(&self.report.prompt),
            _ => None,
        }
    }
}

impl Default for Prompts {
    fn default() -> Self {
        Self::default_prompts()
    }
}
