//! Wrapped security tool definitions and argument types

pub mod gobuster;
pub mod nmap;
pub mod sqlmap;

use serde::{Deserialize, Serialize};

pub use gobuster::GobusterArgs;
pub use nmap::NmapArgs;
pub use sqlmap::SqlmapArgs;

/// A security tool exposed to an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}
