//! Configuration types for redloop runs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_KALI_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_MODEL: &str = "qwen3:8b";

/// Target configuration (optional in config file - use CLI --target instead)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default)]
    pub host: String,
    /// Free-text engagement task handed to the orchestrator
    #[serde(default)]
    pub task: Option<String>,
}

/// Ollama chat endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Temperature for the sqlmap output summarizer (deterministic by default)
    #[serde(default)]
    pub summarizer_temperature: f64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    0.2
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: default_model(),
            temperature: default_temperature(),
            summarizer_temperature: 0.0,
        }
    }
}

impl OllamaConfig {
    /// Resolve the base URL: config value, then OLLAMA_API, then localhost
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .or_else(|| std::env::var("OLLAMA_API").ok())
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string())
    }
}

/// Remote Kali tool service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KaliConfig {
    #[serde(default)]
    pub base_url: Option<String>,
}

impl KaliConfig {
    /// Resolve the base URL: config value, then KALI_API, then localhost
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .or_else(|| std::env::var("KALI_API").ok())
            .unwrap_or_else(|| DEFAULT_KALI_URL.to_string())
    }
}

/// Iteration bounds for agent and orchestrator loops
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default = "default_agent_iterations")]
    pub agent_iterations: usize,
    #[serde(default = "default_orchestrator_iterations")]
    pub orchestrator_iterations: usize,
}

fn default_agent_iterations() -> usize {
    40
}

fn default_orchestrator_iterations() -> usize {
    20
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            agent_iterations: default_agent_iterations(),
            orchestrator_iterations: default_orchestrator_iterations(),
        }
    }
}

/// Orchestrator memory store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_memory_path")]
    pub db_path: PathBuf,
}

fn default_memory_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".redloop")
        .join("memory.sqlite")
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_memory_path(),
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub kali: KaliConfig,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from default locations with cascade:
    /// 1. ./redloop.toml (local override)
    /// 2. ~/.redloop/config.toml (global defaults)
    /// 3. Built-in defaults
    pub fn load_default() -> Self {
        if let Ok(config) = Self::from_file("redloop.toml") {
            return config;
        }

        if let Some(home) = dirs::home_dir() {
            let global_path = home.join(".redloop").join("config.toml");
            if let Ok(config) = Self::from_file(&global_path) {
                return config;
            }
        }

        Self::default()
    }

    /// Expand `${VAR}` environment references in URL fields
    pub fn expand_env_vars(&mut self) {
        for url in [&mut self.ollama.base_url, &mut self.kali.base_url] {
            if let Some(ref value) = url {
                if value.starts_with("${") && value.ends_with('}') {
                    let var_name = &value[2..value.len() - 1];
                    if let Ok(expanded) = std::env::var(var_name) {
                        *url = Some(expanded);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = RunConfig::parse("").unwrap();
        assert_eq!(config.ollama.model, "qwen3:8b");
        assert!((config.ollama.temperature - 0.2).abs() < 1e-9);
        assert_eq!(config.limits.agent_iterations, 40);
        assert_eq!(config.target.host, "");
    }

    #[test]
    fn test_parse_config_with_target() {
        let toml = r#"
[target]
host = "192.168.56.0/24"
task = "profile all hosts on the lab network"
"#;
        let config = RunConfig::parse(toml).unwrap();
        assert_eq!(config.target.host, "192.168.56.0/24");
        assert_eq!(
            config.target.task.as_deref(),
            Some("profile all hosts on the lab network")
        );
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[target]
host = "http://192.168.56.10"

[ollama]
base_url = "http://10.0.0.2:11434"
model = "llama3.1:8b"
temperature = 0.1

[kali]
base_url = "http://10.0.0.3:5000"

[limits]
agent_iterations = 25
orchestrator_iterations = 8
"#;
        let config = RunConfig::parse(toml).unwrap();
        assert_eq!(config.ollama.model, "llama3.1:8b");
        assert_eq!(config.ollama.resolved_base_url(), "http://10.0.0.2:11434");
        assert_eq!(config.kali.resolved_base_url(), "http://10.0.0.3:5000");
        assert_eq!(config.limits.agent_iterations, 25);
        assert_eq!(config.limits.orchestrator_iterations, 8);
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("REDLOOP_TEST_KALI", "http://expanded:5000");
        let toml = r#"
[kali]
base_url = "${REDLOOP_TEST_KALI}"
"#;
        let mut config = RunConfig::parse(toml).unwrap();
        config.expand_env_vars();
        assert_eq!(config.kali.base_url.as_deref(), Some("http://expanded:5000"));
        std::env::remove_var("REDLOOP_TEST_KALI");
    }

    #[test]
    fn test_summarizer_temperature_defaults_to_zero() {
        let config = RunConfig::default();
        assert_eq!(config.ollama.summarizer_temperature, 0.0);
    }
}
