//! Ollama provider implementation using rig-core

use async_trait::async_trait;
use rig::client::{CompletionClient, Nothing};
use rig::completion::Prompt;
use rig::providers::ollama;

use crate::state::MetricsTracker;
use crate::{Error, Result};

use super::{CompletionRequest, LlmProvider};

/// Estimate token count from text (roughly 4 characters per token for English)
/// Ollama does not reliably report usage, so this is what the metrics carry
fn estimate_tokens(text: &str) -> u64 {
    (text.len() as u64).div_ceil(4)
}

/// Ollama provider using rig-core
pub struct OllamaProvider {
    client: ollama::Client,
    model: String,
    metrics: MetricsTracker,
}

impl OllamaProvider {
    /// Create with default localhost URL (http://localhost:11434)
    pub fn new(model: impl Into<String>, metrics: MetricsTracker) -> Result<Self> {
        let client = ollama::Client::builder()
            .api_key(Nothing)
            .build()
            .map_err(|e| Error::Provider(format!("Failed to build Ollama client: {}", e)))?;

        Ok(Self {
            client,
            model: model.into(),
            metrics,
        })
    }

    /// Create with custom base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        model: impl Into<String>,
        metrics: MetricsTracker,
    ) -> Result<Self> {
        let client = ollama::Client::builder()
            .api_key(Nothing)
            .base_url(base_url.into())
            .build()
            .map_err(|e| Error::Provider(format!("Failed to build Ollama client: {}", e)))?;

        Ok(Self {
            client,
            model: model.into(),
            metrics,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        // Flatten message history into a single prompt
        let prompt = request
            .messages
            .iter()
            .map(|m| format!("{:?}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");

        let mut builder = self
            .client
            .agent(&self.model)
            .preamble(
                request
                    .system
                    .as_deref()
                    .unwrap_or("You are a deterministic sub-agent."),
            )
            .max_tokens(u64::from(request.max_tokens.unwrap_or(4096)));

        if let Some(temperature) = request.temperature {
            builder = builder.temperature(temperature);
        }

        let agent = builder.build();

        let response = agent
            .prompt(&prompt)
            .await
            .map_err(|e| Error::Provider(format!("Ollama completion failed: {}", e)))?;

        let system_len = request.system.as_deref().map(estimate_tokens).unwrap_or(0);
        self.metrics.record_tokens(
            estimate_tokens(&prompt) + system_len,
            estimate_tokens(&response),
        );

        Ok(response)
    }

    fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_default_localhost() {
        // Should work without any env vars (defaults to localhost:11434)
        let result = OllamaProvider::new("qwen3:8b", MetricsTracker::new());
        assert!(result.is_ok());
    }

    #[test]
    fn test_provider_custom_base_url() {
        let result =
            OllamaProvider::with_base_url("http://custom:11434", "qwen3:8b", MetricsTracker::new());
        assert!(result.is_ok());
    }

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
    }
}
