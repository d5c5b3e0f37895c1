//! SQL-injection assessment agent wrapping sqlmap
//!
//! Raw sqlmap output is too noisy to feed back verbatim, so every tool
//! result first goes through a low-temperature summarizer pass. The tags the
//! summarizer appends drive the assessment phase machine.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::decision::ToolCall;
use crate::kali::protocol::ToolOutput;
use crate::parsers::extract_tags;
use crate::prompts::Prompts;
use crate::providers::{CompletionRequest, LlmProvider, Message};
use crate::state::SqlmapState;
use crate::tools::SqlmapArgs;
use crate::Result;

use super::ToolAgent;

const TAG_INSTRUCTIONS: &str = "\
IMPORTANT:
Append one or more TAGS at the end of the summary.

Allowed TAGS (uppercase, exact match):

- TAG:INJECTABLE
- TAG:NOT_INJECTABLE
- TAG:DB_ENUM_AVAILABLE
- TAG:DATA_EXTRACTED
- TAG:ERROR

Only include a TAG if it is explicitly supported by the tool output.
Do NOT infer.
Do NOT invent tags.";

pub struct SqlmapAgent {
    state: SqlmapState,
    prompts: Prompts,
    summarizer_temperature: f64,
}

impl SqlmapAgent {
    pub fn new(prompts: Prompts, summarizer_temperature: f64) -> Self {
        Self {
            state: SqlmapState::new(),
            prompts,
            summarizer_temperature,
        }
    }

    pub fn state(&self) -> &SqlmapState {
        &self.state
    }

    /// Summarize raw tool output and request phase tags
    async fn summarize(
        &self,
        call: &ToolCall,
        output: &ToolOutput,
        provider: &dyn LlmProvider,
    ) -> Result<String> {
        let task = format!(
            "YOUR TASK:\nCreate a concise summary of the last tool output.\n\n{}\n\n\
             LAST TOOL CALL:\n{}\n\nLAST TOOL OUTPUT:\n{}",
            TAG_INSTRUCTIONS,
            serde_json::json!({ "tool": call.tool, "args": call.args }),
            serde_json::to_string(output)?,
        );

        let request = CompletionRequest::new(vec![Message::system(task)])
            .with_system(self.prompts.get("summarizer").unwrap_or(""))
            .with_temperature(self.summarizer_temperature);

        provider.complete(request).await
    }
}

impl Default for SqlmapAgent {
    fn default() -> Self {
        Self::new(Prompts::default(), 0.0)
    }
}

#[async_trait(?Send)]
impl ToolAgent for SqlmapAgent {
    fn name(&self) -> &str {
        "sqlmap"
    }

    fn system_prompt(&self) -> &str {
        self.prompts.get("sqlmap").unwrap_or("")
    }

    fn tool(&self) -> crate::tools::ToolDefinition {
        crate::tools::sqlmap::definition()
    }

    fn normalize_args(&self, args: &Value) -> Result<Value> {
        Ok(SqlmapArgs::from_value(args)?.payload())
    }

    fn snapshot(&self) -> Value {
        self.state.snapshot()
    }

    async fn observe(
        &mut self,
        call: &ToolCall,
        output: &ToolOutput,
        provider: &dyn LlmProvider,
    ) -> Result<String> {
        let summary = self.summarize(call, output, provider).await?;
        let summary = summary.trim().to_string();
        if summary.is_empty() {
            return Ok(serde_json::to_string(output)?);
        }

        let tags = extract_tags(&summary);
        self.state.observe(
            serde_json::json!({ "tool": call.tool, "args": call.args }),
            summary.clone(),
            &tags,
        );
        if self.state.phase.is_done() {
            debug!(
                target = self.state.target.as_deref().unwrap_or("unknown"),
                "assessment reached its terminal phase"
            );
        }

        Ok(summary)
    }
}
