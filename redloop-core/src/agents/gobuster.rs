//! Directory-enumeration agent wrapping gobuster
//!
//! Findings live in structured state, not in the model's final answer; the
//! final answer is only a confirmation that enumeration ran.

use async_trait::async_trait;
use serde_json::Value;

use crate::decision::ToolCall;
use crate::kali::protocol::ToolOutput;
use crate::parsers::gobuster::parse;
use crate::prompts::Prompts;
use crate::providers::LlmProvider;
use crate::state::GobusterState;
use crate::tools::GobusterArgs;
use crate::Result;

use super::ToolAgent;

pub struct GobusterAgent {
    state: GobusterState,
    prompts: Prompts,
}

impl GobusterAgent {
    pub fn new(prompts: Prompts) -> Self {
        Self {
            state: GobusterState::new(),
            prompts,
        }
    }

    pub fn state(&self) -> &GobusterState {
        &self.state
    }

    /// Structured findings for the orchestrator, since the model's final
    /// answer is only a confirmation
    pub fn findings(&self) -> Value {
        self.state.snapshot()
    }
}

impl Default for GobusterAgent {
    fn default() -> Self {
        Self::new(Prompts::default())
    }
}

#[async_trait(?Send)]
impl ToolAgent for GobusterAgent {
    fn name(&self) -> &str {
        "gobuster"
    }

    fn system_prompt(&self) -> &str {
        self.prompts.get("gobuster").unwrap_or("")
    }

    fn tool(&self) -> crate::tools::ToolDefinition {
        crate::tools::gobuster::definition()
    }

    fn normalize_args(&self, args: &Value) -> Result<Value> {
        Ok(GobusterArgs::from_value(args)?.payload())
    }

    fn snapshot(&self) -> Value {
        self.state.snapshot()
    }

    async fn observe(
        &mut self,
        call: &ToolCall,
        output: &ToolOutput,
        _provider: &dyn LlmProvider,
    ) -> Result<String> {
        if output.success {
            let scan = parse(&output.stdout);
            self.state.record(&call.tool, call.args.clone(), scan);
        }

        Ok(serde_json::to_string(output)?)
    }
}
