//! Tool agent trait and the shared chat control loop
//!
//! Every tool agent speaks the same line protocol and runs under the same
//! loop: snapshot state into a system message, ask the model for one line,
//! execute a tool call or accept a final answer, fold the tool output back
//! into state, repeat. Agents differ only in their prompt, state shape, and
//! how they digest tool output.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::decision::{Decision, ToolCall};
use crate::kali::{protocol::ToolOutput, ToolExecutor};
use crate::providers::{CompletionRequest, LlmProvider, Message};
use crate::tools::ToolDefinition;
use crate::Result;

/// Terminal result of one agent run
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    /// True when the agent produced a final answer
    pub finished: bool,
    /// Final answer text, or a short failure note
    pub report: String,
}

/// Bounds and sampling settings for one agent run
#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    pub max_iterations: usize,
    pub temperature: Option<f64>,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            max_iterations: 40,
            temperature: Some(0.2),
        }
    }
}

/// A tool-wrapping agent driven by [`run_loop`]
#[async_trait(?Send)]
pub trait ToolAgent {
    /// Agent name, used in logs and by the orchestrator
    fn name(&self) -> &str;

    /// System prompt establishing the line protocol and tool contract
    fn system_prompt(&self) -> &str;

    /// Definition of the single tool this agent wraps
    fn tool(&self) -> ToolDefinition;

    /// Normalize model-emitted arguments into the full service payload.
    ///
    /// Round-trips through the typed argument struct so serde defaults
    /// (scan type, gobuster wordlist) apply even when the model omits them.
    fn normalize_args(&self, args: &Value) -> Result<Value>;

    /// JSON snapshot of the mutable state, injected into each turn
    fn snapshot(&self) -> Value;

    /// Fold one tool result into state.
    ///
    /// Returns the observation text the model sees as LAST TOOL OUTPUT on
    /// the next turn. The provider is available for agents that post-process
    /// raw output with a second completion.
    async fn observe(
        &mut self,
        call: &ToolCall,
        output: &ToolOutput,
        provider: &dyn LlmProvider,
    ) -> Result<String>;
}

/// Drive a tool agent until it produces a final answer or the iteration
/// bound is hit.
///
/// Tool failures never abort the loop: the executor folds them into
/// failure-flagged outputs, the agent observes them, and the model decides
/// whether to retry with adjusted arguments.
pub async fn run_loop(
    agent: &mut dyn ToolAgent,
    provider: &dyn LlmProvider,
    executor: &dyn ToolExecutor,
    task: &str,
    settings: LoopSettings,
) -> Result<AgentOutcome> {
    let mut last_call: Option<ToolCall> = None;
    let mut last_output: Option<String> = None;

    for iteration in 1..=settings.max_iterations {
        let turn = build_turn_message(
            task,
            &agent.snapshot(),
            last_call.as_ref(),
            last_output.as_deref(),
        );

        let mut request =
            CompletionRequest::new(vec![Message::system(turn)]).with_system(agent.system_prompt());
        if let Some(temperature) = settings.temperature {
            request = request.with_temperature(temperature);
        }

        let response = provider.complete(request).await?;
        debug!(agent = agent.name(), iteration, "model turn complete");

        match Decision::parse(&response) {
            Decision::CallTool(call) => {
                if call.tool != agent.tool().name {
                    warn!(
                        agent = agent.name(),
                        tool = %call.tool,
                        "model called a tool outside its contract"
                    );
                }
                // Bad arguments go back to the model as a failed result, not
                // to the service.
                let call = match agent.normalize_args(&call.args) {
                    Ok(args) => ToolCall {
                        tool: call.tool,
                        args,
                    },
                    Err(e) => {
                        warn!(agent = agent.name(), error = %e, "rejected tool arguments");
                        let output =
                            ToolOutput::failure(format!("Invalid tool arguments: {}", e), None);
                        let observation = agent.observe(&call, &output, provider).await?;
                        last_call = Some(call);
                        last_output = Some(observation);
                        continue;
                    }
                };
                provider.metrics().record_tool_call();
                let output = executor.execute(&call.tool, call.args.clone()).await?;
                if !output.success {
                    warn!(
                        agent = agent.name(),
                        tool = %call.tool,
                        "tool call failed, surfacing to model"
                    );
                }
                let observation = agent.observe(&call, &output, provider).await?;
                last_call = Some(call);
                last_output = Some(observation);
            }
            Decision::FinalAnswer(report) => {
                // A final answer that smuggles a tool call is not terminal.
                if report.trim_start().starts_with("CALL_TOOL:") {
                    warn!(agent = agent.name(), "final answer wraps a tool call, ignoring");
                    continue;
                }
                return Ok(AgentOutcome {
                    finished: true,
                    report,
                });
            }
            Decision::Error(message) => {
                warn!(agent = agent.name(), %message, "agent gave up");
                return Ok(AgentOutcome {
                    finished: false,
                    report: message,
                });
            }
            Decision::Empty => {
                warn!(agent = agent.name(), iteration, "empty model response, retrying");
            }
        }
    }

    Ok(AgentOutcome {
        finished: false,
        report: format!(
            "Iteration limit of {} reached without a final answer.",
            settings.max_iterations
        ),
    })
}

/// Format one turn's system message from task, state, and the previous
/// tool exchange. Missing fields are omitted rather than sent empty.
fn build_turn_message(
    task: &str,
    snapshot: &Value,
    last_call: Option<&ToolCall>,
    last_output: Option<&str>,
) -> String {
    let mut message = format!(
        "YOUR TASK:\nSupervisor gave you the following task: {}\n\nCURRENT STATE:\n{}\n",
        task, snapshot
    );

    if let Some(call) = last_call {
        message.push_str(&format!(
            "\nLAST TOOL CALL:\n{}\n",
            serde_json::json!({ "tool": call.tool, "args": call.args })
        ));
    }
    if let Some(output) = last_output {
        message.push_str(&format!("\nLAST TOOL OUTPUT:\n{}\n", output));
    }

    message
}
