//! Supervisor that sequences tool agents over a run
//!
//! The orchestrator loops reason -> plan -> dispatch: a one-word reasoning
//! pass picks the next action, a planner pass turns it into a single-sentence
//! command for the chosen tool agent, and the agent's report feeds the next
//! reasoning pass. Findings worth keeping go to the sqlite store; "output"
//! ends the run with a written report.

use std::str::FromStr;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RunConfig;
use crate::kali::ToolExecutor;
use crate::prompts::Prompts;
use crate::providers::{CompletionRequest, LlmProvider, Message};
use crate::state::MemoryStore;
use crate::{Error, Result};

use super::{run_loop, GobusterAgent, LoopSettings, NmapAgent, SqlmapAgent};

const REASON_RETRIES: usize = 3;
const MEMORY_SEARCH_LIMIT: usize = 10;

/// Action chosen by the reasoning pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    Nmap,
    Gobuster,
    Sqlmap,
    Memory,
    Output,
}

impl FromStr for NextAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "nmap" => Ok(Self::Nmap),
            "gobuster" => Ok(Self::Gobuster),
            "sqlmap" => Ok(Self::Sqlmap),
            "memory" => Ok(Self::Memory),
            "output" => Ok(Self::Output),
            other => Err(Error::Agent(format!(
                "Reasoner returned an unknown action: {other:?}"
            ))),
        }
    }
}

pub struct Orchestrator<'a> {
    provider: &'a dyn LlmProvider,
    executor: &'a dyn ToolExecutor,
    store: &'a MemoryStore,
    prompts: Prompts,
    config: &'a RunConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        provider: &'a dyn LlmProvider,
        executor: &'a dyn ToolExecutor,
        store: &'a MemoryStore,
        config: &'a RunConfig,
    ) -> Self {
        Self {
            provider,
            executor,
            store,
            prompts: Prompts::default(),
            config,
        }
    }

    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    fn namespace(&self) -> &str {
        &self.config.target.host
    }

    fn loop_settings(&self) -> LoopSettings {
        LoopSettings {
            max_iterations: self.config.limits.agent_iterations,
            temperature: Some(self.config.ollama.temperature),
        }
    }

    async fn invoke(&self, role: &str, body: String) -> Result<String> {
        let request = CompletionRequest::new(vec![Message::system(body)])
            .with_system(self.prompts.get(role).unwrap_or(""))
            .with_temperature(self.config.ollama.temperature);
        Ok(self.provider.complete(request).await?.trim().to_string())
    }

    fn recalled_memory(&self) -> Result<String> {
        let records = self.store.search(self.namespace(), MEMORY_SEARCH_LIMIT)?;
        Ok(records
            .iter()
            .map(|r| r.value.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// One-word decision on the next action, with bounded retries on
    /// out-of-vocabulary answers
    async fn reason(
        &self,
        task: &str,
        current_step: &str,
        last_result: Option<&str>,
    ) -> Result<NextAction> {
        let body = format!(
            "GIVEN TASK:\n{}\n\nMEMORY:\n{}\n\nCURRENT STEP:\n{}\n\nLAST PARSED TOOL OUTPUT:\n{}",
            task,
            self.recalled_memory()?,
            current_step,
            last_result.unwrap_or(""),
        );

        let mut last_err = None;
        for attempt in 1..=REASON_RETRIES {
            let word = self.invoke("reasoner", body.clone()).await?;
            match NextAction::from_str(&word) {
                Ok(action) => {
                    debug!(?action, attempt, "reasoner decided");
                    return Ok(action);
                }
                Err(e) => {
                    warn!(attempt, %word, "reasoner went off vocabulary");
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| Error::Agent("Reasoner produced no decision".into())))
    }

    /// Translate an intent into a single-sentence command for a tool agent
    async fn plan(
        &self,
        intent: NextAction,
        task: &str,
        last_result: Option<&str>,
    ) -> Result<String> {
        let body = format!(
            "NEW INTENT:\n{:?}\n\nPREVIOUS TASK:\n{}\n\nLAST TOOL OUTPUT:\n{}",
            intent,
            task,
            last_result.unwrap_or(""),
        );
        self.invoke("planner", body).await
    }

    /// Distill the last step into a summary and persist it
    async fn store_memory(&self, current_step: &str, last_result: Option<&str>) -> Result<()> {
        let body = format!(
            "CURRENT STEP:\n{}\n\nLAST PARSED TOOL OUTPUT:\n{}",
            current_step,
            last_result.unwrap_or(""),
        );
        let summary = self.invoke("memory", body).await?;
        if !summary.is_empty() {
            self.store
                .put(self.namespace(), &Uuid::new_v4().to_string(), &summary)?;
        }
        Ok(())
    }

    /// Written final report from task, stored memory, and the last result
    async fn report(&self, task: &str, last_result: Option<&str>) -> Result<String> {
        let body = format!(
            "GIVEN TASK:\n{}\n\nMEMORY:\n{}\n\nLAST PARSED TOOL OUTPUT:\n{}",
            task,
            self.recalled_memory()?,
            last_result.unwrap_or(""),
        );
        self.invoke("report", body).await
    }

    async fn dispatch(&self, action: NextAction, command: &str) -> Result<(String, String)> {
        let settings = self.loop_settings();
        let outcome = match action {
            NextAction::Nmap => {
                let mut agent = NmapAgent::new(self.prompts.clone());
                run_loop(&mut agent, self.provider, self.executor, command, settings).await?
            }
            NextAction::Gobuster => {
                let mut agent = GobusterAgent::new(self.prompts.clone());
                let outcome =
                    run_loop(&mut agent, self.provider, self.executor, command, settings).await?;
                // The confirmation answer carries nothing; the findings do.
                if outcome.finished {
                    super::AgentOutcome {
                        finished: true,
                        report: agent.findings().to_string(),
                    }
                } else {
                    outcome
                }
            }
            NextAction::Sqlmap => {
                let mut agent = SqlmapAgent::new(
                    self.prompts.clone(),
                    self.config.ollama.summarizer_temperature,
                );
                run_loop(&mut agent, self.provider, self.executor, command, settings).await?
            }
            NextAction::Memory | NextAction::Output => {
                return Err(Error::Agent(format!(
                    "Action {action:?} is not a tool agent"
                )))
            }
        };

        let status = if outcome.finished {
            "Completed.".to_string()
        } else {
            "Failed to complete the task.".to_string()
        };
        Ok((extract_report(&outcome.report), status))
    }

    /// Run the full supervisor loop for one task
    pub async fn run(&self, task: &str) -> Result<String> {
        let mut current_step = String::from("Run start.");
        let mut last_result: Option<String> = None;

        for round in 1..=self.config.limits.orchestrator_iterations {
            let action = self
                .reason(task, &current_step, last_result.as_deref())
                .await?;
            info!(round, ?action, "orchestrator step");

            match action {
                NextAction::Output => {
                    return self.report(task, last_result.as_deref()).await;
                }
                NextAction::Memory => {
                    self.store_memory(&current_step, last_result.as_deref())
                        .await?;
                    current_step = "Stored findings to memory.".to_string();
                }
                tool_action => {
                    let command = self
                        .plan(tool_action, task, last_result.as_deref())
                        .await?;
                    let (result, status) = self.dispatch(tool_action, &command).await?;
                    current_step = format!("{tool_action:?} agent: {status}");
                    last_result = Some(result);
                }
            }
        }

        warn!("orchestrator hit its round limit, reporting what we have");
        self.report(task, last_result.as_deref()).await
    }
}

/// Strip a FINAL_ANSWER prefix off a sub-agent report
pub fn extract_report(text: &str) -> String {
    let text = text.trim();
    let upper = text.to_uppercase();
    if upper.starts_with("FINAL_ANSWER:") {
        text.get("FINAL_ANSWER:".len()..)
            .unwrap_or("")
            .trim()
            .to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::agents::traits::tests::{ScriptedProvider, StubExecutor};
    use crate::kali::protocol::ToolOutput;

    #[test]
    fn test_next_action_parsing() {
        assert_eq!(NextAction::from_str("nmap").unwrap(), NextAction::Nmap);
        assert_eq!(NextAction::from_str(" Output \n").unwrap(), NextAction::Output);
        assert!(NextAction::from_str("ping").is_err());
    }

    #[test]
    fn test_extract_report() {
        assert_eq!(extract_report("FINAL_ANSWER: all done"), "all done");
        assert_eq!(extract_report("final_answer: case test"), "case test");
        assert_eq!(extract_report("plain text"), "plain text");
        assert_eq!(extract_report(""), "");
    }

    fn test_config() -> RunConfig {
        let mut config = RunConfig::default();
        config.target.host = "192.168.56.103".to_string();
        config.limits.orchestrator_iterations = 5;
        config.limits.agent_iterations = 5;
        config
    }

    #[tokio::test]
    async fn test_immediate_output_produces_report() {
        let provider = ScriptedProvider::new(vec!["output", "Nothing to do, target untouched."]);
        let executor = StubExecutor::new(ToolOutput::default());
        let store = MemoryStore::open_in_memory().expect("store");
        let config = test_config();

        let orchestrator = Orchestrator::new(&provider, &executor, &store, &config);
        let report = orchestrator.run("Assess the target.").await.expect("run");

        assert_eq!(report, "Nothing to do, target untouched.");
    }

    #[tokio::test]
    async fn test_nmap_dispatch_then_memory_then_output() {
        let provider = ScriptedProvider::new(vec![
            // round 1: reason -> nmap, plan, agent turn
            "nmap",
            "Scan host 192.168.56.103 for open services.",
            "FINAL_ANSWER: Host 192.168.56.103 runs ssh and http.",
            // round 2: reason -> memory, memory summary
            "memory",
            "192.168.56.103 exposes ssh (22) and http (80).",
            // round 3: reason -> output, report
            "output",
            "Target exposes ssh and http, no further findings.",
        ]);
        let executor = StubExecutor::new(ToolOutput::default());
        let store = MemoryStore::open_in_memory().expect("store");
        let config = test_config();

        let orchestrator = Orchestrator::new(&provider, &executor, &store, &config);
        let report = orchestrator.run("Assess the target.").await.expect("run");

        assert_eq!(report, "Target exposes ssh and http, no further findings.");

        let records = store.search("192.168.56.103", 10).expect("search");
        assert_eq!(records.len(), 1);
        assert!(records[0].value.contains("ssh (22)"));
    }

    #[tokio::test]
    async fn test_reasoner_off_vocabulary_retries_then_fails() {
        let provider = ScriptedProvider::new(vec!["ping", "maybe", "dunno"]);
        let executor = StubExecutor::new(ToolOutput::default());
        let store = MemoryStore::open_in_memory().expect("store");
        let config = test_config();

        let orchestrator = Orchestrator::new(&provider, &executor, &store, &config);
        let result = orchestrator.run("Assess the target.").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_round_limit_still_reports() {
        // Reasoner keeps storing memory until rounds run out.
        let mut script = Vec::new();
        for _ in 0..5 {
            script.push("memory");
            script.push("nothing new");
        }
        script.push("Partial report.");
        let provider = ScriptedProvider::new(script);
        let executor = StubExecutor::new(ToolOutput::default());
        let store = MemoryStore::open_in_memory().expect("store");
        let config = test_config();

        let orchestrator = Orchestrator::new(&provider, &executor, &store, &config);
        let report = orchestrator.run("Assess the target.").await.expect("run");

        assert_eq!(report, "Partial report.");
    }
}
