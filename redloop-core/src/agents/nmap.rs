//! Network-scanning agent wrapping nmap

use async_trait::async_trait;
use serde_json::Value;

use crate::decision::ToolCall;
use crate::kali::protocol::ToolOutput;
use crate::parsers::scan_report_hosts;
use crate::prompts::Prompts;
use crate::providers::LlmProvider;
use crate::state::{FactNote, NmapState};
use crate::tools::NmapArgs;
use crate::Result;

use super::ToolAgent;

/// Profiles hosts with a fixed plan of escalating scans
pub struct NmapAgent {
    state: NmapState,
    prompts: Prompts,
}

impl NmapAgent {
    pub fn new(prompts: Prompts) -> Self {
        Self {
            state: NmapState::new(),
            prompts,
        }
    }

    pub fn state(&self) -> &NmapState {
        &self.state
    }
}

impl Default for NmapAgent {
    fn default() -> Self {
        Self::new(Prompts::default())
    }
}

#[async_trait(?Send)]
impl ToolAgent for NmapAgent {
    fn name(&self) -> &str {
        "nmap"
    }

    fn system_prompt(&self) -> &str {
        self.prompts.get("nmap").unwrap_or("")
    }

    fn tool(&self) -> crate::tools::ToolDefinition {
        crate::tools::nmap::definition()
    }

    fn normalize_args(&self, args: &Value) -> Result<Value> {
        Ok(NmapArgs::from_value(args)?.payload())
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
        // Every scan report line can surface a new host, even on partial runs.
        let hosts = scan_report_hosts(&output.stdout);
        self.state.discover_all(&hosts);

        if output.success {
            if let Ok(args) = NmapArgs::from_value(&call.args) {
                let note = FactNote {
                    scan_type: args.scan_type.clone(),
                    ports: (!args.ports.is_empty()).then(|| args.ports.clone()),
                    additional_args: (!args.additional_args.is_empty())
                        .then(|| args.additional_args.clone()),
                    notes: format!(
                        "With the scan of {} we learned the following facts:\n\n{}",
                        args.target, output.stdout
                    ),
                };
                self.state.record_scan(&args.target, note);
            }
        }

        Ok(serde_json::to_string(output)?)
    }
}
