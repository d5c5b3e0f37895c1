//! Wires configuration into providers, the executor, and the agents

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;

use redloop_core::agents::{
    run_loop, GobusterAgent, LoopSettings, NmapAgent, Orchestrator, SqlmapAgent,
};
use redloop_core::config::RunConfig;
use redloop_core::kali::KaliClient;
use redloop_core::prompts::Prompts;
use redloop_core::providers::{LlmProvider, OllamaProvider};
use redloop_core::state::{MemoryStore, MetricsTracker};

use crate::args::{AgentName, Args, Command};

/// Load config with CLI overrides applied
pub fn load_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RunConfig::load_default(),
    };
    config.expand_env_vars();

    if let Some(target) = &args.target {
        config.target.host = target.clone();
    }
    if let Some(url) = &args.ollama_url {
        config.ollama.base_url = Some(url.clone());
    }
    if let Some(url) = &args.kali_url {
        config.kali.base_url = Some(url.clone());
    }
    if let Some(model) = &args.model {
        config.ollama.model = model.clone();
    }

    Ok(config)
}

fn build_provider(config: &RunConfig) -> Result<OllamaProvider> {
    let provider = OllamaProvider::with_base_url(
        config.ollama.resolved_base_url(),
        &config.ollama.model,
        MetricsTracker::new(),
    )?;
    Ok(provider)
}

/// Execute the selected subcommand
pub async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    match &args.command {
        Command::Run { task } => run_orchestrator(&config, task.as_deref()).await,
        Command::Agent { name } => run_agent_repl(&config, *name).await,
        Command::Memory { action } => {
            let store = MemoryStore::open(&config.memory.db_path)?;
            match action {
                crate::args::MemoryAction::Show => {
                    for record in store.all()? {
                        println!(
                            "[{}] {} / {}\n{}\n",
                            record.created_at, record.namespace, record.key, record.value
                        );
                    }
                }
                crate::args::MemoryAction::Wipe => {
                    let deleted = store.wipe()?;
                    println!("Deleted {deleted} records.");
                }
            }
            Ok(())
        }
    }
}

async fn run_orchestrator(config: &RunConfig, task: Option<&str>) -> Result<()> {
    anyhow::ensure!(
        !config.target.host.is_empty(),
        "No target configured; pass --target or set [target] in the config"
    );

    let provider = build_provider(config)?;
    let executor = KaliClient::new(config.kali.resolved_base_url());
    let store = MemoryStore::open(&config.memory.db_path)?;

    let default_task = format!(
        "Perform a penetration test against {}.",
        config.target.host
    );
    let task = task
        .or(config.target.task.as_deref())
        .unwrap_or(&default_task);

    info!(target = %config.target.host, "starting orchestrated run");
    let orchestrator = Orchestrator::new(&provider, &executor, &store, config);
    let report = orchestrator.run(task).await?;

    println!("{report}");
    print_metrics(&provider);
    Ok(())
}

/// Read commands from stdin and run the chosen agent once per line
async fn run_agent_repl(config: &RunConfig, name: AgentName) -> Result<()> {
    let provider = build_provider(config)?;
    let executor = KaliClient::new(config.kali.resolved_base_url());
    let prompts = Prompts::default();
    let settings = LoopSettings {
        max_iterations: config.limits.agent_iterations,
        temperature: Some(config.ollama.temperature),
    };

    println!("type 'exit' to close the conversation");
    let stdin = io::stdin();
    loop {
        print!("\nUser: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if matches!(command.to_lowercase().as_str(), "exit" | "quit") {
            println!("Ending...");
            break;
        }

        // Fresh state per command; one line is one full agent run.
        let outcome = match name {
            AgentName::Nmap => {
                let mut agent = NmapAgent::new(prompts.clone());
                run_loop(&mut agent, &provider, &executor, command, settings).await?
            }
            AgentName::Gobuster => {
                let mut agent = GobusterAgent::new(prompts.clone());
                let outcome =
                    run_loop(&mut agent, &provider, &executor, command, settings).await?;
                println!("Findings:\n{}", agent.findings());
                outcome
            }
            AgentName::Sqlmap => {
                let mut agent =
                    SqlmapAgent::new(prompts.clone(), config.ollama.summarizer_temperature);
                let outcome =
                    run_loop(&mut agent, &provider, &executor, command, settings).await?;
                println!("Final phase: {:?}", agent.state().phase);
                outcome
            }
        };

        if outcome.finished {
            println!("\nReport:\n{}", outcome.report);
        } else {
            println!("\nAgent did not finish: {}", outcome.report);
        }
    }

    print_metrics(&provider);
    Ok(())
}

fn print_metrics(provider: &OllamaProvider) {
    let metrics = provider.metrics().snapshot();
    info!(
        tool_calls = metrics.tool_calls,
        tokens_input = metrics.tokens_input,
        tokens_output = metrics.tokens_output,
        "run metrics"
    );
}
