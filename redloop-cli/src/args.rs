//! CLI argument parsing

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "redloop")]
#[command(author, version, about = "LLM-driven pentest tool agents over a remote Kali executor")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Target host, CIDR, or URL (overrides config)
    #[arg(long)]
    pub target: Option<String>,

    /// Ollama base URL (overrides config and OLLAMA_API)
    #[arg(long)]
    pub ollama_url: Option<String>,

    /// Tool executor base URL (overrides config and KALI_API)
    #[arg(long)]
    pub kali_url: Option<String>,

    /// Model to use
    #[arg(long)]
    pub model: Option<String>,

    /// Verbose output
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the orchestrator against the configured target
    Run {
        /// Task description; defaults to the config's target task
        task: Option<String>,
    },
    /// Drive a single tool agent interactively
    Agent {
        /// Which agent to run
        #[arg(value_enum)]
        name: AgentName,
    },
    /// Inspect or clear the persistent run memory
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AgentName {
    Nmap,
    Gobuster,
    Sqlmap,
}

#[derive(Debug, Subcommand)]
pub enum MemoryAction {
    /// Print stored records, newest first
    Show,
    /// Delete all stored records
    Wipe,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_parse() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_run_with_task() {
        let args = Args::parse_from(["redloop", "run", "Assess 192.168.56.103"]);
        match args.command {
            Command::Run { task } => assert_eq!(task.as_deref(), Some("Assess 192.168.56.103")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_agent_subcommand() {
        let args = Args::parse_from(["redloop", "--target", "10.0.0.5", "agent", "nmap"]);
        assert_eq!(args.target.as_deref(), Some("10.0.0.5"));
        assert!(matches!(
            args.command,
            Command::Agent {
                name: AgentName::Nmap
            }
        ));
    }

    #[test]
    fn test_memory_wipe() {
        let args = Args::parse_from(["redloop", "memory", "wipe"]);
        assert!(matches!(
            args.command,
            Command::Memory {
                action: MemoryAction::Wipe
            }
        ));
    }
}
