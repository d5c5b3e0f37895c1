//! Tool agents and the orchestrator that coordinates them

pub mod gobuster;
pub mod nmap;
pub mod orchestrator;
pub mod sqlmap;
pub mod traits;

pub use gobuster::GobusterAgent;
pub use nmap::NmapAgent;
pub use orchestrator::{NextAction, Orchestrator};
pub use sqlmap::SqlmapAgent;
pub use traits::{run_loop, AgentOutcome, LoopSettings, ToolAgent};
