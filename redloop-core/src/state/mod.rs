//! Agent state and orchestrator memory

pub mod gobuster;
pub mod metrics;
pub mod nmap;
pub mod sqlmap;
pub mod store;

pub use gobuster::{GobusterState, ScanRecord};
pub use metrics::{Metrics, MetricsTracker};
pub use nmap::{FactNote, NmapState, ScanProgress, SCAN_STEPS};
pub use sqlmap::{AssessmentRecord, Phase, SqlmapState};
pub use store::{MemoryRecord, MemoryStore};
