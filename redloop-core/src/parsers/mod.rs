//! Scrapers for human-readable tool output

pub mod gobuster;
pub mod nmap;
pub mod sqlmap;

pub use gobuster::{Endpoint, EndpointKind, GobusterScan};
pub use nmap::scan_report_hosts;
pub use sqlmap::{extract_tags, SummaryTag};
