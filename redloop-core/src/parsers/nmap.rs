//! Extraction of hosts from nmap text output

use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)] // Static initialization with hardcoded regex
static IPV4_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{1,3}(?:\.[0-9]{1,3}){3})").expect("Hardcoded IPv4 regex should be valid")
});

/// Extract IPv4 addresses from `Nmap scan report for` blocks.
///
/// Handles both the bare-IP form (`Nmap scan report for 10.0.0.5`) and the
/// resolved form (`Nmap scan report for web01 (10.0.0.5)`). Order follows
/// first appearance; duplicates are dropped.
pub fn scan_report_hosts(stdout: &str) -> Vec<String> {
    let mut hosts = Vec::new();

    for block in stdout.split("Nmap scan report for ").skip(1) {
        let first_line = block.lines().next().unwrap_or("");
        if let Some(captures) = IPV4_RE.captures(first_line) {
            let ip = captures[1].to_string();
            if !hosts.contains(&ip) {
                hosts.push(ip);
            }
        }
    }

    hosts
}
