//! Mutable scan state for the network-scanning agent
//!
//! Tracks discovered hosts, per-host scan progress through a fixed plan of
//! escalating scans, and free-form notes keyed by host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ordered scan plan a host is walked through before it counts as scanned
pub const SCAN_STEPS: [&str; 5] = [
    "basic_port_sweep",
    "service_version_detection",
    "script_analysis",
    "aggressive_profiling",
    "focused_rescan",
];

/// Position of a pending host within the scan plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Index of the next step in [`SCAN_STEPS`]
    pub next_step: usize,
}

impl ScanProgress {
    /// Name of the next step, or `None` when the plan is exhausted
    pub fn next_step_name(&self) -> Option<&'static str> {
        SCAN_STEPS.get(self.next_step).copied()
    }

    /// True once every step in the plan has been executed
    pub fn is_complete(&self) -> bool {
        self.next_step >= SCAN_STEPS.len()
    }
}

/// A note recorded about one scan against one host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactNote {
    pub scan_type: String,
    pub ports: Option<String>,
    pub additional_args: Option<String>,
    pub notes: String,
}

/// Accumulated network-scanning state, injected into the model prompt each turn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NmapState {
    /// Hosts seen in any scan output, in order of first appearance
    pub discovered_hosts: Vec<String>,
    /// Hosts that finished the full scan plan
    pub scanned_hosts: Vec<String>,
    /// Hosts mid-plan, keyed by address
    pub pending_hosts: BTreeMap<String, ScanProgress>,
    /// Notes per host
    pub memory: BTreeMap<String, Vec<FactNote>>,
}

impl NmapState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a host if it has not been seen yet
    pub fn discover(&mut self, host: &str) {
        if !self.discovered_hosts.iter().any(|h| h == host) {
            self.discovered_hosts.push(host.to_string());
            self.pending_hosts
                .insert(host.to_string(), ScanProgress::default());
        }
    }

    /// Register every host in the slice, keeping first-seen order
    pub fn discover_all(&mut self, hosts: &[String]) {
        for host in hosts {
            self.discover(host);
        }
    }

    /// Record a completed scan against `host` and advance it through the plan.
    ///
    /// Scan targets are not discoveries: only hosts already seen in output
    /// gain progress, so a CIDR range or an unconfirmed address never enters
    /// the pending queue. The note is kept either way. The host moves from
    /// pending to scanned once the plan is exhausted.
    pub fn record_scan(&mut self, host: &str, note: FactNote) {
        self.memory.entry(host.to_string()).or_default().push(note);

        if let Some(progress) = self.pending_hosts.get_mut(host) {
            progress.next_step += 1;
            if progress.is_complete() {
                self.pending_hosts.remove(host);
                if !self.scanned_hosts.iter().any(|h| h == host) {
                    self.scanned_hosts.push(host.to_string());
                }
            }
        }
    }

    /// Next pending host in discovery order, with its next step name
    pub fn next_pending(&self) -> Option<(&str, &'static str)> {
        self.discovered_hosts.iter().find_map(|host| {
            self.pending_hosts
                .get(host)
                .and_then(ScanProgress::next_step_name)
                .map(|step| (host.as_str(), step))
        })
    }

    /// Number of notes recorded for a host
    pub fn fact_count(&self, host: &str) -> usize {
        self.memory.get(host).map_or(0, Vec::len)
    }

    /// JSON snapshot for prompt injection, with a hint at which host to
    /// scan next and with which plan step
    pub fn snapshot(&self) -> serde_json::Value {
        let mut snapshot = serde_json::to_value(self).unwrap_or_default();
        if let Some((host, step)) = self.next_pending() {
            snapshot["next_pending"] = serde_json::json!({ "host": host, "next_step": step });
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(scan_type: &str) -> FactNote {
        FactNote {
            scan_type: scan_type.to_string(),
            ports: None,
            additional_args: None,
            notes: String::new(),
        }
    }

    #[test]
    fn test_discover_is_idempotent() {
        let mut state = NmapState::new();
        state.discover("10.0.0.5");
        state.discover("10.0.0.5");

        assert_eq!(state.discovered_hosts, vec!["10.0.0.5"]);
        assert_eq!(state.pending_hosts.len(), 1);
    }

    #[test]
    fn test_host_advances_through_plan() {
        let mut state = NmapState::new();
        state.discover("10.0.0.5");

        for (i, step) in SCAN_STEPS.iter().enumerate() {
            let (host, next) = state.next_pending().expect("host should be pending");
            assert_eq!(host, "10.0.0.5");
            assert_eq!(next, *step);
            state.record_scan("10.0.0.5", note(step));
            assert_eq!(state.fact_count("10.0.0.5"), i + 1);
        }

        assert!(state.next_pending().is_none());
        assert!(state.pending_hosts.is_empty());
        assert_eq!(state.scanned_hosts, vec!["10.0.0.5"]);
    }

    #[test]
    fn test_record_scan_keeps_note_without_enqueueing_target() {
        let mut state = NmapState::new();
        state.record_scan("192.168.56.0/24", note("basic_port_sweep"));

        // A range scan target is not a live host.
        assert!(state.discovered_hosts.is_empty());
        assert!(state.pending_hosts.is_empty());
        assert_eq!(state.fact_count("192.168.56.0/24"), 1);
    }

    #[test]
    fn test_next_pending_follows_discovery_order() {
        let mut state = NmapState::new();
        state.discover_all(&["10.0.0.5".into(), "10.0.0.6".into()]);

        // Exhaust the first host; the second becomes next.
        for step in SCAN_STEPS {
            state.record_scan("10.0.0.5", note(step));
        }

        let (host, step) = state.next_pending().expect("second host pending");
        assert_eq!(host, "10.0.0.6");
        assert_eq!(step, "basic_port_sweep");
    }

    #[test]
    fn test_snapshot_contains_hosts_and_next_step_hint() {
        let mut state = NmapState::new();
        state.discover("10.0.0.5");

        let snapshot = state.snapshot();
        assert_eq!(snapshot["discovered_hosts"][0], "10.0.0.5");
        assert_eq!(snapshot["next_pending"]["host"], "10.0.0.5");
        assert_eq!(snapshot["next_pending"]["next_step"], "basic_port_sweep");
    }

    #[test]
    fn test_snapshot_drops_hint_once_plan_is_exhausted() {
        let mut state = NmapState::new();
        state.discover("10.0.0.5");
        for step in SCAN_STEPS {
            state.record_scan("10.0.0.5", note(step));
        }

        assert!(state.snapshot().get("next_pending").is_none());
    }
}
