use serde::Serialize;

use crate::engine::types::Cycle;

/// Counter set accumulated by an engine over a run. All counters are
/// monotonically non-decreasing until the engine reaches its terminal state,
/// after which nothing records into them. Snapshots are plain reads.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EngineStats {
    issued: u64,
    completed: u64,
    bytes_issued: u64,
    bytes_completed: u64,
    active_cycles: u64,
    passes_completed: u64,
    inflight: u64,
    max_inflight: u64,
    latency_sum: u64,
    latency_count: u64,
    last_completion_cycle: Option<Cycle>,
}

impl EngineStats {
    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn bytes_issued(&self) -> u64 {
        self.bytes_issued
    }

    pub fn bytes_completed(&self) -> u64 {
        self.bytes_completed
    }

    pub fn active_cycles(&self) -> u64 {
        self.active_cycles
    }

    pub fn passes_completed(&self) -> u64 {
        self.passes_completed
    }

    pub fn inflight(&self) -> u64 {
        self.inflight
    }

    pub fn max_inflight(&self) -> u64 {
        self.max_inflight
    }

    pub fn last_completion_cycle(&self) -> Option<Cycle> {
        self.last_completion_cycle
    }

    pub fn avg_latency(&self) -> f64 {
        if self.latency_count == 0 {
            return 0.0;
        }
        self.latency_sum as f64 / self.latency_count as f64
    }

    pub fn record_issue(&mut self, bytes: u32) {
        self.issued = self.issued.saturating_add(1);
        self.bytes_issued = self.bytes_issued.saturating_add(bytes as u64);
        self.inflight = self.inflight.saturating_add(1);
        self.max_inflight = self.max_inflight.max(self.inflight);
    }

    pub fn record_completion(&mut self, bytes: u32, latency: Cycle, now: Cycle) {
        self.completed = self.completed.saturating_add(1);
        self.bytes_completed = self.bytes_completed.saturating_add(bytes as u64);
        self.inflight = self.inflight.saturating_sub(1);
        self.latency_sum = self.latency_sum.saturating_add(latency);
        self.latency_count = self.latency_count.saturating_add(1);
        self.last_completion_cycle = Some(now);
    }

    pub fn record_active_cycle(&mut self) {
        self.active_cycles = self.active_cycles.saturating_add(1);
    }

    pub fn record_pass(&mut self) {
        self.passes_completed = self.passes_completed.saturating_add(1);
    }

    /// One-line report used by the periodic print and the teardown summary.
    pub fn summary_line(&self, now: Cycle) -> String {
        format!(
            "cycle {:>8} issued {} completed {} inflight {} passes {} active {}",
            now, self.issued, self.completed, self.inflight, self.passes_completed,
            self.active_cycles
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_complete_bookkeeping() {
        let mut stats = EngineStats::default();
        stats.record_issue(64);
        stats.record_issue(64);
        assert_eq!(stats.issued(), 2);
        assert_eq!(stats.inflight(), 2);
        assert_eq!(stats.max_inflight(), 2);
        stats.record_completion(64, 10, 12);
        assert_eq!(stats.completed(), 1);
        assert_eq!(stats.inflight(), 1);
        assert_eq!(stats.max_inflight(), 2);
        assert_eq!(stats.last_completion_cycle(), Some(12));
        assert_eq!(stats.bytes_issued(), 128);
        assert_eq!(stats.bytes_completed(), 64);
    }

    #[test]
    fn avg_latency() {
        let mut stats = EngineStats::default();
        assert_eq!(stats.avg_latency(), 0.0);
        stats.record_issue(4);
        stats.record_issue(4);
        stats.record_completion(4, 10, 10);
        stats.record_completion(4, 20, 21);
        assert_eq!(stats.avg_latency(), 15.0);
    }

    #[test]
    fn pass_and_cycle_counters() {
        let mut stats = EngineStats::default();
        stats.record_active_cycle();
        stats.record_active_cycle();
        stats.record_pass();
        assert_eq!(stats.active_cycles(), 2);
        assert_eq!(stats.passes_completed(), 1);
    }
}
