use crate::engine::config::WorkloadConfig;

/// Outcome of a pass-boundary check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PassEvent {
    /// A pass drained; issuance restarts at the given pass index.
    PassComplete { next_pass: u64 },
    /// The final pass drained; the engine is terminal.
    RunComplete,
}

/// Flow-control discipline shared by both engine variants: per-cycle and
/// outstanding budgets, per-pass issue counts, and the drain-then-advance
/// pass transition.
#[derive(Debug)]
pub(crate) struct FlowControl {
    reqs_per_pass: u64,
    repeats: u64,
    max_outstanding: u32,
    max_per_cycle: u32,
    issued_this_pass: u64,
    passes_done: u64,
    done: bool,
}

impl FlowControl {
    pub(crate) fn new(config: &WorkloadConfig) -> Self {
        Self {
            reqs_per_pass: config.reqs_to_issue,
            repeats: config.repeats,
            max_outstanding: config.max_outstanding_requests,
            max_per_cycle: config.max_requests_per_cycle,
            issued_this_pass: 0,
            passes_done: 0,
            done: false,
        }
    }

    /// Number of operations that may be issued this cycle. Zero is the
    /// backpressure case, not an error.
    pub(crate) fn budget(&self, inflight: usize) -> u64 {
        if self.done {
            return 0;
        }
        let remaining = self.reqs_per_pass - self.issued_this_pass;
        let window = (self.max_outstanding as u64).saturating_sub(inflight as u64);
        remaining.min(window).min(self.max_per_cycle as u64)
    }

    /// Sequence slot of the next operation within the current pass.
    pub(crate) fn next_slot(&self) -> u64 {
        self.issued_this_pass
    }

    pub(crate) fn pass(&self) -> u64 {
        self.passes_done
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    pub(crate) fn record_issue(&mut self) {
        debug_assert!(self.issued_this_pass < self.reqs_per_pass);
        self.issued_this_pass += 1;
    }

    /// Advance the pass counter once the current pass has fully issued and
    /// drained. Called at the top of every tick.
    pub(crate) fn try_finish_pass(&mut self, inflight: usize) -> Option<PassEvent> {
        if self.done || self.issued_this_pass < self.reqs_per_pass || inflight > 0 {
            return None;
        }
        self.passes_done += 1;
        if self.passes_done >= self.repeats {
            self.done = true;
            Some(PassEvent::RunComplete)
        } else {
            self.issued_this_pass = 0;
            Some(PassEvent::PassComplete {
                next_pass: self.passes_done,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::small_config;

    fn flow(outstanding: u32, per_cycle: u32, reqs: u64, repeats: u64) -> FlowControl {
        let mut cfg = small_config();
        cfg.max_outstanding_requests = outstanding;
        cfg.max_requests_per_cycle = per_cycle;
        cfg.reqs_to_issue = reqs;
        cfg.repeats = repeats;
        FlowControl::new(&cfg)
    }

    #[test]
    fn budget_is_min_of_caps_and_remaining() {
        let mut fc = flow(8, 2, 3, 1);
        assert_eq!(fc.budget(0), 2); // per-cycle cap
        assert_eq!(fc.budget(7), 1); // outstanding window
        assert_eq!(fc.budget(8), 0); // window exhausted
        fc.record_issue();
        fc.record_issue();
        assert_eq!(fc.budget(0), 1); // one left in the pass
        fc.record_issue();
        assert_eq!(fc.budget(0), 0); // pass fully issued
    }

    #[test]
    fn stalled_completions_stall_issuance() {
        // both in-flight slots occupied and never completing: budget is zero
        let fc = flow(2, 2, 100, 1);
        assert_eq!(fc.budget(2), 0);
    }

    #[test]
    fn pass_advances_only_after_drain() {
        let mut fc = flow(4, 4, 2, 2);
        fc.record_issue();
        fc.record_issue();
        assert_eq!(fc.try_finish_pass(1), None);
        assert_eq!(
            fc.try_finish_pass(0),
            Some(PassEvent::PassComplete { next_pass: 1 })
        );
        assert_eq!(fc.pass(), 1);
        fc.record_issue();
        fc.record_issue();
        assert_eq!(fc.try_finish_pass(0), Some(PassEvent::RunComplete));
        assert!(fc.is_done());
        assert_eq!(fc.budget(0), 0);
    }

    #[test]
    fn unfinished_pass_does_not_advance() {
        let mut fc = flow(4, 4, 2, 2);
        fc.record_issue();
        assert_eq!(fc.try_finish_pass(0), None);
    }
}
