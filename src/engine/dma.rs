use std::sync::Arc;

use crate::engine::config::WorkloadConfig;
use crate::engine::error::{ConfigError, ProtocolError};
use crate::engine::flow::{FlowControl, PassEvent};
use crate::engine::stats::EngineStats;
use crate::engine::tracker::{CompletionTracker, PendingOp};
use crate::engine::types::{Cycle, MemRequest, MemoryInterface, OpId, OpKind, TrafficEngine};
use crate::sim::log::Logger;
use crate::{debug, info};

/// Bulk-transfer driver: stages backing-memory lines into the scratchpad with
/// whole-line copies instead of per-access requests. Shares the flow-control
/// discipline of `RequestEngine`; one copy consumes one unit of both budgets
/// regardless of its byte size.
pub struct DmaEngine {
    config: Arc<WorkloadConfig>,
    flow: FlowControl,
    tracker: CompletionTracker,
    stats: EngineStats,
    /// Residency map over scratch lines, marked as transfers complete.
    staged: Vec<bool>,
    /// Destination slots available in the scratchpad, in backing-line units.
    slots: u64,
    completions_this_cycle: u64,
    logger: Logger,
}

impl DmaEngine {
    pub fn new(config: Arc<WorkloadConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        let flow = FlowControl::new(&config);
        let tracker = CompletionTracker::new(config.max_outstanding_requests as usize);
        let staged = vec![false; config.scratch_lines() as usize];
        let slots = config.scratch_size / config.mem_line_size;
        let logger = Logger::new(config.verbose);
        Ok(Self {
            config,
            flow,
            tracker,
            stats: EngineStats::default(),
            staged,
            slots,
            completions_this_cycle: 0,
            logger,
        })
    }

    /// Transfer plan: operation `slot` of `pass` stages the next backing line
    /// (round-robin over the backing region) into the next scratch slot
    /// (round-robin over the scratchpad).
    fn transfer(&self, pass: u64, slot: u64) -> MemRequest {
        let backing_lines = self.config.backing_lines();
        let src_line = pass
            .wrapping_mul(self.config.reqs_to_issue)
            .wrapping_add(slot)
            % backing_lines;
        let src = self.config.scratch_size + src_line * self.config.mem_line_size;
        let dst = (slot % self.slots) * self.config.mem_line_size;
        MemRequest {
            kind: OpKind::Copy { src },
            addr: dst,
            bytes: self.config.mem_line_size as u32,
        }
    }

    fn mark_staged(&mut self, addr: u64, bytes: u32) {
        let first = (addr / self.config.scratch_line_size) as usize;
        let lines = (bytes as u64 / self.config.scratch_line_size) as usize;
        for line in self.staged.iter_mut().skip(first).take(lines.max(1)) {
            *line = true;
        }
    }

    /// Whether the scratch line holding `addr` has been staged by a completed
    /// transfer. Consulted by a co-simulated fine-grained driver.
    pub fn is_staged(&self, addr: u64) -> bool {
        if addr >= self.config.scratch_size {
            return false;
        }
        self.staged[(addr / self.config.scratch_line_size) as usize]
    }

    pub fn staged_line_count(&self) -> usize {
        self.staged.iter().filter(|&&line| line).count()
    }

    pub fn outstanding(&self) -> usize {
        self.tracker.len()
    }
}

impl TrafficEngine for DmaEngine {
    fn tick(&mut self, now: Cycle, memory: &mut dyn MemoryInterface) -> Result<(), ProtocolError> {
        if self.flow.is_done() {
            return Ok(());
        }
        let completions = std::mem::take(&mut self.completions_this_cycle);

        if let Some(event) = self.flow.try_finish_pass(self.tracker.len()) {
            self.stats.record_pass();
            match event {
                PassEvent::RunComplete => {
                    if completions > 0 {
                        self.stats.record_active_cycle();
                    }
                    info!(
                        self.logger,
                        now,
                        "[dma] run complete: {}",
                        self.stats.summary_line(now)
                    );
                    return Ok(());
                }
                PassEvent::PassComplete { next_pass } => {
                    info!(self.logger, now, "[dma] pass {} drained", next_pass - 1);
                }
            }
        }

        let budget = self.flow.budget(self.tracker.len());
        for _ in 0..budget {
            let slot = self.flow.next_slot();
            let request = self.transfer(self.flow.pass(), slot);
            let id = memory.issue(now, request);
            self.tracker.register(PendingOp {
                id,
                addr: request.addr,
                bytes: request.bytes,
                kind: request.kind,
                issued_at: now,
            })?;
            self.flow.record_issue();
            self.stats.record_issue(request.bytes);
            debug!(
                self.logger,
                now,
                "[dma] slot {} staging {:#x} -> {:#x} ({}B) as op {}",
                slot,
                match request.kind {
                    OpKind::Copy { src } => src,
                    _ => 0,
                },
                request.addr,
                request.bytes,
                id
            );
        }

        if budget > 0 || completions > 0 {
            self.stats.record_active_cycle();
        }
        if now > 0 && now % self.config.print_frequency == 0 {
            info!(self.logger, now, "[dma] {}", self.stats.summary_line(now));
        }
        Ok(())
    }

    fn complete(&mut self, now: Cycle, id: OpId) -> Result<(), ProtocolError> {
        let op = self.tracker.complete(id)?;
        self.completions_this_cycle += 1;
        self.mark_staged(op.addr, op.bytes);
        self.stats
            .record_completion(op.bytes, now.saturating_sub(op.issued_at), now);
        debug!(
            self.logger,
            now,
            "[dma] op {} staged {:#x} ({}B)",
            id,
            op.addr,
            op.bytes
        );
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.flow.is_done()
    }

    fn stats(&self) -> &EngineStats {
        &self.stats
    }

    fn name(&self) -> &'static str {
        "dma"
    }
}
