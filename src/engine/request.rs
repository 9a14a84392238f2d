use std::sync::Arc;

use crate::engine::address::{AddressGenerator, GeneratedAccess};
use crate::engine::config::WorkloadConfig;
use crate::engine::error::{ConfigError, ProtocolError};
use crate::engine::flow::{FlowControl, PassEvent};
use crate::engine::stats::EngineStats;
use crate::engine::tracker::{CompletionTracker, PendingOp};
use crate::engine::types::{Cycle, MemRequest, MemoryInterface, OpId, TrafficEngine};
use crate::sim::log::Logger;
use crate::{debug, info};

/// Direct-access driver: one fine-grained line request per graph-traversal
/// node touch, regulated by the shared flow-control discipline.
pub struct RequestEngine {
    config: Arc<WorkloadConfig>,
    addrgen: AddressGenerator,
    table: Vec<GeneratedAccess>,
    flow: FlowControl,
    tracker: CompletionTracker,
    stats: EngineStats,
    completions_this_cycle: u64,
    logger: Logger,
}

impl RequestEngine {
    pub fn new(config: Arc<WorkloadConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        let addrgen = AddressGenerator::new(&config);
        let table = addrgen.pass_table(0);
        let flow = FlowControl::new(&config);
        let tracker = CompletionTracker::new(config.max_outstanding_requests as usize);
        let logger = Logger::new(config.verbose);
        Ok(Self {
            config,
            addrgen,
            table,
            flow,
            tracker,
            stats: EngineStats::default(),
            completions_this_cycle: 0,
            logger,
        })
    }

    pub fn outstanding(&self) -> usize {
        self.tracker.len()
    }
}

impl TrafficEngine for RequestEngine {
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
                        "[req] run complete: {}",
                        self.stats.summary_line(now)
                    );
                    return Ok(());
                }
                PassEvent::PassComplete { next_pass } => {
                    self.table = self.addrgen.pass_table(next_pass);
                    info!(self.logger, now, "[req] pass {} drained", next_pass - 1);
                }
            }
        }

        let budget = self.flow.budget(self.tracker.len());
        for _ in 0..budget {
            let slot = self.flow.next_slot() as usize;
            let access = self.table[slot];
            let request = MemRequest {
                kind: access.kind,
                addr: access.addr,
                bytes: access.bytes,
            };
            let id = memory.issue(now, request);
            self.tracker.register(PendingOp {
                id,
                addr: access.addr,
                bytes: access.bytes,
                kind: access.kind,
                issued_at: now,
            })?;
            self.flow.record_issue();
            self.stats.record_issue(access.bytes);
            debug!(
                self.logger,
                now,
                "[req] slot {} issued {} {:#x} ({}B) as op {}",
                slot,
                access.kind.short(),
                access.addr,
                access.bytes,
                id
            );
        }

        if budget > 0 || completions > 0 {
            self.stats.record_active_cycle();
        }
        if now > 0 && now % self.config.print_frequency == 0 {
            info!(self.logger, now, "[req] {}", self.stats.summary_line(now));
        }
        Ok(())
    }

    fn complete(&mut self, now: Cycle, id: OpId) -> Result<(), ProtocolError> {
        let op = self.tracker.complete(id)?;
        self.completions_this_cycle += 1;
        self.stats
            .record_completion(op.bytes, now.saturating_sub(op.issued_at), now);
        debug!(
            self.logger,
            now,
            "[req] op {} completed ({} cycles in flight)",
            id,
            now.saturating_sub(op.issued_at)
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
        "request"
    }
}
