use std::sync::Arc;

use anyhow::bail;

use crate::engine::config::WorkloadConfig;
use crate::engine::dma::DmaEngine;
use crate::engine::error::{ConfigError, ProtocolError};
use crate::engine::request::RequestEngine;
use crate::engine::types::{Cycle, TrafficEngine};
use crate::sim::config::{EngineMode, SimConfig};
use crate::sim::mem_model::{MemModelConfig, TieredMem};

/// Host harness: one engine instance clocked against the stand-in hierarchy.
pub struct SimTop {
    pub engine: Box<dyn TrafficEngine>,
    pub memory: TieredMem,
    cycle: Cycle,
    timeout: Cycle,
}

impl SimTop {
    pub fn new(
        sim_config: &SimConfig,
        workload: Arc<WorkloadConfig>,
        mem_config: MemModelConfig,
    ) -> Result<Self, ConfigError> {
        let engine: Box<dyn TrafficEngine> = match sim_config.engine {
            EngineMode::Request => Box::new(RequestEngine::new(Arc::clone(&workload))?),
            EngineMode::Dma => Box::new(DmaEngine::new(Arc::clone(&workload))?),
        };
        let memory = TieredMem::new(mem_config, workload.scratch_size);
        Ok(Self {
            engine,
            memory,
            cycle: 0,
            timeout: sim_config.timeout,
        })
    }

    /// One cycle: completions land first, then the engine ticks.
    pub fn tick_one(&mut self) -> Result<(), ProtocolError> {
        let now = self.cycle;
        for id in self.memory.drain_ready(now) {
            self.engine.complete(now, id)?;
        }
        self.engine.tick(now, &mut self.memory)?;
        self.cycle += 1;
        Ok(())
    }

    pub fn finished(&self) -> bool {
        self.engine.is_done()
    }

    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    /// Clock until the workload reaches its terminal state. A hierarchy that
    /// never completes is a configuration error surfaced as a timeout.
    pub fn run(&mut self) -> anyhow::Result<Cycle> {
        while !self.finished() {
            if self.cycle >= self.timeout {
                bail!(
                    "simulation timed out after {} cycles ({} of {} operations completed)",
                    self.cycle,
                    self.engine.stats().completed(),
                    self.engine.stats().issued()
                );
            }
            self.tick_one()?;
        }
        Ok(self.cycle)
    }
}
