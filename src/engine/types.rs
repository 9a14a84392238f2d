use crate::engine::error::ProtocolError;
use crate::engine::stats::EngineStats;

pub type Cycle = u64;
pub type OpId = u64;

/// Operation kind as seen by the memory hierarchy. `Copy` is a bulk move from
/// a backing-memory source into the scratchpad, issued only by the DMA engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Read,
    Write,
    Copy { src: u64 },
}

impl OpKind {
    pub fn is_copy(self) -> bool {
        matches!(self, Self::Copy { .. })
    }

    pub fn short(self) -> &'static str {
        match self {
            Self::Read => "r",
            Self::Write => "w",
            Self::Copy { .. } => "c",
        }
    }
}

/// A single memory operation handed to the hierarchy. `addr` is the target
/// address, or the scratch-side destination for copies.
#[derive(Debug, Clone, Copy)]
pub struct MemRequest {
    pub kind: OpKind,
    pub addr: u64,
    pub bytes: u32,
}

/// Contract with the external memory hierarchy: it accepts a request and
/// assigns the id under which the asynchronous completion will be delivered.
/// No completion-ordering guarantee is assumed.
pub trait MemoryInterface {
    fn issue(&mut self, now: Cycle, request: MemRequest) -> OpId;
}

/// A traffic-generation engine driven by the host clock.
///
/// All completions that land on cycle `now` must be delivered through
/// `complete` before `tick(now)` runs, so the issue budget sees the drained
/// outstanding count for that cycle.
pub trait TrafficEngine {
    /// Advance one cycle: decide the issue budget, generate addresses, and
    /// submit up to that many operations.
    fn tick(&mut self, now: Cycle, memory: &mut dyn MemoryInterface) -> Result<(), ProtocolError>;

    /// Deliver one asynchronous completion. Unknown or repeated ids are a
    /// broken-collaborator contract and abort the run.
    fn complete(&mut self, now: Cycle, id: OpId) -> Result<(), ProtocolError>;

    /// True once all passes have issued and drained.
    fn is_done(&self) -> bool;

    fn stats(&self) -> &EngineStats;

    /// Short variant name used in reports.
    fn name(&self) -> &'static str;
}
