pub mod address;
pub mod config;
pub mod dma;
pub mod error;
mod flow;
pub mod request;
pub mod stats;
pub mod tracker;
pub mod types;

pub use address::{AddressGenerator, GeneratedAccess, Tier};
pub use config::WorkloadConfig;
pub use dma::DmaEngine;
pub use error::{ConfigError, ProtocolError};
pub use request::RequestEngine;
pub use stats::EngineStats;
pub use tracker::{CompletionTracker, PendingOp};
pub use types::{Cycle, MemRequest, MemoryInterface, OpId, OpKind, TrafficEngine};
