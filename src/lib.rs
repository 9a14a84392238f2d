//! Cycle-level model of the memory traffic a proximity-graph search workload
//! drives into a scratchpad-plus-backing hierarchy. The `engine` module holds
//! the request-generation and flow-control core; `sim` holds the host harness
//! that clocks an engine against a stand-in latency model.

pub mod engine;
pub mod sim;
