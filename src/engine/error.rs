use std::fmt;

use crate::engine::types::OpId;

/// Rejected configuration: engines cannot be constructed from a config that
/// violates these invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroField { name: &'static str },
    MaxAddrTooSmall { max_addr: u64, scratch_size: u64 },
    NotPowerOfTwo { name: &'static str, value: u64 },
    LineOrder { scratch_line_size: u64, mem_line_size: u64 },
    MisalignedRegion { line: &'static str, line_size: u64, region: &'static str, region_size: u64 },
    PerCycleExceedsOutstanding { per_cycle: u32, outstanding: u32 },
    WritePercentOutOfRange { value: u8 },
    BadClock { spec: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroField { name } => write!(f, "'{}' must be greater than zero", name),
            Self::MaxAddrTooSmall { max_addr, scratch_size } => write!(
                f,
                "'max_addr' ({}) must be larger than 'scratch_size' ({})",
                max_addr, scratch_size
            ),
            Self::NotPowerOfTwo { name, value } => {
                write!(f, "'{}' ({}) must be a power of two", name, value)
            }
            Self::LineOrder { scratch_line_size, mem_line_size } => write!(
                f,
                "'mem_line_size' ({}) must be at least 'scratch_line_size' ({})",
                mem_line_size, scratch_line_size
            ),
            Self::MisalignedRegion { line, line_size, region, region_size } => write!(
                f,
                "'{}' ({}) must evenly divide {} ({})",
                line, line_size, region, region_size
            ),
            Self::PerCycleExceedsOutstanding { per_cycle, outstanding } => write!(
                f,
                "'max_requests_per_cycle' ({}) must not exceed 'max_outstanding_requests' ({})",
                per_cycle, outstanding
            ),
            Self::WritePercentOutOfRange { value } => {
                write!(f, "'write_percent' ({}) must be at most 100", value)
            }
            Self::BadClock { spec } => write!(f, "cannot parse clock spec '{}'", spec),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Broken collaborator contract. Continuing after either variant would
/// corrupt the outstanding-request accounting, so the run aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Completion delivered for an id that was never registered, or already
    /// completed.
    UnknownCompletion { id: OpId },
    /// Registration past the outstanding budget the engine itself computed.
    OutstandingOverflow { capacity: usize },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCompletion { id } => {
                write!(f, "completion for unknown operation id {}", id)
            }
            Self::OutstandingOverflow { capacity } => write!(
                f,
                "attempted to register past the outstanding capacity of {}",
                capacity
            ),
        }
    }
}

impl std::error::Error for ProtocolError {}
