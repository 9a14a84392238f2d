use serde::Deserialize;

use crate::engine::error::ConfigError;
use crate::sim::config::Config;

/// Workload parameters, fixed at construction. Defaults mirror the scratchpad
/// traffic component this models: a 64B-line scratchpad in front of a larger
/// backing region, a small outstanding-request window, and a few passes over
/// the working set.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Cycles between periodic statistics reports.
    pub print_frequency: u64,
    /// Number of full passes over the working set.
    pub repeats: u64,
    /// Scratchpad capacity in bytes. Required; zero is rejected.
    pub scratch_size: u64,
    /// Exclusive upper bound of generated addresses. Required; must exceed
    /// `scratch_size`.
    pub max_addr: u64,
    /// Line size and maximum request size for the scratchpad tier.
    pub scratch_line_size: u64,
    /// Line size and maximum request size for the backing tier.
    pub mem_line_size: u64,
    /// Clock frequency ("1GHz") or period ("2ns").
    pub clock: String,
    /// Cap on concurrently outstanding operations.
    pub max_outstanding_requests: u32,
    /// Cap on operations issued in a single cycle.
    pub max_requests_per_cycle: u32,
    /// Operations issued per pass.
    pub reqs_to_issue: u64,
    /// Seed for the generated address stream.
    pub seed: u64,
    /// Share of generated operations that are writes, in percent.
    pub write_percent: u8,
    /// Diagnostic verbosity (0: none, 1: info, 2: debug).
    pub verbose: u64,
}

impl Config for WorkloadConfig {}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            print_frequency: 5,
            repeats: 10,
            scratch_size: 0,
            max_addr: 0,
            scratch_line_size: 64,
            mem_line_size: 64,
            clock: "1GHz".to_string(),
            max_outstanding_requests: 8,
            max_requests_per_cycle: 2,
            reqs_to_issue: 1000,
            seed: 7,
            write_percent: 25,
            verbose: 0,
        }
    }
}

impl WorkloadConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("print_frequency", self.print_frequency),
            ("repeats", self.repeats),
            ("scratch_size", self.scratch_size),
            ("reqs_to_issue", self.reqs_to_issue),
            ("max_requests_per_cycle", self.max_requests_per_cycle as u64),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroField { name });
            }
        }
        if self.max_addr <= self.scratch_size {
            return Err(ConfigError::MaxAddrTooSmall {
                max_addr: self.max_addr,
                scratch_size: self.scratch_size,
            });
        }
        for (name, value) in [
            ("scratch_line_size", self.scratch_line_size),
            ("mem_line_size", self.mem_line_size),
        ] {
            if !value.is_power_of_two() {
                return Err(ConfigError::NotPowerOfTwo { name, value });
            }
        }
        if self.mem_line_size < self.scratch_line_size {
            return Err(ConfigError::LineOrder {
                scratch_line_size: self.scratch_line_size,
                mem_line_size: self.mem_line_size,
            });
        }
        if self.scratch_size % self.scratch_line_size != 0 {
            return Err(ConfigError::MisalignedRegion {
                line: "scratch_line_size",
                line_size: self.scratch_line_size,
                region: "scratch_size",
                region_size: self.scratch_size,
            });
        }
        // Backing addresses are offset by scratch_size, so mem-line alignment
        // of the whole address space needs both checks.
        if self.scratch_size % self.mem_line_size != 0 {
            return Err(ConfigError::MisalignedRegion {
                line: "mem_line_size",
                line_size: self.mem_line_size,
                region: "scratch_size",
                region_size: self.scratch_size,
            });
        }
        if (self.max_addr - self.scratch_size) % self.mem_line_size != 0 {
            return Err(ConfigError::MisalignedRegion {
                line: "mem_line_size",
                line_size: self.mem_line_size,
                region: "the backing region",
                region_size: self.max_addr - self.scratch_size,
            });
        }
        if self.max_requests_per_cycle > self.max_outstanding_requests {
            return Err(ConfigError::PerCycleExceedsOutstanding {
                per_cycle: self.max_requests_per_cycle,
                outstanding: self.max_outstanding_requests,
            });
        }
        if self.write_percent > 100 {
            return Err(ConfigError::WritePercentOutOfRange {
                value: self.write_percent,
            });
        }
        self.clock_hz()?;
        Ok(())
    }

    /// Number of scratchpad lines.
    pub fn scratch_lines(&self) -> u64 {
        self.scratch_size / self.scratch_line_size
    }

    /// Number of backing-memory lines in `[scratch_size, max_addr)`.
    pub fn backing_lines(&self) -> u64 {
        (self.max_addr - self.scratch_size) / self.mem_line_size
    }

    /// Parse the clock spec into Hz.
    pub fn clock_hz(&self) -> Result<u64, ConfigError> {
        parse_clock(&self.clock).ok_or_else(|| ConfigError::BadClock {
            spec: self.clock.clone(),
        })
    }
}

fn parse_clock(spec: &str) -> Option<u64> {
    let trimmed = spec.trim();
    let split = trimmed.find(|c: char| c.is_ascii_alphabetic())?;
    let (num, unit) = trimmed.split_at(split);
    let value: f64 = num.trim().parse().ok()?;
    if value <= 0.0 || !value.is_finite() {
        return None;
    }
    let hz = match unit.trim().to_ascii_lowercase().as_str() {
        "ghz" => value * 1e9,
        "mhz" => value * 1e6,
        "khz" => value * 1e3,
        "hz" => value,
        "s" => 1.0 / value,
        "ms" => 1e3 / value,
        "us" => 1e6 / value,
        "ns" => 1e9 / value,
        _ => return None,
    };
    Some(hz.round() as u64)
}
