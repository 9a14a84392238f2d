use std::env;
use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;

use crate::engine::stats::EngineStats;
use crate::engine::types::Cycle;

/// Final run summary emitted at teardown.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub engine: &'static str,
    pub cycles: Cycle,
    pub clock_hz: u64,
    pub sim_time_ns: u64,
    pub stats: EngineStats,
}

impl RunSummary {
    pub fn new(engine: &'static str, cycles: Cycle, clock_hz: u64, stats: EngineStats) -> Self {
        let sim_time_ns = if clock_hz == 0 {
            0
        } else {
            ((cycles as u128 * 1_000_000_000) / clock_hz as u128) as u64
        };
        Self {
            engine,
            cycles,
            clock_hz,
            sim_time_ns,
            stats,
        }
    }
}

/// Resolve a results path: absolute paths are used as-is, relative paths land
/// under `SPADFLOW_RESULTS_DIR` when set.
fn resolve_path(base: &str) -> Option<PathBuf> {
    let base_path = PathBuf::from(base);
    let path = if base_path.is_absolute() {
        base_path
    } else {
        match env::var("SPADFLOW_RESULTS_DIR") {
            Ok(dir) => PathBuf::from(dir).join(base_path),
            Err(_) => base_path,
        }
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && fs::create_dir_all(parent).is_err() {
            return None;
        }
    }
    Some(path)
}

/// Write the summary as pretty-printed JSON. Returns the resolved path, or
/// None if the filesystem did not cooperate.
pub fn write_summary(base: &str, summary: &RunSummary) -> Option<PathBuf> {
    let path = resolve_path(base)?;
    let file = File::create(&path).ok()?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary).ok()?;
    writer.write_all(b"\n").ok()?;
    writer.flush().ok()?;
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_time_from_clock() {
        let summary = RunSummary::new("request", 1000, 1_000_000_000, EngineStats::default());
        assert_eq!(summary.sim_time_ns, 1000);
        let summary = RunSummary::new("request", 1000, 500_000_000, EngineStats::default());
        assert_eq!(summary.sim_time_ns, 2000);
    }

    #[test]
    fn zero_clock_does_not_divide() {
        let summary = RunSummary::new("dma", 1000, 0, EngineStats::default());
        assert_eq!(summary.sim_time_ns, 0);
    }

    #[test]
    fn summary_serializes() {
        let summary = RunSummary::new("request", 42, 1_000_000_000, EngineStats::default());
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"cycles\":42"));
        assert!(json.contains("\"engine\":\"request\""));
    }
}
