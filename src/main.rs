use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use toml::Table;

use spadflow::engine::config::WorkloadConfig;
use spadflow::sim::config::{Config, SimConfig};
use spadflow::sim::mem_model::MemModelConfig;
use spadflow::sim::report::{self, RunSummary};
use spadflow::sim::top::SimTop;

#[derive(Parser)]
#[command(version, about)]
struct SpadflowArgs {
    #[arg(help = "Path to config.toml")]
    config_path: PathBuf,
    #[arg(long, help = "Override engine variant (request or dma)")]
    engine: Option<String>,
    #[arg(long, help = "Override number of passes")]
    repeats: Option<u64>,
    #[arg(long, help = "Override operations issued per pass")]
    reqs_to_issue: Option<u64>,
    #[arg(long, help = "Enable cycle log at level (0:none, 1:info, 2:debug)")]
    log: Option<u64>,
    #[arg(long, help = "Override simulation timeout in cycles")]
    timeout: Option<u64>,
}

pub fn main() -> anyhow::Result<()> {
    env_logger::init();

    let argv = SpadflowArgs::parse();
    let text = fs::read_to_string(&argv.config_path)
        .with_context(|| format!("failed to read config file {}", argv.config_path.display()))?;
    let config_table: Table = toml::from_str(&text).context("cannot parse config toml")?;

    let mut sim_config = SimConfig::from_section(config_table.get("sim"));
    let mut workload = WorkloadConfig::from_section(config_table.get("workload"));
    let mem_config = MemModelConfig::from_section(config_table.get("mem"));

    // override toml configs with argv
    if let Some(engine) = &argv.engine {
        sim_config.engine = engine.parse().map_err(anyhow::Error::msg)?;
    }
    sim_config.timeout = argv.timeout.unwrap_or(sim_config.timeout);
    workload.repeats = argv.repeats.unwrap_or(workload.repeats);
    workload.reqs_to_issue = argv.reqs_to_issue.unwrap_or(workload.reqs_to_issue);
    workload.verbose = argv.log.unwrap_or(workload.verbose);

    workload.validate()?;
    let workload = Arc::new(workload);

    let mut top = SimTop::new(&sim_config, Arc::clone(&workload), mem_config)?;
    let cycles = top.run()?;

    let stats = *top.engine.stats();
    println!(
        "[spadflow] {} engine finished: {}",
        top.engine.name(),
        stats.summary_line(cycles)
    );

    let summary = RunSummary::new(top.engine.name(), cycles, workload.clock_hz()?, stats);
    if let Some(base) = &sim_config.results_json {
        match report::write_summary(base, &summary) {
            Some(path) => println!("[spadflow] results written to {}", path.display()),
            None => log::warn!("failed to write results to {}", base),
        }
    }
    Ok(())
}
