use clap::Parser;
use queue_simulator_core_rs::Simulator;
use tracing::info;

mod config;
mod logging;

use crate::config::{Config, RunConfig, SubCommand};

fn main() -> Result<(), anyhow::Error> {
    let config = Config::parse();
    logging::init(config.verbose);

    match config.sub_command {
        SubCommand::Run(run_config) => run(run_config),
    }
}

fn run(run_config: RunConfig) -> Result<(), anyhow::Error> {
    let json = run_config.json;
    let sim_config = run_config.into_simulator_config()?;
    info!(
        servers = sim_config.server_count,
        horizon = sim_config.horizon,
        seed = sim_config.rng_seed,
        "starting simulation"
    );

    let mut simulator = Simulator::new(sim_config)?;
    let summary = simulator.run()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary);
    }
    Ok(())
}
