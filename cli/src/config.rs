use std::path::PathBuf;

use anyhow::{bail, Context};
use queue_simulator_core_rs::{ArrivalGeneration, SimulatorConfig};

#[derive(clap::Parser, Clone, Debug)]
#[clap(name = "queue-sim")]
#[clap(about = "Discrete-event simulator for networks of finite-buffer queues")]
#[clap(version)]
pub struct Config {
    #[clap(subcommand)]
    pub sub_command: SubCommand,
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(clap::Subcommand, Clone, Debug)]
pub enum SubCommand {
    /// Run a simulation and print its summary.
    Run(RunConfig),
}

/// Simulation parameters
///
/// Either positional `T N p1..pN lambda q1..qN mu1..muN`, or `--config`
/// pointing at a JSON `SimulatorConfig`.
#[derive(clap::Parser, Clone, Debug)]
pub struct RunConfig {
    /// Horizon, server count, routing probabilities, arrival rate, buffer
    /// capacities and service rates, in that order.
    #[arg(required_unless_present = "config", conflicts_with = "config")]
    pub params: Vec<String>,
    /// JSON configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Seed for the random stream; overrides the configuration value.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Generate arrivals one at a time instead of up front.
    #[arg(long)]
    pub lazy_arrivals: bool,
    /// Print the full summary as JSON.
    #[arg(long)]
    pub json: bool,
}

impl RunConfig {
    pub fn into_simulator_config(self) -> anyhow::Result<SimulatorConfig> {
        let mut config = match &self.config {
            Some(path) => SimulatorConfig::from_json_file(path)?,
            None => parse_positional(&self.params)?,
        };

        if let Some(seed) = self.seed {
            config.rng_seed = seed;
        }
        if self.lazy_arrivals {
            config.arrival_generation = ArrivalGeneration::Lazy;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse `T N p1..pN lambda q1..qN mu1..muN`
pub fn parse_positional(params: &[String]) -> anyhow::Result<SimulatorConfig> {
    if params.len() < 2 {
        bail!("expected at least a horizon and a server count");
    }

    let horizon = parse_f64(&params[0], "horizon")?;
    let server_count: usize = params[1]
        .parse()
        .with_context(|| format!("invalid server count '{}'", params[1]))?;

    let Some(expected) = server_count.checked_mul(3).and_then(|n| n.checked_add(3)) else {
        bail!("server count {} is too large", server_count);
    };
    if params.len() != expected {
        bail!(
            "{} servers need {} positional values, got {}",
            server_count,
            expected,
            params.len()
        );
    }

    let n = server_count;
    let routing_probabilities = params[2..2 + n]
        .iter()
        .map(|p| parse_f64(p, "routing probability"))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let arrival_rate = parse_f64(&params[2 + n], "arrival rate")?;
    let buffer_capacities = params[3 + n..3 + 2 * n]
        .iter()
        .map(|q| {
            q.parse::<usize>()
                .with_context(|| format!("invalid buffer capacity '{}'", q))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let service_rates = params[3 + 2 * n..]
        .iter()
        .map(|mu| parse_f64(mu, "service rate"))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(SimulatorConfig {
        horizon,
        server_count,
        routing_probabilities,
        arrival_rate,
        buffer_capacities,
        service_rates,
        rng_seed: 12345,
        arrival_generation: ArrivalGeneration::Eager,
        record_events: false,
    })
}

fn parse_f64(value: &str, what: &str) -> anyhow::Result<f64> {
    value
        .parse()
        .with_context(|| format!("invalid {} '{}'", what, value))
}
