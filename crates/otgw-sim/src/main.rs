//! Scenario runner for the OpenTherm gateway.
//!
//! Loads a gateway configuration and a scenario, drives the gateway for
//! the scripted number of ticks against the simulated links, and prints
//! every published value plus the final gateway state.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use otgw_gateway::GatewayConfig;
use otgw_sim::{demo_scenario, run_scenario, Scenario};

#[derive(Parser, Debug)]
#[command(name = "otgw-sim", about = "Drive the OpenTherm gateway against simulated links")]
struct Args {
    /// Gateway configuration file (YAML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scenario file (YAML). Runs a built-in demo when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override the scenario's tick count.
    #[arg(long)]
    ticks: Option<u32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(message) = run(Args::parse()) {
        eprintln!("error: {}", message);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => GatewayConfig::load(path).map_err(|e| e.to_string())?,
        None => GatewayConfig::default(),
    };

    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path).map_err(|e| e.to_string())?,
        None => demo_scenario(),
    };
    if let Some(ticks) = args.ticks {
        scenario.ticks = ticks;
    }

    log::info!(
        "running {} ticks of {} ms against {} boiler points",
        scenario.ticks,
        scenario.tick_ms,
        scenario.boiler_points.len()
    );

    let run = run_scenario(&config, &scenario);

    println!("published values:");
    for (target, value) in run.events() {
        println!("  {} = {}", target, value);
    }

    let status = run.gateway.status();
    println!(
        "final status: ch={} dhw={} cooling={} otc={} ch2={} (received={})",
        status.ch_enable,
        status.dhw_enable,
        status.cooling_enable,
        status.otc_active,
        status.ch2_active,
        status.status_received
    );

    Ok(())
}
