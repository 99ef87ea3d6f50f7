//! Pass Simulation CLI
//!
//! Usage:
//!   pass-sim run data/missions/cubesat_uhf_svalbard.json --json results.json
//!   pass-sim budget data/missions/cubesat_uhf_svalbard.json --elevation 10
//!   pass-sim stations

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ground_stations::StationRegistry;
use pass_simulation::{generate_report, MissionConfig};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "pass-sim",
    about = "Time-stepped satellite pass and link budget simulation"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate every pass of a mission and print the report
    Run {
        /// Mission JSON file
        mission: PathBuf,

        /// Override the fine sampling step in seconds
        #[arg(long)]
        fine_step: Option<f64>,

        /// Override the number of simulated orbits
        #[arg(long)]
        orbits: Option<f64>,

        /// Sample passes in parallel
        #[arg(long)]
        parallel: bool,

        /// Also write the full results as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Single-point link budget at a given elevation
    Budget {
        /// Mission JSON file
        mission: PathBuf,

        /// Elevation angle in degrees
        #[arg(short, long, default_value_t = 10.0)]
        elevation: f64,
    },
    /// List the reference ground stations
    Stations,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Run {
            mission,
            fine_step,
            orbits,
            parallel,
            json,
        } => {
            let mut config = MissionConfig::from_json_file(&mission)
                .with_context(|| format!("loading mission {:?}", mission))?;
            if let Some(step) = fine_step {
                config.simulation.fine_step_s = step;
            }
            if let Some(orbits) = orbits {
                config.simulation.duration_orbits = orbits;
            }
            config.simulation.parallel |= parallel;

            info!("{}", "=".repeat(60));
            info!("Mission: {}", config.name);
            info!("{}", "=".repeat(60));

            let results = config.run()?;
            println!("{}", generate_report(&results, config.reference_epoch()?));

            if let Some(path) = json {
                info!("Writing results to {:?}", path);
                let file = File::create(&path)?;
                let writer = BufWriter::new(file);
                serde_json::to_writer_pretty(writer, &results)?;
            }
        }
        Command::Budget { mission, elevation } => {
            let config = MissionConfig::from_json_file(&mission)
                .with_context(|| format!("loading mission {:?}", mission))?;
            let budget = config.link_budget_at(elevation)?;
            println!("Mission: {} @ {:.1} deg elevation", config.name, elevation);
            println!("{}", budget);
            for check in config.design_checks()? {
                println!("{}", check);
            }
        }
        Command::Stations => {
            let registry = StationRegistry::with_reference_network();
            println!(
                "{:<16} {:>9} {:>10} {:>8} {:>8}",
                "Name", "Lat [deg]", "Lon [deg]", "Alt [m]", "Mask"
            );
            for station in registry.iter() {
                println!(
                    "{:<16} {:>9.2} {:>10.2} {:>8.0} {:>8.1}",
                    station.name,
                    station.latitude_deg,
                    station.longitude_deg,
                    station.altitude_m,
                    station.min_elevation_deg
                );
            }
        }
    }

    Ok(())
}
