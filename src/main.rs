//! VALORANT scouting CLI
//!
//! Runs the analysis pipeline over already-fetched provider JSON and
//! prints the structured scouting report. Fetching from the provider is a
//! separate concern; local files stand in for it here.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use valscout::ingest;
use valscout::insight::ScoutingPipeline;
use valscout::spatial::zones;
use valscout::{Result, ScoutError};

#[derive(Parser)]
#[command(name = "valscout")]
#[command(about = "VALORANT scouting reports from provider match data", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a scouting report from local series/event JSON
    Report {
        /// Team name to scout (exact, case-insensitive)
        #[arg(long)]
        team: String,
        /// Path to a JSON array of series records
        #[arg(long)]
        series: PathBuf,
        /// Optional path to a JSON array of per-round event batches
        #[arg(long)]
        events: Option<PathBuf>,
        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },
    /// Classify a coordinate into a named map zone
    Zone {
        /// Map name (raw provider identifiers accepted)
        #[arg(long)]
        map: String,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "warn" }),
    )
    .init();

    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Report {
            team,
            series,
            events,
            pretty,
        } => {
            let series_list = ingest::load_series_file(&series)?;
            let mut pipeline = ScoutingPipeline::new(&team);

            let mut processed = 0usize;
            for record in &series_list {
                if pipeline.ingest_series(record, None) {
                    processed += 1;
                }
            }
            if processed == 0 {
                return Err(ScoutError::TeamNotFound(team));
            }
            log::info!("processed {processed} of {} series", series_list.len());

            if let Some(events_path) = events {
                for round in ingest::load_events_file(&events_path)? {
                    pipeline.ingest_round_events(
                        &round.map_name,
                        round.round_number,
                        &round.events,
                    );
                }
            }

            let report = pipeline.build_report();
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
            Ok(())
        }
        Commands::Zone { map, x, y } => {
            if zones::zone_table(&map).is_none() {
                let known = zones::known_maps().collect::<Vec<_>>().join(", ");
                return Err(ScoutError::UnknownMap(map, known));
            }
            println!("{}", zones::zone_for_coordinates(x, y, &map));
            Ok(())
        }
    }
}
