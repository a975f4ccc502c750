//! `keithley-sweep`: play the sweep script against the instrument.

use clap::Parser;
use keithley_scpi::cli::Args;
use keithley_scpi::logging::init_logging;
use keithley_scpi::player::play_from_config;
use keithley_scpi::AppResult;
use tracing::{error, info};

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> AppResult<()> {
    let loader = args.resolve()?;

    if args.show_config {
        println!("{}", loader.to_toml()?);
        return Ok(());
    }
    let config = loader.config();

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Warning: logging unavailable: {e}");
    }
    info!("Starting keithley-sweep v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &loader.config_path {
        info!("Configuration loaded from {}", path.display());
    }

    let report = play_from_config(config)?;
    info!(
        "Playback finished: {} sent, {} read, {} decoded, {} skipped",
        report.commands_sent, report.lines_read, report.records_decoded, report.skipped
    );
    Ok(())
}
