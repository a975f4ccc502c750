//! `keithley-probe`: check the serial link by repeating one query.
//!
//! ```bash
//! keithley-probe
//! keithley-probe --config bench.toml --log-level debug
//! ```

use clap::Parser;
use keithley_scpi::cli::Args;
use keithley_scpi::logging::init_logging;
use keithley_scpi::probe::probe_from_config;
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
    info!("Starting keithley-probe v{}", env!("CARGO_PKG_VERSION"));

    let replies = probe_from_config(config)?;
    info!("Probe finished with {} replies", replies.len());
    Ok(())
}
