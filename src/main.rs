//! d2xx - FTDI D2XX native library loader
//!
//! Command line front end for `d2xx-core`: shows how the host platform is
//! detected, where the bundled native library is expected, and performs
//! extraction and loading with the same code path applications use.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use d2xx_core::config::{parse_options, split_options};
use d2xx_core::LoaderConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let config = match cli.options.as_deref() {
        Some(options) => parse_options(&split_options(options)?)?,
        None => LoaderConfig::default(),
    };

    let result = match cli.command {
        Commands::Platform => commands::platform::cmd_platform(&config),
        Commands::ListPlatforms => {
            commands::list_platforms();
            Ok(())
        }
        Commands::Extract { output } => commands::load::cmd_extract(&config, &output),
        Commands::Load { symbol } => commands::load::cmd_load(&config, &symbol),
        Commands::ClockRates => {
            commands::list_clock_rates();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
