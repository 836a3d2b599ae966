use std::io::Write;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sleeplog_cli::commands::{check, days, source, summary, today, util};
use sleeplog_cli::{Cli, Commands, Config};
use sleeplog_core::segment_days;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so report output on stdout stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let wall_clock = Local::now().naive_local();
    let now = match &cli.now {
        Some(value) => util::parse_now(value, wall_clock)?,
        None => wall_clock,
    };

    let log_path = cli.log.as_deref().unwrap_or(&config.log_path);
    let log = source::load(log_path, config.first_data_row)?;
    let stats = segment_days(&log.entries, now, &config.segment);

    let mut stdout = std::io::stdout().lock();
    match command {
        Commands::Days { limit, json } => days::run(&mut stdout, &stats, *limit, *json)?,
        Commands::Today { json } => today::run(&mut stdout, &stats, now, *json)?,
        Commands::Summary { days: last_n, json } => {
            summary::run(&mut stdout, &stats, *last_n, *json)?;
        }
        Commands::Check => check::run(&mut stdout, &log, &stats)?,
    }
    stdout.flush().context("failed to write output")?;

    Ok(())
}
