//! ReasonRank CLI - Score argument graphs from the command line.

use clap::Parser;
use reasonrank_cli::commands;
use reasonrank_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> reasonrank_cli::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = Config::load(cli.config.as_deref())?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Score(args) => commands::execute_score(args, &config, &formatter)?,
        Command::Dedup(args) => commands::execute_dedup(args, &config, &formatter)?,
        Command::Replay(args) => commands::execute_replay(args, &config, &formatter)?,
        Command::Leaderboard(args) => commands::execute_leaderboard(args, &config, &formatter)?,
        Command::Config => commands::execute_config(cli.config.as_deref(), &config, &formatter)?,
    }

    Ok(())
}
