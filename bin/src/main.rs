//! candela CLI - OHLCV re-aggregation and Wilder ATR.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::aggregate::AggregateArgs;
use commands::atr::AtrCommandArgs;
use commands::check::CheckArgs;
use commands::project::ProjectArgs;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "candela")]
#[command(about = "Re-aggregate OHLCV bars and compute Wilder ATR", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Pipeline configuration file (JSON); flags override its fields
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate bars into a coarser granularity
    Aggregate(AggregateArgs),

    /// Compute True Range and ATR over bars as they are
    Atr(AtrCommandArgs),

    /// Aggregate bars, then compute ATR on the result
    Run(RunArgs),

    /// Report ordering, duplicates, malformed bars and gaps
    Check(CheckArgs),

    /// Copy coarse ATR onto the fine bars inside each coarse bucket
    Project(ProjectArgs),
}

/// Installs the log subscriber. `RUST_LOG` wins over `-v`/`-q`.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = display::load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "pipeline config");

    match command {
        Commands::Aggregate(args) => commands::aggregate::aggregate(&args, config, cli.quiet),
        Commands::Atr(args) => commands::atr::atr(&args, config, cli.quiet),
        Commands::Run(args) => commands::run::run(&args, config, cli.quiet),
        Commands::Check(args) => commands::check::check(&args, config, cli.quiet),
        Commands::Project(args) => commands::project::project(&args, config, cli.quiet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candela_lib::{AtrWindow, Granularity};

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "candela", "run", "bars.csv", "--from", "1m", "--to", "daily", "--days", "14", "-o",
            "out.parquet", "-f", "parquet", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.from, Some(Granularity::Minute));
        assert_eq!(args.to, Some(Granularity::Daily));
        assert_eq!(args.atr.window(), Some(AtrWindow::Days(14)));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(
            Cli::try_parse_from(["candela", "aggregate", "bars.csv", "--to", "weekly"]).is_err()
        );
        assert!(
            Cli::try_parse_from(["candela", "atr", "bars.csv", "--period", "3", "--days", "1"])
                .is_err()
        );
    }
}
