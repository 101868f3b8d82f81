//! `pgator` - sequence power for Polygator radio module boards.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pgator_cli::commands;
use pgator_cli::exit_codes::map_clap_error;
use pgator_cli::inventory::{DEFAULT_DEV_ROOT, DEFAULT_SUBSYSTEM_PATH};
use pgator_core::Direction;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pgator",
    version,
    about = "Power sequencer for Polygator radio module boards"
)]
struct Cli {
    /// Subsystem description file.
    #[arg(long, default_value = DEFAULT_SUBSYSTEM_PATH)]
    subsystem: PathBuf,

    /// Root under which board device paths are resolved.
    #[arg(long, default_value = DEFAULT_DEV_ROOT)]
    dev_root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Power up every radio channel on every board.
    Enable,
    /// Power down every radio channel on every board.
    Disable,
    /// Print the subsystem configuration tree.
    Show,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // try_parse so argument errors get their own exit code instead of
    // clap's default 2, which would collide with a sequencing failure.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = map_clap_error(&err);
            let _ = err.print();
            return ExitCode::from(code);
        }
    };
    let code = match cli.command {
        Command::Enable => {
            commands::power::run(&cli.subsystem, &cli.dev_root, Direction::PowerUp)
        }
        Command::Disable => {
            commands::power::run(&cli.subsystem, &cli.dev_root, Direction::PowerDown)
        }
        Command::Show => commands::show::run(&cli.subsystem, &cli.dev_root),
    };
    ExitCode::from(code)
}
