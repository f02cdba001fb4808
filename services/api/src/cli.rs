use crate::report::{run_index_preview, run_roster_report, IndexArgs, RosterReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use load_index::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Workload Index",
    about = "Track QA engineer workload and serve the roster API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Summarise a CSV roster from the command line
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
    /// Score a hypothetical number of active requests
    Index(IndexArgs),
}

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Print team analytics and an optional employee listing
    Report(RosterReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory roster from a CSV export
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Roster {
            command: RosterCommand::Report(args),
        } => run_roster_report(args).await,
        Command::Index(args) => run_index_preview(args),
    }
}
