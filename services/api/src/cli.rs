use crate::demo::{run_availability, run_demo, run_quote, AvailabilityArgs, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rental_quote::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Rental Quote Engine",
    about = "Quote vacation-rental stays and check unit availability",
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
    /// Price a stay and print the Italian booking summary
    Quote(QuoteArgs),
    /// List which units are free for a date range
    Availability(AvailabilityArgs),
    /// Walk through the reference pricing and availability scenarios
    Demo,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quote(args) => run_quote(args),
        Command::Availability(args) => run_availability(args),
        Command::Demo => run_demo(),
    }
}
