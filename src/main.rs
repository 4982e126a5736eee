use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use coinconv::core::Asset;
use coinconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for coinconv::AppCommand {
    fn from(cmd: Commands) -> coinconv::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                from,
                to,
                swap,
            } => coinconv::AppCommand::Convert {
                amount,
                from,
                to,
                swap,
            },
            Commands::Rates => coinconv::AppCommand::Rates,
            Commands::Interactive => coinconv::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two assets
    Convert {
        /// Amount in the source asset
        amount: Option<f64>,
        /// Source asset (BTC, USDT, ETH)
        from: Option<Asset>,
        /// Target asset (BTC, USDT, ETH)
        to: Option<Asset>,
        /// Swap source and target after converting
        #[arg(short, long)]
        swap: bool,
    },
    /// Display exchange rates for all supported pairs
    Rates,
    /// Start an interactive converter session
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => coinconv::cli::setup::setup(),
        Some(cmd) => coinconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
