use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use fxtable::core::ConversionMode;
use fxtable::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(flatten)]
    overrides: OverrideArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
struct OverrideArgs {
    /// Base currency to convert from
    #[arg(short, long, global = true)]
    base: Option<String>,

    /// Amount to convert
    #[arg(short, long, global = true)]
    amount: Option<f64>,

    /// Conversion mode: direct or cross-rate
    #[arg(short, long, global = true)]
    mode: Option<ConversionMode>,

    /// Currency to show, may be repeated
    #[arg(long = "add", global = true)]
    currencies: Vec<String>,

    /// Show every available currency
    #[arg(long, global = true)]
    all: bool,
}

impl From<OverrideArgs> for fxtable::Overrides {
    fn from(args: OverrideArgs) -> fxtable::Overrides {
        fxtable::Overrides {
            base: args.base,
            amount: args.amount,
            mode: args.mode,
            currencies: args.currencies,
            all: args.all,
        }
    }
}

impl From<Commands> for fxtable::AppCommand {
    fn from(cmd: Commands) -> fxtable::AppCommand {
        match cmd {
            Commands::Table => fxtable::AppCommand::Table,
            Commands::Currencies => fxtable::AppCommand::Currencies,
            Commands::Interactive => fxtable::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the conversion table
    Table,
    /// List available currencies
    Currencies,
    /// Start an interactive session
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let overrides = fxtable::Overrides::from(cli.overrides);
    let result = match cli.command {
        Some(Commands::Setup) => fxtable::cli::setup::setup(),
        Some(cmd) => {
            fxtable::run_command(cmd.into(), cli.config_path.as_deref(), &overrides).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
        eprintln!("{}", fxtable::cli::ui::alert(&format!("{e:#}")));
        std::process::exit(1);
    }
    result
}
