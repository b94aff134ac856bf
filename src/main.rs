use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use kardex::cli::{handle_options_command, handle_report_command, OptionsArgs, ReportArgs};
use kardex::config::{paths::KardexPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "kardex",
    version,
    about = "Terminal viewer for Kardex inventory movement reports",
    long_about = "Kardex loads a semicolon-delimited inventory movement export, \
                  filters it by store, product, operator, location, period and \
                  stock flags, and shows the matching movements with inflow and \
                  outflow totals."
)]
struct Cli {
    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI
    #[command(alias = "ui")]
    Tui {
        /// Kardex CSV file to open on start
        file: Option<PathBuf>,
    },

    /// Print a filtered report
    Report(ReportArgs),

    /// List the values each filter accepts for a file
    Options(OptionsArgs),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = KardexPaths::new()?;
    let settings = Settings::load_or_default(&paths)?;

    let tui = matches!(cli.command, Some(Commands::Tui { .. }));
    kardex::logging::init(&settings.log_level, cli.verbose, tui);

    match cli.command {
        Some(Commands::Tui { file }) => {
            kardex::tui::run_tui(&settings, file)?;
        }
        Some(Commands::Report(args)) => {
            handle_report_command(&settings, args)?;
        }
        Some(Commands::Options(args)) => {
            handle_options_command(&settings, args)?;
        }
        Some(Commands::Config) => {
            println!("Kardex Configuration");
            println!("====================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Delimiter:      '{}'", settings.delimiter);
            println!("  Decimal places: {}", settings.decimal_places);
            println!("  Log level:      {}", settings.log_level);
            println!("  Columns:        {}", settings.columns.required().join(", "));
        }
        None => {
            println!("Kardex - inventory movement report viewer");
            println!();
            println!("Run 'kardex --help' for usage information.");
            println!("Run 'kardex tui <file>' to launch the interactive interface.");
        }
    }

    Ok(())
}
