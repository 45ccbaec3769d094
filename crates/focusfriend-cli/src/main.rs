use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focusfriend", version, about = "Focusfriend CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the rest of the week and write blocks to the calendar
    Run {
        /// Log planned changes without touching the calendar
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the week plan as JSON without writing it
    Plan {
        /// Plan the week starting at this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        date: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Workday and break-window hours
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Local calendar entries
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { dry_run } => commands::run::run(dry_run),
        Commands::Plan { date } => commands::plan::run(date.as_deref()),
        Commands::Config { action } => commands::config::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Event { action } => commands::event::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
