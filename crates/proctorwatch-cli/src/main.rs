use clap::{Parser, Subcommand};
use proctorwatch_core::Config;

mod commands;

#[derive(Parser)]
#[command(name = "proctorwatch-cli", version, about = "ProctorWatch CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run or inspect proctoring sessions
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Stored session reports
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(config: &Config) {
    // RUST_LOG wins over the configured level.
    env_logger::Builder::new()
        .parse_filters(&config.logging.level)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("warning: using default configuration: {e}");
            Config::default()
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action, &config),
        Commands::History { action } => commands::history::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
