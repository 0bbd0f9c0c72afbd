use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;
mod session;

#[derive(Parser)]
#[command(name = "countdown-cli", version, about = "Countdown timer CLI")]
pub(crate) struct Cli {
    /// Log engine transitions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "countdown_core=debug,countdown_cli=debug"
    } else {
        "warn"
    }
}

/// `COUNTDOWN_LOG` wins over `--verbose`. Logs go to stderr so frames on
/// stdout stay clean.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("COUNTDOWN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignored_commands_are_logged_by_default() {
        assert_eq!(default_filter(false), "warn");
        assert!(default_filter(true).contains("countdown_core=debug"));
    }
}
