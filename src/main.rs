mod commands;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use catezile_core::config::SiteConfig;
use catezile_core::format::DisplayPattern;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "catezile")]
#[command(about = "Countdowns, Romanian date formatting and calendar export")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the countdown to a target once
    Countdown {
        /// Target instant (ISO-8601, or epoch milliseconds)
        target: String,

        /// Target has a live phase after it starts (e.g. a fixture)
        #[arg(long)]
        live: bool,

        /// Label printed before the countdown
        #[arg(long)]
        title: Option<String>,
    },
    /// Re-render the countdown every second until it ends or Ctrl-C
    Watch {
        target: String,

        #[arg(long)]
        live: bool,

        /// How long a live target stays live (e.g. "90m", "2h")
        #[arg(long, value_parser = humantime::parse_duration)]
        live_window: Option<std::time::Duration>,
    },
    /// Show an instant in the site timezone
    Show {
        instant: String,

        /// date, datetime, time, long or numeric
        #[arg(short, long, default_value = "long")]
        pattern: DisplayPattern,

        #[arg(short, long)]
        locale: Option<String>,

        /// IANA timezone (defaults to the configured one)
        #[arg(long)]
        tz: Option<String>,
    },
    /// Export an event as an .ics calendar file
    Ics {
        #[arg(short, long)]
        title: String,

        /// Start date/time (e.g. "2025-08-12T18:00")
        #[arg(short, long)]
        start: String,

        /// End date/time (defaults to one hour after start)
        #[arg(short, long)]
        end: Option<String>,

        #[arg(short, long)]
        url: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List countdowns from a JSON feed file
    Catalog {
        file: PathBuf,

        /// Hide targets that have already ended
        #[arg(long)]
        upcoming: bool,

        /// Print translated targets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show config paths and effective settings
    Config {
        /// Write a commented default config file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = SiteConfig::load().context("Failed to load configuration")?;

    match cli.command {
        Commands::Countdown {
            target,
            live,
            title,
        } => commands::countdown::run(&config, &target, live, title.as_deref()),
        Commands::Watch {
            target,
            live,
            live_window,
        } => commands::watch::run(&config, &target, live, live_window).await,
        Commands::Show {
            instant,
            pattern,
            locale,
            tz,
        } => commands::show::run(
            &config,
            &instant,
            pattern,
            locale.as_deref(),
            tz.as_deref(),
        ),
        Commands::Ics {
            title,
            start,
            end,
            url,
            output,
        } => commands::ics::run(&config, title, &start, end, url, output.as_deref()),
        Commands::Catalog {
            file,
            upcoming,
            json,
        } => commands::catalog::run(&config, &file, upcoming, json),
        Commands::Config { init } => commands::config::run(&config, init),
    }
}

/// Logs go to stderr so command output stays pipeable.
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("catezile_core={0},catezile={0}", default_level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_show_pattern_parses() {
        let cli =
            Cli::try_parse_from(["catezile", "show", "2025-08-12T18:00", "-p", "date"]).unwrap();
        match cli.command {
            Commands::Show { pattern, .. } => assert_eq!(pattern, DisplayPattern::Date),
            _ => panic!("expected show"),
        }
        assert!(Cli::try_parse_from(["catezile", "show", "x", "-p", "weekly"]).is_err());
    }
}
