use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use pitwatch::application::config::AppConfig;
use pitwatch::application::services::dispatcher::AlertDispatcher;
use pitwatch::infrastructure::notifications::build_notifier;
use pitwatch::presentation::cli::app::{Cli, Commands};
use pitwatch::presentation::cli::commands::check::run_check;
use pitwatch::presentation::cli::commands::listen::run_listen;
use pitwatch::presentation::cli::commands::replay::{run_replay, ReplayOptions};
use pitwatch::presentation::cli::commands::rules::run_rules;

fn print_banner() {
    println!("{}", "━".repeat(40).cyan());
    println!("{}", "  PITWATCH: Smoker Temperature Watch".bold().cyan());
    println!("{}", "━".repeat(40).cyan());
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_dispatcher(config: &AppConfig) -> anyhow::Result<AlertDispatcher> {
    let notifier = build_notifier(&config.notifications)?;
    if notifier.is_empty() {
        tracing::warn!("No notification channel enabled; alerts will only be logged");
    } else {
        tracing::info!("Notification channels: {}", notifier.names().join(", "));
    }
    Ok(AlertDispatcher::new(Arc::new(notifier)))
}

fn configured_csv(config: &AppConfig) -> Option<PathBuf> {
    config
        .general
        .csv_path
        .as_deref()
        .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load()?
    };
    let rules = config.rule_set()?;
    let queue_capacity = config.general.queue_capacity.max(1);

    // No subcommand: replay the configured CSV, or fall back to stdin.
    let command = cli.command.unwrap_or_else(|| {
        if configured_csv(&config).is_some() {
            Commands::Replay {
                file: None,
                interval_ms: None,
                keep_gaps: false,
            }
        } else {
            Commands::Listen
        }
    });

    match command {
        Commands::Replay {
            file,
            interval_ms,
            keep_gaps,
        } => {
            let Some(path) = file.or_else(|| configured_csv(&config)) else {
                anyhow::bail!("No CSV file given and general.csv_path is not set");
            };
            let dispatcher = build_dispatcher(&config)?;
            print_banner();
            let options = ReplayOptions {
                interval: Duration::from_millis(
                    interval_ms.unwrap_or(config.general.replay_interval_ms),
                ),
                keep_gaps: keep_gaps || config.general.keep_gaps,
                queue_capacity,
            };
            run_replay(&path, &rules, &dispatcher, options).await?;
        }
        Commands::Listen => {
            let dispatcher = build_dispatcher(&config)?;
            print_banner();
            run_listen(&rules, &dispatcher, queue_capacity).await?;
        }
        Commands::Check {
            file,
            keep_gaps,
            json,
        } => {
            run_check(
                &file,
                &rules,
                keep_gaps || config.general.keep_gaps,
                queue_capacity,
                json,
            )
            .await?;
        }
        Commands::Rules { json } => {
            run_rules(&rules, json)?;
        }
    }

    Ok(())
}
