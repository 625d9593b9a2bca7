use std::path::Path;
use std::time::Duration;

use crate::application::services::dispatcher::AlertDispatcher;
use crate::application::services::lane::AlertRetention;
use crate::domain::rules::RuleSet;
use crate::infrastructure::feeds::{channel_feeds, CsvReplayFeed};
use crate::presentation::cli::formatters::alert_fmt::format_report_table;

use super::pipeline::{build_lanes, run_session};

/// Options for a paced CSV replay.
#[derive(Debug, Clone, Copy)]
pub struct ReplayOptions {
    pub interval: Duration,
    pub keep_gaps: bool,
    pub queue_capacity: usize,
}

/// Replay a thermometer CSV export in real time, notifying on every alert.
///
/// # Errors
///
/// Returns an error if the CSV file cannot be read or parsed.
pub async fn run_replay(
    path: &Path,
    rules: &RuleSet,
    dispatcher: &AlertDispatcher,
    options: ReplayOptions,
) -> anyhow::Result<()> {
    tracing::info!(
        "Replaying {} every {} ms",
        path.display(),
        options.interval.as_millis()
    );
    let (router, sources) = channel_feeds(options.queue_capacity);
    let lanes = build_lanes(rules, sources, Some(dispatcher), AlertRetention::default());
    let feed = CsvReplayFeed::new(path, options.interval, options.keep_gaps).run(router);

    let outcome = run_session(lanes, feed).await?;
    if outcome.interrupted {
        println!("\nReplay interrupted.");
    }
    println!("{}", format_report_table(&outcome.reports));
    Ok(())
}
