use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::application::services::lane::{AlertRetention, LaneReport};
use crate::domain::entities::alert::AlertEvent;
use crate::domain::rules::RuleSet;
use crate::infrastructure::feeds::{channel_feeds, CsvReplayFeed, FeedStats};
use crate::presentation::cli::formatters::alert_fmt::{
    format_alerts, format_report_table, print_no_alerts,
};

use super::pipeline::{build_lanes, run_session};

#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    feed: FeedStats,
    alerts: &'a [AlertEvent],
    lanes: &'a [LaneReport],
}

/// Analyze a CSV export as fast as it can be read, without notifications.
///
/// # Errors
///
/// Returns an error if the CSV file cannot be read or parsed, or JSON
/// serialization fails.
pub async fn run_check(
    path: &Path,
    rules: &RuleSet,
    keep_gaps: bool,
    queue_capacity: usize,
    json: bool,
) -> anyhow::Result<()> {
    let (reports, feed) = check_file(path, rules, keep_gaps, queue_capacity).await?;
    let mut alerts: Vec<AlertEvent> = reports.iter().flat_map(|r| r.alerts.clone()).collect();
    alerts.sort_by_key(|a| a.observed_at);

    if json {
        let output = CheckOutput {
            feed,
            alerts: &alerts,
            lanes: &reports,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if alerts.is_empty() {
        print_no_alerts();
    } else {
        println!();
        format_alerts(&alerts);
    }
    println!("{}", format_report_table(&reports));
    Ok(())
}

/// Run every lane over the file with no pacing and no dispatcher.
///
/// # Errors
///
/// Returns an error if the CSV file cannot be read or parsed.
pub async fn check_file(
    path: &Path,
    rules: &RuleSet,
    keep_gaps: bool,
    queue_capacity: usize,
) -> anyhow::Result<(Vec<LaneReport>, FeedStats)> {
    let (router, sources) = channel_feeds(queue_capacity);
    let lanes = build_lanes(rules, sources, None, AlertRetention::All);
    let feed = CsvReplayFeed::new(path, Duration::ZERO, keep_gaps).run(router);
    let outcome = run_session(lanes, feed).await?;
    Ok((outcome.reports, outcome.feed))
}
