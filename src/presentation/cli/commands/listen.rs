use crate::application::services::dispatcher::AlertDispatcher;
use crate::application::services::lane::AlertRetention;
use crate::domain::rules::RuleSet;
use crate::infrastructure::feeds::{channel_feeds, LineFeed};
use crate::presentation::cli::formatters::alert_fmt::format_report_table;

use super::pipeline::{build_lanes, run_session};

/// Monitor `channel,timestamp,value` lines arriving on stdin until EOF or Ctrl+C.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub async fn run_listen(
    rules: &RuleSet,
    dispatcher: &AlertDispatcher,
    queue_capacity: usize,
) -> anyhow::Result<()> {
    tracing::info!("Listening for readings on stdin (channel,timestamp,value)");
    let (router, sources) = channel_feeds(queue_capacity);
    let lanes = build_lanes(rules, sources, Some(dispatcher), AlertRetention::default());
    let feed = LineFeed::stdin(queue_capacity)?.run(router);

    let outcome = run_session(lanes, feed).await?;
    println!("{}", format_report_table(&outcome.reports));
    Ok(())
}
