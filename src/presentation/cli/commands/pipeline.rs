use std::future::Future;

use anyhow::Context;
use tokio::sync::watch;

use crate::application::services::dispatcher::AlertDispatcher;
use crate::application::services::lane::{run_lanes, AlertRetention, LaneReport, SensorLane};
use crate::application::services::monitor::SensorMonitor;
use crate::domain::rules::RuleSet;
use crate::domain::value_objects::sensor::SensorChannel;
use crate::infrastructure::feeds::{ChannelSource, FeedError, FeedStats};

/// Result of one monitoring session.
#[derive(Debug)]
pub struct SessionOutcome {
    pub reports: Vec<LaneReport>,
    pub feed: FeedStats,
    pub interrupted: bool,
}

/// Build one lane per channel source, each with its own rule and window.
#[must_use]
pub fn build_lanes(
    rules: &RuleSet,
    sources: Vec<(SensorChannel, ChannelSource)>,
    dispatcher: Option<&AlertDispatcher>,
    retention: AlertRetention,
) -> Vec<SensorLane> {
    sources
        .into_iter()
        .map(|(channel, source)| {
            let monitor = SensorMonitor::new(channel.name(), rules.for_channel(channel));
            SensorLane::new(monitor, Box::new(source), dispatcher.cloned()).with_retention(retention)
        })
        .collect()
}

/// Drive `feed` and the lanes to completion, stopping early on Ctrl+C.
///
/// # Errors
///
/// Returns an error if the feed fails (unreadable file, broken input).
pub async fn run_session<F>(lanes: Vec<SensorLane>, feed: F) -> anyhow::Result<SessionOutcome>
where
    F: Future<Output = Result<FeedStats, FeedError>> + Send + 'static,
{
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };
    run_session_until(lanes, feed, ctrl_c).await
}

/// Drive `feed` and the lanes until the feed ends or `stop` resolves.
///
/// The feed runs on its own task and owns the router, so the lanes finish
/// once it returns. When `stop` fires first, the shutdown signal flips, the
/// feed is aborted and whatever the lanes saw so far is still collected.
///
/// # Errors
///
/// Returns an error if the feed fails (unreadable file, broken input).
pub async fn run_session_until<F, S>(
    lanes: Vec<SensorLane>,
    feed: F,
    stop: S,
) -> anyhow::Result<SessionOutcome>
where
    F: Future<Output = Result<FeedStats, FeedError>> + Send + 'static,
    S: Future<Output = ()>,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let feed_task = tokio::spawn(feed);

    let lanes_done = run_lanes(lanes, shutdown_rx);
    tokio::pin!(lanes_done);
    tokio::pin!(stop);

    let mut interrupted = false;
    let reports = tokio::select! {
        reports = &mut lanes_done => reports,
        () = &mut stop => {
            tracing::info!("Shutdown signal received, stopping lanes...");
            interrupted = true;
            let _ = shutdown_tx.send(true);
            feed_task.abort();
            lanes_done.await
        }
    };

    let feed = match feed_task.await {
        Ok(result) => result.context("sample feed failed")?,
        Err(e) if e.is_cancelled() => FeedStats::default(),
        Err(e) => return Err(anyhow::anyhow!("sample feed task failed: {e}")),
    };
    tracing::info!(
        routed = feed.routed,
        skipped = feed.skipped,
        "feed finished"
    );

    Ok(SessionOutcome {
        reports,
        feed,
        interrupted,
    })
}
