#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use pitwatch::application::services::dispatcher::AlertDispatcher;
use pitwatch::application::services::lane::{run_lanes, AlertRetention, SensorLane};
use pitwatch::application::services::monitor::SensorMonitor;
use pitwatch::domain::entities::sample::RawSample;
use pitwatch::domain::ports::notifier::{NotificationError, Notifier};
use pitwatch::domain::rules::default_rules;
use pitwatch::domain::value_objects::sensor::SensorChannel;
use pitwatch::infrastructure::feeds::{channel_feeds, CsvReplayFeed, FeedStats};
use pitwatch::presentation::cli::commands::pipeline::{build_lanes, run_session};

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn notify(&self, message: &str) -> Result<(), NotificationError> {
        self.messages.lock().expect("lock").push(message.to_string());
        Ok(())
    }
}

struct DownNotifier;

#[async_trait]
impl Notifier for DownNotifier {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn notify(&self, _message: &str) -> Result<(), NotificationError> {
        Err(NotificationError::ChannelUnavailable("gateway offline".into()))
    }
}

fn fixture(name: &str) -> PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[tokio::test]
async fn replay_notifies_each_smoker_alert() {
    let recorder = Arc::new(RecordingNotifier::default());
    let dispatcher = AlertDispatcher::new(Arc::clone(&recorder) as Arc<dyn Notifier>);

    let (router, sources) = channel_feeds(8);
    let lanes = build_lanes(
        &default_rules(),
        sources,
        Some(&dispatcher),
        AlertRetention::default(),
    );
    let feed = CsvReplayFeed::new(fixture("smoker-temps.csv"), Duration::ZERO, false).run(router);

    let outcome = run_session(lanes, feed).await.expect("replay");

    assert_eq!(
        outcome.feed,
        FeedStats {
            routed: 86,
            skipped: 4
        }
    );
    let ingested: Vec<usize> = outcome.reports.iter().map(|r| r.ingested).collect();
    assert_eq!(ingested, vec![30, 30, 26]);
    let raised: Vec<usize> = outcome.reports.iter().map(|r| r.alerts_raised).collect();
    assert_eq!(raised, vec![3, 0, 0]);

    let messages = recorder.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].starts_with("Smoker alert! smoker Alert"));
    assert!(messages[0].contains("(225.0°F -> 206.0°F)"));
    assert!(messages[0].contains("in 2 minutes"));
}

#[tokio::test]
async fn keep_gaps_forwards_missing_readings() {
    let (router, sources) = channel_feeds(8);
    let lanes = build_lanes(&default_rules(), sources, None, AlertRetention::default());
    let feed = CsvReplayFeed::new(fixture("smoker-temps.csv"), Duration::ZERO, true).run(router);

    let outcome = run_session(lanes, feed).await.expect("replay");

    assert_eq!(outcome.feed.routed, 90);
    assert_eq!(outcome.reports[2].ingested, 30);
    assert_eq!(outcome.reports[2].malformed, 0);
}

#[tokio::test]
async fn failed_notification_does_not_stop_the_lane() {
    let dispatcher = AlertDispatcher::new(Arc::new(DownNotifier));
    let (router, sources) = channel_feeds(8);
    let lanes = build_lanes(
        &default_rules(),
        sources,
        Some(&dispatcher),
        AlertRetention::default(),
    );
    let feed = CsvReplayFeed::new(fixture("smoker-temps.csv"), Duration::ZERO, false).run(router);

    let outcome = run_session(lanes, feed).await.expect("replay");

    let smoker = &outcome.reports[0];
    assert_eq!(smoker.ingested, 30);
    assert_eq!(smoker.alerts_raised, 3);
    assert_eq!(smoker.dispatch_failures, 3);
}

#[tokio::test]
async fn lanes_are_independent() {
    let rules = default_rules();
    let (router, sources) = channel_feeds(8);
    let lanes: Vec<SensorLane> = sources
        .into_iter()
        .map(|(channel, source)| {
            let monitor = SensorMonitor::new(channel.name(), rules.for_channel(channel));
            SensorLane::new(monitor, Box::new(source), None)
        })
        .collect();
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let lanes_done = tokio::spawn(run_lanes(lanes, shutdown_rx));

    // A broken food reading sits between smoker readings that fill a window.
    for (i, value) in ["225", "220", "215", "212", "205"].iter().enumerate() {
        let ts = format!("10/23/23 12:0{}:{:02}", i / 2, (i % 2) * 30);
        router
            .route(SensorChannel::Smoker, RawSample::new(ts, *value))
            .await
            .expect("smoker lane");
        if i == 2 {
            router
                .route(SensorChannel::FoodA, RawSample::new("not a time", "150"))
                .await
                .expect("food lane");
        }
    }
    drop(router);

    let reports = lanes_done.await.expect("lanes join");
    assert_eq!(reports[0].alerts_raised, 1);
    assert_eq!(reports[1].malformed, 1);
    assert_eq!(reports[1].ingested, 0);
    assert_eq!(reports[2].ingested, 0);
}
