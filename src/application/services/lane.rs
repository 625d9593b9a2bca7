use std::collections::VecDeque;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::domain::entities::alert::AlertEvent;
use crate::domain::ports::source::SampleSource;
use crate::domain::rules::Assessment;

use super::dispatcher::AlertDispatcher;
use super::monitor::{MonitorState, SensorMonitor};

/// Alerts a long-running lane keeps in its report by default.
pub const RECENT_ALERTS: usize = 16;

/// How many raised alerts a lane holds on to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertRetention {
    /// Only the newest `n` alerts; older ones are dropped.
    Recent(usize),
    /// Every alert, for bounded inputs such as an offline CSV check.
    All,
}

impl Default for AlertRetention {
    fn default() -> Self {
        Self::Recent(RECENT_ALERTS)
    }
}

/// Counters for one lane, returned when its feed ends.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LaneReport {
    pub sensor: String,
    pub ingested: usize,
    pub malformed: usize,
    pub insufficient_signal: usize,
    pub alerts_raised: usize,
    /// Retained alerts, oldest first.
    pub alerts: VecDeque<AlertEvent>,
    pub dispatch_failures: usize,
    pub source_error: Option<String>,
}

impl LaneReport {
    fn record_alert(&mut self, event: AlertEvent, retention: AlertRetention) {
        self.alerts_raised += 1;
        match retention {
            AlertRetention::All => self.alerts.push_back(event),
            AlertRetention::Recent(0) => {}
            AlertRetention::Recent(limit) => {
                if self.alerts.len() == limit {
                    self.alerts.pop_front();
                }
                self.alerts.push_back(event);
            }
        }
    }
}

/// Sequential processing lane for one sensor channel:
/// feed → monitor → (optional) dispatcher.
pub struct SensorLane {
    monitor: SensorMonitor,
    source: Box<dyn SampleSource>,
    dispatcher: Option<AlertDispatcher>,
    retention: AlertRetention,
}

impl SensorLane {
    #[must_use]
    pub fn new(
        monitor: SensorMonitor,
        source: Box<dyn SampleSource>,
        dispatcher: Option<AlertDispatcher>,
    ) -> Self {
        Self {
            monitor,
            source,
            dispatcher,
            retention: AlertRetention::default(),
        }
    }

    #[must_use]
    pub fn with_retention(mut self, retention: AlertRetention) -> Self {
        self.retention = retention;
        self
    }

    /// Drain the feed until it ends or `shutdown` flips.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> LaneReport {
        let mut report = LaneReport {
            sensor: self.monitor.sensor_name().to_string(),
            ..LaneReport::default()
        };
        tracing::debug!(sensor = %report.sensor, "lane started");

        loop {
            let next = tokio::select! {
                next = self.source.next_sample() => next,
                _ = shutdown.changed() => {
                    tracing::debug!(sensor = %report.sensor, "lane shutting down");
                    break;
                }
            };

            let raw = match next {
                Ok(Some(raw)) => raw,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(sensor = %report.sensor, "sample feed failed: {e}");
                    report.source_error = Some(e.to_string());
                    break;
                }
            };

            let warming = self.monitor.state() == MonitorState::WarmingUp;
            let evaluation = match self.monitor.observe(&raw) {
                Ok(evaluation) => evaluation,
                Err(e) => {
                    tracing::warn!(sensor = %report.sensor, "skipping sample: {e}");
                    report.malformed += 1;
                    continue;
                }
            };
            report.ingested += 1;
            if warming && self.monitor.state() == MonitorState::Active {
                tracing::debug!(sensor = %report.sensor, "window full, evaluating");
            }
            log_assessment(&evaluation.assessment, &mut report);

            if let Some(event) = evaluation.alert {
                tracing::info!(
                    sensor = %event.sensor_name,
                    "{} change of {:.1}°F in {:.2} minutes (threshold {}°F)",
                    event.kind.headline(),
                    event.delta(),
                    event.elapsed_minutes,
                    event.threshold
                );
                if let Some(dispatcher) = &self.dispatcher {
                    if let Err(e) = dispatcher.dispatch(&event).await {
                        tracing::warn!("Alert notification failed: {e}");
                        report.dispatch_failures += 1;
                    }
                }
                report.record_alert(event, self.retention);
            }
        }

        tracing::debug!(
            sensor = %report.sensor,
            ingested = report.ingested,
            alerts = report.alerts_raised,
            "lane finished"
        );
        report
    }
}

fn log_assessment(assessment: &Assessment, report: &mut LaneReport) {
    match assessment {
        Assessment::InsufficientSignal => {
            tracing::warn!(sensor = %report.sensor, "Not enough valid temperatures");
            report.insufficient_signal += 1;
        }
        Assessment::Quiet(m) | Assessment::Triggered(m) => {
            tracing::debug!(
                sensor = %report.sensor,
                first = m.first_value,
                last = m.last_value,
                elapsed_minutes = m.elapsed_minutes,
                "window evaluated"
            );
        }
        Assessment::WarmingUp => {}
    }
}

/// Run every lane on its own task and collect the reports once all feeds end
/// or `shutdown` flips. Reports come back in lane order.
pub async fn run_lanes(lanes: Vec<SensorLane>, shutdown: watch::Receiver<bool>) -> Vec<LaneReport> {
    let mut set = JoinSet::new();
    for (index, lane) in lanes.into_iter().enumerate() {
        let shutdown = shutdown.clone();
        set.spawn(async move { (index, lane.run(shutdown).await) });
    }

    let mut reports = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(entry) => reports.push(entry),
            Err(e) => tracing::error!("sensor lane panicked: {e}"),
        }
    }
    reports.sort_by_key(|(index, _)| *index);
    reports.into_iter().map(|(_, report)| report).collect()
}
