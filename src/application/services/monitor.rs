use std::sync::Arc;

use crate::domain::entities::alert::AlertEvent;
use crate::domain::entities::sample::{RawSample, Sample, SampleError};
use crate::domain::entities::window::SampleWindow;
use crate::domain::rules::{AnomalyRule, Assessment};

/// Lifecycle of a monitor's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Window not full yet; no evaluation.
    WarmingUp,
    /// Window full; every ingested sample is evaluated.
    Active,
}

/// What one ingested sample led to.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub assessment: Assessment,
    pub alert: Option<AlertEvent>,
}

/// Binds one sensor's private window to its (shared) rule.
///
/// Callers must feed samples in arrival order, one at a time. The monitor
/// does no I/O and no logging.
#[derive(Debug)]
pub struct SensorMonitor {
    sensor_name: String,
    rule: Arc<AnomalyRule>,
    window: SampleWindow,
}

impl SensorMonitor {
    #[must_use]
    pub fn new(sensor_name: impl Into<String>, rule: Arc<AnomalyRule>) -> Self {
        let window = rule.new_window();
        Self {
            sensor_name: sensor_name.into(),
            rule,
            window,
        }
    }

    #[must_use]
    pub fn sensor_name(&self) -> &str {
        &self.sensor_name
    }

    #[must_use]
    pub fn rule(&self) -> &AnomalyRule {
        &self.rule
    }

    #[must_use]
    pub const fn window(&self) -> &SampleWindow {
        &self.window
    }

    #[must_use]
    pub fn state(&self) -> MonitorState {
        if self.window.is_full() {
            MonitorState::Active
        } else {
            MonitorState::WarmingUp
        }
    }

    /// Parse and ingest a raw reading, returning only the alert.
    ///
    /// # Errors
    ///
    /// Returns `SampleError::MalformedTimestamp` when the timestamp cannot be
    /// parsed; the window is left untouched in that case.
    pub fn ingest(&mut self, raw: &RawSample) -> Result<Option<AlertEvent>, SampleError> {
        Ok(self.observe(raw)?.alert)
    }

    /// Parse and ingest a raw reading. The window is assessed exactly once
    /// and the alert, if any, is built from that assessment.
    ///
    /// # Errors
    ///
    /// Same as [`SensorMonitor::ingest`].
    pub fn observe(&mut self, raw: &RawSample) -> Result<Evaluation, SampleError> {
        let sample = Sample::parse(raw)?;
        self.window.push(sample);
        let assessment = self.rule.assess(&self.window);
        let alert = self
            .rule
            .alert_for(&self.sensor_name, &self.window, assessment);
        Ok(Evaluation { assessment, alert })
    }
}
