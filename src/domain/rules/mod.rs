use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::alert::AlertEvent;
use crate::domain::entities::window::SampleWindow;
use crate::domain::value_objects::sensor::{SensorChannel, SensorKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("rule '{rule}': window capacity must be at least 2, got {capacity}")]
    InvalidCapacity { rule: String, capacity: usize },
    #[error("rule '{rule}': delta threshold must be a finite value >= 0, got {threshold}")]
    InvalidThreshold { rule: String, threshold: f64 },
    #[error("rule '{rule}': max elapsed minutes must be a finite value > 0, got {minutes}")]
    InvalidElapsed { rule: String, minutes: f64 },
}

/// Change observed across a window: first and last present values and the
/// full window span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowDelta {
    pub first_value: f64,
    pub last_value: f64,
    pub delta: f64,
    pub elapsed_minutes: f64,
}

/// How a rule sees a window right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Assessment {
    /// Window not full yet; nothing is evaluated.
    WarmingUp,
    /// Full window with fewer than two present values.
    InsufficientSignal,
    /// Evaluated, conditions not met.
    Quiet(WindowDelta),
    /// Evaluated, both conditions met.
    Triggered(WindowDelta),
}

/// Windowed rate-of-change rule for one sensor kind.
///
/// Fires when the absolute change between the first and last present values
/// reaches `delta_threshold` while the window spans at most
/// `max_elapsed_minutes`. Both conditions are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRule {
    name: String,
    kind: SensorKind,
    window_capacity: usize,
    delta_threshold: f64,
    max_elapsed_minutes: f64,
}

impl AnomalyRule {
    /// # Errors
    ///
    /// Returns `RuleError` if the capacity is below 2, the threshold is
    /// negative or not finite, or the elapsed bound is not strictly positive.
    pub fn new(
        name: impl Into<String>,
        kind: SensorKind,
        window_capacity: usize,
        delta_threshold: f64,
        max_elapsed_minutes: f64,
    ) -> Result<Self, RuleError> {
        let name = name.into();
        if window_capacity < 2 {
            return Err(RuleError::InvalidCapacity {
                rule: name,
                capacity: window_capacity,
            });
        }
        if !delta_threshold.is_finite() || delta_threshold < 0.0 {
            return Err(RuleError::InvalidThreshold {
                rule: name,
                threshold: delta_threshold,
            });
        }
        if !max_elapsed_minutes.is_finite() || max_elapsed_minutes <= 0.0 {
            return Err(RuleError::InvalidElapsed {
                rule: name,
                minutes: max_elapsed_minutes,
            });
        }
        Ok(Self {
            name,
            kind,
            window_capacity,
            delta_threshold,
            max_elapsed_minutes,
        })
    }

    /// Smoker: 15 °F in 2.5 minutes over the last 5 readings.
    #[must_use]
    pub fn smoker() -> Self {
        Self {
            name: "smoker".into(),
            kind: SensorKind::Smoker,
            window_capacity: 5,
            delta_threshold: 15.0,
            max_elapsed_minutes: 2.5,
        }
    }

    /// Food probes: 1 °F in 10 minutes over the last 20 readings.
    #[must_use]
    pub fn food() -> Self {
        Self {
            name: "food".into(),
            kind: SensorKind::Food,
            window_capacity: 20,
            delta_threshold: 1.0,
            max_elapsed_minutes: 10.0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> SensorKind {
        self.kind
    }

    #[must_use]
    pub const fn window_capacity(&self) -> usize {
        self.window_capacity
    }

    #[must_use]
    pub const fn delta_threshold(&self) -> f64 {
        self.delta_threshold
    }

    #[must_use]
    pub const fn max_elapsed_minutes(&self) -> f64 {
        self.max_elapsed_minutes
    }

    /// A fresh, empty window sized for this rule.
    #[must_use]
    pub fn new_window(&self) -> SampleWindow {
        SampleWindow::new(self.window_capacity)
    }

    /// First/last present values and the window span, or `None` when fewer
    /// than two values are present.
    #[must_use]
    pub fn measure(&self, window: &SampleWindow) -> Option<WindowDelta> {
        let mut values = window.values();
        let first_value = values.next()?;
        let last_value = values.last()?;
        let elapsed_minutes = window.span_minutes()?;
        Some(WindowDelta {
            first_value,
            last_value,
            delta: (first_value - last_value).abs(),
            elapsed_minutes,
        })
    }

    #[must_use]
    pub fn assess(&self, window: &SampleWindow) -> Assessment {
        if !window.is_full() {
            return Assessment::WarmingUp;
        }
        match self.measure(window) {
            None => Assessment::InsufficientSignal,
            Some(measured) if self.crosses(&measured) => Assessment::Triggered(measured),
            Some(measured) => Assessment::Quiet(measured),
        }
    }

    /// Returns the alert for `sensor_name` when the window triggers this rule.
    /// Partial windows are never evaluated.
    #[must_use]
    pub fn evaluate(&self, sensor_name: &str, window: &SampleWindow) -> Option<AlertEvent> {
        self.alert_for(sensor_name, window, self.assess(window))
    }

    /// Builds the alert from an assessment already made on `window`.
    #[must_use]
    pub fn alert_for(
        &self,
        sensor_name: &str,
        window: &SampleWindow,
        assessment: Assessment,
    ) -> Option<AlertEvent> {
        match assessment {
            Assessment::Triggered(measured) => Some(AlertEvent {
                sensor_name: sensor_name.to_string(),
                kind: self.kind,
                first_value: measured.first_value,
                last_value: measured.last_value,
                elapsed_minutes: measured.elapsed_minutes,
                threshold: self.delta_threshold,
                max_elapsed_minutes: self.max_elapsed_minutes,
                observed_at: window.newest()?.timestamp,
            }),
            Assessment::WarmingUp | Assessment::InsufficientSignal | Assessment::Quiet(_) => None,
        }
    }

    fn crosses(&self, measured: &WindowDelta) -> bool {
        measured.delta >= self.delta_threshold
            && measured.elapsed_minutes <= self.max_elapsed_minutes
    }
}

/// One shared rule per sensor kind.
#[derive(Debug, Clone)]
pub struct RuleSet {
    smoker: Arc<AnomalyRule>,
    food: Arc<AnomalyRule>,
}

impl RuleSet {
    #[must_use]
    pub fn new(smoker: AnomalyRule, food: AnomalyRule) -> Self {
        Self {
            smoker: Arc::new(smoker),
            food: Arc::new(food),
        }
    }

    #[must_use]
    pub fn for_kind(&self, kind: SensorKind) -> Arc<AnomalyRule> {
        match kind {
            SensorKind::Smoker => Arc::clone(&self.smoker),
            SensorKind::Food => Arc::clone(&self.food),
        }
    }

    #[must_use]
    pub fn for_channel(&self, channel: SensorChannel) -> Arc<AnomalyRule> {
        self.for_kind(channel.kind())
    }

    /// Rules in channel order, one entry per channel.
    #[must_use]
    pub fn by_channel(&self) -> Vec<(SensorChannel, Arc<AnomalyRule>)> {
        SensorChannel::ALL
            .iter()
            .map(|&channel| (channel, self.for_channel(channel)))
            .collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        default_rules()
    }
}

/// The built-in smoker and food rules.
#[must_use]
pub fn default_rules() -> RuleSet {
    RuleSet::new(AnomalyRule::smoker(), AnomalyRule::food())
}
