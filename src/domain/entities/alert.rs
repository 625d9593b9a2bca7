use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::sensor::SensorKind;

/// A fired window rule, carrying everything needed to describe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub sensor_name: String,
    pub kind: SensorKind,
    pub first_value: f64,
    pub last_value: f64,
    pub elapsed_minutes: f64,
    pub threshold: f64,
    pub max_elapsed_minutes: f64,
    /// Timestamp of the newest sample in the window when the rule fired.
    pub observed_at: NaiveDateTime,
}

impl AlertEvent {
    #[must_use]
    pub fn delta(&self) -> f64 {
        (self.first_value - self.last_value).abs()
    }
}
