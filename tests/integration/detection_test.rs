#![allow(clippy::expect_used)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use pitwatch::application::services::monitor::{MonitorState, SensorMonitor};
use pitwatch::domain::entities::sample::{RawSample, Sample};
use pitwatch::domain::entities::window::SampleWindow;
use pitwatch::domain::rules::{default_rules, AnomalyRule, Assessment};
use pitwatch::domain::value_objects::sensor::{SensorChannel, SensorKind};
use pitwatch::infrastructure::feeds::csv_replay::read_rows;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 10, 23)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid start time")
}

fn window_of(capacity: usize, step_secs: i64, values: &[Option<f64>]) -> SampleWindow {
    let mut window = SampleWindow::new(capacity);
    for (i, value) in values.iter().enumerate() {
        let offset = step_secs * i64::try_from(i).expect("small index");
        window.push(Sample::new(start() + Duration::seconds(offset), *value));
    }
    window
}

fn load_fixture(name: &str) -> std::fs::File {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::File::open(path).expect("Failed to open fixture")
}

#[test]
fn smoker_drop_within_window_alerts() {
    let rule = AnomalyRule::smoker();
    let window = window_of(
        5,
        30,
        &[Some(225.0), Some(220.0), Some(215.0), Some(212.0), Some(205.0)],
    );

    let alert = rule.evaluate("smoker", &window).expect("smoker alert");
    assert_eq!(alert.kind, SensorKind::Smoker);
    assert!((alert.elapsed_minutes - 2.0).abs() < f64::EPSILON);
    assert!((alert.delta() - 20.0).abs() < f64::EPSILON);
    assert!((alert.first_value - 225.0).abs() < f64::EPSILON);
    assert!((alert.last_value - 205.0).abs() < f64::EPSILON);
}

#[test]
fn slow_smoker_change_does_not_alert() {
    let rule = AnomalyRule::smoker();
    // 5 samples spread over 10 minutes
    let window = window_of(
        5,
        150,
        &[Some(225.0), Some(220.0), Some(215.0), Some(210.0), Some(205.0)],
    );

    assert!(rule.evaluate("smoker", &window).is_none());
    match rule.assess(&window) {
        Assessment::Quiet(m) => assert!((m.elapsed_minutes - 10.0).abs() < f64::EPSILON),
        other => panic!("expected a quiet window, got {other:?}"),
    }
}

#[test]
fn food_plateau_below_threshold_does_not_alert() {
    let rule = AnomalyRule::food();
    let values: Vec<Option<f64>> = (0..20)
        .map(|i| Some(if i == 19 { 150.3 } else { 150.0 + f64::from(i % 3) * 0.1 }))
        .collect();
    // 19 steps of 30 s = 9.5 minutes
    let window = window_of(20, 30, &values);

    assert!(window.is_full());
    assert!((window.span_minutes().expect("span") - 9.5).abs() < f64::EPSILON);
    assert!(rule.evaluate("food-A", &window).is_none());
}

#[test]
fn food_change_at_threshold_alerts_as_stall() {
    let rule = AnomalyRule::food();
    let values: Vec<Option<f64>> = (0..20)
        .map(|i| Some(if i == 19 { 151.0 } else { 150.0 }))
        .collect();
    let window = window_of(20, 30, &values);

    let alert = rule.evaluate("food-B", &window).expect("literal threshold check");
    assert_eq!(alert.kind, SensorKind::Food);
    assert_eq!(alert.kind.headline(), "Food stall!");
}

#[test]
fn missing_values_use_present_endpoints() {
    let rule = AnomalyRule::smoker();
    let window = window_of(5, 30, &[Some(200.0), None, None, Some(180.0), None]);

    let alert = rule.evaluate("smoker", &window).expect("alert from present values");
    assert!((alert.first_value - 200.0).abs() < f64::EPSILON);
    assert!((alert.last_value - 180.0).abs() < f64::EPSILON);
    // span still covers the trailing missing reading
    assert!((alert.elapsed_minutes - 2.0).abs() < f64::EPSILON);
}

#[test]
fn single_present_value_is_insufficient() {
    let rule = AnomalyRule::smoker();
    let window = window_of(5, 30, &[None, None, Some(225.0), None, None]);

    assert!(rule.evaluate("smoker", &window).is_none());
    assert_eq!(rule.assess(&window), Assessment::InsufficientSignal);
}

#[test]
fn monitor_warms_up_before_evaluating() {
    let rules = default_rules();
    let mut monitor = SensorMonitor::new("smoker", rules.for_channel(SensorChannel::Smoker));
    let values = ["225", "220", "215", "212"];

    for (i, value) in values.iter().enumerate() {
        let raw = RawSample::new(format!("10/23/23 12:0{}:{:02}", i / 2, (i % 2) * 30), *value);
        assert!(monitor.ingest(&raw).expect("valid sample").is_none());
        assert_eq!(monitor.state(), MonitorState::WarmingUp);
    }

    let alert = monitor
        .ingest(&RawSample::new("10/23/23 12:02:00", "205"))
        .expect("valid sample")
        .expect("alert once the window fills");
    assert_eq!(monitor.state(), MonitorState::Active);
    assert_eq!(alert.sensor_name, "smoker");
}

#[test]
fn malformed_timestamp_is_rejected_without_touching_window() {
    let rules = default_rules();
    let mut monitor = SensorMonitor::new("food-A", rules.for_channel(SensorChannel::FoodA));

    assert!(monitor.ingest(&RawSample::new("yesterday", "150")).is_err());
    assert!(monitor.window().is_empty());
}

#[test]
fn fixture_smoker_drop_is_found() {
    let rows = read_rows(load_fixture("smoker-temps.csv")).expect("fixture parses");
    assert_eq!(rows.len(), 30);

    let rules = default_rules();
    let mut alerts = Vec::new();
    for channel in SensorChannel::ALL {
        let mut monitor = SensorMonitor::new(channel.name(), rules.for_channel(channel));
        for row in &rows {
            let raw = row.sample_for(channel);
            if raw.value.is_empty() {
                continue;
            }
            if let Some(alert) = monitor.ingest(&raw).expect("fixture timestamps are valid") {
                alerts.push(alert);
            }
        }
    }

    assert_eq!(alerts.len(), 3);
    assert!(alerts.iter().all(|a| a.sensor_name == "smoker"));
    assert_eq!(
        alerts[0].observed_at.format("%H:%M:%S").to_string(),
        "12:11:30"
    );
    assert!((alerts[0].first_value - 225.0).abs() < f64::EPSILON);
    assert!((alerts[0].last_value - 206.0).abs() < f64::EPSILON);
}
