use colored::Colorize;

use crate::application::services::lane::LaneReport;
use crate::domain::entities::alert::AlertEvent;
use crate::domain::value_objects::sensor::SensorKind;

fn kind_badge(kind: SensorKind) -> String {
    let label = format!(" {} {} ", kind.emoji(), kind.headline());
    match kind {
        SensorKind::Smoker => format!("{}", label.on_red().white().bold()),
        SensorKind::Food => format!("{}", label.on_yellow().black().bold()),
    }
}

/// One line per alert: badge, sensor, time, change and window span.
#[must_use]
pub fn format_alert_line(alert: &AlertEvent) -> String {
    format!(
        "{} {} at {}: {:.1}\u{b0}F \u{2192} {:.1}\u{b0}F ({:.1}\u{b0}F in {:.2} min, threshold {}\u{b0}F / {} min)",
        kind_badge(alert.kind),
        alert.sensor_name.bold(),
        alert.observed_at.format("%m/%d/%y %H:%M:%S"),
        alert.first_value,
        alert.last_value,
        alert.delta(),
        alert.elapsed_minutes,
        alert.threshold,
        alert.max_elapsed_minutes,
    )
}

pub fn format_alerts(alerts: &[AlertEvent]) {
    for alert in alerts {
        println!("{}", format_alert_line(alert));
    }
    println!();
}

pub fn print_no_alerts() {
    println!();
    println!("{}", "\u{2705} No alerts, the cook looks steady".green().bold());
    println!();
}

/// Per-sensor summary table of a finished run.
#[must_use]
pub fn format_report_table(reports: &[LaneReport]) -> String {
    let header = format!(
        "{:<8} {:>9} {:>10} {:>13} {:>7} {:>11}",
        "SENSOR", "INGESTED", "MALFORMED", "NO-SIGNAL", "ALERTS", "NOTIFY-ERR"
    );
    let separator = "\u{2500}".repeat(header.len());
    let mut rows = vec![header, separator];

    for r in reports {
        let row = format!(
            "{:<8} {:>9} {:>10} {:>13} {:>7} {:>11}",
            r.sensor,
            r.ingested,
            r.malformed,
            r.insufficient_signal,
            r.alerts_raised,
            r.dispatch_failures
        );
        if r.source_error.is_some() || r.dispatch_failures > 0 {
            rows.push(row.red().to_string());
        } else if r.alerts_raised == 0 {
            rows.push(row);
        } else {
            rows.push(row.yellow().to_string());
        }
    }

    rows.join("\n")
}
