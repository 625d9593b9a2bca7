use serde::Serialize;

use crate::domain::rules::RuleSet;

#[derive(Debug, Serialize)]
pub struct RuleRow {
    pub sensor: &'static str,
    pub rule: String,
    pub window_capacity: usize,
    pub delta_threshold: f64,
    pub max_elapsed_minutes: f64,
}

#[must_use]
pub fn rule_rows(rules: &RuleSet) -> Vec<RuleRow> {
    rules
        .by_channel()
        .into_iter()
        .map(|(channel, rule)| RuleRow {
            sensor: channel.name(),
            rule: rule.name().to_string(),
            window_capacity: rule.window_capacity(),
            delta_threshold: rule.delta_threshold(),
            max_elapsed_minutes: rule.max_elapsed_minutes(),
        })
        .collect()
}

/// Aligned table of the rule applied to each sensor channel.
#[must_use]
pub fn format_rules_table(rules: &RuleSet) -> String {
    let header = format!(
        "{:<8} {:<8} {:>7} {:>14} {:>13}",
        "SENSOR", "RULE", "WINDOW", "THRESHOLD(\u{b0}F)", "MAX-ELAPSED"
    );
    let separator = "\u{2500}".repeat(header.chars().count());
    let mut rows = vec![header, separator];

    for row in rule_rows(rules) {
        rows.push(format!(
            "{:<8} {:<8} {:>7} {:>14.1} {:>9.1} min",
            row.sensor, row.rule, row.window_capacity, row.delta_threshold, row.max_elapsed_minutes
        ));
    }

    rows.join("\n")
}
