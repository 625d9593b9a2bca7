use crate::domain::rules::RuleSet;
use crate::presentation::cli::formatters::rules_fmt::{format_rules_table, rule_rows};

/// Print the rule each sensor channel is evaluated against.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run_rules(rules: &RuleSet, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&rule_rows(rules))?);
    } else {
        println!("{}", format_rules_table(rules));
    }
    Ok(())
}
