pub mod alert_fmt;
pub mod rules_fmt;
