use std::borrow::Cow;

use async_trait::async_trait;
use chrono::Local;
use colored::Colorize;

use crate::domain::ports::notifier::{NotificationError, Notifier};
use crate::domain::value_objects::sensor::SensorKind;

const SEPARATOR_WIDTH: usize = 70;

/// Prints alerts to stdout between separators.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    fn name(&self) -> &'static str {
        "terminal"
    }

    async fn notify(&self, message: &str) -> Result<(), NotificationError> {
        let separator = "\u{2500}".repeat(SEPARATOR_WIDTH);

        println!("\n{}", separator.dimmed());
        println!("{} {}", badge(message), Local::now().format("%H:%M:%S").to_string().dimmed());
        println!("{}", sanitize(message).bold());
        println!("{}\n", separator.dimmed());
        Ok(())
    }
}

fn badge(message: &str) -> String {
    if message.starts_with(SensorKind::Smoker.headline()) {
        format!(" {} SMOKER ", SensorKind::Smoker.emoji())
            .on_red()
            .white()
            .bold()
            .to_string()
    } else if message.starts_with(SensorKind::Food.headline()) {
        format!(" {} FOOD ", SensorKind::Food.emoji())
            .on_yellow()
            .black()
            .bold()
            .to_string()
    } else {
        " ALERT ".on_blue().white().to_string()
    }
}

/// Strip ANSI escape sequences and C0 control characters from a string,
/// preserving only printable content, newlines, and tabs.
fn sanitize(s: &str) -> Cow<'_, str> {
    if s.bytes()
        .any(|b| matches!(b, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F))
    {
        Cow::Owned(
            s.chars()
                .filter(|&c| !matches!(c as u32, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F))
                .collect(),
        )
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_escape_sequences() {
        assert_eq!(sanitize("a\x1b[31mb"), "a[31mb");
        assert!(matches!(sanitize("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn badge_follows_headline() {
        colored::control::set_override(false);
        assert!(badge("Smoker alert! smoker Alert: ...").contains("SMOKER"));
        assert!(badge("Food stall! food-A Alert: ...").contains("FOOD"));
        assert!(badge("something else").contains("ALERT"));
    }

    #[tokio::test]
    async fn notify_always_succeeds() {
        let notifier = TerminalNotifier::new();
        assert_eq!(notifier.name(), "terminal");
        assert!(notifier.notify("Smoker alert! test").await.is_ok());
    }
}
