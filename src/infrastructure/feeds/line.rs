use std::io::BufRead;

use tokio::sync::mpsc;

use crate::domain::entities::sample::RawSample;
use crate::domain::value_objects::sensor::SensorChannel;

use super::channel::FeedRouter;
use super::{FeedError, FeedStats};

/// Reads `channel,timestamp,value` lines (e.g. from stdin) and routes each
/// reading to its channel. Blank lines and `#` comments are ignored.
///
/// Lines are read on their own OS thread and handed over a bounded queue.
/// Dropping the feed never waits on that thread, so a read that blocks
/// forever cannot keep the process alive after shutdown.
pub struct LineFeed {
    lines: mpsc::Receiver<std::io::Result<String>>,
}

impl LineFeed {
    /// Start the reader thread over `reader`.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::Io` if the thread cannot be spawned.
    pub fn spawn<R: BufRead + Send + 'static>(reader: R, capacity: usize) -> Result<Self, FeedError> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        std::thread::Builder::new()
            .name("pitwatch-lines".into())
            .spawn(move || {
                for line in reader.lines() {
                    let failed = line.is_err();
                    if tx.blocking_send(line).is_err() || failed {
                        break;
                    }
                }
            })?;
        Ok(Self { lines: rx })
    }

    /// # Errors
    ///
    /// Same as [`LineFeed::spawn`].
    pub fn stdin(capacity: usize) -> Result<Self, FeedError> {
        Self::spawn(std::io::BufReader::new(std::io::stdin()), capacity)
    }

    /// # Errors
    ///
    /// Returns `FeedError` if the input cannot be read or a lane has gone away.
    pub async fn run(mut self, router: FeedRouter) -> Result<FeedStats, FeedError> {
        let mut stats = FeedStats::default();

        while let Some(line) = self.lines.recv().await {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match parse_line(trimmed) {
                Some((channel, sample)) => {
                    router.route(channel, sample).await?;
                    stats.routed += 1;
                }
                None => {
                    tracing::warn!("ignoring unreadable line: {trimmed}");
                    stats.skipped += 1;
                }
            }
        }
        Ok(stats)
    }
}

/// Splits `channel,timestamp,value`; the value may be missing or empty.
#[must_use]
pub fn parse_line(line: &str) -> Option<(SensorChannel, RawSample)> {
    let (channel, body) = line.split_once(',')?;
    let channel = channel.parse::<SensorChannel>().ok()?;
    Some((channel, RawSample::from_body(body)))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::ports::source::SampleSource;
    use crate::infrastructure::feeds::channel::channel_feeds;

    #[test]
    fn parse_line_reads_channel_and_body() {
        let (channel, sample) = parse_line("food-B,10/23/23 12:00:00,70.5").expect("line");
        assert_eq!(channel, SensorChannel::FoodB);
        assert_eq!(sample, RawSample::new("10/23/23 12:00:00", "70.5"));
    }

    #[test]
    fn parse_line_tolerates_missing_value() {
        let (_, sample) = parse_line("smoker,10/23/23 12:00:00").expect("line");
        assert_eq!(sample.value, "");
    }

    #[test]
    fn parse_line_rejects_unknown_channel() {
        assert!(parse_line("grill,10/23/23 12:00:00,500").is_none());
        assert!(parse_line("smoker").is_none());
    }

    #[tokio::test]
    async fn run_routes_and_skips() {
        let input = "\
# session 1
smoker,10/23/23 12:00:00,225

food-A,10/23/23 12:00:00,None
oven,10/23/23 12:00:00,400
";
        let (router, mut sources) = channel_feeds(8);
        let stats = LineFeed::spawn(std::io::Cursor::new(input), 4)
            .expect("reader thread")
            .run(router)
            .await
            .expect("run");
        assert_eq!(stats, FeedStats { routed: 2, skipped: 1 });

        let (_, food_a) = &mut sources[1];
        let sample = food_a.next_sample().await.expect("read").expect("sample");
        assert_eq!(sample.value, "None");
    }

    struct BrokenReader;

    impl std::io::Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("device gone"))
        }
    }

    #[tokio::test]
    async fn read_error_ends_the_feed() {
        let (router, _sources) = channel_feeds(1);
        let err = LineFeed::spawn(std::io::BufReader::new(BrokenReader), 1)
            .expect("reader thread")
            .run(router)
            .await
            .expect_err("read error");
        assert!(matches!(err, FeedError::Io(_)));
    }
}
