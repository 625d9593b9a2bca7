use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::entities::sample::RawSample;
use crate::domain::value_objects::sensor::SensorChannel;

use super::channel::FeedRouter;
use super::{FeedError, FeedStats};

/// One row of the thermometer export: timestamp plus one cell per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub timestamp: String,
    pub cells: [String; 3],
}

impl CsvRow {
    /// The cell for `channel`, as a raw sample.
    #[must_use]
    pub fn sample_for(&self, channel: SensorChannel) -> RawSample {
        RawSample::new(
            self.timestamp.clone(),
            self.cells[channel.cell_index()].clone(),
        )
    }
}

/// Reads `Time, Smoker, Food A, Food B` rows. The header row is skipped and
/// short rows get empty cells.
///
/// # Errors
///
/// Returns `FeedError::Csv` when the input is not valid CSV.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<CsvRow>, FeedError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let cell = |i: usize| record.get(i).unwrap_or_default().to_string();
        let timestamp = cell(0);
        if timestamp.is_empty() {
            continue;
        }
        rows.push(CsvRow {
            timestamp,
            cells: [cell(1), cell(2), cell(3)],
        });
    }
    Ok(rows)
}

/// Replays a thermometer CSV export into the per-channel queues at a fixed
/// pace, like the live thermometer would.
pub struct CsvReplayFeed {
    path: PathBuf,
    interval: Duration,
    keep_gaps: bool,
}

impl CsvReplayFeed {
    #[must_use]
    pub fn new(path: impl AsRef<Path>, interval: Duration, keep_gaps: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            interval,
            keep_gaps,
        }
    }

    /// Loads the whole file, then routes row by row. Consumes the router so
    /// the lanes see end-of-feed once the last row is sent.
    ///
    /// # Errors
    ///
    /// Returns `FeedError` if the file cannot be opened or parsed, or a lane
    /// disappears mid-replay.
    pub async fn run(self, router: FeedRouter) -> Result<FeedStats, FeedError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FeedError::Open {
                path: self.path.display().to_string(),
                source,
            })?;
        let rows = read_rows(bytes.as_slice())?;
        tracing::info!(
            "Replaying {} row(s) from {}",
            rows.len(),
            self.path.display()
        );
        replay_rows(&rows, &router, self.interval, self.keep_gaps).await
    }
}

/// Routes each row's cells to their channels, sleeping `interval` between rows.
/// Empty cells are dropped unless `keep_gaps` is set.
///
/// # Errors
///
/// Returns `FeedError::Route` if a lane has gone away.
pub async fn replay_rows(
    rows: &[CsvRow],
    router: &FeedRouter,
    interval: Duration,
    keep_gaps: bool,
) -> Result<FeedStats, FeedError> {
    let mut stats = FeedStats::default();
    for (i, row) in rows.iter().enumerate() {
        if i > 0 && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
        for channel in SensorChannel::ALL {
            let sample = row.sample_for(channel);
            if sample.value.is_empty() && !keep_gaps {
                stats.skipped += 1;
                continue;
            }
            router.route(channel, sample).await?;
            stats.routed += 1;
        }
        tracing::debug!(
            timestamp = %row.timestamp,
            smoker = %row.cells[0],
            food_a = %row.cells[1],
            food_b = %row.cells[2],
            "row sent"
        );
    }
    Ok(stats)
}
