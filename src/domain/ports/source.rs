use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::sample::RawSample;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("sample feed disconnected: {0}")]
    Disconnected(String),
}

/// Ordered feed of readings for a single sensor channel.
#[async_trait]
pub trait SampleSource: Send {
    /// Wait for the next reading. `Ok(None)` marks the end of the feed.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the underlying transport fails.
    async fn next_sample(&mut self) -> Result<Option<RawSample>, SourceError>;
}
