pub mod channel;
pub mod csv_replay;
pub mod line;

use serde::Serialize;
use thiserror::Error;

use crate::domain::ports::source::SourceError;

pub use channel::{channel_feeds, ChannelSource, FeedRouter};
pub use csv_replay::CsvReplayFeed;
pub use line::LineFeed;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Route(#[from] SourceError),
}

/// What a feed did with its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub routed: usize,
    pub skipped: usize,
}
