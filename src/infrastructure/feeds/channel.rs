use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::entities::sample::RawSample;
use crate::domain::ports::source::{SampleSource, SourceError};
use crate::domain::value_objects::sensor::SensorChannel;

/// Receiving end of one channel's queue.
pub struct ChannelSource {
    rx: mpsc::Receiver<RawSample>,
}

#[async_trait]
impl SampleSource for ChannelSource {
    async fn next_sample(&mut self) -> Result<Option<RawSample>, SourceError> {
        Ok(self.rx.recv().await)
    }
}

/// Sending side: one bounded queue per sensor channel. Dropping the router
/// ends every lane's feed.
#[derive(Clone)]
pub struct FeedRouter {
    senders: HashMap<SensorChannel, mpsc::Sender<RawSample>>,
}

impl FeedRouter {
    /// Routes a reading to its channel's queue, waiting while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Disconnected` if the lane for `channel` has gone away.
    pub async fn route(&self, channel: SensorChannel, sample: RawSample) -> Result<(), SourceError> {
        let sender = self
            .senders
            .get(&channel)
            .ok_or_else(|| SourceError::Disconnected(format!("no queue for {channel}")))?;
        sender
            .send(sample)
            .await
            .map_err(|_| SourceError::Disconnected(format!("{channel} lane closed")))
    }
}

/// Creates the router and one source per channel, in channel order.
#[must_use]
pub fn channel_feeds(capacity: usize) -> (FeedRouter, Vec<(SensorChannel, ChannelSource)>) {
    let mut senders = HashMap::new();
    let mut sources = Vec::with_capacity(SensorChannel::ALL.len());
    for channel in SensorChannel::ALL {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        senders.insert(channel, tx);
        sources.push((channel, ChannelSource { rx }));
    }
    (FeedRouter { senders }, sources)
}
