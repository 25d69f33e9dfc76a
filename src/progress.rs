//! Progress events and the single-observer channel that carries them.
//!
//! A session sends any number of `progress` events followed by exactly one
//! terminal event. The terminal methods consume the publisher, which drops
//! the sender and closes the channel.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{ScrapeError, ScrapeResult};
use crate::models::Episode;

/// Message sent to the observer of a scrape session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// Full result sequence after an aggregation step.
    Progress { episodes: Vec<Episode> },
    /// The session finished successfully.
    Complete,
    /// The session failed.
    Error { error: String },
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProgressEvent::Progress { .. })
    }
}

/// Sending half, owned by the session.
#[derive(Debug)]
pub struct ProgressPublisher {
    tx: mpsc::Sender<ProgressEvent>,
}

/// Receiving half, owned by the observer.
pub type ProgressReceiver = mpsc::Receiver<ProgressEvent>;

/// Create a bounded progress channel.
pub fn channel(capacity: usize) -> (ProgressPublisher, ProgressReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ProgressPublisher { tx }, rx)
}

impl ProgressPublisher {
    /// Publish the current result sequence.
    pub async fn progress(&self, episodes: &[Episode]) -> ScrapeResult<()> {
        self.tx
            .send(ProgressEvent::Progress {
                episodes: episodes.to_vec(),
            })
            .await
            .map_err(|_| ScrapeError::Cancelled)
    }

    /// Publish the `complete` event and close the channel.
    pub async fn complete(self) {
        let _ = self.tx.send(ProgressEvent::Complete).await;
    }

    /// Publish the `error` event and close the channel.
    pub async fn fail(self, message: impl Into<String>) {
        let _ = self
            .tx
            .send(ProgressEvent::Error {
                error: message.into(),
            })
            .await;
    }

    /// Resolves once the observer has dropped its receiver.
    pub async fn closed(&self) {
        self.tx.closed().await
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
