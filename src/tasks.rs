//! Async task management for non-blocking option fetches.
//!
//! Remote option sources are resolved in background tasks so the UI stays
//! responsive. Results come back to the main event loop over a tokio channel.
//!
//! # Architecture
//!
//! 1. A control's `sync` returns a `FetchRequest` when its source changes
//! 2. The app hands the request to `TaskSpawner::spawn_resolve_options`
//! 3. The main loop keeps rendering and handling events
//! 4. When the fetch completes, a `SourceMessage` is sent through the channel
//! 5. The main loop polls the channel with `try_recv()` and routes the result
//!    back to the control, which drops it if a newer request superseded it

use tokio::sync::mpsc;
use tracing::debug;

use crate::form::SelectOption;
use crate::source::{FetchRequest, OptionClient, OptionSource, OptionSourceConfig, SourceError};

/// Messages sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum SourceMessage {
    /// A remote option fetch finished.
    OptionsResolved {
        /// Field whose control issued the request.
        field_id: String,
        /// Sequence number the request was issued with.
        seq: u64,
        /// Resolved options, or why the fetch failed.
        result: Result<Vec<SelectOption>, SourceError>,
    },
}

/// Spawns background fetches and reports their results.
#[derive(Debug, Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<SourceMessage>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<SourceMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a task that resolves a control's remote options.
    pub fn spawn_resolve_options(
        &self,
        client: &OptionClient,
        field_id: impl Into<String>,
        request: FetchRequest,
    ) {
        let tx = self.tx.clone();
        let client = client.clone();
        let field_id = field_id.into();
        let seq = request.seq;
        debug!(%field_id, seq, url = %request.url, "Spawning option fetch");
        tokio::spawn(async move {
            let config = OptionSourceConfig::Remote { url: request.url };
            let result = OptionSource::resolve(&client, &config).await;
            let _ = tx.send(SourceMessage::OptionsResolved {
                field_id,
                seq,
                result,
            });
        });
    }
}

/// Create a task channel pair.
///
/// Returns the receiver for the main loop and a spawner for issuing tasks.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<SourceMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_fetch_reports_back() {
        let (mut rx, spawner) = create_task_channel();
        let client = OptionClient::new().unwrap();

        spawner.spawn_resolve_options(
            &client,
            "tags",
            FetchRequest {
                seq: 3,
                url: "not a url".to_string(),
            },
        );

        match rx.recv().await {
            Some(SourceMessage::OptionsResolved {
                field_id,
                seq,
                result,
            }) => {
                assert_eq!(field_id, "tags");
                assert_eq!(seq, 3);
                assert!(matches!(result, Err(SourceError::InvalidUrl(_))));
            }
            None => panic!("Expected a message"),
        }
    }
}
