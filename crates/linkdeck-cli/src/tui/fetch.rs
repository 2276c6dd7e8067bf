//! Background favicon fetching
//!
//! Favicon resolution hits the network, so the TUI runs it on a
//! separate task and applies the result whenever it arrives.

use linkdeck_core::Config;
use tokio::sync::mpsc;
use tracing::debug;

use crate::favicon;

/// Event sent back when a favicon fetch finishes
#[derive(Debug)]
pub enum FaviconEvent {
    Resolved {
        bookmark_id: String,
        favicon: String,
        title: Option<String>,
    },
}

/// Handle to the favicon fetch channel
///
/// Holds a sender for the lifetime of the TUI, so the receiver stays
/// open even when no fetch is in flight.
pub struct FetchHandle {
    pub event_rx: mpsc::Receiver<FaviconEvent>,
    event_tx: mpsc::Sender<FaviconEvent>,
    enabled: bool,
}

impl FetchHandle {
    pub fn new(config: &Config) -> Self {
        let (event_tx, event_rx) = mpsc::channel(16);
        Self {
            event_rx,
            event_tx,
            enabled: config.fetch_favicons,
        }
    }

    /// Spawn a fetch for one bookmark; the result arrives on `event_rx`
    ///
    /// Returns false without spawning when fetching is disabled.
    pub fn spawn(&self, bookmark_id: String, url: String) -> bool {
        if !self.enabled {
            return false;
        }

        debug!("Fetching favicon for {} ({})", bookmark_id, url);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let info = favicon::fetch_page_info(&url).await;
            let _ = tx
                .send(FaviconEvent::Resolved {
                    bookmark_id,
                    favicon: info.favicon,
                    title: info.title,
                })
                .await;
        });

        true
    }
}
