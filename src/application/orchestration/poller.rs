//! Block polling loop.
//!
//! Keeps a `last_processed_block` watermark and, each tick, queries both
//! event kinds over `(watermark, head]`. The watermark only moves after a
//! successful query, so a failed tick retries the same range.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::orchestrator::Orchestrator;
use crate::error::Result;
use crate::port::outbound::chain::ChainClient;
use crate::port::outbound::cursor::BlockCursorStore;

/// Cursor name for the bet contract's event stream.
pub const DEFAULT_CURSOR: &str = "bet_router";

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub poll_interval: Duration,
    /// First block to process when no cursor is stored.
    pub start_block: Option<u64>,
    pub cursor_name: String,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            start_block: None,
            cursor_name: DEFAULT_CURSOR.to_string(),
        }
    }
}

/// Result of one polling tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Range queried, `None` when the head had not moved.
    pub range: Option<(u64, u64)>,
    pub events: usize,
    /// Events whose slip could not be read.
    pub failed: usize,
}

pub struct EventPoller {
    chain: Arc<dyn ChainClient>,
    orchestrator: Arc<Orchestrator>,
    cursor: Arc<dyn BlockCursorStore>,
    config: PollerConfig,
    watermark: Option<u64>,
}

impl EventPoller {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        orchestrator: Arc<Orchestrator>,
        cursor: Arc<dyn BlockCursorStore>,
        config: PollerConfig,
    ) -> Self {
        Self {
            chain,
            orchestrator,
            cursor,
            config,
            watermark: None,
        }
    }

    pub fn watermark(&self) -> Option<u64> {
        self.watermark
    }

    /// Resolve the starting watermark: stored cursor, then the block before
    /// `start_block`, then the current head.
    ///
    /// # Errors
    ///
    /// Fails when the cursor store or the chain head cannot be read.
    pub async fn initialize(&mut self) -> Result<u64> {
        let watermark = match self.cursor.load(&self.config.cursor_name)? {
            Some(block) => {
                info!(block, cursor = %self.config.cursor_name, "Resuming from stored cursor");
                block
            }
            None => match self.config.start_block {
                Some(start) => start.saturating_sub(1),
                None => self.chain.latest_block().await?,
            },
        };
        self.watermark = Some(watermark);
        Ok(watermark)
    }

    /// Process every event between the watermark and the current head.
    ///
    /// # Errors
    ///
    /// A failed head read or event query is returned and leaves the
    /// watermark untouched.
    pub async fn tick(&mut self) -> Result<TickReport> {
        let watermark = match self.watermark {
            Some(block) => block,
            None => self.initialize().await?,
        };
        let head = self.chain.latest_block().await?;
        if head <= watermark {
            return Ok(TickReport::default());
        }

        let from = watermark + 1;
        let mut events = self.chain.events(from, head).await?;
        events.sort_by_key(|e| e.block());
        debug!(from, to = head, events = events.len(), "Events fetched");

        let mut failed = 0;
        for event in &events {
            if let Err(e) = self.orchestrator.handle(*event).await {
                warn!(event = %event, error = %e, "Event handling failed");
                failed += 1;
            }
        }

        self.watermark = Some(head);
        if let Err(e) = self.cursor.save(&self.config.cursor_name, head) {
            warn!(block = head, error = %e, "Failed to persist cursor");
        }

        Ok(TickReport {
            range: Some((from, head)),
            events: events.len(),
            failed,
        })
    }

    /// Poll until `shutdown` turns true or its sender is dropped.
    ///
    /// # Errors
    ///
    /// Only initialization failures are returned; tick failures are logged
    /// and retried.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let start = self.initialize().await?;
        info!(
            watermark = start,
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "Event poller started"
        );

        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Shutdown signal received");
                        break;
                    }
                }
                _ = interval.tick() => {
                    match self.tick().await {
                        Ok(report) if report.events > 0 => info!(
                            events = report.events,
                            failed = report.failed,
                            watermark = ?self.watermark,
                            "Tick processed"
                        ),
                        Ok(_) => {}
                        Err(e) => warn!(
                            watermark = ?self.watermark,
                            error = %e,
                            "Tick failed, retrying same range"
                        ),
                    }
                }
            }
        }

        info!(watermark = ?self.watermark, "Event poller stopped");
        Ok(())
    }
}
