//! Persisted polling watermark.

use crate::error::Result;

/// Stores the last fully processed block per named cursor.
pub trait BlockCursorStore: Send + Sync {
    fn load(&self, name: &str) -> Result<Option<u64>>;

    fn save(&self, name: &str, block: u64) -> Result<()>;
}
