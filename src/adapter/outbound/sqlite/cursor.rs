//! SQLite block cursor store.

use chrono::Utc;
use diesel::prelude::*;

use super::database::connection::DbPool;
use super::database::model::BlockCursorRow;
use super::database::schema::block_cursor;
use crate::error::{Error, Result};
use crate::port::outbound::cursor::BlockCursorStore;

pub struct SqliteBlockCursorStore {
    pool: DbPool,
}

impl SqliteBlockCursorStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl BlockCursorStore for SqliteBlockCursorStore {
    fn load(&self, name: &str) -> Result<Option<u64>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        let block: Option<i64> = block_cursor::table
            .filter(block_cursor::name.eq(name))
            .select(block_cursor::last_processed_block)
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        block
            .map(|b| u64::try_from(b).map_err(|_| Error::Database(format!("negative cursor {b} for {name}"))))
            .transpose()
    }

    fn save(&self, name: &str, block: u64) -> Result<()> {
        let block = i64::try_from(block).map_err(|_| Error::Database(format!("block {block} exceeds i64")))?;
        let row = BlockCursorRow {
            name: name.to_string(),
            last_processed_block: block,
            updated_at: Utc::now().to_rfc3339(),
        };
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        diesel::insert_into(block_cursor::table)
            .values(&row)
            .on_conflict(block_cursor::name)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }
}
