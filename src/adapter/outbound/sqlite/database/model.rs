//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{block_cursor, pool_lmsr_data};

/// Database row for one pool's LMSR reserves.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = pool_lmsr_data)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PoolLmsrRow {
    pub schema_namespace: String,
    pub pool_id: i64,
    pub yes_tokens_minted: i64,
    pub yes_tokens_burned: i64,
    pub no_tokens_minted: i64,
    pub no_tokens_burned: i64,
    pub yes_usdc_initial_liquidity: i64,
    pub no_usdc_initial_liquidity: i64,
    pub yes_token_supply: Option<i64>,
    pub no_token_supply: Option<i64>,
}

/// Database row for a block cursor.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = block_cursor)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BlockCursorRow {
    pub name: String,
    pub last_processed_block: i64,
    pub updated_at: String,
}
