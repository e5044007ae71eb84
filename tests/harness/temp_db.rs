use diesel::prelude::*;

use bet_router::adapter::outbound::sqlite::database::connection::{connect, DbPool};
use bet_router::adapter::outbound::sqlite::database::model::PoolLmsrRow;
use bet_router::adapter::outbound::sqlite::database::schema::pool_lmsr_data;

/// Migrated SQLite pool store in a temporary directory.
pub struct TempDb {
    dir: tempfile::TempDir,
    url: String,
    pool: DbPool,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let url = dir
            .path()
            .join(format!("{name}.db"))
            .to_string_lossy()
            .into_owned();
        let pool = connect(&url).expect("open pool store");
        Self { dir, url, pool }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Insert fresh reserves, in collateral base units, with nothing traded.
    pub fn insert_reserves(&self, schema: &str, pool_id: i64, liquidity_a: i64, liquidity_b: i64) {
        self.insert(PoolLmsrRow {
            schema_namespace: schema.to_string(),
            pool_id,
            yes_tokens_minted: 0,
            yes_tokens_burned: 0,
            no_tokens_minted: 0,
            no_tokens_burned: 0,
            yes_usdc_initial_liquidity: liquidity_a,
            no_usdc_initial_liquidity: liquidity_b,
            yes_token_supply: None,
            no_token_supply: None,
        });
    }

    pub fn insert(&self, row: PoolLmsrRow) {
        let mut conn = self.pool.get().expect("get sqlite connection");
        diesel::insert_into(pool_lmsr_data::table)
            .values(&row)
            .execute(&mut conn)
            .expect("insert pool row");
    }
}
