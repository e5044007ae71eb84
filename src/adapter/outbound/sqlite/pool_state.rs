//! SQLite pool reserve view.
//!
//! Rows hold 6-decimal base units; snapshots are returned in whole
//! collateral units. Every call reads the row afresh.

use async_trait::async_trait;
use diesel::prelude::*;

use super::database::connection::DbPool;
use super::database::model::PoolLmsrRow;
use super::database::schema::pool_lmsr_data;
use crate::domain::money::from_signed_base_units;
use crate::domain::{PoolConfig, ReserveSnapshot};
use crate::error::PoolStateError;
use crate::port::outbound::pool_state::PoolStateGateway;

/// SQLite-backed [`PoolStateGateway`].
pub struct SqlitePoolStateGateway {
    pool: DbPool,
    decimals: u32,
}

impl SqlitePoolStateGateway {
    #[must_use]
    pub fn new(pool: DbPool, decimals: u32) -> Self {
        Self { pool, decimals }
    }

    fn load(pool: &DbPool, schema: &str, pool_id: u64) -> Result<Option<PoolLmsrRow>, PoolStateError> {
        let id = i64::try_from(pool_id).map_err(|_| PoolStateError::Malformed {
            schema: schema.to_string(),
            pool_id,
            reason: "pool id exceeds i64".into(),
        })?;
        let mut conn = pool
            .get()
            .map_err(|e| PoolStateError::Connection(e.to_string()))?;
        pool_lmsr_data::table
            .filter(pool_lmsr_data::schema_namespace.eq(schema))
            .filter(pool_lmsr_data::pool_id.eq(id))
            .select(PoolLmsrRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| PoolStateError::Connection(e.to_string()))
    }

    /// Convert a row, rejecting negative quantities.
    fn to_snapshot(&self, row: &PoolLmsrRow, pool_id: u64) -> Result<ReserveSnapshot, PoolStateError> {
        let malformed = |reason: String| PoolStateError::Malformed {
            schema: row.schema_namespace.clone(),
            pool_id,
            reason,
        };

        let net = |side: &str, minted: i64, burned: i64| {
            minted
                .checked_sub(burned)
                .ok_or_else(|| malformed(format!("{side} minted {minted} minus burned {burned} overflows")))
        };
        let supply_a = match row.yes_token_supply {
            Some(supply) => supply,
            None => net("yes", row.yes_tokens_minted, row.yes_tokens_burned)?,
        };
        let supply_b = match row.no_token_supply {
            Some(supply) => supply,
            None => net("no", row.no_tokens_minted, row.no_tokens_burned)?,
        };

        for (field, value) in [
            ("yes_usdc_initial_liquidity", row.yes_usdc_initial_liquidity),
            ("no_usdc_initial_liquidity", row.no_usdc_initial_liquidity),
            ("yes supply", supply_a),
            ("no supply", supply_b),
        ] {
            if value < 0 {
                return Err(malformed(format!("{field} is negative ({value})")));
            }
        }

        Ok(ReserveSnapshot::new(
            from_signed_base_units(row.yes_usdc_initial_liquidity, self.decimals),
            from_signed_base_units(row.no_usdc_initial_liquidity, self.decimals),
        )
        .with_supply(
            from_signed_base_units(supply_a, self.decimals),
            from_signed_base_units(supply_b, self.decimals),
        ))
    }
}

#[async_trait]
impl PoolStateGateway for SqlitePoolStateGateway {
    async fn fetch(&self, pool: &PoolConfig) -> Result<ReserveSnapshot, PoolStateError> {
        let pool_id = pool.pool_id.value();
        let schema = pool.schema_namespace.clone();
        let db = self.pool.clone();
        let lookup = schema.clone();
        let row = tokio::task::spawn_blocking(move || Self::load(&db, &lookup, pool_id))
            .await
            .map_err(|e| PoolStateError::Connection(e.to_string()))??;
        match row {
            Some(row) => self.to_snapshot(&row, pool_id),
            None => Err(PoolStateError::Missing { schema, pool_id }),
        }
    }
}
