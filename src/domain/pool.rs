//! Pools, sides and raw reserve snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::MarketId;

/// One of the two binary outcomes of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Outcome A (YES), option index 0.
    A,
    /// Outcome B (NO), option index 1.
    B,
}

impl Side {
    /// Map a contract option index onto a side.
    ///
    /// # Errors
    ///
    /// Returns an error for anything other than 0 or 1.
    pub fn from_option_index(index: u64) -> Result<Self, DomainError> {
        match index {
            0 => Ok(Self::A),
            1 => Ok(Self::B),
            _ => Err(DomainError::InvalidOptionIndex { index }),
        }
    }

    #[must_use]
    pub const fn option_index(self) -> u8 {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" | "yes" | "0" => Ok(Self::A),
            "b" | "no" | "1" => Ok(Self::B),
            other => Err(format!("unknown side '{other}' (expected a|b)")),
        }
    }
}

/// Pricing model backing a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    #[default]
    Lmsr,
    OrderBook,
}

/// One AMM instance backing a logical market on one marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolConfig {
    pub pool_id: MarketId,
    /// Storage namespace of the marketplace deployment.
    pub schema_namespace: String,
    pub display_name: String,
    pub market_type: MarketType,
}

impl PoolConfig {
    pub fn new(
        pool_id: MarketId,
        schema_namespace: impl Into<String>,
        market_type: MarketType,
    ) -> Self {
        let schema_namespace = schema_namespace.into();
        Self {
            display_name: format!("{schema_namespace}/{pool_id}"),
            pool_id,
            schema_namespace,
            market_type,
        }
    }
}

impl fmt::Display for PoolConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// Point-in-time pool reserves in whole collateral units.
///
/// Never cached: the gateway re-reads it for every decision.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReserveSnapshot {
    pub initial_liquidity_a: f64,
    pub initial_liquidity_b: f64,
    pub current_supply_a: f64,
    pub current_supply_b: f64,
}

impl ReserveSnapshot {
    #[must_use]
    pub const fn new(liquidity_a: f64, liquidity_b: f64) -> Self {
        Self {
            initial_liquidity_a: liquidity_a,
            initial_liquidity_b: liquidity_b,
            current_supply_a: 0.0,
            current_supply_b: 0.0,
        }
    }

    #[must_use]
    pub const fn with_supply(mut self, supply_a: f64, supply_b: f64) -> Self {
        self.current_supply_a = supply_a;
        self.current_supply_b = supply_b;
        self
    }
}
