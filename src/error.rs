use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::id::MarketplaceId;

/// Configuration-related errors. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("contract ABI at {path}: {reason}")]
    Abi { path: String, reason: String },

    #[error("{0}")]
    Other(String),
}

/// A pool's reserve snapshot could not be read.
#[derive(Error, Debug, Clone)]
pub enum PoolStateError {
    #[error("no reserve data for pool {pool_id} in {schema}")]
    Missing { schema: String, pool_id: u64 },

    #[error("malformed reserve data for pool {pool_id} in {schema}: {reason}")]
    Malformed {
        schema: String,
        pool_id: u64,
        reason: String,
    },

    #[error("pool store unavailable: {0}")]
    Connection(String),
}

/// Pricing engine input errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("non-positive liquidity: a={liquidity_a}, b={liquidity_b}")]
    NonPositiveLiquidity { liquidity_a: f64, liquidity_b: f64 },

    #[error("invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("no quote available for {pool}")]
    MissingQuote { pool: String },
}

/// Allocation optimizer errors.
#[derive(Error, Debug, Clone)]
pub enum OptimizationError {
    #[error("no pools to allocate across")]
    NoPools,

    #[error("{strategy} strategy requires exactly 2 pools, got {pools}")]
    RequiresTwoPools { strategy: &'static str, pools: usize },

    #[error("{strategy} strategy requires at least 2 pools, got {pools}")]
    RequiresAtLeastTwoPools { strategy: &'static str, pools: usize },

    #[error("constrained optimization requested but no solver is configured")]
    SolverUnavailable,

    #[error("failed to evaluate pool {pool}: {reason}")]
    PoolEvaluation { pool: String, reason: String },

    #[error("no candidate allocation could be evaluated")]
    NoFeasibleCombination,

    #[error("total amount must be positive, got {0}")]
    NonPositiveBudget(f64),

    #[error("solver failed: {0}")]
    Solver(String),
}

/// Bet execution errors. Individual order failures are not errors; they
/// surface as failed responses inside the execution result.
#[derive(Error, Debug, Clone)]
pub enum ExecutionError {
    #[error("all allocations below minimum bet amount {minimum}")]
    AllBelowMinimum { minimum: f64 },

    #[error("marketplace request failed: {0}")]
    Request(String),
}

/// Marketplace registry lookups and validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no schema mapped for marketplace {0}")]
    UnknownMarketplace(MarketplaceId),

    #[error("no endpoint mapped for schema '{0}'")]
    UnknownSchema(String),

    #[error("no marketplace mapped for endpoint '{0}'")]
    UnknownEndpoint(String),

    #[error("duplicate {field} '{value}' in marketplace registry")]
    Duplicate { field: &'static str, value: String },
}

/// On-chain read and write failures.
#[derive(Error, Debug, Clone)]
pub enum ChainError {
    #[error("chain read failed: {0}")]
    Read(String),

    #[error("failed to decode contract data: {0}")]
    Decode(String),

    #[error("transaction submission failed: {0}")]
    Submit(String),

    #[error("transaction {tx_hash} not mined within {timeout_secs}s")]
    Timeout { tx_hash: String, timeout_secs: u64 },

    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("insufficient balance for gas: need {needed}, have {available}")]
    InsufficientGas { needed: u128, available: u128 },

    #[error("refusing to write: {0}")]
    InvalidRecord(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    PoolState(#[from] PoolStateError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Optimization(#[from] OptimizationError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, Error>;
