//! Domain validation errors.
//!
//! Returned when raw values (usually decoded from the chain) violate a
//! domain invariant.

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A bytes32 value carried more significant bytes than fit in a `u64`.
    #[error("bytes32 value 0x{hex} does not fit in 64 bits")]
    Bytes32Overflow {
        /// Hex encoding of the offending value.
        hex: String,
    },

    /// Option index outside the binary outcome range.
    #[error("option index {index} is not a binary outcome (expected 0 or 1)")]
    InvalidOptionIndex { index: u64 },

    /// A hex string could not be parsed into a fixed-width id.
    #[error("invalid hex id '{value}': {reason}")]
    InvalidHex { value: String, reason: String },

    /// Slip market and marketplace lists differ in length.
    #[error("slip lists {marketplaces} marketplaces but {markets} markets")]
    MismatchedMarkets { marketplaces: usize, markets: usize },

    /// An amount could not be represented in collateral base units.
    #[error("amount {amount} cannot be represented in collateral base units")]
    UnrepresentableAmount { amount: String },
}
