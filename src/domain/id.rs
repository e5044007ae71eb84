//! Identifier newtypes.
//!
//! Marketplace and market ids travel on-chain as `bytes32` big-endian
//! integers; bet slip ids are `uint256` counters. Both fit comfortably in
//! 64 bits for every deployed contract, and decoding rejects anything wider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;

/// Decode a big-endian `bytes32` into a `u64`.
///
/// # Errors
///
/// Returns [`DomainError::Bytes32Overflow`] when any of the leading 24 bytes
/// is non-zero.
pub fn u64_from_bytes32(bytes: &[u8; 32]) -> Result<u64, DomainError> {
    if bytes[..24].iter().any(|b| *b != 0) {
        return Err(DomainError::Bytes32Overflow {
            hex: encode_hex(bytes),
        });
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&bytes[24..]);
    Ok(u64::from_be_bytes(tail))
}

/// Encode a `u64` as a big-endian `bytes32`.
#[must_use]
pub fn u64_to_bytes32(value: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&value.to_be_bytes());
    out
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(self) -> u64 {
                self.0
            }

            /// Decode from an on-chain `bytes32`.
            ///
            /// # Errors
            ///
            /// Returns an error when the value does not fit in 64 bits.
            pub fn from_bytes32(bytes: &[u8; 32]) -> Result<Self, DomainError> {
                u64_from_bytes32(bytes).map(Self)
            }

            #[must_use]
            pub fn to_bytes32(self) -> [u8; 32] {
                u64_to_bytes32(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id!(
    /// Bet slip identifier assigned by the contract.
    BetSlipId
);
numeric_id!(
    /// Marketplace identifier (one per AMM deployment family).
    MarketplaceId
);
numeric_id!(
    /// Market identifier within a marketplace. Doubles as the pool id.
    MarketId
);

/// Opaque 256-bit proxied bet identifier.
///
/// Fresh ids are a random v4 UUID left-aligned and zero-padded to 32 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxiedBetId([u8; 32]);

impl ProxiedBetId {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random id.
    #[must_use]
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(Uuid::new_v4().as_bytes());
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First four bytes in hex, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        encode_hex(&self.0[..4])
    }
}

impl fmt::Display for ProxiedBetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", encode_hex(&self.0))
    }
}

impl fmt::Debug for ProxiedBetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProxiedBetId({self})")
    }
}

impl FromStr for ProxiedBetId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix("0x").unwrap_or(s);
        let invalid = |reason: &str| DomainError::InvalidHex {
            value: s.to_string(),
            reason: reason.to_string(),
        };
        if hex.len() != 64 {
            return Err(invalid("expected 64 hex characters"));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).map_err(|_| invalid("not ascii"))?;
            bytes[i] = u8::from_str_radix(pair, 16).map_err(|_| invalid("not hex"))?;
        }
        Ok(Self(bytes))
    }
}
