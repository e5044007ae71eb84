//! Reading share and collateral counts out of adapter replies.
//!
//! Adapter deployments disagree on field names, so each value is looked up
//! through a fallback chain. Numbers may arrive as JSON numbers or numeric
//! strings; fractional counts are truncated.

use serde_json::Value;

/// Field names tried, in order, for shares bought.
pub const SHARE_FIELDS: [&str; 8] = [
    "sharesMinted",
    "shares",
    "sharesBought",
    "shares_bought",
    "sharesReceived",
    "shares_received",
    "amount",
    "quantity",
];

/// Field name for collateral returned by a sale.
pub const COLLATERAL_FIELD: &str = "collateralReceived";

/// A count read from a reply, or an estimate when the reply had none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extracted<T> {
    pub value: T,
    pub estimated: bool,
}

/// Shares bought according to a buy reply.
///
/// Falls back to the collateral spent, truncated to whole units, when no
/// field holds a positive count.
pub fn shares_bought(body: &Value, collateral_amount: f64) -> Extracted<u128> {
    let found = SHARE_FIELDS
        .iter()
        .filter_map(|field| body.get(field).and_then(as_f64))
        .find(|v| *v > 0.0)
        .map(|v| v.trunc() as u128)
        .filter(|v| *v > 0);

    match found {
        Some(value) => Extracted {
            value,
            estimated: false,
        },
        None => Extracted {
            value: collateral_amount.max(0.0).trunc() as u128,
            estimated: true,
        },
    }
}

/// Collateral returned by a sell reply, in whole units.
///
/// Falls back to one unit per share sold.
pub fn collateral_received(body: &Value, shares_sold: u128) -> Extracted<f64> {
    match body.get(COLLATERAL_FIELD).and_then(as_f64).filter(|v| *v > 0.0) {
        Some(value) => Extracted {
            value,
            estimated: false,
        },
        None => Extracted {
            value: shares_sold as f64,
            estimated: true,
        },
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primary_field_wins() {
        let got = shares_bought(&json!({"sharesMinted": 120, "shares": 5}), 100.0);
        assert_eq!(got, Extracted { value: 120, estimated: false });
    }

    #[test]
    fn zero_falls_through_to_next_field() {
        let got = shares_bought(&json!({"sharesMinted": 0, "sharesBought": "42.9"}), 100.0);
        assert_eq!(got.value, 42);
        assert!(!got.estimated);
    }

    #[test]
    fn missing_shares_are_estimated_from_collateral() {
        let got = shares_bought(&json!({"transactionId": "0xabc"}), 49.7);
        assert_eq!(got, Extracted { value: 49, estimated: true });
    }

    #[test]
    fn non_numeric_strings_are_ignored() {
        let got = shares_bought(&json!({"shares": "lots", "quantity": 3}), 10.0);
        assert_eq!(got.value, 3);
    }

    #[test]
    fn collateral_falls_back_to_share_count() {
        assert_eq!(
            collateral_received(&json!({"collateralReceived": 3.536336}), 7),
            Extracted { value: 3.536336, estimated: false }
        );
        assert_eq!(
            collateral_received(&json!({}), 7),
            Extracted { value: 7.0, estimated: true }
        );
    }
}
