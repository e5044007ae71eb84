//! Adapter request bodies.
//!
//! ```json
//! {"marketId":10,"optionIndex":0,"collateralAmount":50.0}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::port::outbound::marketplace::{BuyOrder, SellOrder};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuySharesRequest {
    pub market_id: u64,
    pub option_index: u8,
    pub collateral_amount: f64,
}

impl From<&BuyOrder> for BuySharesRequest {
    fn from(order: &BuyOrder) -> Self {
        Self {
            market_id: order.market_id.value(),
            option_index: order.option_index,
            collateral_amount: order.collateral_amount,
        }
    }
}

/// Share counts can exceed `u64`; the amount is sent as a decimal string
/// when it would lose precision as a JSON number.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellSharesRequest {
    pub market_id: u64,
    pub option_index: u8,
    pub amount: Value,
}

impl From<&SellOrder> for SellSharesRequest {
    fn from(order: &SellOrder) -> Self {
        let amount = u64::try_from(order.amount)
            .map_or_else(|_| Value::String(order.amount.to_string()), Value::from);
        Self {
            market_id: order.market_id.value(),
            option_index: order.option_index,
            amount,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPricesRequest {
    pub market_id: u64,
}

/// `get-prices` answers either a bare array or an object wrapping one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PricesResponse {
    List(Vec<f64>),
    Wrapped { prices: Vec<f64> },
}

impl PricesResponse {
    pub fn into_prices(self) -> Vec<f64> {
        match self {
            Self::List(prices) | Self::Wrapped { prices } => prices,
        }
    }
}
