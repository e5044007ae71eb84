//! Recording marketplace adapter with scripted replies.
//!
//! Every call is appended to a log. Replies are scripted per endpoint; an
//! endpoint without a script answers `200 {}` for buys and sells.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::domain::MarketId;
use crate::error::{Error, ExecutionError, Result};
use crate::port::outbound::marketplace::{BuyOrder, MarketplaceClient, MarketplaceReply, SellOrder};

/// What kind of adapter call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Buy,
    Sell,
    Prices,
}

/// One logged adapter call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub endpoint: String,
    pub market_id: MarketId,
    pub option_index: Option<u8>,
    /// Collateral for buys, share count for sells, 0 for price reads.
    pub amount: f64,
}

#[derive(Debug, Clone)]
enum Script {
    Reply(MarketplaceReply),
    Transport(String),
}

#[derive(Default)]
pub struct ScriptedMarketplace {
    buys: Mutex<HashMap<String, Script>>,
    sells: Mutex<HashMap<String, Script>>,
    prices: Mutex<HashMap<(String, MarketId), Vec<f64>>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
}

impl ScriptedMarketplace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buy_reply(self, endpoint: &str, status: u16, body: Value) -> Self {
        self.buys
            .lock()
            .insert(endpoint.to_string(), Script::Reply(MarketplaceReply { status, body }));
        self
    }

    pub fn with_buy_transport_error(self, endpoint: &str, message: &str) -> Self {
        self.buys
            .lock()
            .insert(endpoint.to_string(), Script::Transport(message.to_string()));
        self
    }

    pub fn with_sell_reply(self, endpoint: &str, status: u16, body: Value) -> Self {
        self.sells
            .lock()
            .insert(endpoint.to_string(), Script::Reply(MarketplaceReply { status, body }));
        self
    }

    pub fn with_sell_transport_error(self, endpoint: &str, message: &str) -> Self {
        self.sells
            .lock()
            .insert(endpoint.to_string(), Script::Transport(message.to_string()));
        self
    }

    pub fn with_prices(self, endpoint: &str, market_id: MarketId, prices: Vec<f64>) -> Self {
        self.prices
            .lock()
            .insert((endpoint.to_string(), market_id), prices);
        self
    }

    /// Sleep before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn calls_of(&self, kind: CallKind) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.kind == kind)
            .cloned()
            .collect()
    }

    async fn answer(&self, script: Option<Script>) -> Result<MarketplaceReply> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match script {
            Some(Script::Reply(reply)) => Ok(reply),
            Some(Script::Transport(message)) => Err(Error::Execution(ExecutionError::Request(message))),
            None => Ok(MarketplaceReply {
                status: 200,
                body: json!({}),
            }),
        }
    }
}

#[async_trait]
impl MarketplaceClient for ScriptedMarketplace {
    async fn buy_shares(&self, endpoint: &str, order: &BuyOrder) -> Result<MarketplaceReply> {
        self.calls.lock().push(RecordedCall {
            kind: CallKind::Buy,
            endpoint: endpoint.to_string(),
            market_id: order.market_id,
            option_index: Some(order.option_index),
            amount: order.collateral_amount,
        });
        let script = self.buys.lock().get(endpoint).cloned();
        self.answer(script).await
    }

    async fn sell_shares(&self, endpoint: &str, order: &SellOrder) -> Result<MarketplaceReply> {
        self.calls.lock().push(RecordedCall {
            kind: CallKind::Sell,
            endpoint: endpoint.to_string(),
            market_id: order.market_id,
            option_index: Some(order.option_index),
            amount: order.amount as f64,
        });
        let script = self.sells.lock().get(endpoint).cloned();
        self.answer(script).await
    }

    async fn get_prices(&self, endpoint: &str, market_id: MarketId) -> Result<Vec<f64>> {
        self.calls.lock().push(RecordedCall {
            kind: CallKind::Prices,
            endpoint: endpoint.to_string(),
            market_id,
            option_index: None,
            amount: 0.0,
        });
        self.prices
            .lock()
            .get(&(endpoint.to_string(), market_id))
            .cloned()
            .ok_or_else(|| {
                Error::Execution(ExecutionError::Request(format!(
                    "no prices for {endpoint}/{market_id}"
                )))
            })
    }
}
