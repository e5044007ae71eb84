//! Bet contract port.
//!
//! All writes share one signing identity. Callers must not issue writes
//! concurrently; nonces are read per transaction.

use async_trait::async_trait;

use crate::domain::{BetSlip, BetSlipId, ChainEvent, ProxiedBet, ProxiedBetId};
use crate::error::Result;

/// Summary of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Contract reads, event queries and signed writes.
///
/// Write methods resolve only once the transaction is mined with a
/// successful status; reverts and receipt timeouts are errors.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn latest_block(&self) -> Result<u64>;

    /// Both event kinds over `[from, to]`, in chain order.
    async fn events(&self, from: u64, to: u64) -> Result<Vec<ChainEvent>>;

    async fn bet_slip(&self, id: BetSlipId) -> Result<BetSlip>;

    async fn proxied_bet(&self, id: ProxiedBetId) -> Result<ProxiedBet>;

    async fn update_bet_slip_status(&self, id: BetSlipId, status: u8) -> Result<TxReceipt>;

    async fn record_proxied_bet_placed(&self, bet: &ProxiedBet) -> Result<TxReceipt>;

    async fn record_proxied_bet_sold(
        &self,
        id: ProxiedBetId,
        shares_sold: u128,
        collateral_received: u128,
    ) -> Result<TxReceipt>;
}
