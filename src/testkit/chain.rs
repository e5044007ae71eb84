//! In-memory bet contract.
//!
//! Behaves like the deployed contract for the calls the orchestrator makes:
//! recording a proxied bet appends its id to the slip, status updates
//! overwrite the slip's ordinal. Every write is also appended to a log.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{BetSlip, BetSlipId, ChainEvent, ProxiedBet, ProxiedBetId};
use crate::error::{ChainError, Result};
use crate::port::outbound::chain::{ChainClient, TxReceipt};
use crate::port::outbound::cursor::BlockCursorStore;

/// One contract write, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainWrite {
    Status { bet_slip_id: BetSlipId, status: u8 },
    Placed(ProxiedBet),
    Sold {
        id: ProxiedBetId,
        shares_sold: u128,
        collateral_received: u128,
    },
}

#[derive(Default)]
pub struct FakeChain {
    head: AtomicU64,
    events: Mutex<Vec<ChainEvent>>,
    slips: Mutex<HashMap<BetSlipId, BetSlip>>,
    bets: Mutex<HashMap<ProxiedBetId, ProxiedBet>>,
    writes: Mutex<Vec<ChainWrite>>,
    event_queries: Mutex<Vec<(u64, u64)>>,
    fail_event_queries: AtomicBool,
    fail_writes: AtomicBool,
    tx_counter: AtomicUsize,
}

impl FakeChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slip(self, slip: BetSlip) -> Self {
        self.insert_slip(slip);
        self
    }

    pub fn with_bet(self, bet: ProxiedBet) -> Self {
        self.bets.lock().insert(bet.id, bet);
        self
    }

    pub fn insert_slip(&self, slip: BetSlip) {
        self.slips.lock().insert(slip.id, slip);
    }

    /// Emit an event and advance the head to its block.
    pub fn emit(&self, event: ChainEvent) {
        self.head.fetch_max(event.block(), Ordering::SeqCst);
        self.events.lock().push(event);
    }

    pub fn set_head(&self, block: u64) {
        self.head.store(block, Ordering::SeqCst);
    }

    pub fn fail_event_queries(&self, fail: bool) {
        self.fail_event_queries.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn slip(&self, id: BetSlipId) -> Option<BetSlip> {
        self.slips.lock().get(&id).cloned()
    }

    pub fn bet(&self, id: ProxiedBetId) -> Option<ProxiedBet> {
        self.bets.lock().get(&id).cloned()
    }

    pub fn writes(&self) -> Vec<ChainWrite> {
        self.writes.lock().clone()
    }

    /// Status ordinals written for `id`, in order.
    pub fn status_history(&self, id: BetSlipId) -> Vec<u8> {
        self.writes
            .lock()
            .iter()
            .filter_map(|w| match w {
                ChainWrite::Status { bet_slip_id, status } if *bet_slip_id == id => Some(*status),
                _ => None,
            })
            .collect()
    }

    pub fn event_queries(&self) -> Vec<(u64, u64)> {
        self.event_queries.lock().clone()
    }

    fn write(&self, entry: ChainWrite) -> Result<TxReceipt> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ChainError::Submit("scripted write failure".into()).into());
        }
        self.writes.lock().push(entry);
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        Ok(TxReceipt {
            tx_hash: format!("0x{n:064x}"),
            block_number: Some(self.head.load(Ordering::SeqCst)),
            gas_used: 21_000,
        })
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn latest_block(&self) -> Result<u64> {
        Ok(self.head.load(Ordering::SeqCst))
    }

    async fn events(&self, from: u64, to: u64) -> Result<Vec<ChainEvent>> {
        self.event_queries.lock().push((from, to));
        if self.fail_event_queries.load(Ordering::SeqCst) {
            return Err(ChainError::Read("scripted query failure".into()).into());
        }
        Ok(self
            .events
            .lock()
            .iter()
            .filter(|e| (from..=to).contains(&e.block()))
            .copied()
            .collect())
    }

    async fn bet_slip(&self, id: BetSlipId) -> Result<BetSlip> {
        self.slip(id)
            .ok_or_else(|| ChainError::Read(format!("bet slip {id} not found")).into())
    }

    async fn proxied_bet(&self, id: ProxiedBetId) -> Result<ProxiedBet> {
        self.bet(id)
            .ok_or_else(|| ChainError::Read(format!("proxied bet {id} not found")).into())
    }

    async fn update_bet_slip_status(&self, id: BetSlipId, status: u8) -> Result<TxReceipt> {
        let receipt = self.write(ChainWrite::Status {
            bet_slip_id: id,
            status,
        })?;
        if let Some(slip) = self.slips.lock().get_mut(&id) {
            slip.status = status;
        }
        Ok(receipt)
    }

    async fn record_proxied_bet_placed(&self, bet: &ProxiedBet) -> Result<TxReceipt> {
        let receipt = self.write(ChainWrite::Placed(bet.clone()))?;
        if let Some(slip) = self.slips.lock().get_mut(&bet.bet_slip_id) {
            slip.proxied_bet_ids.push(bet.id);
        }
        self.bets.lock().insert(bet.id, bet.clone());
        Ok(receipt)
    }

    async fn record_proxied_bet_sold(
        &self,
        id: ProxiedBetId,
        shares_sold: u128,
        collateral_received: u128,
    ) -> Result<TxReceipt> {
        let receipt = self.write(ChainWrite::Sold {
            id,
            shares_sold,
            collateral_received,
        })?;
        if let Some(bet) = self.bets.lock().get_mut(&id) {
            bet.shares_sold = shares_sold;
            bet.final_collateral = collateral_received;
        }
        Ok(receipt)
    }
}

/// Block cursor kept in memory.
#[derive(Default)]
pub struct MemoryCursorStore {
    cursors: Mutex<HashMap<String, u64>>,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: &str, block: u64) -> Self {
        self.cursors.lock().insert(name.to_string(), block);
        self
    }
}

impl BlockCursorStore for MemoryCursorStore {
    fn load(&self, name: &str) -> Result<Option<u64>> {
        Ok(self.cursors.lock().get(name).copied())
    }

    fn save(&self, name: &str, block: u64) -> Result<()> {
        self.cursors.lock().insert(name.to_string(), block);
        Ok(())
    }
}
