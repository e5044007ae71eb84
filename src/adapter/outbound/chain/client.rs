//! Alloy-backed [`ChainClient`].
//!
//! Every write reads the nonce and gas price, checks the signer can pay for
//! the gas limit, submits with explicit values and waits for the receipt.
//! Writes must not be issued concurrently.

use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{Address, FixedBytes, U256};
use alloy_provider::network::ReceiptResponse;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{debug, info};

use super::contract::{self, EventKind, EventLog, PolyBet};
use super::settings::ChainConfig;
use crate::domain::{BetSlip, BetSlipId, ChainEvent, ProxiedBet, ProxiedBetId};
use crate::error::{ChainError, ConfigError, Result};
use crate::port::outbound::chain::{ChainClient, TxReceipt};

type Contract = PolyBet::PolyBetInstance<DynProvider>;

pub struct AlloyChainClient {
    provider: DynProvider,
    contract: Contract,
    /// `None` for read-only clients.
    signer: Option<Address>,
    receipt_timeout: Duration,
    record_gas_limit: u64,
    status_gas_limit: u64,
}

fn parse_rpc(config: &ChainConfig) -> Result<url::Url> {
    if config.rpc_url.trim().is_empty() {
        return Err(ConfigError::MissingField { field: "chain.rpc_url" }.into());
    }
    config.rpc_url.parse().map_err(|e: url::ParseError| {
        ConfigError::InvalidValue {
            field: "chain.rpc_url",
            reason: e.to_string(),
        }
        .into()
    })
}

fn parse_address(config: &ChainConfig) -> Result<Address> {
    Address::from_str(config.contract_address.trim()).map_err(|e| {
        ConfigError::InvalidValue {
            field: "chain.contract_address",
            reason: e.to_string(),
        }
        .into()
    })
}

impl AlloyChainClient {
    /// Signing client used by the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the key, RPC URL or contract address is invalid.
    pub fn connect(config: &ChainConfig) -> Result<Self> {
        let key = config
            .private_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingField {
                field: "BET_ROUTER_PRIVATE_KEY",
            })?;
        let signer = PrivateKeySigner::from_str(key.trim()).map_err(|e| ConfigError::InvalidValue {
            field: "BET_ROUTER_PRIVATE_KEY",
            reason: e.to_string(),
        })?;
        let address = signer.address();
        let wallet = alloy_provider::network::EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(parse_rpc(config)?)
            .erased();
        Self::build(provider, Some(address), config)
    }

    /// Client without a signer; writes fail with [`ChainError::Submit`].
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC URL or contract address is invalid.
    pub fn read_only(config: &ChainConfig) -> Result<Self> {
        let provider = ProviderBuilder::new().connect_http(parse_rpc(config)?).erased();
        Self::build(provider, None, config)
    }

    fn build(provider: DynProvider, signer: Option<Address>, config: &ChainConfig) -> Result<Self> {
        let contract = PolyBet::new(parse_address(config)?, provider.clone());
        Ok(Self {
            provider,
            contract,
            signer,
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
            record_gas_limit: config.record_gas_limit,
            status_gas_limit: config.status_gas_limit,
        })
    }

    #[must_use]
    pub fn signer_address(&self) -> Option<Address> {
        self.signer
    }

    /// Chain id reported by the RPC endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    pub async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ChainError::Read(format!("chain id: {e}")).into())
    }

    /// Nonce and gas price for the next write, after checking the signer
    /// can cover `gas_limit` at that price.
    async fn prepare(&self, gas_limit: u64) -> Result<(u64, u128)> {
        let signer = self
            .signer
            .ok_or_else(|| ChainError::Submit("client has no signing key".into()))?;
        let nonce = self
            .provider
            .get_transaction_count(signer)
            .await
            .map_err(|e| ChainError::Read(format!("nonce: {e}")))?;
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| ChainError::Read(format!("gas price: {e}")))?;
        let balance = self
            .provider
            .get_balance(signer)
            .await
            .map_err(|e| ChainError::Read(format!("balance: {e}")))?;

        let needed = u128::from(gas_limit).saturating_mul(gas_price);
        let available = u128::try_from(balance).unwrap_or(u128::MAX);
        if available < needed {
            return Err(ChainError::InsufficientGas { needed, available }.into());
        }
        debug!(nonce, gas_price = %gas_price, gas_limit, "Prepared write");
        Ok((nonce, gas_price))
    }

    async fn confirm<N>(&self, pending: alloy_provider::PendingTransactionBuilder<N>) -> Result<TxReceipt>
    where
        N: alloy_provider::network::Network,
    {
        let tx_hash = format!("{:?}", pending.tx_hash());
        debug!(tx_hash = %tx_hash, "Transaction sent");
        let receipt = pending
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await
            .map_err(|e| match e {
                alloy_provider::PendingTransactionError::TxWatcher(_) => ChainError::Timeout {
                    tx_hash: tx_hash.clone(),
                    timeout_secs: self.receipt_timeout.as_secs(),
                },
                other => ChainError::Read(format!("receipt for {tx_hash}: {other}")),
            })?;

        if !receipt.status() {
            return Err(ChainError::Reverted { tx_hash }.into());
        }
        Ok(TxReceipt {
            tx_hash,
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
        })
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn latest_block(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::Read(format!("block number: {e}")).into())
    }

    async fn events(&self, from: u64, to: u64) -> Result<Vec<ChainEvent>> {
        let created = self
            .contract
            .BetSlipCreated_filter()
            .from_block(from)
            .to_block(to)
            .query()
            .await
            .map_err(|e| ChainError::Read(format!("BetSlipCreated logs: {e}")))?;
        let selling = self
            .contract
            .BetSlipSellingStateUpdate_filter()
            .from_block(from)
            .to_block(to)
            .query()
            .await
            .map_err(|e| ChainError::Read(format!("BetSlipSellingStateUpdate logs: {e}")))?;

        let logs = created
            .into_iter()
            .map(|(event, log)| (EventKind::Created, event.betId, log))
            .chain(
                selling
                    .into_iter()
                    .map(|(event, log)| (EventKind::SellingStateUpdate, event.betId, log)),
            )
            .map(|(kind, bet_id, log)| EventLog {
                kind,
                bet_id,
                block: log.block_number,
                log_index: log.log_index,
            })
            .collect();
        Ok(contract::events_from_logs(logs, to))
    }

    async fn bet_slip(&self, id: BetSlipId) -> Result<BetSlip> {
        let data = self
            .contract
            .getBetSlip(U256::from(id.value()))
            .call()
            .await
            .map_err(|e| ChainError::Read(format!("getBetSlip({id}): {e}")))?;
        Ok(contract::bet_slip_from_tuple(id, data)?)
    }

    async fn proxied_bet(&self, id: ProxiedBetId) -> Result<ProxiedBet> {
        let data = self
            .contract
            .getProxiedBet(FixedBytes(*id.as_bytes()))
            .call()
            .await
            .map_err(|e| ChainError::Read(format!("getProxiedBet({id}): {e}")))?;
        Ok(contract::proxied_bet_from_tuple(data)?)
    }

    async fn update_bet_slip_status(&self, id: BetSlipId, status: u8) -> Result<TxReceipt> {
        let (nonce, gas_price) = self.prepare(self.status_gas_limit).await?;
        let pending = self
            .contract
            .updateBetSlipStatus(U256::from(id.value()), status)
            .nonce(nonce)
            .gas_price(gas_price)
            .gas(self.status_gas_limit)
            .send()
            .await
            .map_err(|e| ChainError::Submit(format!("updateBetSlipStatus({id}, {status}): {e}")))?;
        let receipt = self.confirm(pending).await?;
        info!(bet_slip_id = %id, status, tx_hash = %receipt.tx_hash, "Status updated");
        Ok(receipt)
    }

    async fn record_proxied_bet_placed(&self, bet: &ProxiedBet) -> Result<TxReceipt> {
        if bet.shares_bought == 0 {
            return Err(ChainError::InvalidRecord(format!("proxied bet {} has no shares", bet.id.short())).into());
        }
        let (nonce, gas_price) = self.prepare(self.record_gas_limit).await?;
        let pending = self
            .contract
            .recordProxiedBetPlaced(U256::from(bet.bet_slip_id.value()), contract::proxied_bet_to_tuple(bet))
            .nonce(nonce)
            .gas_price(gas_price)
            .gas(self.record_gas_limit)
            .send()
            .await
            .map_err(|e| ChainError::Submit(format!("recordProxiedBetPlaced({}): {e}", bet.id.short())))?;
        self.confirm(pending).await
    }

    async fn record_proxied_bet_sold(
        &self,
        id: ProxiedBetId,
        shares_sold: u128,
        collateral_received: u128,
    ) -> Result<TxReceipt> {
        let (nonce, gas_price) = self.prepare(self.record_gas_limit).await?;
        let pending = self
            .contract
            .recordProxiedBetSold(
                FixedBytes(*id.as_bytes()),
                U256::from(shares_sold),
                U256::from(collateral_received),
            )
            .nonce(nonce)
            .gas_price(gas_price)
            .gas(self.record_gas_limit)
            .send()
            .await
            .map_err(|e| ChainError::Submit(format!("recordProxiedBetSold({}): {e}", id.short())))?;
        self.confirm(pending).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ChainConfig {
        ChainConfig {
            rpc_url: "http://127.0.0.1:8545".into(),
            contract_address: "0x633D59F15e588c4a5D8F2E35e4d65041191517AA".into(),
            ..ChainConfig::default()
        }
    }

    #[test]
    fn signing_client_requires_a_key() {
        let err = AlloyChainClient::connect(&config()).err().unwrap();
        assert!(err.to_string().contains("BET_ROUTER_PRIVATE_KEY"));
    }

    #[test]
    fn rejects_bad_contract_address() {
        let mut config = config();
        config.contract_address = "0x1234".into();
        assert!(AlloyChainClient::read_only(&config).is_err());
    }

    #[tokio::test]
    async fn read_only_client_refuses_writes() {
        let client = AlloyChainClient::read_only(&config()).unwrap();
        assert!(client.signer_address().is_none());
        let err = client.update_bet_slip_status(BetSlipId::new(1), 2).await.unwrap_err();
        assert!(matches!(err, crate::error::Error::Chain(ChainError::Submit(_))));
    }
}
