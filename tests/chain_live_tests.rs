//! Read-only checks against a deployed bet contract.
//!
//! Requires `--features integration-tests` and:
//!
//! - `BET_ROUTER_LIVE_RPC_URL`
//! - `BET_ROUTER_LIVE_CONTRACT`
//! - `BET_ROUTER_LIVE_SLIP_ID` (an existing slip)

#![cfg(feature = "integration-tests")]

use bet_router::adapter::outbound::chain::{AlloyChainClient, ChainConfig};
use bet_router::domain::{BetSlipId, StatusMapping};
use bet_router::port::outbound::chain::ChainClient;

struct Live {
    client: AlloyChainClient,
    slip: BetSlipId,
}

fn live() -> Option<Live> {
    let rpc_url = std::env::var("BET_ROUTER_LIVE_RPC_URL").ok()?;
    let contract_address = std::env::var("BET_ROUTER_LIVE_CONTRACT").ok()?;
    let slip = std::env::var("BET_ROUTER_LIVE_SLIP_ID").ok()?.parse().ok()?;
    let config = ChainConfig {
        rpc_url,
        contract_address,
        ..ChainConfig::default()
    };
    let client = AlloyChainClient::read_only(&config).expect("read-only client");
    Some(Live {
        client,
        slip: BetSlipId::new(slip),
    })
}

#[tokio::test]
async fn stored_status_decodes_with_default_ordinals() {
    let Some(live) = live() else {
        eprintln!("live chain env not set, skipping");
        return;
    };

    let slip = live.client.bet_slip(live.slip).await.expect("read slip");

    assert_eq!(slip.id, live.slip);
    assert!(
        StatusMapping::default().status(slip.status).is_some(),
        "ordinal {} is not a known status",
        slip.status
    );
    assert_eq!(slip.marketplace_ids.len(), slip.market_ids.len());
    slip.targets().expect("targets decode");
}

#[tokio::test]
async fn proxied_bets_of_a_slip_are_readable() {
    let Some(live) = live() else {
        eprintln!("live chain env not set, skipping");
        return;
    };

    let slip = live.client.bet_slip(live.slip).await.expect("read slip");
    for id in &slip.proxied_bet_ids {
        let bet = live.client.proxied_bet(*id).await.expect("read proxied bet");
        assert_eq!(bet.id, *id);
        assert_eq!(bet.bet_slip_id, live.slip);
    }
}

#[tokio::test]
async fn event_range_up_to_head_is_queryable() {
    let Some(live) = live() else {
        eprintln!("live chain env not set, skipping");
        return;
    };

    let head = live.client.latest_block().await.expect("head");
    let from = head.saturating_sub(100);
    let events = live.client.events(from, head).await.expect("events");
    assert!(events.iter().all(|e| (from..=head).contains(&e.block())));
}
