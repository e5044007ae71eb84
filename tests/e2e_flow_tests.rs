//! Buy and sell flows from contract event to contract writes.

mod support;

use std::sync::Arc;
use std::time::Duration;

use bet_router::application::orchestration::{EventPoller, FlowOutcome, PollerConfig};
use bet_router::domain::{
    BetSlipId, BetSlipStatus, ChainEvent, MarketId, MarketplaceId, ProxiedBet, Side,
};
use bet_router::port::outbound::cursor::BlockCursorStore;
use bet_router::testkit::chain::{ChainWrite, FakeChain, MemoryCursorStore};
use bet_router::testkit::config::dry_run_executor;
use bet_router::testkit::domain::{reserves, slip};
use bet_router::testkit::marketplace::{CallKind, ScriptedMarketplace};
use bet_router::testkit::pool::StaticPoolState;
use serde_json::json;

use support::router::{pool, status, Router, CHAMBER, SLAUGHTERHOUSE, TERMINAL};

const HUNDRED: u128 = 100_000_000;

fn skewed_pools() -> StaticPoolState {
    StaticPoolState::new()
        .with(&pool(2, 10), reserves(0.4, 0.6))
        .with(&pool(3, 20), reserves(0.1, 0.9))
}

fn filling_marketplace() -> ScriptedMarketplace {
    ScriptedMarketplace::new()
        .with_buy_reply(SLAUGHTERHOUSE, 200, json!({ "sharesMinted": 61 }))
        .with_buy_reply(TERMINAL, 201, json!({ "sharesMinted": "47" }))
}

fn created(id: u64, block: u64) -> ChainEvent {
    ChainEvent::BetSlipCreated {
        bet_slip_id: BetSlipId::new(id),
        block,
    }
}

fn selling(id: u64, block: u64) -> ChainEvent {
    ChainEvent::BetSlipSellingStateUpdate {
        bet_slip_id: BetSlipId::new(id),
        block,
    }
}

fn placed_writes(chain: &FakeChain) -> Vec<ProxiedBet> {
    chain
        .writes()
        .into_iter()
        .filter_map(|w| match w {
            ChainWrite::Placed(bet) => Some(bet),
            _ => None,
        })
        .collect()
}

fn expect_buy(outcome: FlowOutcome) -> bet_router::application::orchestration::BuyOutcome {
    match outcome {
        FlowOutcome::Buy(outcome) => outcome,
        FlowOutcome::Sell(other) => panic!("expected buy flow, got {other:?}"),
    }
}

fn expect_sell(outcome: FlowOutcome) -> bet_router::application::orchestration::SellOutcome {
    match outcome {
        FlowOutcome::Sell(outcome) => outcome,
        FlowOutcome::Buy(other) => panic!("expected sell flow, got {other:?}"),
    }
}

#[tokio::test]
async fn created_slip_is_split_recorded_and_placed() {
    let chain = FakeChain::new().with_slip(slip(1, HUNDRED, 0, &[(2, 10), (3, 20)]));
    let router = Router::new(chain, filling_marketplace(), skewed_pools());

    let outcome = expect_buy(router.orchestrator.handle(created(1, 7)).await.unwrap());

    assert_eq!(outcome.status, BetSlipStatus::Placed);
    assert!(outcome.failure_reason.is_none());

    let buys = router.marketplace.calls_of(CallKind::Buy);
    assert_eq!(buys.len(), 2);
    let spent_at = |endpoint: &str| -> f64 {
        buys.iter().filter(|c| c.endpoint == endpoint).map(|c| c.amount).sum()
    };
    assert!((spent_at(SLAUGHTERHOUSE) - 5.0).abs() < 1e-9, "{buys:?}");
    assert!((spent_at(TERMINAL) - 95.0).abs() < 1e-9, "{buys:?}");
    assert!(buys.iter().all(|c| c.option_index == Some(0)));

    let placed = placed_writes(&router.chain);
    assert_eq!(placed.len(), 2);
    assert_eq!(outcome.recorded, 2);
    let mut marketplaces: Vec<u64> = placed.iter().map(|b| b.marketplace_id.value()).collect();
    marketplaces.sort_unstable();
    assert_eq!(marketplaces, vec![2, 3]);
    for bet in &placed {
        assert_eq!(bet.bet_slip_id, BetSlipId::new(1));
        assert!(bet.shares_bought > 0);
        assert_eq!(bet.shares_sold, 0);
    }

    let stored = router.chain.slip(BetSlipId::new(1)).unwrap();
    assert_eq!(stored.proxied_bet_ids.len(), 2);
    assert_eq!(
        router.chain.status_history(BetSlipId::new(1)),
        vec![status().placed]
    );
}

#[tokio::test]
async fn created_event_runs_buy_whatever_the_stored_status() {
    let mut closed = slip(2, HUNDRED, 1, &[(2, 10)]);
    closed.status = status().closed;
    let router = Router::new(FakeChain::new().with_slip(closed), filling_marketplace(), skewed_pools());

    let outcome = expect_buy(router.orchestrator.handle(created(2, 3)).await.unwrap());

    assert_eq!(outcome.status, BetSlipStatus::Placed);
    let buys = router.marketplace.calls_of(CallKind::Buy);
    assert_eq!(buys.len(), 1);
    assert_eq!(buys[0].endpoint, SLAUGHTERHOUSE);
    assert_eq!(buys[0].option_index, Some(1));
}

#[tokio::test]
async fn selling_event_runs_sell_on_a_pending_slip() {
    let router = Router::new(
        FakeChain::new().with_slip(slip(3, HUNDRED, 0, &[(2, 10)])),
        filling_marketplace(),
        skewed_pools(),
    );

    let outcome = expect_sell(router.orchestrator.handle(selling(3, 9)).await.unwrap());

    assert_eq!(outcome.attempted, 0);
    assert!(!outcome.closed);
    assert!(router.marketplace.calls_of(CallKind::Buy).is_empty());
    assert!(router.chain.writes().is_empty());
}

#[tokio::test]
async fn every_order_failing_marks_the_slip_failed() {
    let marketplace = ScriptedMarketplace::new()
        .with_buy_transport_error(SLAUGHTERHOUSE, "connection reset")
        .with_buy_reply(TERMINAL, 500, json!({ "error": "paused" }));
    let router = Router::new(
        FakeChain::new().with_slip(slip(4, HUNDRED, 0, &[(2, 10), (3, 20)])),
        marketplace,
        skewed_pools(),
    );

    let outcome = expect_buy(router.orchestrator.handle(created(4, 1)).await.unwrap());

    assert_eq!(outcome.status, BetSlipStatus::Failed);
    assert_eq!(outcome.recorded, 0);
    assert!(outcome.failure_reason.is_some());
    assert!(placed_writes(&router.chain).is_empty());
    assert_eq!(
        router.chain.status_history(BetSlipId::new(4)),
        vec![status().failed]
    );
}

#[tokio::test]
async fn unregistered_marketplace_fails_before_any_order() {
    let router = Router::new(
        FakeChain::new().with_slip(slip(5, HUNDRED, 0, &[(99, 10)])),
        filling_marketplace(),
        skewed_pools(),
    );

    let outcome = expect_buy(router.orchestrator.handle(created(5, 1)).await.unwrap());

    assert_eq!(outcome.status, BetSlipStatus::Failed);
    assert!(outcome.execution.is_none());
    assert!(router.marketplace.calls().is_empty());
}

#[tokio::test]
async fn dry_run_places_nothing_and_writes_nothing() {
    let router = Router::with_executor(
        FakeChain::new().with_slip(slip(6, HUNDRED, 0, &[(2, 10), (3, 20)])),
        filling_marketplace(),
        skewed_pools(),
        dry_run_executor(),
    );

    let outcome = expect_buy(router.orchestrator.handle(created(6, 1)).await.unwrap());

    assert_eq!(outcome.status, BetSlipStatus::Placed);
    assert_eq!(outcome.recorded, 0);
    assert!(router.marketplace.calls().is_empty());
    assert!(router.chain.writes().is_empty());
}

fn slip_holding(id: u64, bets: &[ProxiedBet]) -> bet_router::domain::BetSlip {
    let mut s = slip(id, HUNDRED, 0, &[(2, 10), (4, 30)]);
    s.status = status().selling;
    s.proxied_bet_ids = bets.iter().map(|b| b.id).collect();
    s
}

fn held(slip_id: u64, marketplace: u64, market: u64, shares: u128) -> ProxiedBet {
    ProxiedBet::placed(
        BetSlipId::new(slip_id),
        MarketplaceId::new(marketplace),
        MarketId::new(market),
        Side::A,
        50_000_000,
        shares,
        1_700_000_000,
    )
}

#[tokio::test]
async fn sell_liquidates_every_bet_and_closes_once() {
    let bets = [held(7, 2, 10, 61), held(7, 4, 30, 47)];
    let chain = FakeChain::new()
        .with_slip(slip_holding(7, &bets))
        .with_bet(bets[0].clone())
        .with_bet(bets[1].clone());
    let marketplace = ScriptedMarketplace::new()
        .with_sell_reply(SLAUGHTERHOUSE, 200, json!({ "collateralReceived": 42.5 }))
        .with_sell_reply(CHAMBER, 200, json!({ "collateralReceived": "30" }));
    let router = Router::new(chain, marketplace, skewed_pools());

    let outcome = expect_sell(router.orchestrator.handle(selling(7, 12)).await.unwrap());

    assert_eq!(outcome.attempted, 2);
    assert_eq!(outcome.sold, 2);
    assert!(outcome.closed);
    let sells = router.marketplace.calls_of(CallKind::Sell);
    assert_eq!(sells.len(), 2);
    assert_eq!(sells[0].amount, 61.0);

    let first = router.chain.bet(bets[0].id).unwrap();
    assert_eq!(first.shares_sold, 61);
    assert_eq!(first.final_collateral, 42_500_000);
    let second = router.chain.bet(bets[1].id).unwrap();
    assert_eq!(second.final_collateral, 30_000_000);
    assert_eq!(
        router.chain.status_history(BetSlipId::new(7)),
        vec![status().closed]
    );

    let again = expect_sell(router.orchestrator.handle(selling(7, 13)).await.unwrap());
    assert_eq!(again.sold, 0);
    assert!(!again.closed);
    assert_eq!(router.marketplace.calls_of(CallKind::Sell).len(), 2);
}

#[tokio::test]
async fn rejected_sale_leaves_the_slip_open() {
    let bets = [held(8, 2, 10, 61)];
    let chain = FakeChain::new().with_slip(slip_holding(8, &bets)).with_bet(bets[0].clone());
    let marketplace =
        ScriptedMarketplace::new().with_sell_reply(SLAUGHTERHOUSE, 400, json!({ "error": "slippage too high" }));
    let router = Router::new(chain, marketplace, skewed_pools());

    let outcome = expect_sell(router.orchestrator.handle(selling(8, 2)).await.unwrap());

    assert_eq!(outcome.sold, 0);
    assert!(!outcome.closed);
    assert!(router.chain.writes().is_empty());
    assert_eq!(router.chain.bet(bets[0].id).unwrap().shares_sold, 0);
}

#[tokio::test]
async fn unrecorded_sale_does_not_count() {
    let bets = [held(9, 2, 10, 61)];
    let chain = FakeChain::new().with_slip(slip_holding(9, &bets)).with_bet(bets[0].clone());
    chain.fail_writes(true);
    let router = Router::new(chain, ScriptedMarketplace::new(), skewed_pools());

    let outcome = expect_sell(router.orchestrator.handle(selling(9, 2)).await.unwrap());

    assert_eq!(router.marketplace.calls_of(CallKind::Sell).len(), 1);
    assert_eq!(outcome.sold, 0);
    assert!(!outcome.closed);
}

#[tokio::test]
async fn dry_run_sale_sends_no_order_and_writes_nothing() {
    let bets = [held(12, 2, 10, 61)];
    let chain = FakeChain::new().with_slip(slip_holding(12, &bets)).with_bet(bets[0].clone());
    let marketplace =
        ScriptedMarketplace::new().with_sell_reply(SLAUGHTERHOUSE, 200, json!({ "collateralReceived": 42.5 }));
    let router = Router::with_executor(chain, marketplace, skewed_pools(), dry_run_executor());

    let outcome = expect_sell(router.orchestrator.handle(selling(12, 4)).await.unwrap());

    assert!(router.marketplace.calls_of(CallKind::Sell).is_empty());
    assert!(router.chain.writes().is_empty());
    assert_eq!(outcome.attempted, 1);
    assert_eq!(outcome.sold, 1);
    assert!(!outcome.closed);
    assert_eq!(router.chain.bet(bets[0].id).unwrap().shares_sold, 0);
}

fn poller(router: &Router, cursor: Arc<MemoryCursorStore>, start_block: Option<u64>) -> EventPoller {
    EventPoller::new(
        router.chain.clone(),
        router.orchestrator.clone(),
        cursor,
        PollerConfig {
            poll_interval: Duration::from_millis(10),
            start_block,
            ..PollerConfig::default()
        },
    )
}

#[tokio::test]
async fn poller_retries_the_same_range_after_a_failed_query() {
    let chain = FakeChain::new().with_slip(slip(10, HUNDRED, 0, &[(2, 10), (3, 20)]));
    chain.set_head(10);
    chain.emit(created(10, 7));
    let router = Router::new(chain, filling_marketplace(), skewed_pools());
    let cursor = Arc::new(MemoryCursorStore::new());
    let mut poller = poller(&router, cursor.clone(), Some(5));

    assert_eq!(poller.initialize().await.unwrap(), 4);

    router.chain.fail_event_queries(true);
    assert!(poller.tick().await.is_err());
    assert_eq!(poller.watermark(), Some(4));
    assert!(router.marketplace.calls().is_empty());

    router.chain.fail_event_queries(false);
    let report = poller.tick().await.unwrap();
    assert_eq!(report.range, Some((5, 10)));
    assert_eq!(report.events, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(poller.watermark(), Some(10));
    assert_eq!(cursor.load("bet_router").unwrap(), Some(10));
    assert_eq!(router.chain.event_queries(), vec![(5, 10), (5, 10)]);
    assert_eq!(
        router.chain.status_history(BetSlipId::new(10)).last(),
        Some(&status().placed)
    );

    let idle = poller.tick().await.unwrap();
    assert_eq!(idle.range, None);
}

#[tokio::test]
async fn poller_resumes_from_the_stored_cursor() {
    let chain = FakeChain::new();
    chain.set_head(50);
    let router = Router::new(chain, filling_marketplace(), skewed_pools());
    let cursor = Arc::new(MemoryCursorStore::new().with("bet_router", 40));
    let mut poller = poller(&router, cursor, Some(5));

    let report = poller.tick().await.unwrap();

    assert_eq!(report.range, Some((41, 50)));
}

#[tokio::test]
async fn unreadable_slip_is_counted_and_skipped() {
    let chain = FakeChain::new().with_slip(slip(11, HUNDRED, 1, &[(2, 10)]));
    chain.set_head(20);
    chain.emit(created(404, 15));
    chain.emit(created(11, 16));
    let router = Router::new(chain, filling_marketplace(), skewed_pools());
    let mut poller = poller(&router, Arc::new(MemoryCursorStore::new()), Some(15));

    let report = poller.tick().await.unwrap();

    assert_eq!(report.events, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(poller.watermark(), Some(20));
    assert_eq!(router.marketplace.calls_of(CallKind::Buy).len(), 1);
}
