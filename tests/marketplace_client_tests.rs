//! HTTP marketplace client against a scripted adapter.

mod harness;

use bet_router::adapter::outbound::marketplace::{HttpMarketplaceClient, MarketplaceConfig};
use bet_router::domain::MarketId;
use bet_router::error::{Error, ExecutionError};
use bet_router::port::outbound::marketplace::{BuyOrder, MarketplaceClient, SellOrder};
use serde_json::{json, Value};

use harness::adapter_server::{AdapterServer, Response};

fn client(server: &AdapterServer, max_retries: u32) -> HttpMarketplaceClient {
    HttpMarketplaceClient::from_config(&MarketplaceConfig {
        base_url: format!("{}/", server.base_url()),
        timeout_secs: 2,
        connect_timeout_secs: 1,
        max_retries,
        retry_delay_ms: 10,
    })
}

#[tokio::test]
async fn buy_reply_is_returned_untouched() {
    let server = AdapterServer::start(vec![(
        "/alpha/buy-shares",
        vec![Response::json(503, json!({ "error": "busy" }))],
    )])
    .await;
    let order = BuyOrder {
        market_id: MarketId::new(7),
        option_index: 0,
        collateral_amount: 3.25,
    };

    let reply = client(&server, 3).buy_shares("alpha", &order).await.unwrap();

    assert_eq!(reply.status, 503);
    assert!(!reply.is_success());
    assert_eq!(reply.body, json!({ "error": "busy" }));
    assert_eq!(server.hits("/alpha/buy-shares"), 1, "buys are never retried");
}

#[tokio::test]
async fn non_json_body_is_kept_as_text() {
    let server = AdapterServer::start(vec![("/alpha/sell-shares", vec![Response::text(200, "ok")])]).await;
    let order = SellOrder {
        market_id: MarketId::new(7),
        option_index: 1,
        amount: 40,
    };

    let reply = client(&server, 0).sell_shares("alpha", &order).await.unwrap();

    assert!(reply.is_success());
    assert_eq!(reply.body, Value::String("ok".to_string()));
    assert_eq!(
        server.received()[0].body,
        json!({ "marketId": 7, "optionIndex": 1, "amount": 40 })
    );
}

#[tokio::test]
async fn prices_are_retried_on_server_errors() {
    let server = AdapterServer::start(vec![(
        "/alpha/get-prices",
        vec![
            Response::json(502, json!({})),
            Response::json(200, json!({ "prices": [0.25, 0.75] })),
        ],
    )])
    .await;

    let prices = client(&server, 2).get_prices("alpha", MarketId::new(9)).await.unwrap();

    assert_eq!(prices, vec![0.25, 0.75]);
    assert_eq!(server.hits("/alpha/get-prices"), 2);
    assert_eq!(server.received()[0].body, json!({ "marketId": 9 }));
}

#[tokio::test]
async fn bare_price_array_is_accepted() {
    let server = AdapterServer::start(vec![("/alpha/get-prices", vec![Response::json(200, json!([0.6, 0.4]))])]).await;
    let prices = client(&server, 0).get_prices("alpha", MarketId::new(1)).await.unwrap();
    assert_eq!(prices, vec![0.6, 0.4]);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = AdapterServer::start(vec![("/alpha/get-prices", vec![Response::json(404, json!({}))])]).await;

    let err = client(&server, 3)
        .get_prices("alpha", MarketId::new(1))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Execution(ExecutionError::Request(_))));
    assert_eq!(server.hits("/alpha/get-prices"), 1);
}
