//! HTTP contract tests for the Jupiter client.
//!
//! wiremock stands in for the aggregator's `/quote` and `/swap` endpoints.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use solana_trade_tools::aggregator::{JupiterClient, SwapAggregator};
use solana_trade_tools::{SwapQuote, SwapQuoteRequest, TradeError, TraderConfig};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> JupiterClient {
    let config = TraderConfig::default()
        .with_jupiter_api_url(server.uri())
        .with_request_timeout(5);
    JupiterClient::new(&config).expect("client builds")
}

#[tokio::test]
async fn test_quote_sends_slippage_in_basis_points() {
    let server = MockServer::start().await;
    let quote_body = json!({ "inputMint": "A", "outputMint": "B", "outAmount": "990000" });

    Mock::given(method("GET"))
        .and(path("/quote"))
        .and(query_param("inputMint", "A"))
        .and(query_param("outputMint", "B"))
        .and(query_param("amount", "1000000"))
        .and(query_param("slippageBps", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&quote_body))
        .expect(1)
        .mount(&server)
        .await;

    let request = SwapQuoteRequest::new("A", "B", "1000000", 1.0).unwrap();
    let quote = client_for(&server).quote(&request).await.unwrap();

    assert_eq!(quote.as_value(), &quote_body);
}

#[tokio::test]
async fn test_quote_rejection_makes_no_further_calls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/quote"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "no route" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/swap"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request = SwapQuoteRequest::new("A", "B", "1000000", 0.5).unwrap();
    let err = client_for(&server).quote(&request).await.unwrap_err();

    assert!(matches!(err, TradeError::QuoteUnavailable(_)));
    assert!(err.to_string().starts_with("Failed to get swap quote: aggregator responded with 400"));
}

#[tokio::test]
async fn test_api_key_header_is_sent_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/quote"))
        .and(header("x-api-key", "k-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let config = TraderConfig::default()
        .with_jupiter_api_url(format!("{}/", server.uri()))
        .with_jupiter_api_key("k-123");
    let client = JupiterClient::new(&config).unwrap();

    let request = SwapQuoteRequest::new("A", "B", "5", 0.0).unwrap();
    client.quote(&request).await.unwrap();
}

#[tokio::test]
async fn test_swap_posts_quote_verbatim_and_decodes_payload() {
    let server = MockServer::start().await;
    let user = Pubkey::new_unique();
    let quote = SwapQuote(json!({ "outAmount": "7", "routePlan": [{ "percent": 100 }] }));
    let payload = vec![1u8, 2, 3, 4, 5];

    Mock::given(method("POST"))
        .and(path("/swap"))
        .and(body_json(json!({
            "quoteResponse": quote.as_value(),
            "userPublicKey": user.to_string(),
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "swapTransaction": BASE64.encode(&payload) })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let bytes = client_for(&server).swap_transaction(&quote, &user).await.unwrap();
    assert_eq!(bytes, payload);
}

#[tokio::test]
async fn test_swap_rejection_is_preparation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/swap"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .swap_transaction(&SwapQuote(json!({})), &Pubkey::new_unique())
        .await
        .unwrap_err();

    assert!(matches!(err, TradeError::Preparation(_)));
    assert!(err.to_string().starts_with("Failed to prepare swap transaction"));
}

#[tokio::test]
async fn test_swap_with_bad_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/swap"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "swapTransaction": "%%%" })))
        .mount(&server)
        .await;
    let err = client_for(&server)
        .swap_transaction(&SwapQuote(json!({})), &Pubkey::new_unique())
        .await
        .unwrap_err();
    assert!(matches!(err, TradeError::MalformedTransaction(_)));

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/swap"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "stale quote" })))
        .mount(&server)
        .await;
    let err = client_for(&server)
        .swap_transaction(&SwapQuote(json!({})), &Pubkey::new_unique())
        .await
        .unwrap_err();
    assert!(matches!(err, TradeError::Preparation(_)));
}
