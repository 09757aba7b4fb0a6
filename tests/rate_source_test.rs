//! Rate source tests against a mocked exchange rate service

use budget_fx::fx::{ErApiRateSource, RateSource};
use budget_fx::pipeline::{run, PipelineOptions};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> ErApiRateSource {
    ErApiRateSource::with_config(&server.uri(), "EUR", Some(Duration::from_secs(5))).unwrap()
}

async fn mount_rates(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v6/latest/EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_rates_success() {
    let server = MockServer::start().await;
    mount_rates(
        &server,
        json!({
            "result": "success",
            "base_code": "EUR",
            "rates": { "EUR": 1, "USD": 1.12, "GBP": 0.86 }
        }),
    )
    .await;

    let rates = source_for(&server).fetch_rates().await;

    assert_eq!(rates.len(), 3);
    assert_eq!(rates.get("USD"), Some(1.12));
    assert_eq!(rates.get("EUR"), Some(1.0));
}

#[tokio::test]
async fn test_get_rate_success() {
    let server = MockServer::start().await;
    mount_rates(&server, json!({ "rates": { "USD": 1.12 } })).await;

    let rate = source_for(&server).get_rate("USD").await;
    assert_eq!(rate, Some(1.12));
}

#[tokio::test]
async fn test_get_rate_missing_code() {
    let server = MockServer::start().await;
    mount_rates(&server, json!({ "rates": { "USD": 1.12 } })).await;

    assert_eq!(source_for(&server).get_rate("ZZZ").await, None);
}

#[tokio::test]
async fn test_get_rate_rejects_non_positive_rates() {
    let server = MockServer::start().await;
    mount_rates(
        &server,
        json!({ "rates": { "USD": 0.0, "GBP": -0.85, "JPY": 160.0 } }),
    )
    .await;

    let source = source_for(&server);
    assert_eq!(source.get_rate("USD").await, None);
    assert_eq!(source.get_rate("GBP").await, None);
    assert_eq!(source.get_rate("jpy").await, Some(160.0));
}

#[tokio::test]
async fn test_get_rate_transport_failure() {
    let source = ErApiRateSource::with_config("http://127.0.0.1:9", "EUR", None).unwrap();
    assert_eq!(source.get_rate("USD").await, None);
}

#[tokio::test]
async fn test_http_error_status_gives_empty_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/latest/EUR"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let rates = source_for(&server).fetch_rates().await;
    assert!(rates.is_empty());
}

#[tokio::test]
async fn test_service_error_body_gives_empty_table() {
    let server = MockServer::start().await;
    mount_rates(
        &server,
        json!({ "result": "error", "error-type": "unsupported-code" }),
    )
    .await;

    assert!(source_for(&server).fetch_rates().await.is_empty());
}

#[tokio::test]
async fn test_malformed_body_gives_empty_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/latest/EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    assert!(source_for(&server).fetch_rates().await.is_empty());
}

#[tokio::test]
async fn test_run_fetches_rates_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/latest/EUR"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "rates": { "USD": 2.0 } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    let mut content = String::from("budget_EUR,local_currency\n");
    for i in 0..50 {
        content.push_str(&format!("{},USD\n", i));
    }
    std::fs::write(&input, content).unwrap();

    let summary = run(
        &source_for(&server),
        &input,
        &output,
        PipelineOptions { chunk_size: 4 },
    )
    .await;

    assert_eq!(summary.rows_written, 50);
    assert_eq!(summary.batches_written, 13);
    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("\n3,USD,6.0\n"));
}
