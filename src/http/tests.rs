//! Tests for the HTTP client module

use super::client::decode_body;
use super::*;
use crate::auth::{QueryParams, Timestamp};
use crate::config::ClientConfig;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const SECRET: &str = "S3cr3t";

fn client_for(server: &MockServer) -> CommandoClient {
    let config = ClientConfig::new(&format!("{}/ws/api.php", server.uri()), SECRET).unwrap();
    CommandoClient::new(config).unwrap()
}

fn query_keys(request: &Request) -> Vec<String> {
    request
        .url
        .query_pairs()
        .map(|(k, _)| k.into_owned())
        .collect()
}

fn query_value(request: &Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

async fn only_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    requests.remove(0)
}

// ============================================================================
// Body Decoding
// ============================================================================

#[test]
fn test_decode_body_variants() {
    assert_eq!(decode_body(b"").unwrap(), json!({}));
    assert_eq!(decode_body(b"null").unwrap(), json!({}));
    assert_eq!(decode_body(b"[1,2]").unwrap(), json!([1, 2]));
    assert_eq!(decode_body(br#"{"A1": 3}"#).unwrap(), json!({"A1": 3}));
    assert!(matches!(
        decode_body(b"not json").unwrap_err(),
        Error::RemoteDecode { .. }
    ));
}

#[test]
fn test_decode_body_whitespace_only_is_decode_error() {
    assert!(matches!(
        decode_body(b"  \n").unwrap_err(),
        Error::RemoteDecode { .. }
    ));
}

#[test]
fn test_decode_body_rejects_invalid_utf8() {
    assert!(matches!(
        decode_body(b"{\"a\":\"\xff\"}").unwrap_err(),
        Error::RemoteDecode { .. }
    ));
}

// ============================================================================
// Successful Calls
// ============================================================================

#[tokio::test]
async fn test_call_sends_signed_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ws/api.php"))
        .and(query_param("act", "cscliste"))
        .and(query_param("cli", "00318945"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"CSC001": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let params = QueryParams::new()
        .with("act", "cscliste")
        .with("cli", "00318945");
    let data = client.call(params.clone()).await.unwrap();
    assert_eq!(data, json!({"CSC001": {}}));

    let request = only_request(&server).await;
    assert_eq!(query_keys(&request), vec!["act", "cli", "ts", "token"]);

    // The token on the wire matches the timestamp on the wire
    let ts = Timestamp::parse(&query_value(&request, "ts").unwrap()).unwrap();
    let expected = client.signer().token(&params, &ts);
    assert_eq!(query_value(&request, "token").unwrap(), expected);
}

#[tokio::test]
async fn test_send_matches_build_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let params = QueryParams::new()
        .with("act", "reliq")
        .with("cli", "00318945")
        .with("ref", "9782070360024,9782070368228");
    let ts = Timestamp::parse("20240101120000").unwrap();

    let built = client.build_url_at(params.clone(), ts.clone()).unwrap();
    let signed = client.signer().sign(params, ts).unwrap();
    client.send(&signed).await.unwrap();

    let request = only_request(&server).await;
    let built = url::Url::parse(&built).unwrap();
    assert_eq!(request.url.path(), built.path());
    assert_eq!(request.url.query(), built.query());
}

#[test]
fn test_build_url_known_vector() {
    let config = ClientConfig::new("https://commando.example.com/ws/api.php", SECRET).unwrap();
    let client = CommandoClient::new(config).unwrap();
    let params = QueryParams::new()
        .with("act", "cscliste")
        .with("cli", "00318945");

    let url = client
        .build_url_at(params, Timestamp::parse("20240101120000").unwrap())
        .unwrap();
    assert_eq!(
        url,
        "https://commando.example.com/ws/api.php?act=cscliste&cli=00318945&ts=20240101120000&token=4fbb411227dafe769edcab4a16cb05ca"
    );
}

#[test]
fn test_build_url_uses_current_time() {
    let config = ClientConfig::new("https://commando.example.com/ws/api.php", SECRET).unwrap();
    let client = CommandoClient::new(config).unwrap();

    let url = client
        .build_url(QueryParams::new().with("act", "dispo").with("ref", "A1"))
        .unwrap();
    let url = url::Url::parse(&url).unwrap();
    let ts = url
        .query_pairs()
        .find(|(k, _)| k == "ts")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert!(Timestamp::parse(&ts).is_ok());
}

#[tokio::test]
async fn test_empty_body_yields_empty_object() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let data = client.get_csc_list("00318945").await.unwrap();
    assert_eq!(data, json!({}));
}

// ============================================================================
// Action Wrappers
// ============================================================================

#[tokio::test]
async fn test_get_backorders_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("act", "reliq"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"A1": 2})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let data = client.get_backorders("00318945", "").await.unwrap();
    assert_eq!(data["A1"], 2);

    let request = only_request(&server).await;
    assert_eq!(query_keys(&request), vec!["act", "cli", "ref", "ts", "token"]);
    assert_eq!(query_value(&request, "ref").unwrap(), "");
}

#[tokio::test]
async fn test_get_stock_availability_with_alert() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("act", "dispo"))
        .and(query_param("alert", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.get_stock_availability("A1,B2", true).await.unwrap();

    let request = only_request(&server).await;
    assert_eq!(query_keys(&request), vec!["act", "ref", "alert", "ts", "token"]);
}

#[tokio::test]
async fn test_get_stock_availability_without_alert() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.get_stock_availability("A1,B2", false).await.unwrap();

    let request = only_request(&server).await;
    assert_eq!(query_keys(&request), vec!["act", "ref", "ts", "token"]);
    assert!(query_value(&request, "alert").is_none());
}

#[tokio::test]
async fn test_get_pricing_full_info() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("act", "tarif"))
        .and(query_param("fullinfo", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"A1": {"prix": 9.5}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let data = client.get_pricing("00318945", "A1", true).await.unwrap();
    assert_eq!(data["A1"]["prix"], 9.5);

    let request = only_request(&server).await;
    assert_eq!(
        query_keys(&request),
        vec!["act", "cli", "ref", "fullinfo", "ts", "token"]
    );
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_non_200_is_remote_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Error"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_csc_list("00318945").await.unwrap_err();
    match err {
        Error::RemoteHttp { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Error");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_other_success_codes_are_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_csc_list("00318945").await.unwrap_err();
    assert!(matches!(err, Error::RemoteHttp { status: 204, .. }));
}

#[tokio::test]
async fn test_invalid_json_is_remote_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_csc_list("00318945").await.unwrap_err();
    assert!(matches!(err, Error::RemoteDecode { .. }));
    assert!(err.is_remote());
}

#[tokio::test]
async fn test_invalid_utf8_body_is_remote_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"{\"a\":\"\xff\"}".to_vec(), "application/json"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_csc_list("00318945").await.unwrap_err();
    assert!(matches!(err, Error::RemoteDecode { .. }));
}

#[tokio::test]
async fn test_connection_refused_is_remote_call_error() {
    let config = ClientConfig::new("http://127.0.0.1:1/ws/api.php", SECRET).unwrap();
    let client = CommandoClient::new(config).unwrap();

    let err = client.get_csc_list("00318945").await.unwrap_err();
    assert!(matches!(err, Error::RemoteCall { .. }));
    assert!(err.is_remote());
}

#[tokio::test]
async fn test_timeout_is_remote_call_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(server.uri())
        .shared_secret(SECRET)
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let client = CommandoClient::new(config).unwrap();

    let err = client.get_csc_list("00318945").await.unwrap_err();
    assert!(matches!(err, Error::RemoteCall { .. }));
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_reserved_params_are_rejected_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let params = QueryParams::new().with("act", "cscliste").with("ts", "1");
    let err = client.call(params.clone()).await.unwrap_err();
    assert!(matches!(err, Error::ReservedParameter { .. }));
    assert!(client.build_url(params).is_err());
}

#[test]
fn test_client_debug_masks_secret() {
    let config = ClientConfig::new("https://commando.example.com", SECRET).unwrap();
    let client = CommandoClient::new(config).unwrap();
    assert!(!format!("{client:?}").contains(SECRET));
}
