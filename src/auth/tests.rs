//! Tests for the auth module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use test_case::test_case;
use url::Url;

fn ts() -> Timestamp {
    Timestamp::parse("20240101120000").unwrap()
}

fn csc_list_params() -> QueryParams {
    QueryParams::new()
        .with("act", "cscliste")
        .with("cli", "00318945")
}

// ============================================================================
// Timestamp Tests
// ============================================================================

#[test]
fn test_timestamp_now_format() {
    let now = Timestamp::now();
    assert_eq!(now.as_str().len(), 14);
    assert!(now.as_str().bytes().all(|b| b.is_ascii_digit()));
    assert!(Timestamp::parse(now.as_str()).is_ok());
}

#[test_case("2024010112000" ; "too short")]
#[test_case("202401011200000" ; "too long")]
#[test_case("2024-01-01 12:0" ; "separators")]
#[test_case("20241301120000" ; "month 13")]
#[test_case("20240101250000" ; "hour 25")]
fn test_timestamp_rejects(value: &str) {
    let err = Timestamp::parse(value).unwrap_err();
    assert!(matches!(err, Error::InvalidTimestamp { .. }));
}

#[test]
fn test_timestamp_from_datetime() {
    let dt = chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(7, 8, 9)
        .unwrap();
    assert_eq!(Timestamp::from_datetime(dt).as_str(), "20240305070809");
}

// ============================================================================
// QueryParams Tests
// ============================================================================

#[test]
fn test_query_params_keep_insertion_order() {
    let params = QueryParams::new()
        .with("ref", "A1")
        .with("act", "dispo")
        .with("cli", "42");
    assert_eq!(params.keys(), vec!["ref", "act", "cli"]);
    assert_eq!(params.get("act"), Some("dispo"));
    assert_eq!(params.len(), 3);
}

#[test]
fn test_query_params_with_if() {
    let on = QueryParams::new().with("act", "dispo").with_if(true, "alert", "1");
    let off = QueryParams::new().with("act", "dispo").with_if(false, "alert", "1");
    assert_eq!(on.keys(), vec!["act", "alert"]);
    assert_eq!(off.keys(), vec!["act"]);
}

#[test]
fn test_query_params_from_vec() {
    let params = QueryParams::from(vec![("b", "2"), ("a", "1")]);
    assert_eq!(params.keys(), vec!["b", "a"]);
}

// ============================================================================
// Signer Tests
// ============================================================================

#[test]
fn test_canonical_string() {
    let signer = RequestSigner::new("S3cr3t");
    assert_eq!(
        signer.canonical(&csc_list_params(), &ts()),
        "S3cr3tact=csclistecli=00318945ts=20240101120000"
    );
}

#[test]
fn test_token_known_vector() {
    let signer = RequestSigner::new("S3cr3t");
    assert_eq!(
        signer.token(&csc_list_params(), &ts()),
        "4fbb411227dafe769edcab4a16cb05ca"
    );
}

#[test]
fn test_token_is_deterministic() {
    let signer = RequestSigner::new("S3cr3t");
    let a = signer.token(&csc_list_params(), &ts());
    let b = signer.token(&csc_list_params(), &ts());
    assert_eq!(a, b);
    assert_eq!(a.len(), 32);
    assert_eq!(a, a.to_lowercase());
}

#[test]
fn test_token_depends_on_order() {
    let signer = RequestSigner::new("S3cr3t");
    let swapped = QueryParams::new()
        .with("cli", "00318945")
        .with("act", "cscliste");

    assert_eq!(
        signer.canonical(&swapped, &ts()),
        "S3cr3tcli=00318945act=csclistets=20240101120000"
    );
    assert_eq!(
        signer.token(&swapped, &ts()),
        "372ee98467831a3c1a216e13514b1631"
    );
    assert_ne!(
        signer.token(&swapped, &ts()),
        signer.token(&csc_list_params(), &ts())
    );
}

#[test]
fn test_token_with_no_params() {
    let signer = RequestSigner::new("S3cr3t");
    assert_eq!(
        signer.token(&QueryParams::new(), &ts()),
        "1da2ed8179797cee38c54606f845a3d1"
    );
}

#[test_case("ts" ; "timestamp key")]
#[test_case("token" ; "token key")]
fn test_sign_rejects_reserved_keys(key: &str) {
    let signer = RequestSigner::new("S3cr3t");
    let params = QueryParams::new().with("act", "cscliste").with(key, "x");

    let err = signer.sign(params, ts()).unwrap_err();
    match err {
        Error::ReservedParameter { key: found } => assert_eq!(found, key),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_signed_query_wire_order() {
    let signer = RequestSigner::new("S3cr3t");
    let signed = signer.sign(csc_list_params(), ts()).unwrap();

    let keys: Vec<&str> = signed.pairs().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["act", "cli", "ts", "token"]);
    assert_eq!(signed.timestamp(), &ts());
    assert_eq!(
        signed.query_string(),
        "act=cscliste&cli=00318945&ts=20240101120000&token=4fbb411227dafe769edcab4a16cb05ca"
    );
}

#[test]
fn test_signed_query_encodes_values() {
    let signer = RequestSigner::new("S3cr3t");
    let params = QueryParams::new()
        .with("act", "dispo")
        .with("ref", "A B,C&D");
    let signed = signer.sign(params, ts()).unwrap();

    // The token is computed over raw values; only the wire form is encoded
    assert!(signed
        .query_string()
        .starts_with("act=dispo&ref=A+B%2CC%26D&ts=20240101120000&token="));
}

#[test]
fn test_signed_query_to_url() {
    let signer = RequestSigner::new("S3cr3t");
    let signed = signer.sign(csc_list_params(), ts()).unwrap();
    let base = Url::parse("https://commando.example.com/ws/api.php").unwrap();

    let url = signed.to_url(&base);
    assert_eq!(url.path(), "/ws/api.php");
    assert_eq!(url.query(), Some(signed.query_string().as_str()));
}

#[test]
fn test_signer_debug_masks_secret() {
    let signer = RequestSigner::new("S3cr3t");
    let debug = format!("{signer:?}");
    assert!(!debug.contains("S3cr3t"));
    assert!(debug.contains("***"));
}
