//! Unit tests for the Salesforce adapter.
//!
//! These tests cover:
//! - REST endpoint construction
//! - Error body decoding and status mapping
//! - Adapter construction and credential hygiene

use url::Url;

use super::SalesforceAdapter;
use super::rest::{api_base, error_from_response, global_describe_url, object_describe_url};
use crate::adapters::{ConnectionConfig, SchemaSource};
use crate::auth::{AccessToken, OrgAuth};
use crate::error::ObjExportError;

fn auth(instance: &str) -> OrgAuth {
    OrgAuth {
        username: Some("admin@acme.org".to_string()),
        instance_url: Url::parse(instance).unwrap(),
        access_token: AccessToken::new("00D000000000001!AQ0AQHtokensecret"),
        api_version: None,
    }
}

fn config() -> ConnectionConfig {
    ConnectionConfig::new(Url::parse("https://placeholder.invalid").unwrap())
}

// =============================================================================
// Endpoint Tests
// =============================================================================

#[test]
fn test_api_base_from_bare_instance() {
    let instance = Url::parse("https://acme.my.salesforce.com").unwrap();
    let base = api_base(&instance, "60.0").unwrap();
    assert_eq!(
        base.as_str(),
        "https://acme.my.salesforce.com/services/data/v60.0"
    );
}

#[test]
fn test_api_base_ignores_trailing_slash_and_query() {
    let instance = Url::parse("https://acme.my.salesforce.com/?foo=bar#frag").unwrap();
    let base = api_base(&instance, "59.0").unwrap();
    assert_eq!(
        base.as_str(),
        "https://acme.my.salesforce.com/services/data/v59.0"
    );
}

#[test]
fn test_global_describe_url() {
    let base = Url::parse("https://acme.my.salesforce.com/services/data/v60.0").unwrap();
    assert_eq!(
        global_describe_url(&base).unwrap().as_str(),
        "https://acme.my.salesforce.com/services/data/v60.0/sobjects"
    );
}

#[test]
fn test_object_describe_url() {
    let base = Url::parse("https://acme.my.salesforce.com/services/data/v60.0").unwrap();
    assert_eq!(
        object_describe_url(&base, "Invoice__c").unwrap().as_str(),
        "https://acme.my.salesforce.com/services/data/v60.0/sobjects/Invoice__c/describe"
    );
}

#[test]
fn test_object_describe_url_encodes_name_as_single_segment() {
    let base = Url::parse("https://acme.my.salesforce.com/services/data/v60.0").unwrap();
    let url = object_describe_url(&base, "../limits").unwrap();
    assert!(url.path().ends_with("/sobjects/..%2Flimits/describe"), "{url}");
}

#[test]
fn test_object_describe_url_rejects_empty_name() {
    let base = Url::parse("https://acme.my.salesforce.com/services/data/v60.0").unwrap();
    assert!(object_describe_url(&base, "").is_err());
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[test]
fn test_401_maps_to_authentication() {
    let body = r#"[{"message":"Session expired or invalid","errorCode":"INVALID_SESSION_ID"}]"#;
    match error_from_response("global", 401, body) {
        ObjExportError::Authentication { message } => {
            assert!(message.contains("INVALID_SESSION_ID"));
            assert!(message.contains("Session expired"));
        }
        other => panic!("expected authentication error, got {other:?}"),
    }
}

#[test]
fn test_error_body_is_decoded() {
    let body = r#"[{"errorCode":"NOT_FOUND","message":"The requested resource does not exist"}]"#;
    match error_from_response("Nope__c", 404, body) {
        ObjExportError::Describe {
            target,
            status,
            error_code,
            message,
        } => {
            assert_eq!(target, "Nope__c");
            assert_eq!(status, 404);
            assert_eq!(error_code, "NOT_FOUND");
            assert_eq!(message, "The requested resource does not exist");
        }
        other => panic!("expected describe error, got {other:?}"),
    }
}

#[test]
fn test_non_json_error_body_is_truncated() {
    let body = "x".repeat(1000);
    match error_from_response("global", 502, &body) {
        ObjExportError::Describe {
            error_code,
            message,
            ..
        } => {
            assert_eq!(error_code, "UNKNOWN");
            assert!(message.len() < 300);
            assert!(message.ends_with("..."));
        }
        other => panic!("expected describe error, got {other:?}"),
    }
}

// =============================================================================
// Adapter Tests
// =============================================================================

#[test]
fn test_adapter_takes_instance_from_auth() {
    let adapter = SalesforceAdapter::new(&auth("https://acme.my.salesforce.com"), config())
        .unwrap();

    assert_eq!(
        adapter.api_base().as_str(),
        "https://acme.my.salesforce.com/services/data/v60.0"
    );
    assert_eq!(
        adapter.connection_config().instance_url.host_str(),
        Some("acme.my.salesforce.com")
    );
    assert_eq!(adapter.org_label(), "admin@acme.org");
}

#[test]
fn test_adapter_rejects_invalid_api_version() {
    let result = SalesforceAdapter::new(
        &auth("https://acme.my.salesforce.com"),
        config().with_api_version("latest"),
    );
    assert!(matches!(result, Err(ObjExportError::Configuration { .. })));
}

#[test]
fn test_adapter_debug_has_no_token() {
    let adapter = SalesforceAdapter::new(&auth("https://acme.my.salesforce.com"), config())
        .unwrap();
    let debug = format!("{adapter:?}");
    assert!(!debug.contains("tokensecret"), "token leaked: {debug}");
}

#[test]
fn test_token_with_newline_is_rejected() {
    let mut org = auth("https://acme.my.salesforce.com");
    org.access_token = AccessToken::new("bad\ntoken");
    let result = SalesforceAdapter::new(&org, config());
    assert!(matches!(result, Err(ObjExportError::Authentication { .. })));
}
