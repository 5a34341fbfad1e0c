//! Integration tests for the REST claim store adapter
//!
//! Runs the adapter against a wiremock server to verify request paths, JSON
//! bodies and the mapping of failures onto adapter error kinds.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use core_kernel::{AdapterConfig, AdapterErrorKind, ClaimId, Protocol};
use domain_claims::claim::{ClaimStatus, StatusUpdate};
use domain_claims::ports::ClaimStorePort;
use infra_protocols::RestClaimStore;
use test_utils::ClaimFixtures;

fn store(server: &MockServer) -> RestClaimStore {
    RestClaimStore::new(&AdapterConfig::new(Protocol::Rest, server.uri())).expect("adapter build")
}

fn claim_body(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "customerId": "CUST-001",
        "fullName": "Jane Doe",
        "policyNumber": "POL-1001",
        "claimType": "ACCIDENT",
        "claimedAmount": 2500.0,
        "description": "Rear-end collision at a traffic light",
        "status": status,
        "createdAt": "2024-03-15T09:30:00Z",
        "history": [
            {"at": "2024-03-15T09:30:00Z", "status": "SUBMITTED", "message": "Claim submitted"}
        ]
    })
}

#[tokio::test]
async fn test_create_claim_posts_intake() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/claims"))
        .and(body_json(json!({
            "customerId": "CUST-001",
            "fullName": "Jane Doe",
            "policyNumber": "POL-1001",
            "claimType": "ACCIDENT",
            "claimedAmount": 2500.0,
            "description": "Rear-end collision at a traffic light"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(claim_body("CLM-42", "SUBMITTED")))
        .expect(1)
        .mount(&server)
        .await;

    let claim = store(&server).create_claim(&ClaimFixtures::intake()).await.unwrap();

    assert_eq!(claim.id, ClaimId::new("CLM-42"));
    assert_eq!(claim.status, "SUBMITTED");
}

#[tokio::test]
async fn test_get_claim_and_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/claims/CLM-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(claim_body("CLM-42", "FRAUD_LOW")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/claims/CLM-42/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"at": "2024-03-15T09:30:00Z", "status": "SUBMITTED", "message": "Claim submitted"},
            {"at": "2024-03-15T09:31:00Z", "status": "IDENTITY_VERIFIED", "message": null}
        ])))
        .mount(&server)
        .await;

    let store = store(&server);
    let id = ClaimId::new("CLM-42");
    let claim = store.get_claim(&id).await.unwrap();
    let history = store.history(&id).await.unwrap();

    assert_eq!(claim.status, "FRAUD_LOW");
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].status, "IDENTITY_VERIFIED");
    assert_eq!(history[1].message, "");
}

#[tokio::test]
async fn test_list_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/claims"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            claim_body("CLM-1", "SUBMITTED"),
            claim_body("CLM-2", "APPROVED")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/claims/CLM-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server);
    let claims = store.list_claims().await.unwrap();
    store.delete_claim(&ClaimId::new("CLM-1")).await.unwrap();

    assert_eq!(claims.len(), 2);
    assert_eq!(claims[1].status, "APPROVED");
}

#[tokio::test]
async fn test_update_status_posts_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/claims/CLM-42/status"))
        .and(body_json(json!({"status": "IN_REVIEW", "message": "Expert assigned"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(claim_body("CLM-42", "IN_REVIEW")))
        .expect(1)
        .mount(&server)
        .await;

    let update = StatusUpdate::new(ClaimStatus::InReview, "Expert assigned");
    let claim = store(&server)
        .update_status(&ClaimId::new("CLM-42"), &update)
        .await
        .unwrap();

    assert_eq!(claim.status, "IN_REVIEW");
}

#[tokio::test]
async fn test_non_success_is_protocol_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/claims"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"policyNumber unknown"}"#))
        .mount(&server)
        .await;

    let error = store(&server).create_claim(&ClaimFixtures::intake()).await.unwrap_err();

    assert_eq!(error.kind, AdapterErrorKind::Protocol);
    assert_eq!(error.detail, r#"{"error":"policyNumber unknown"}"#);
}

#[tokio::test]
async fn test_missing_claim_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/claims/CLM-404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = store(&server).get_claim(&ClaimId::new("CLM-404")).await.unwrap_err();

    assert_eq!(error.kind, AdapterErrorKind::Protocol);
    assert_eq!(error.detail, "HTTP 404");
}

#[tokio::test]
async fn test_malformed_body_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/claims"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let error = store(&server).list_claims().await.unwrap_err();

    assert_eq!(error.kind, AdapterErrorKind::Protocol);
}

#[tokio::test]
async fn test_slow_store_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/claims"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = AdapterConfig::new(Protocol::Rest, server.uri()).with_timeout_ms(100);
    let error = RestClaimStore::new(&config).unwrap().list_claims().await.unwrap_err();

    assert_eq!(error.kind, AdapterErrorKind::Timeout);
    assert!(error.is_transient());
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    let config = AdapterConfig::new(Protocol::Rest, "http://127.0.0.1:1").with_timeout_ms(2_000);

    let error = RestClaimStore::new(&config).unwrap().list_claims().await.unwrap_err();

    assert_eq!(error.kind, AdapterErrorKind::Transport);
}
