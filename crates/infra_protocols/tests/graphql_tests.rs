//! Integration tests for the GraphQL policy adapter

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use core_kernel::{AdapterConfig, AdapterErrorKind, Protocol};
use domain_claims::claim::ClaimType;
use domain_claims::ports::{PolicyCheck, PolicyPort};
use infra_protocols::GraphqlPolicyValidator;

fn validator(server: &MockServer) -> GraphqlPolicyValidator {
    let config = AdapterConfig::new(Protocol::Graphql, format!("{}/graphql", server.uri()));
    GraphqlPolicyValidator::new(&config).expect("adapter build")
}

fn check() -> PolicyCheck {
    PolicyCheck {
        policy_number: "POL-1001".to_string(),
        claim_type: ClaimType::Accident,
    }
}

#[tokio::test]
async fn test_sends_variables_and_reads_validation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "variables": {"policyNumber": "POL-1001", "claimType": "ACCIDENT"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"validatePolicy": {"valid": true, "covered": true, "message": "POLICY_VALID"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let validation = validator(&server).validate_policy(&check()).await.unwrap();

    assert!(validation.accepts());
    assert_eq!(validation.message.as_deref(), Some("POLICY_VALID"));
}

#[tokio::test]
async fn test_uncovered_claim_type_is_an_answer_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"validatePolicy": {"valid": true, "covered": false, "message": null}}
        })))
        .mount(&server)
        .await;

    let validation = validator(&server).validate_policy(&check()).await.unwrap();

    assert!(validation.valid);
    assert!(!validation.covered);
    assert!(!validation.accepts());
}

#[tokio::test]
async fn test_errors_array_is_protocol_error_even_with_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"validatePolicy": {"valid": true, "covered": true, "message": null}},
            "errors": [{"message": "Variable 'claimType' has an invalid value"}]
        })))
        .mount(&server)
        .await;

    let error = validator(&server).validate_policy(&check()).await.unwrap_err();

    assert_eq!(error.kind, AdapterErrorKind::Protocol);
    assert!(error.detail.contains("Variable 'claimType' has an invalid value"));
}

#[tokio::test]
async fn test_empty_errors_array_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"validatePolicy": {"valid": false, "covered": false, "message": "POLICY_INVALID"}},
            "errors": []
        })))
        .mount(&server)
        .await;

    let validation = validator(&server).validate_policy(&check()).await.unwrap();

    assert!(!validation.valid);
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let error = validator(&server).validate_policy(&check()).await.unwrap_err();

    assert_eq!(error.kind, AdapterErrorKind::Transport);
    assert!(error.detail.contains("upstream down"));
}

#[tokio::test]
async fn test_missing_data_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let error = validator(&server).validate_policy(&check()).await.unwrap_err();

    assert_eq!(error.kind, AdapterErrorKind::Protocol);
}
