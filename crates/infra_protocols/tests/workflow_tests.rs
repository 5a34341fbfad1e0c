//! Integration tests for the workflow engine client

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use core_kernel::{AdapterConfig, AdapterErrorKind, ClaimId, ProcessInstanceId, Protocol, TaskId};
use domain_claims::ports::WorkflowPort;
use domain_claims::workflow::{ExpertDecision, TaskVariables, WorkflowRunState, WorkflowStartRequest};
use infra_protocols::HttpWorkflowEngine;
use test_utils::ClaimFixtures;

fn engine(server: &MockServer) -> HttpWorkflowEngine {
    let config = AdapterConfig::new(Protocol::Workflow, format!("{}/api", server.uri()));
    HttpWorkflowEngine::new(&config).expect("adapter build")
}

#[tokio::test]
async fn test_start_returns_instance_and_business_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/workflow/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "processInstanceId": "PI-9",
            "businessKey": "CLM-42"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = WorkflowStartRequest::from(&ClaimFixtures::intake());
    let started = engine(&server).start(&request).await.unwrap();

    assert_eq!(started.process_instance_id, ProcessInstanceId::new("PI-9"));
    assert_eq!(started.business_key, ClaimId::new("CLM-42"));
}

#[tokio::test]
async fn test_running_state_exposes_live_activity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/workflow/claims/CLM-42/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "processInstanceId": "PI-9",
            "claimId": "CLM-42",
            "state": "RUNNING",
            "activityId": ["ut_docs"]
        })))
        .mount(&server)
        .await;

    let state = engine(&server).state(&ClaimId::new("CLM-42")).await.unwrap();

    assert_eq!(state.state, WorkflowRunState::Running);
    assert_eq!(state.live_activity(), Some("ut_docs"));
}

#[tokio::test]
async fn test_finished_state_without_instance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/workflow/claims/CLM-42/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "claimId": "CLM-42",
            "state": "FINISHED"
        })))
        .mount(&server)
        .await;

    let state = engine(&server).state(&ClaimId::new("CLM-42")).await.unwrap();

    assert!(state.is_finished());
    assert_eq!(state.process_instance_id, None);
    assert_eq!(state.live_activity(), None);
}

#[tokio::test]
async fn test_tasks_by_claim_and_by_instance() {
    let server = MockServer::start().await;
    let tasks = json!([{"id": "T-1", "name": "Provide documents", "taskDefinitionKey": "ut_docs"}]);
    Mock::given(method("GET"))
        .and(path("/api/workflow/claims/CLM-42/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/workflow/instances/PI-9/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks))
        .mount(&server)
        .await;

    let engine = engine(&server);
    let by_claim = engine.tasks_for_claim(&ClaimId::new("CLM-42")).await.unwrap();
    let by_instance = engine
        .tasks_for_instance(&ProcessInstanceId::new("PI-9"))
        .await
        .unwrap();

    assert_eq!(by_claim, by_instance);
    assert_eq!(by_claim[0].id, TaskId::new("T-1"));
    assert_eq!(by_claim[0].task_definition_key, "ut_docs");
}

#[tokio::test]
async fn test_complete_task_posts_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/workflow/tasks/T-2/complete"))
        .and(body_json(json!({"expertDecision": "APPROVE"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    engine(&server)
        .complete_task(&TaskId::new("T-2"), &TaskVariables::expert_decision(ExpertDecision::Approve))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unknown_claim_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/workflow/claims/CLM-404/state"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no process for claim CLM-404"))
        .mount(&server)
        .await;

    let error = engine(&server).state(&ClaimId::new("CLM-404")).await.unwrap_err();

    assert_eq!(error.kind, AdapterErrorKind::Protocol);
    assert_eq!(error.detail, "no process for claim CLM-404");
}
