//! Tests for notification debouncing and payment detection

use core_kernel::ClaimId;
use domain_claims::notification::{payment_detected, NotificationDeduper};
use domain_claims::workflow::WorkflowRunState;
use test_utils::EventFixtures;

#[test]
fn test_first_observation_notifies() {
    let mut deduper = NotificationDeduper::new();

    assert!(deduper.should_notify(&ClaimId::new("CLM-1"), "SUBMITTED", Some(WorkflowRunState::Running)));
}

#[test]
fn test_unchanged_state_is_suppressed() {
    let mut deduper = NotificationDeduper::new();
    let claim = ClaimId::new("CLM-1");

    assert!(deduper.should_notify(&claim, "IN_REVIEW", Some(WorkflowRunState::Running)));
    assert!(!deduper.should_notify(&claim, "IN_REVIEW", Some(WorkflowRunState::Running)));
    assert!(!deduper.should_notify(&claim, "in_review", Some(WorkflowRunState::Running)));
}

#[test]
fn test_any_component_change_notifies() {
    let mut deduper = NotificationDeduper::new();
    let claim = ClaimId::new("CLM-1");

    assert!(deduper.should_notify(&claim, "APPROVED", Some(WorkflowRunState::Running)));
    assert!(deduper.should_notify(&claim, "APPROVED", Some(WorkflowRunState::Finished)));
    assert!(deduper.should_notify(&ClaimId::new("CLM-2"), "APPROVED", Some(WorkflowRunState::Finished)));
}

#[test]
fn test_returning_to_an_earlier_state_notifies_again() {
    let mut deduper = NotificationDeduper::new();
    let claim = ClaimId::new("CLM-1");

    assert!(deduper.should_notify(&claim, "SUSPENDED", None));
    assert!(deduper.should_notify(&claim, "IN_REVIEW", None));
    assert!(deduper.should_notify(&claim, "SUSPENDED", None));
}

#[test]
fn test_dedupers_do_not_share_state() {
    let mut first = NotificationDeduper::new();
    let mut second = NotificationDeduper::new();
    let claim = ClaimId::new("CLM-1");

    assert!(first.should_notify(&claim, "APPROVED", None));
    assert!(second.should_notify(&claim, "APPROVED", None));
}

#[test]
fn test_reset_forgets_last_key() {
    let mut deduper = NotificationDeduper::new();
    let claim = ClaimId::new("CLM-1");
    deduper.should_notify(&claim, "APPROVED", None);

    deduper.reset();

    assert_eq!(deduper.last_key(), None);
    assert!(deduper.should_notify(&claim, "APPROVED", None));
}

#[test]
fn test_payment_detected_from_status() {
    assert!(payment_detected("approved", &[]));
    assert!(!payment_detected("IN_REVIEW", &[]));
}

#[test]
fn test_payment_detected_from_history() {
    let history = EventFixtures::history(&[
        ("SUBMITTED", "Claim submitted"),
        ("IN_REVIEW", "Payment authorized by finance"),
    ]);

    assert!(payment_detected("IN_REVIEW", &history));
    assert!(!payment_detected("IN_REVIEW", &EventFixtures::through_fraud()));
}
