//! Tests for the progress projection

use proptest::prelude::*;

use domain_claims::progress::{project, status_tone, ProjectionResult, Stage, STAGE_COUNT};
use domain_claims::workflow::{WorkflowRunState, DOCS_ACTIVITY, EXPERT_ACTIVITY};
use test_utils::{
    assert_all_tones, assert_stage_tone, assert_tones, history_strategy, live_activity_strategy,
    terminal_status_strategy, workflow_state_strategy, EventFixtures,
};

use domain_claims::progress::Tone::{Bad, Good, None as Blank, Warn};

// ============================================================================
// Scenarios
// ============================================================================

mod scenario_tests {
    use super::*;

    #[test]
    fn test_submitted_only() {
        let events = EventFixtures::history(&[("SUBMITTED", "")]);

        let result = project(&events, None, Some(WorkflowRunState::Running), None);

        assert_eq!(result.reached, 1);
        assert_tones(&result, [Good, Blank, Blank, Blank, Blank, Blank, Blank, Blank]);
    }

    #[test]
    fn test_waiting_in_docs_without_history() {
        let result = project(&[], Some(DOCS_ACTIVITY), Some(WorkflowRunState::Running), None);

        assert_eq!(result.reached, 4);
        assert_tones(&result, [Good, Good, Good, Good, Warn, Blank, Blank, Blank]);
    }

    #[test]
    fn test_finished_and_approved() {
        let events = EventFixtures::history(&[("SUBMITTED", "")]);

        let result = project(&events, None, Some(WorkflowRunState::Finished), Some("APPROVED"));

        assert_eq!(result.reached, STAGE_COUNT);
        assert!(result.is_complete());
        assert_all_tones(&result, Good);
    }

    #[test]
    fn test_finished_and_rejected_reports_every_stage_good() {
        let events = EventFixtures::history(&[("SUBMITTED", ""), ("REJECTED", "expert rejected")]);

        let result = project(&events, None, Some(WorkflowRunState::Finished), Some("REJECTED"));

        assert_eq!(result.reached, STAGE_COUNT);
        assert_all_tones(&result, Good);
    }

    #[test]
    fn test_rejected_while_running_splits_good_and_bad() {
        let result = project(
            &EventFixtures::through_fraud(),
            None,
            Some(WorkflowRunState::Running),
            Some("REJECTED"),
        );

        assert_eq!(result.reached, 4);
        assert_tones(&result, [Good, Good, Good, Good, Bad, Bad, Bad, Bad]);
    }

    #[test]
    fn test_waiting_for_expert_after_automated_checks() {
        let result = project(
            &EventFixtures::through_fraud(),
            Some(EXPERT_ACTIVITY),
            Some(WorkflowRunState::Running),
            Some("IN_REVIEW"),
        );

        assert_eq!(result.reached, 5);
        assert_stage_tone(&result, Stage::Docs, Good);
        assert_stage_tone(&result, Stage::Expert, Warn);
        assert_stage_tone(&result, Stage::Payment, Blank);
    }

    #[test]
    fn test_live_activity_matches_case_insensitively_for_reached() {
        let result = project(&[], Some("UT_EXPERT"), Some(WorkflowRunState::Running), None);

        assert_eq!(result.reached, 5);
        // The warn tone compares activity ids exactly.
        assert_stage_tone(&result, Stage::Expert, Blank);
    }

    #[test]
    fn test_approved_while_running_marks_payment_and_done() {
        let events = EventFixtures::history(&[("SUBMITTED", "")]);

        let result = project(&events, None, Some(WorkflowRunState::Running), Some("APPROVED"));

        assert_stage_tone(&result, Stage::Submitted, Good);
        assert_stage_tone(&result, Stage::Identity, Blank);
        assert_stage_tone(&result, Stage::Payment, Good);
        assert_stage_tone(&result, Stage::Done, Good);
    }

    #[test]
    fn test_message_keywords_count_towards_stages() {
        let events = EventFixtures::history(&[("IN_REVIEW", "payment sent to bank")]);

        let result = project(&events, None, None, None);

        assert_eq!(result.reached, Stage::Payment.index() + 1);
    }

    #[test]
    fn test_empty_inputs_reach_nothing() {
        let result = project(&[], None, None, None);

        assert_eq!(result, ProjectionResult { tones: [Blank; 8], reached: 0 });
    }
}

// ============================================================================
// Status tone
// ============================================================================

mod status_tone_tests {
    use super::*;

    #[test]
    fn test_failures_are_bad() {
        for status in ["REJECTED", "IDENTITY_FAILED", "POLICY_INVALID", "PAYMENT_FAILED"] {
            assert_eq!(status_tone(status), Bad, "{status}");
        }
    }

    #[test]
    fn test_successes_are_good() {
        for status in ["APPROVED", "PAYMENT_AUTHORIZED", "IDENTITY_VERIFIED", "POLICY_VALID"] {
            assert_eq!(status_tone(status), Good, "{status}");
        }
    }

    #[test]
    fn test_holds_are_warn() {
        assert_eq!(status_tone("SUSPENDED"), Warn);
        assert_eq!(status_tone("in_review"), Warn);
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn projection_is_deterministic(
        events in history_strategy(12),
        activity in live_activity_strategy(),
        state in workflow_state_strategy(),
        terminal in terminal_status_strategy(),
    ) {
        let first = project(&events, activity.as_deref(), state, terminal.as_deref());
        let second = project(&events, activity.as_deref(), state, terminal.as_deref());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn appending_events_never_lowers_reached(
        prefix in history_strategy(8),
        suffix in history_strategy(8),
        activity in live_activity_strategy(),
        state in workflow_state_strategy(),
    ) {
        let before = project(&prefix, activity.as_deref(), state, None);
        let mut extended = prefix.clone();
        extended.extend(suffix);
        let after = project(&extended, activity.as_deref(), state, None);
        prop_assert!(after.reached >= before.reached);
    }

    #[test]
    fn rejection_splits_at_reached(
        events in history_strategy(12),
        activity in live_activity_strategy(),
        state in workflow_state_strategy(),
        prefix in "[A-Z_]{0,6}",
    ) {
        let terminal = format!("{prefix}REJECTED");
        let result = project(&events, activity.as_deref(), state, Some(terminal.as_str()));
        for (stage, tone) in result.stages() {
            let expected = if stage.index() < result.reached { Good } else { Bad };
            prop_assert_eq!(tone, expected);
        }
    }

    #[test]
    fn finished_workflow_reaches_every_stage(
        events in history_strategy(12),
        activity in live_activity_strategy(),
        terminal in terminal_status_strategy(),
    ) {
        let result = project(&events, activity.as_deref(), Some(WorkflowRunState::Finished), terminal.as_deref());
        prop_assert_eq!(result.reached, STAGE_COUNT);
    }

    #[test]
    fn reached_never_exceeds_stage_count(
        events in history_strategy(16),
        activity in live_activity_strategy(),
        state in workflow_state_strategy(),
        terminal in terminal_status_strategy(),
    ) {
        let result = project(&events, activity.as_deref(), state, terminal.as_deref());
        prop_assert!(result.reached <= STAGE_COUNT);
    }
}
