//! Property-Based Test Generators
//!
//! Provides proptest strategies for claim intakes, history events and the
//! live workflow signals fed into the progress projection.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_claims::claim::{ClaimEvent, ClaimIntake, ClaimType};
use domain_claims::workflow::{WorkflowRunState, DOCS_ACTIVITY, EXPERT_ACTIVITY};

/// Strategy for generating claim types
pub fn claim_type_strategy() -> impl Strategy<Value = ClaimType> {
    prop_oneof![
        Just(ClaimType::Accident),
        Just(ClaimType::Theft),
        Just(ClaimType::Fire),
        Just(ClaimType::Health),
        Just(ClaimType::Other),
    ]
}

/// Strategy for generating amounts the portal accepts (0.01 to 1,000,000.00)
pub fn accepted_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating valid claim intakes
pub fn intake_strategy() -> impl Strategy<Value = ClaimIntake> {
    (
        "CUST-[0-9]{3,6}",
        "[A-Z][a-z]{2,8} [A-Z][a-z]{2,10}",
        "POL-[0-9]{4}",
        claim_type_strategy(),
        accepted_amount_strategy(),
        "[a-z]{4,12}( [a-z]{2,10}){0,5}",
    )
        .prop_map(|(customer_id, full_name, policy_number, claim_type, claimed_amount, description)| {
            ClaimIntake {
                customer_id,
                full_name,
                policy_number,
                claim_type,
                claimed_amount,
                description,
            }
        })
}

/// Strategy for generating status strings, known and unknown
pub fn status_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("SUBMITTED".to_string()),
        Just("IDENTITY_VERIFIED".to_string()),
        Just("IDENTITY_FAILED".to_string()),
        Just("POLICY_VALID".to_string()),
        Just("POLICY_INVALID".to_string()),
        Just("FRAUD_LOW".to_string()),
        Just("FRAUD_HIGH".to_string()),
        Just("IN_REVIEW".to_string()),
        Just("SUSPENDED".to_string()),
        Just("APPROVED".to_string()),
        Just("REJECTED".to_string()),
        Just("PAYMENT_AUTHORIZED".to_string()),
        "[A-Z_]{0,12}",
    ]
}

/// Strategy for generating free-text event messages
pub fn message_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("SOAP identity check passed".to_string()),
        Just("policy covers claim type".to_string()),
        Just("gRPC risk LOW".to_string()),
        Just("documents uploaded".to_string()),
        Just("expert assigned".to_string()),
        Just("payment sent".to_string()),
        "[a-z ]{0,24}",
    ]
}

/// Strategy for generating history events
pub fn event_strategy() -> impl Strategy<Value = ClaimEvent> {
    (0i64..10_000i64, status_strategy(), message_strategy()).prop_map(|(minutes, status, message)| {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default();
        ClaimEvent::new(start + Duration::minutes(minutes), status, message)
    })
}

/// Strategy for generating histories of up to `max` events
pub fn history_strategy(max: usize) -> impl Strategy<Value = Vec<ClaimEvent>> {
    proptest::collection::vec(event_strategy(), 0..=max)
}

/// Strategy for generating the live activity id, if any
pub fn live_activity_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(DOCS_ACTIVITY.to_string())),
        Just(Some(EXPERT_ACTIVITY.to_string())),
        Just(Some("st_fraud".to_string())),
        Just(Some("gw_decision".to_string())),
    ]
}

/// Strategy for generating the workflow run state, if known
pub fn workflow_state_strategy() -> impl Strategy<Value = Option<WorkflowRunState>> {
    prop_oneof![
        Just(None),
        Just(Some(WorkflowRunState::Running)),
        Just(Some(WorkflowRunState::Finished)),
    ]
}

/// Strategy for generating the claim's terminal status, if any
pub fn terminal_status_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(status_strategy())
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_intakes_pass_validation(intake in intake_strategy()) {
            prop_assert!(intake.validate().is_ok());
        }

        #[test]
        fn accepted_amounts_are_in_range(amount in accepted_amount_strategy()) {
            prop_assert!(amount > Decimal::ZERO);
            prop_assert!(amount <= domain_claims::claim::MAX_CLAIMED_AMOUNT);
        }
    }
}
