//! Tests for the opaque identifier newtypes

use std::collections::HashSet;

use core_kernel::{ClaimId, ProcessInstanceId, TaskId};
use proptest::prelude::*;

#[test]
fn test_claim_id_prefix() {
    assert_eq!(ClaimId::prefix(), "CLM");
    assert_eq!(ProcessInstanceId::prefix(), "PI");
    assert_eq!(TaskId::prefix(), "TSK");
}

#[test]
fn test_generated_ids_are_unique() {
    let ids: HashSet<ClaimId> = (0..200).map(|_| ClaimId::generate()).collect();
    assert_eq!(ids.len(), 200);
}

#[test]
fn test_claim_id_serializes_transparently() {
    let id = ClaimId::new("CLM-1");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"CLM-1\"");

    let back: ClaimId = serde_json::from_str("\"CLM-1\"").unwrap();
    assert_eq!(back, id);
}

#[test]
fn test_conversions() {
    let from_str: TaskId = "42".into();
    let from_string: TaskId = String::from("42").into();
    assert_eq!(from_str, from_string);
    assert_eq!(from_str.as_ref(), "42");
    assert_eq!(from_str.into_inner(), "42");
}

proptest! {
    #[test]
    fn prop_display_round_trips(raw in "[A-Za-z0-9-]{1,24}") {
        let id = ClaimId::new(raw.clone());
        let parsed: ClaimId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed.as_str(), raw.as_str());
    }
}
