//! Notification debouncing
//!
//! A polling view recomputes the same derived state every tick. The deduper
//! remembers the last state it notified about, so an unchanged claim does not
//! produce the same notification again. Each view owns its own deduper; there
//! is no shared registry, so two claims watched by one process cannot suppress
//! each other's notifications.

use core_kernel::ClaimId;

use crate::claim::ClaimEvent;
use crate::progress::event_text;
use crate::workflow::WorkflowRunState;

/// Single-slot debouncer owned by one caller
#[derive(Debug, Clone, Default)]
pub struct NotificationDeduper {
    last_key: Option<String>,
}

impl NotificationDeduper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `(claim, status, workflow state)` differs from the last
    /// remembered state, and remembers it
    pub fn should_notify(
        &mut self,
        claim_id: &ClaimId,
        status: &str,
        workflow_state: Option<WorkflowRunState>,
    ) -> bool {
        let key = format!(
            "{}|{}|{}",
            claim_id,
            status.to_uppercase(),
            workflow_state.map(|state| state.as_str()).unwrap_or_default()
        );

        if self.last_key.as_deref() == Some(key.as_str()) {
            return false;
        }
        self.last_key = Some(key);
        true
    }

    /// The remembered key, if any
    pub fn last_key(&self) -> Option<&str> {
        self.last_key.as_deref()
    }

    /// Forgets the remembered state, e.g. when the view switches claims
    pub fn reset(&mut self) {
        self.last_key = None;
    }
}

/// Returns true when the claim shows signs of an authorized payment
///
/// Either the claim status is approved, or some history event mentions a
/// payment.
pub fn payment_detected(status: &str, history: &[ClaimEvent]) -> bool {
    if status.to_uppercase().contains("APPROVED") {
        return true;
    }
    history.iter().map(event_text).any(|text| {
        ["PAY", "PAID", "AUTHORIZED"]
            .iter()
            .any(|token| text.contains(token))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_includes_workflow_state() {
        let mut deduper = NotificationDeduper::new();
        deduper.should_notify(&ClaimId::new("CLM-1"), "approved", Some(WorkflowRunState::Finished));
        assert_eq!(deduper.last_key(), Some("CLM-1|APPROVED|FINISHED"));
    }

    #[test]
    fn test_key_without_workflow_state() {
        let mut deduper = NotificationDeduper::new();
        deduper.should_notify(&ClaimId::new("CLM-1"), "SUBMITTED", None);
        assert_eq!(deduper.last_key(), Some("CLM-1|SUBMITTED|"));
    }
}
