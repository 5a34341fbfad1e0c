//! Claim progress tracking
//!
//! Assembles everything the portal shows for one claim: the claim record, its
//! history, the workflow state, open tasks, and the derived projection.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use core_kernel::{AdapterError, ClaimId};

use crate::claim::{Claim, ClaimEvent};
use crate::notification::payment_detected;
use crate::ports::{ClaimStorePort, WorkflowPort};
use crate::progress::{now_message, project, ProjectionResult};
use crate::workflow::{WorkflowState, WorkflowTask};

/// Everything known about a claim at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub claim: Claim,
    pub history: Vec<ClaimEvent>,
    pub workflow: WorkflowState,
    pub tasks: Vec<WorkflowTask>,
    pub projection: ProjectionResult,
    pub now_message: String,
}

impl ProgressSnapshot {
    pub fn payment_detected(&self) -> bool {
        payment_detected(&self.claim.status, &self.history)
    }
}

/// Shortest interval `watch` polls at; smaller values are raised to it
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Reads claim and workflow state and projects the claim's progress
pub struct ProgressTracker {
    claims: Arc<dyn ClaimStorePort>,
    workflow: Arc<dyn WorkflowPort>,
}

impl ProgressTracker {
    pub fn new(claims: Arc<dyn ClaimStorePort>, workflow: Arc<dyn WorkflowPort>) -> Self {
        Self { claims, workflow }
    }

    /// Fetches the four inputs concurrently and projects them
    pub async fn snapshot(&self, claim_id: &ClaimId) -> Result<ProgressSnapshot, AdapterError> {
        let (claim, history, workflow, tasks) = tokio::try_join!(
            self.claims.get_claim(claim_id),
            self.claims.history(claim_id),
            self.workflow.state(claim_id),
            self.workflow.tasks_for_claim(claim_id),
        )?;

        let live_activity = workflow.live_activity();
        let projection = project(
            &history,
            live_activity,
            Some(workflow.state),
            Some(claim.status.as_str()),
        );
        let now_message = now_message(live_activity, Some(workflow.state), Some(claim.status.as_str()));

        debug!(
            claim_id = %claim_id,
            reached = projection.reached,
            state = %workflow.state,
            "progress snapshot taken"
        );

        Ok(ProgressSnapshot {
            claim,
            history,
            workflow,
            tasks,
            projection,
            now_message,
        })
    }

    /// Polls the claim every `interval` until the receiver is dropped
    ///
    /// Failed polls are delivered as errors and polling carries on. Intervals
    /// below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn watch(
        self: Arc<Self>,
        claim_id: ClaimId,
        interval: Duration,
    ) -> mpsc::Receiver<Result<ProgressSnapshot, AdapterError>> {
        let (tx, rx) = mpsc::channel(1);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(MIN_POLL_INTERVAL));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let result = self.snapshot(&claim_id).await;
                if let Err(error) = &result {
                    warn!(claim_id = %claim_id, error = %error, "progress poll failed");
                }
                if tx.send(result).await.is_err() {
                    debug!(claim_id = %claim_id, "progress watcher dropped");
                    break;
                }
            }
        });

        rx
    }
}
