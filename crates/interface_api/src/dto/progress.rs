//! Claim progress DTOs

use serde::Serialize;

use core_kernel::ClaimId;
use domain_claims::{ClaimEvent, ProgressSnapshot, Tone, WorkflowRunState, WorkflowTask};
use domain_claims::progress::status_tone;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageView {
    pub key: &'static str,
    pub title: &'static str,
    pub tone: Tone,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub claim_id: ClaimId,
    pub status: String,
    pub status_tone: Tone,
    pub reached: usize,
    pub stages: Vec<StageView>,
    pub now_message: String,
    pub workflow_state: WorkflowRunState,
    pub live_activity: Option<String>,
    pub tasks: Vec<WorkflowTask>,
    pub payment_detected: bool,
    pub history: Vec<ClaimEvent>,
}

impl From<ProgressSnapshot> for ProgressResponse {
    fn from(snapshot: ProgressSnapshot) -> Self {
        let payment_detected = snapshot.payment_detected();
        let stages = snapshot
            .projection
            .stages()
            .map(|(stage, tone)| StageView {
                key: stage.key(),
                title: stage.title(),
                tone,
            })
            .collect();

        Self {
            status_tone: status_tone(&snapshot.claim.status),
            live_activity: snapshot.workflow.live_activity().map(str::to_string),
            workflow_state: snapshot.workflow.state,
            reached: snapshot.projection.reached,
            claim_id: snapshot.claim.id,
            status: snapshot.claim.status,
            stages,
            now_message: snapshot.now_message,
            tasks: snapshot.tasks,
            payment_detected,
            history: snapshot.history,
        }
    }
}
