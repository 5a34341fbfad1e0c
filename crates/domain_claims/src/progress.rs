//! Claim progress projection
//!
//! Reconstructs where a claim stands in the eight-stage approval pipeline from
//! its sparse history plus the live signals of the workflow engine.
//!
//! # Algorithm
//!
//! 1. A stage is *matched* when any event is classified as belonging to it.
//! 2. `reached` is one past the highest matched stage (0 when none matched).
//! 3. A live user task raises `reached` to the index of its stage, marking the
//!    stages before it as done while the waiting stage itself stays open.
//! 4. A finished workflow forces `reached` to 8.
//! 5. Each stage then gets a [`Tone`] from `reached`, the live activity and the
//!    terminal status.
//!
//! Because step 4 runs before the rejection rule, a finished workflow with a
//! rejected claim reports every stage as good. This is the observed behavior
//! of the portal and is kept as is.
//!
//! Classification of an event is isolated behind [`EventClassifier`], so the
//! keyword heuristic can be swapped for structured events without touching
//! callers of [`project`].

use serde::{Deserialize, Serialize};

use crate::claim::ClaimEvent;
use crate::workflow::{WorkflowRunState, DOCS_ACTIVITY, EXPERT_ACTIVITY};

/// Number of stages in the approval pipeline
pub const STAGE_COUNT: usize = 8;

/// One milestone of the approval pipeline, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Submitted,
    Identity,
    Policy,
    Fraud,
    Docs,
    Expert,
    Payment,
    Done,
}

impl Stage {
    pub const ALL: [Stage; STAGE_COUNT] = [
        Stage::Submitted,
        Stage::Identity,
        Stage::Policy,
        Stage::Fraud,
        Stage::Docs,
        Stage::Expert,
        Stage::Payment,
        Stage::Done,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn key(&self) -> &'static str {
        match self {
            Stage::Submitted => "submitted",
            Stage::Identity => "identity",
            Stage::Policy => "policy",
            Stage::Fraud => "fraud",
            Stage::Docs => "docs",
            Stage::Expert => "expert",
            Stage::Payment => "payment",
            Stage::Done => "done",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Stage::Submitted => "Claim submitted (REST)",
            Stage::Identity => "Identity verification (SOAP)",
            Stage::Policy => "Policy validation (GraphQL)",
            Stage::Fraud => "Fraud detection (gRPC)",
            Stage::Docs => "Document review (User Task)",
            Stage::Expert => "Expert assessment (User Task)",
            Stage::Payment => "Payment authorization",
            Stage::Done => "Completed",
        }
    }

    /// Uppercase tokens that mark an event as belonging to this stage
    pub fn tokens(&self) -> &'static [&'static str] {
        match self {
            Stage::Submitted => &["SUBMITTED"],
            Stage::Identity => &["IDENTITY", "SOAP", "VERIFIED"],
            Stage::Policy => &["POLICY", "COVER", "VALID", "GRAPHQL"],
            Stage::Fraud => &["FRAUD", "RISK", "GRPC"],
            Stage::Docs => &["DOC", "DOCUMENT", "UT_DOCS"],
            Stage::Expert => &["EXPERT", "UT_EXPERT"],
            Stage::Payment => &["PAY", "PAYMENT", "AUTHORIZED", "PAID"],
            Stage::Done => &["APPROVED", "REJECTED", "COMPLETED", "FINISHED"],
        }
    }

    /// Workflow activity that means the process is waiting in this stage
    pub fn trigger_activity(&self) -> Option<&'static str> {
        match self {
            Stage::Docs => Some(DOCS_ACTIVITY),
            Stage::Expert => Some(EXPERT_ACTIVITY),
            _ => None,
        }
    }

    /// Stage whose user task matches the activity id, compared case-insensitively
    pub fn for_activity(activity: &str) -> Option<Stage> {
        let activity = activity.to_lowercase();
        Stage::ALL
            .into_iter()
            .find(|stage| stage.trigger_activity() == Some(activity.as_str()))
    }
}

/// Rendering classification of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    None,
    Good,
    Warn,
    Bad,
}

/// Per-stage tones plus the number of stages considered reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub tones: [Tone; STAGE_COUNT],
    pub reached: usize,
}

impl ProjectionResult {
    pub fn tone(&self, stage: Stage) -> Tone {
        self.tones[stage.index()]
    }

    /// Stages paired with their tones, in pipeline order
    pub fn stages(&self) -> impl Iterator<Item = (Stage, Tone)> + '_ {
        Stage::ALL.into_iter().zip(self.tones.iter().copied())
    }

    pub fn is_complete(&self) -> bool {
        self.reached == STAGE_COUNT
    }
}

/// Decides whether a history event belongs to a stage
pub trait EventClassifier {
    fn matches(&self, stage: Stage, event: &ClaimEvent) -> bool;
}

/// Matches the uppercased `status + " " + message` against each stage's tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl EventClassifier for KeywordClassifier {
    fn matches(&self, stage: Stage, event: &ClaimEvent) -> bool {
        let text = event_text(event);
        stage.tokens().iter().any(|token| text.contains(token))
    }
}

/// Uppercased searchable text of an event
pub fn event_text(event: &ClaimEvent) -> String {
    format!("{} {}", event.status, event.message).to_uppercase()
}

/// Projects a claim's progress using the keyword classifier
pub fn project(
    events: &[ClaimEvent],
    live_activity: Option<&str>,
    workflow_state: Option<WorkflowRunState>,
    terminal_status: Option<&str>,
) -> ProjectionResult {
    project_with(&KeywordClassifier, events, live_activity, workflow_state, terminal_status)
}

/// Projects a claim's progress using the given classifier
pub fn project_with<C: EventClassifier + ?Sized>(
    classifier: &C,
    events: &[ClaimEvent],
    live_activity: Option<&str>,
    workflow_state: Option<WorkflowRunState>,
    terminal_status: Option<&str>,
) -> ProjectionResult {
    let mut reached = Stage::ALL
        .into_iter()
        .filter(|stage| events.iter().any(|event| classifier.matches(*stage, event)))
        .map(|stage| stage.index() + 1)
        .max()
        .unwrap_or(0);

    if let Some(waiting) = live_activity.and_then(Stage::for_activity) {
        reached = reached.max(waiting.index());
    }

    if workflow_state == Some(WorkflowRunState::Finished) {
        reached = STAGE_COUNT;
    }

    let terminal = terminal_status.unwrap_or_default().to_uppercase();
    let rejected = terminal.contains("REJECT");
    let approved = terminal.contains("APPROVED");

    let mut tones = [Tone::None; STAGE_COUNT];
    for (stage, tone) in Stage::ALL.into_iter().zip(tones.iter_mut()) {
        let i = stage.index();
        *tone = if rejected {
            if i < reached { Tone::Good } else { Tone::Bad }
        } else if live_activity.is_some() && stage.trigger_activity() == live_activity {
            Tone::Warn
        } else if approved && matches!(stage, Stage::Payment | Stage::Done) {
            Tone::Good
        } else if i < reached {
            Tone::Good
        } else {
            Tone::None
        };
    }

    ProjectionResult { tones, reached }
}

/// Classifies a raw claim status for display
///
/// Failure tokens are checked before success tokens. This deliberately differs
/// from the portal's success-first order, which renders `POLICY_INVALID` as
/// good because it contains `VALID`.
pub fn status_tone(status: &str) -> Tone {
    let s = status.to_uppercase();

    if contains_any(&s, &["REJECT", "FAILED", "INVALID"]) {
        Tone::Bad
    } else if contains_any(&s, &["APPROVED", "AUTHORIZED", "VERIFIED", "VALID"]) {
        Tone::Good
    } else if contains_any(&s, &["SUSPEND", "REVIEW"]) {
        Tone::Warn
    } else {
        Tone::None
    }
}

fn contains_any(text: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| text.contains(token))
}

/// One-line description of what the claim is waiting for
pub fn now_message(
    live_activity: Option<&str>,
    workflow_state: Option<WorkflowRunState>,
    status: Option<&str>,
) -> String {
    let status = status.unwrap_or_default().to_uppercase();

    if workflow_state == Some(WorkflowRunState::Finished) {
        return if status.contains("APPROVED") {
            "Approved. Payment authorized (demo).".to_string()
        } else if status.contains("REJECT") {
            "Rejected. Customer will see the decision in the portal.".to_string()
        } else {
            "Process finished.".to_string()
        };
    }

    match live_activity {
        Some(DOCS_ACTIVITY) => {
            "Waiting for expert to validate documents (Docs OK / Docs Missing).".to_string()
        }
        Some(EXPERT_ACTIVITY) => "Waiting for expert to approve or reject the claim.".to_string(),
        Some(activity) if !activity.is_empty() => format!("Workflow is running ({activity})."),
        _ => "Workflow is progressing...".to_string(),
    }
}
