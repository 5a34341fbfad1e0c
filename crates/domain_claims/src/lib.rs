//! Claims Domain
//!
//! This crate holds the logic of the claims portal that carries real
//! invariants: projecting a claim's progress through the approval pipeline,
//! debouncing notifications, and running the submission saga across the four
//! backend protocols.
//!
//! # Approval Pipeline
//!
//! ```text
//! submitted -> identity -> policy -> fraud -> docs -> expert -> payment -> done
//! ```
//!
//! # Submission Saga
//!
//! ```text
//! create claim (REST) -> verify identity (SOAP) -> validate policy (GraphQL) -> score fraud (gRPC)
//! ```
//!
//! The saga halts on the first failure and never compensates: a claim created
//! by the first step stays in the store.

pub mod claim;
pub mod error;
pub mod progress;
pub mod notification;
pub mod workflow;
pub mod ports;
pub mod saga;
pub mod tracking;

pub use claim::{Claim, ClaimEvent, ClaimIntake, ClaimStatus, ClaimType, StatusUpdate};
pub use error::ClaimError;
pub use progress::{project, project_with, EventClassifier, KeywordClassifier, ProjectionResult, Stage, Tone};
pub use notification::NotificationDeduper;
pub use workflow::{WorkflowRunState, WorkflowState, WorkflowTask};
pub use saga::{RejectionPolicy, SagaError, SagaFailure, SagaOrchestrator, SagaResult, SagaStep, SagaStepName};
pub use tracking::{ProgressSnapshot, ProgressTracker};
