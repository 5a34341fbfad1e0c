//! Custom Test Assertions
//!
//! Provides assertion helpers for saga outcomes and progress projections that
//! give more meaningful failure messages than plain `assert_eq!`.

use core_kernel::{AdapterErrorKind, ErrorCategory};
use domain_claims::progress::{ProjectionResult, Stage, Tone};
use domain_claims::saga::{SagaError, SagaResult, SagaStepName};

/// Asserts that every saga step completed
pub fn assert_saga_completed(result: &SagaResult) {
    assert!(
        result.ok(),
        "Expected saga to complete, it halted at {:?} with {:?}",
        result.failing_step(),
        result.error()
    );
    let names: Vec<SagaStepName> = result.steps.iter().map(|step| step.name).collect();
    assert_eq!(names, SagaStepName::ALL.to_vec(), "Unexpected completed steps");
}

/// Asserts that the saga halted at `step`, with exactly the steps before it completed
pub fn assert_saga_halted_at(result: &SagaResult, step: SagaStepName) {
    assert_eq!(
        result.failing_step(),
        Some(step),
        "Expected saga to halt at {step}, completed steps: {:?}",
        result.steps.iter().map(|s| s.name).collect::<Vec<_>>()
    );
    let expected: Vec<SagaStepName> = SagaStepName::ALL[..step.position() - 1].to_vec();
    let names: Vec<SagaStepName> = result.steps.iter().map(|s| s.name).collect();
    assert_eq!(names, expected, "Steps before {step} should be exactly the completed ones");
}

/// Asserts the kind of adapter error the saga halted with
pub fn assert_adapter_failure(result: &SagaResult, kind: AdapterErrorKind) {
    match result.error() {
        Some(SagaError::Adapter(error)) => assert_eq!(
            error.kind, kind,
            "Expected {kind} failure, got {error}"
        ),
        other => panic!("Expected adapter failure of kind {kind}, got {other:?}"),
    }
}

/// Asserts that the saga halted because a backend refused the claim
pub fn assert_rejected(result: &SagaResult) {
    match result.error() {
        Some(error) => assert_eq!(
            error.category(),
            ErrorCategory::ValidationRejected,
            "Expected a rejection, got {error}"
        ),
        None => panic!("Expected a rejection, saga completed"),
    }
}

/// Asserts the full tone vector of a projection, naming the first mismatching stage
pub fn assert_tones(result: &ProjectionResult, expected: [Tone; 8]) {
    for (stage, tone) in result.stages() {
        assert_eq!(
            tone,
            expected[stage.index()],
            "Stage {} ({}) has tone {:?}, expected {:?}; reached={}",
            stage.key(),
            stage.index(),
            tone,
            expected[stage.index()],
            result.reached
        );
    }
}

/// Asserts that every stage carries `tone`
pub fn assert_all_tones(result: &ProjectionResult, tone: Tone) {
    assert_tones(result, [tone; 8]);
}

/// Asserts the tone of a single stage
pub fn assert_stage_tone(result: &ProjectionResult, stage: Stage, tone: Tone) {
    assert_eq!(
        result.tone(stage),
        tone,
        "Stage {} has tone {:?}, expected {:?}",
        stage.key(),
        result.tone(stage),
        tone
    );
}
