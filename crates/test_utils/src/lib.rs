//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims gateway test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for claims, events and workflow state
//! - `fakes`: In-memory implementations of the backend ports
//! - `assertions`: Custom assertion helpers for saga and projection results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod fakes;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use fakes::*;
pub use assertions::*;
pub use generators::*;
