//! Core Kernel - Foundational types shared by the claims gateway crates
//!
//! This crate provides the building blocks used across the domain and
//! infrastructure layers:
//! - Opaque identifiers issued by the external claim store and workflow engine
//! - The uniform adapter error every protocol adapter reports through
//! - A keyed, single-flight cache for expensive protocol clients

pub mod identifiers;
pub mod error;
pub mod ports;
pub mod cache;

pub use identifiers::{ClaimId, ProcessInstanceId, TaskId};
pub use error::ErrorCategory;
pub use ports::{AdapterError, AdapterErrorKind, AdapterConfig, DomainPort, Protocol, bounded_call};
pub use cache::ClientCache;
