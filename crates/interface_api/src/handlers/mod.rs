//! Request handlers

pub mod health;
pub mod process;
pub mod passthrough;
pub mod progress;
