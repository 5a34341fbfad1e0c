//! Request/response data transfer objects

pub mod process;
pub mod progress;

use serde::Serialize;

/// Success envelope of the passthrough endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { ok: true, data }
    }
}
