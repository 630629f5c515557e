use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of a wholesale CSV list replacement, as reported by the backend.
/// A rejected upload comes back with `count == 0` and a populated `error`
/// rather than as a transport failure, so it can be shown inline next to
/// the upload control.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadOutcome {
    pub count: u64,
    pub error: Option<String>,
}

impl UploadOutcome {
    pub fn ok(count: u64) -> Self {
        Self { count, error: None }
    }

    pub fn rejected(error: String) -> Self {
        Self {
            count: 0,
            error: Some(error),
        }
    }
}
