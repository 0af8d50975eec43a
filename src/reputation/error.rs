use thiserror::Error;

use super::types::SourceKind;

/// Lookup failures. The enricher absorbs all of them into a zero signal.
#[derive(Debug, Error)]
pub enum ReputationError {
    #[error("{source_kind} request failed: {reason}")]
    RequestFailed {
        source_kind: SourceKind,
        reason: String,
    },

    #[error("{source_kind} returned status {status}")]
    BadStatus { source_kind: SourceKind, status: u16 },

    #[error("{source_kind} response could not be parsed: {reason}")]
    InvalidResponse {
        source_kind: SourceKind,
        reason: String,
    },

    #[error("{source_kind} user not found: {username}")]
    UserNotFound {
        source_kind: SourceKind,
        username: String,
    },

    #[error("{source_kind} lookup timed out after {timeout_ms}ms")]
    Timeout {
        source_kind: SourceKind,
        timeout_ms: u64,
    },

    #[error("failed to build HTTP client: {reason}")]
    ClientBuild { reason: String },
}
