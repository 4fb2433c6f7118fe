//! Engine-level errors.

use thiserror::Error;

use lossdesk_infra::StoreError;

/// Failure surfaced to the embedding transport.
///
/// Invalid input, stale references and lost close races are handled inside
/// the engine — they produce a prompt, not an error. Whatever escapes here
/// already tore the session down; the user has to restart the flow.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A store call failed while handling the event.
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    /// The session reached a state its draft cannot support.
    #[error("inconsistent session: {0}")]
    Inconsistent(String),
}

impl EngineError {
    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::Inconsistent(msg.into())
    }
}
