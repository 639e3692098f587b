use thiserror::Error;

#[derive(Error, Debug)]
pub enum AxonError {
    /// Startup-time programmer error: two modules claimed the same
    /// state-slice key. Aborts module initialization.
    #[error("namespace `{0}` is already registered")]
    DuplicateNamespace(String),

    /// A loading counter was decremented below zero. Reported as a defect,
    /// never clamped.
    #[error("loading counter `{0}` decremented below zero")]
    LoadingUnderflow(String),

    #[error("malformed {action} payload: {reason}")]
    InvalidPayload { action: String, reason: String },

    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}
