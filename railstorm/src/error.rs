use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for a single loop iteration.
///
/// All three origins funnel into the same recovery path; the discriminant only
/// shows up in log output so the kinds can be told apart after the fact.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure from any HTTP call (connect, decode, non-2xx).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// A mutation's response envelope did not report success.
    #[error("business failure from {endpoint}: {detail}")]
    Business {
        endpoint: &'static str,
        detail: String,
    },

    /// A precondition the workload relies on does not hold (e.g. the target
    /// account has no contacts to book with).
    #[error("precondition failure: {0}")]
    Precondition(String),
}

impl Error {
    /// Stable label for log lines. Recovery never branches on this.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Transport(_) => "transport",
            Error::Business { .. } => "business",
            Error::Precondition(_) => "precondition",
        }
    }
}
