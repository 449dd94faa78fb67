use std::fmt;

use console_core::{Action, PollId, StatusPayload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Initial status of every harvester, fetched once at start-up.
    InventoryFetched(Result<StatusPayload, FetchError>),
    /// One poll tick finished.
    StatusFetched {
        poll_id: PollId,
        name: String,
        result: Result<StatusPayload, FetchError>,
    },
    ActionCompleted {
        action: Action,
        result: Result<Vec<(String, String)>, FetchError>,
    },
    DocumentFetched {
        title: String,
        result: Result<String, FetchError>,
    },
    ChartFetched(Result<StatusPayload, FetchError>),
}

/// A failed request. For HTTP status failures `message` holds the raw
/// response body so it can be shown to the operator verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
}
