//! Error types for the account-info pipeline.
//!
//! Every failure reaching the caller is one `AccountInfoError`. The three
//! kinds mirror where a run can stop: before any session exists
//! (configuration), before the aggregator starts (validation), or while
//! talking to the backend (remote query).

use std::fmt;
use std::time::Duration;

/// Top level error returned by [`crate::method::GetAccountInfo`].
#[derive(Debug, thiserror::Error)]
pub enum AccountInfoError {
    #[error("Configuration error. {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Validation error. {0}")]
    Validation(#[from] ValidationError),
    #[error("Remote query error. {0}")]
    RemoteQuery(#[from] RemoteQueryError),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Coin \"{0}\" not found")]
    UnknownNetwork(String),
    #[error("No backend configured for {0}")]
    NoBackend(String),
    #[error("Invalid backend url \"{0}\": expected tcp://host:port or ssl://host:port")]
    InvalidBackendUrl(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Parameter \"{0}\" is missing")]
    MissingParameter(String),
    #[error("Parameter \"{name}\" has invalid type. \"{expected}\" expected")]
    InvalidType { name: String, expected: &'static str },
    #[error("Parameter \"{0}\" must not be negative")]
    NegativeValue(String),
    #[error("Parameter \"{0}\" is empty")]
    Empty(String),
    #[error("Account #{index}: {source}")]
    InvalidAccount {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

/// The remote call a run was waiting on when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Connect,
    SyncStatus,
    Confirmed,
    PendingCount,
    PendingItems,
}

impl fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use QueryPhase::*;
        let name = match self {
            Connect => "connect",
            SyncStatus => "sync status",
            Confirmed => "confirmed history",
            PendingCount => "pending count",
            PendingItems => "pending items",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{phase} query failed{}: {source}", account_suffix(.account))]
pub struct RemoteQueryError {
    pub phase: QueryPhase,
    /// Index of the account being processed, `None` for run-wide calls.
    pub account: Option<usize>,
    #[source]
    pub source: BackendError,
}

fn account_suffix(account: &Option<usize>) -> String {
    match account {
        Some(index) => format!(" for account #{index}"),
        None => String::new(),
    }
}

impl RemoteQueryError {
    pub fn run_wide(phase: QueryPhase, source: BackendError) -> Self {
        Self {
            phase,
            account: None,
            source,
        }
    }

    pub fn for_account(phase: QueryPhase, index: usize, source: BackendError) -> Self {
        Self {
            phase,
            account: Some(index),
            source,
        }
    }
}

/// Transport level failures of a backend session.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("tls error: {0}")]
    Tls(#[from] native_tls::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("backend returned error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection closed by backend")]
    ConnectionClosed,
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
