use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An account as the caller last saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDescriptor {
    pub address: String,
    pub last_known_block: u64,
    pub last_known_transaction_count: u64,
}

/// Chain state reported by the backend. Read once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStatus {
    pub height: u64,
}

/// Second positional argument of `getAddressHistory`.
///
/// `end` is `None` for mempool queries and is then left off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQueryWindow {
    pub start: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u64>,
    pub from: u64,
    pub to: u64,
    #[serde(rename = "queryMempoolOnly")]
    pub pending_only: bool,
}

/// Result of `getAddressHistory`. Items are passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressHistory {
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<Value>,
}

/// One reconciled account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfoRecord {
    pub address: String,
    /// Confirmed transactions since the caller's last known block.
    pub transactions: u64,
    pub pending: Vec<Value>,
    /// The anchor height shared by every record of the run.
    pub block: u64,
}
