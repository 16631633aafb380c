//! Access to the indexing backend.
//!
//! The aggregator only sees the two traits below. Everything is
//! address-list based, mirroring the backend's `getAddressHistory` call.

pub mod blockbook;
pub mod jsonrpc;
pub mod mock;


use async_trait::async_trait;

use crate::error::BackendError;
use crate::network::EthereumNetwork;
use crate::types::{AddressHistory, HistoryQueryWindow, SyncStatus};

pub use blockbook::{BlockbookConnector, BlockbookSession};
pub use mock::MockBackend;

/// A live handle to the backend of one network.
///
/// Calls are issued one at a time; a session is borrowed mutably for the
/// whole run so nothing else can interleave requests on its channel.
#[async_trait]
pub trait BackendSession: Send {
    /// Current chain height as seen by the backend.
    async fn lookup_sync_status(&mut self) -> Result<SyncStatus, BackendError>;

    /// `getAddressHistory(addresses, window)`.
    async fn get_address_history(
        &mut self,
        addresses: &[String],
        window: HistoryQueryWindow,
    ) -> Result<AddressHistory, BackendError>;
}

/// Opens sessions for a given network.
#[async_trait]
pub trait BackendConnector: Send + Sync {
    type Session: BackendSession;

    async fn connect(&self, network: &EthereumNetwork) -> Result<Self::Session, BackendError>;
}
