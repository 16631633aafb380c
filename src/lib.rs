//! Incremental account-history reconciliation against an indexing backend.
//!
//! Given accounts annotated with the last block and transaction count the
//! caller knows about, [`method::GetAccountInfo`] reports, at one shared
//! chain height, how many confirmed transactions happened since and which
//! transactions are still pending.

pub mod aggregator;
pub mod backend;
pub mod config;
pub mod error;
pub mod method;
pub mod network;
pub mod request;
pub mod response;
pub mod types;

pub use error::AccountInfoError;
pub use method::GetAccountInfo;
pub use response::AccountInfoResponse;
pub use types::{AccountDescriptor, AccountInfoRecord};
