//! Account history aggregation.
//!
//! One run reads the chain height once and measures every account against
//! it. Per account the calls are strictly sequential:
//!
//! 1. confirmed history between the anchor and the last known block,
//! 2. mempool history with `to = 0`, which only yields `totalCount`,
//! 3. mempool history with `to = totalCount`, skipped when the count is zero.
//!
//! Records accumulate in a local vector that is only handed back once every
//! account is assembled, so a failure at any call leaves nothing behind.

pub mod state;
mod window;


use crate::backend::{BackendConnector, BackendSession};
use crate::error::{BackendError, QueryPhase, RemoteQueryError};
use crate::network::EthereumNetwork;
use crate::types::{AccountDescriptor, AccountInfoRecord, HistoryQueryWindow, SyncStatus};

use state::{AccountPhase, AccountProgress};

pub struct Aggregator<'c, C> {
    connector: &'c C,
}

impl<'c, C: BackendConnector> Aggregator<'c, C> {
    pub fn new(connector: &'c C) -> Self {
        Self { connector }
    }

    /// Opens a session for `network` and reconciles `accounts` in order.
    pub async fn run(
        &self,
        accounts: &[AccountDescriptor],
        network: &EthereumNetwork,
    ) -> Result<Vec<AccountInfoRecord>, RemoteQueryError> {
        let mut session = self
            .connector
            .connect(network)
            .await
            .map_err(|e| RemoteQueryError::run_wide(QueryPhase::Connect, e))?;

        reconcile(&mut session, accounts).await
    }
}

/// Runs the whole batch on an already open session.
pub async fn reconcile<S: BackendSession + ?Sized>(
    session: &mut S,
    accounts: &[AccountDescriptor],
) -> Result<Vec<AccountInfoRecord>, RemoteQueryError> {
    let SyncStatus { height } = session
        .lookup_sync_status()
        .await
        .map_err(|e| RemoteQueryError::run_wide(QueryPhase::SyncStatus, e))?;

    log::info!(
        "[AGGREGATOR] reconciling {} account(s) at height {}",
        accounts.len(),
        height
    );

    let mut records = Vec::with_capacity(accounts.len());
    for (index, account) in accounts.iter().enumerate() {
        let record = reconcile_account(session, index, account, height).await?;
        records.push(record);
    }

    Ok(records)
}

async fn reconcile_account<S: BackendSession + ?Sized>(
    session: &mut S,
    index: usize,
    account: &AccountDescriptor,
    height: u64,
) -> Result<AccountInfoRecord, RemoteQueryError> {
    let addresses = std::slice::from_ref(&account.address);
    let mut progress = AccountProgress::new(index);

    let confirmed = session
        .get_address_history(
            addresses,
            HistoryQueryWindow::confirmed(height, account.last_known_block),
        )
        .await
        .map_err(failed_at(index, QueryPhase::Confirmed))?;
    progress.advance(AccountPhase::ConfirmedQueried);

    let pending_count = session
        .get_address_history(addresses, HistoryQueryWindow::pending_count(height))
        .await
        .map_err(failed_at(index, QueryPhase::PendingCount))?
        .total_count;
    progress.advance(AccountPhase::PendingCountQueried);

    let pending = if pending_count > 0 {
        let mut items = session
            .get_address_history(
                addresses,
                HistoryQueryWindow::pending_items(height, pending_count),
            )
            .await
            .map_err(failed_at(index, QueryPhase::PendingItems))?
            .items;
        let limit = usize::try_from(pending_count).unwrap_or(usize::MAX);
        if items.len() > limit {
            log::warn!(
                "[AGGREGATOR] account #{}: backend returned {} pending items, {} requested",
                index,
                items.len(),
                limit
            );
            items.truncate(limit);
        }
        progress.advance(AccountPhase::PendingItemsQueried);
        items
    } else {
        progress.advance(AccountPhase::Skipped);
        Vec::new()
    };

    log::debug!(
        "[AGGREGATOR] account #{} {}: {} confirmed since {}, {} pending",
        index,
        account.address,
        confirmed.total_count,
        account.last_known_block,
        pending.len()
    );
    progress.advance(AccountPhase::Assembled);

    Ok(AccountInfoRecord {
        address: account.address.clone(),
        transactions: confirmed.total_count,
        pending,
        block: height,
    })
}

fn failed_at(index: usize, phase: QueryPhase) -> impl FnOnce(BackendError) -> RemoteQueryError {
    move |e| RemoteQueryError::for_account(phase, index, e)
}
