use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::{BackendConnector, BackendSession};
use crate::error::{BackendError, QueryPhase};
use crate::network::EthereumNetwork;
use crate::types::{AddressHistory, HistoryQueryWindow, SyncStatus};

/// A call observed by [`MockBackend`], in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Connect(&'static str),
    SyncStatus,
    AddressHistory {
        addresses: Vec<String>,
        window: HistoryQueryWindow,
    },
}

#[derive(Debug, Clone)]
struct Failure {
    phase: QueryPhase,
    address: Option<String>,
}

/// Pure in-memory backend with canned answers.
///
/// Acts as both connector and session: connecting hands out a clone that
/// shares the call log. Pending item queries return every stored item for
/// the address, whatever window was asked for.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    height: u64,
    confirmed: HashMap<String, u64>,
    pending: HashMap<String, Vec<Value>>,
    pending_totals: HashMap<String, u64>,
    failure: Option<Failure>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockBackend {
    pub fn new(height: u64) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    pub fn with_confirmed(mut self, address: &str, total: u64) -> Self {
        self.confirmed.insert(address.to_string(), total);
        self
    }

    pub fn with_pending(mut self, address: &str, items: Vec<Value>) -> Self {
        self.pending.insert(address.to_string(), items);
        self
    }

    /// Reports `total` from the pending-count query instead of the number
    /// of stored items.
    pub fn with_pending_total(mut self, address: &str, total: u64) -> Self {
        self.pending_totals.insert(address.to_string(), total);
        self
    }

    /// Fails every call of `phase`, optionally only those for `address`.
    pub fn failing(mut self, phase: QueryPhase, address: Option<&str>) -> Self {
        self.failure = Some(Failure {
            phase,
            address: address.map(str::to_string),
        });
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.log().clone()
    }

    /// Number of history queries issued with the given shape.
    pub fn count_phase(&self, phase: QueryPhase) -> usize {
        self.log()
            .iter()
            .filter(|c| match c {
                RecordedCall::AddressHistory { window, .. } => phase_of(window) == phase,
                RecordedCall::SyncStatus => phase == QueryPhase::SyncStatus,
                RecordedCall::Connect(_) => phase == QueryPhase::Connect,
            })
            .count()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<RecordedCall>> {
        // a poisoned log only means another test thread panicked mid-push
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_failure(&self, phase: QueryPhase, addresses: &[String]) -> Result<(), BackendError> {
        match &self.failure {
            Some(f)
                if f.phase == phase
                    && f.address.as_ref().map_or(true, |a| addresses.contains(a)) =>
            {
                Err(BackendError::Unavailable(format!("injected {phase} failure")))
            }
            _ => Ok(()),
        }
    }
}

fn phase_of(window: &HistoryQueryWindow) -> QueryPhase {
    match (window.pending_only, window.to) {
        (false, _) => QueryPhase::Confirmed,
        (true, 0) => QueryPhase::PendingCount,
        (true, _) => QueryPhase::PendingItems,
    }
}

#[async_trait]
impl BackendSession for MockBackend {
    async fn lookup_sync_status(&mut self) -> Result<SyncStatus, BackendError> {
        self.log().push(RecordedCall::SyncStatus);
        self.check_failure(QueryPhase::SyncStatus, &[])?;
        Ok(SyncStatus {
            height: self.height,
        })
    }

    async fn get_address_history(
        &mut self,
        addresses: &[String],
        window: HistoryQueryWindow,
    ) -> Result<AddressHistory, BackendError> {
        self.log().push(RecordedCall::AddressHistory {
            addresses: addresses.to_vec(),
            window,
        });

        let phase = phase_of(&window);
        self.check_failure(phase, addresses)?;

        let history = match phase {
            QueryPhase::Confirmed => AddressHistory {
                total_count: addresses
                    .iter()
                    .map(|a| self.confirmed.get(a).copied().unwrap_or(0))
                    .sum(),
                items: Vec::new(),
            },
            QueryPhase::PendingCount => AddressHistory {
                total_count: addresses
                    .iter()
                    .map(|a| {
                        self.pending_totals.get(a).copied().unwrap_or_else(|| {
                            self.pending.get(a).map_or(0, |items| items.len() as u64)
                        })
                    })
                    .sum(),
                items: Vec::new(),
            },
            _ => {
                let items: Vec<Value> = addresses
                    .iter()
                    .flat_map(|a| self.pending.get(a).cloned().unwrap_or_default())
                    .collect();
                AddressHistory {
                    total_count: items.len() as u64,
                    items,
                }
            }
        };

        Ok(history)
    }
}

#[async_trait]
impl BackendConnector for MockBackend {
    type Session = MockBackend;

    async fn connect(&self, network: &EthereumNetwork) -> Result<MockBackend, BackendError> {
        self.log().push(RecordedCall::Connect(network.shortcut));
        self.check_failure(QueryPhase::Connect, &[])?;
        Ok(self.clone())
    }
}
