use async_trait::async_trait;
use serde_json::{json, Value};

use crate::backend::jsonrpc::JsonRpcChannel;
use crate::backend::{BackendConnector, BackendSession};
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::network::EthereumNetwork;
use crate::types::{AddressHistory, HistoryQueryWindow, SyncStatus};

/// Session against a Blockbook-style indexer speaking JSON-RPC.
pub struct BlockbookSession {
    channel: JsonRpcChannel,
}

impl BlockbookSession {
    pub fn new(channel: JsonRpcChannel) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl BackendSession for BlockbookSession {
    async fn lookup_sync_status(&mut self) -> Result<SyncStatus, BackendError> {
        let info = self.channel.call("getInfo", json!([])).await?;
        let height = info
            .get("blocks")
            .and_then(Value::as_u64)
            .ok_or_else(|| BackendError::UnexpectedResponse(format!("getInfo without blocks: {info}")))?;
        Ok(SyncStatus { height })
    }

    async fn get_address_history(
        &mut self,
        addresses: &[String],
        window: HistoryQueryWindow,
    ) -> Result<AddressHistory, BackendError> {
        let result = self
            .channel
            .call("getAddressHistory", json!([addresses, window]))
            .await?;
        Ok(serde_json::from_value(result)?)
    }
}

/// Connects to the first reachable url of a [`BackendConfig`].
pub struct BlockbookConnector {
    config: BackendConfig,
}

impl BlockbookConnector {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BackendConnector for BlockbookConnector {
    type Session = BlockbookSession;

    async fn connect(&self, network: &EthereumNetwork) -> Result<BlockbookSession, BackendError> {
        let mut last_error = None;

        for url in &self.config.urls {
            match JsonRpcChannel::connect(url, self.config.connect_timeout, self.config.request_timeout).await {
                Ok(channel) => {
                    log::info!("[BACKEND] {} connected to {}:{}", network, url.host, url.port);
                    return Ok(BlockbookSession::new(channel));
                }
                Err(e) => {
                    log::warn!("[BACKEND] {}:{} unreachable: {}", url.host, url.port, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            BackendError::Unavailable(format!("no backend url for {network}"))
        }))
    }
}
