//! The `getAccountInfo` method end to end: validate, resolve the network,
//! aggregate, shape the response.

use serde_json::Value;

use crate::aggregator::Aggregator;
use crate::backend::BackendConnector;
use crate::error::AccountInfoError;
use crate::network::{get_ethereum_network, EthereumNetwork};
use crate::request::AccountInfoRequest;
use crate::response::AccountInfoResponse;

pub struct GetAccountInfo {
    request: AccountInfoRequest,
    network: EthereumNetwork,
}

impl GetAccountInfo {
    pub const INFO: &'static str = "Export ethereum account info";

    /// Fails with a validation error for a malformed payload and with a
    /// configuration error for an unknown coin, in that order.
    pub fn new(payload: &Value) -> Result<Self, AccountInfoError> {
        let request = AccountInfoRequest::from_json(payload)?;
        let network = get_ethereum_network(&request.coin)?;
        Ok(Self { request, network })
    }

    pub fn network(&self) -> &EthereumNetwork {
        &self.network
    }

    pub fn request(&self) -> &AccountInfoRequest {
        &self.request
    }

    pub async fn run<C: BackendConnector>(
        &self,
        connector: &C,
    ) -> Result<AccountInfoResponse, AccountInfoError> {
        log::info!(
            "[METHOD] {} for {} account(s) on {}",
            Self::INFO,
            self.request.batch.accounts().len(),
            self.network
        );

        let records = Aggregator::new(connector)
            .run(self.request.batch.accounts(), &self.network)
            .await?;

        Ok(AccountInfoResponse::assemble(&self.request.batch, records))
    }
}
