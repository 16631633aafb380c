use serde::Serialize;

use crate::request::AccountBatch;
use crate::types::AccountInfoRecord;

/// What the caller gets back: an array for `accounts`, a bare object for `account`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AccountInfoResponse {
    Single(AccountInfoRecord),
    Bundle(Vec<AccountInfoRecord>),
}

impl AccountInfoResponse {
    /// Shapes the aggregator output after the request it answers.
    pub fn assemble(batch: &AccountBatch, records: Vec<AccountInfoRecord>) -> Self {
        match batch {
            AccountBatch::Bundle(_) => AccountInfoResponse::Bundle(records),
            AccountBatch::Single(_) => {
                debug_assert_eq!(records.len(), 1);
                let mut records = records.into_iter();
                match records.next() {
                    Some(record) => AccountInfoResponse::Single(record),
                    None => AccountInfoResponse::Bundle(Vec::new()),
                }
            }
        }
    }

    pub fn records(&self) -> &[AccountInfoRecord] {
        match self {
            AccountInfoResponse::Single(record) => std::slice::from_ref(record),
            AccountInfoResponse::Bundle(records) => records,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::AccountDescriptor;

    fn record(address: &str) -> AccountInfoRecord {
        AccountInfoRecord {
            address: address.to_string(),
            transactions: 3,
            pending: vec![],
            block: 120,
        }
    }

    fn descriptor(address: &str) -> AccountDescriptor {
        AccountDescriptor {
            address: address.to_string(),
            last_known_block: 100,
            last_known_transaction_count: 5,
        }
    }

    #[test]
    fn single_request_unwraps_the_record() {
        let batch = AccountBatch::Single(descriptor("0xA"));
        let response = AccountInfoResponse::assemble(&batch, vec![record("0xA")]);

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "address": "0xA", "transactions": 3, "pending": [], "block": 120 })
        );
    }

    #[test]
    fn bundle_of_one_stays_an_array() {
        let batch = AccountBatch::Bundle(vec![descriptor("0xA")]);
        let response = AccountInfoResponse::assemble(&batch, vec![record("0xA")]);

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!([{ "address": "0xA", "transactions": 3, "pending": [], "block": 120 }])
        );
        assert_eq!(response.records().len(), 1);
    }
}
