//! Request parsing and validation.
//!
//! Turns a raw JSON payload into an [`AccountInfoRequest`] whose shape
//! (single account or bundle) is fixed here and never revisited.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::types::AccountDescriptor;

#[cfg(test)]
mod tests;

/// How the caller phrased the request, which decides the response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountBatch {
    /// `account: {..}`, answered with a bare record.
    Single(AccountDescriptor),
    /// `accounts: [..]`, answered with an array in input order.
    Bundle(Vec<AccountDescriptor>),
}

impl AccountBatch {
    pub fn accounts(&self) -> &[AccountDescriptor] {
        match self {
            AccountBatch::Single(account) => std::slice::from_ref(account),
            AccountBatch::Bundle(accounts) => accounts,
        }
    }

    pub fn is_bundled(&self) -> bool {
        matches!(self, AccountBatch::Bundle(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfoRequest {
    pub coin: String,
    pub batch: AccountBatch,
}

impl AccountInfoRequest {
    pub fn from_json(payload: &Value) -> Result<Self, ValidationError> {
        let object = payload
            .as_object()
            .ok_or_else(|| invalid_type("payload", "object"))?;

        let coin = required_string(object, "coin")?.to_string();

        let batch = match object.get("accounts") {
            Some(accounts) => {
                let items = accounts
                    .as_array()
                    .ok_or_else(|| invalid_type("accounts", "array"))?;
                if items.is_empty() {
                    return Err(ValidationError::Empty("accounts".to_string()));
                }
                let accounts = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        parse_account(item).map_err(|e| ValidationError::InvalidAccount {
                            index,
                            source: Box::new(e),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                AccountBatch::Bundle(accounts)
            }
            None => {
                let account = object
                    .get("account")
                    .ok_or_else(|| ValidationError::MissingParameter("accounts".to_string()))?;
                if !account.is_object() {
                    return Err(invalid_type("account", "object"));
                }
                let account = parse_account(account).map_err(|e| {
                    ValidationError::InvalidAccount {
                        index: 0,
                        source: Box::new(e),
                    }
                })?;
                AccountBatch::Single(account)
            }
        };

        Ok(Self { coin, batch })
    }
}

fn parse_account(item: &Value) -> Result<AccountDescriptor, ValidationError> {
    let object = item
        .as_object()
        .ok_or_else(|| invalid_type("account", "object"))?;

    let address = required_string(object, "address")?;
    if address.trim().is_empty() {
        return Err(ValidationError::Empty("address".to_string()));
    }

    Ok(AccountDescriptor {
        address: address.to_string(),
        last_known_block: required_count(object, "block")?,
        last_known_transaction_count: required_count(object, "transactions")?,
    })
}

fn required<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value, ValidationError> {
    match object.get(name) {
        None | Some(Value::Null) => Err(ValidationError::MissingParameter(name.to_string())),
        Some(v) => Ok(v),
    }
}

fn required_string<'a>(
    object: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a str, ValidationError> {
    required(object, name)?
        .as_str()
        .ok_or_else(|| invalid_type(name, "string"))
}

/// A non-negative integer. Integral floats such as `100.0` are accepted.
fn required_count(object: &Map<String, Value>, name: &str) -> Result<u64, ValidationError> {
    let value = required(object, name)?;
    let Value::Number(number) = value else {
        return Err(invalid_type(name, "number"));
    };

    if let Some(n) = number.as_u64() {
        return Ok(n);
    }
    if number.as_i64().is_some() {
        return Err(ValidationError::NegativeValue(name.to_string()));
    }
    match number.as_f64() {
        Some(f) if f < 0.0 => Err(ValidationError::NegativeValue(name.to_string())),
        Some(f) if f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
        _ => Err(invalid_type(name, "integer")),
    }
}

fn invalid_type(name: &str, expected: &'static str) -> ValidationError {
    ValidationError::InvalidType {
        name: name.to_string(),
        expected,
    }
}
