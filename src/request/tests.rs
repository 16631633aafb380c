use serde_json::json;

use super::*;

fn descriptor(address: &str, block: u64, transactions: u64) -> AccountDescriptor {
    AccountDescriptor {
        address: address.to_string(),
        last_known_block: block,
        last_known_transaction_count: transactions,
    }
}

#[test]
fn plural_accounts_build_a_bundle() {
    let request = AccountInfoRequest::from_json(&json!({
        "coin": "eth",
        "accounts": [
            { "address": "0xA", "block": 100, "transactions": 5 },
            { "address": "0xB", "block": 0, "transactions": 0 },
        ]
    }))
    .unwrap();

    assert_eq!(request.coin, "eth");
    assert!(request.batch.is_bundled());
    assert_eq!(
        request.batch.accounts(),
        &[descriptor("0xA", 100, 5), descriptor("0xB", 0, 0)]
    );
}

#[test]
fn singular_account_is_unbundled() {
    let request = AccountInfoRequest::from_json(&json!({
        "coin": "eth",
        "account": { "address": "0xA", "block": 100, "transactions": 5 }
    }))
    .unwrap();

    assert_eq!(request.batch, AccountBatch::Single(descriptor("0xA", 100, 5)));
    assert!(!request.batch.is_bundled());
    assert_eq!(request.batch.accounts().len(), 1);
}

#[test]
fn plural_key_wins_over_singular() {
    let request = AccountInfoRequest::from_json(&json!({
        "coin": "eth",
        "account": { "address": "0xIGNORED", "block": 1, "transactions": 1 },
        "accounts": [{ "address": "0xA", "block": 2, "transactions": 3 }]
    }))
    .unwrap();

    assert_eq!(request.batch, AccountBatch::Bundle(vec![descriptor("0xA", 2, 3)]));
}

#[test]
fn missing_coin_and_accounts() {
    let err = AccountInfoRequest::from_json(&json!({ "accounts": [] })).unwrap_err();
    assert_eq!(err, ValidationError::MissingParameter("coin".to_string()));

    let err = AccountInfoRequest::from_json(&json!({ "coin": "eth" })).unwrap_err();
    assert_eq!(err, ValidationError::MissingParameter("accounts".to_string()));
}

#[test]
fn wrong_container_types() {
    let err = AccountInfoRequest::from_json(&json!({ "coin": 1, "accounts": [] })).unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidType { name: "coin".to_string(), expected: "string" }
    );

    let err =
        AccountInfoRequest::from_json(&json!({ "coin": "eth", "accounts": {} })).unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidType { name: "accounts".to_string(), expected: "array" }
    );

    let err = AccountInfoRequest::from_json(&json!({ "coin": "eth", "account": [] })).unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidType { name: "account".to_string(), expected: "object" }
    );
}

#[test]
fn empty_bundle_is_rejected() {
    let err = AccountInfoRequest::from_json(&json!({ "coin": "eth", "accounts": [] })).unwrap_err();
    assert_eq!(err, ValidationError::Empty("accounts".to_string()));
}

#[test]
fn item_errors_carry_the_index() {
    let err = AccountInfoRequest::from_json(&json!({
        "coin": "eth",
        "accounts": [
            { "address": "0xA", "block": 1, "transactions": 1 },
            { "address": "0xB", "block": "1", "transactions": 1 },
        ]
    }))
    .unwrap_err();

    assert_eq!(
        err,
        ValidationError::InvalidAccount {
            index: 1,
            source: Box::new(ValidationError::InvalidType {
                name: "block".to_string(),
                expected: "number"
            }),
        }
    );
}

#[test]
fn item_field_rules() {
    let check = |item: serde_json::Value| {
        match AccountInfoRequest::from_json(&json!({ "coin": "eth", "accounts": [item] })) {
            Err(ValidationError::InvalidAccount { index: 0, source }) => *source,
            other => panic!("unexpected {other:?}"),
        }
    };

    assert_eq!(
        check(json!({ "block": 1, "transactions": 1 })),
        ValidationError::MissingParameter("address".to_string())
    );
    assert_eq!(
        check(json!({ "address": "  ", "block": 1, "transactions": 1 })),
        ValidationError::Empty("address".to_string())
    );
    assert_eq!(
        check(json!({ "address": "0xA", "block": -1, "transactions": 1 })),
        ValidationError::NegativeValue("block".to_string())
    );
    assert_eq!(
        check(json!({ "address": "0xA", "block": 1, "transactions": 1.5 })),
        ValidationError::InvalidType { name: "transactions".to_string(), expected: "integer" }
    );
    assert_eq!(
        check(json!({ "address": "0xA", "block": 1, "transactions": null })),
        ValidationError::MissingParameter("transactions".to_string())
    );
    assert_eq!(check(json!("0xA")), ValidationError::InvalidType {
        name: "account".to_string(),
        expected: "object"
    });
}

#[test]
fn integral_floats_are_accepted() {
    let request = AccountInfoRequest::from_json(&json!({
        "coin": "eth",
        "account": { "address": "0xA", "block": 100.0, "transactions": 5 }
    }))
    .unwrap();
    assert_eq!(request.batch.accounts()[0].last_known_block, 100);
}
