//! Validation of the request body for creating a transaction.

use crate::{
    transaction::{NewTransaction, TransactionType},
    validation::{
        JsonObject, ValidationError, at_least, length_between, number_field, require_fields,
        string_field,
    },
};

/// The smallest amount a transaction may have.
pub const MIN_AMOUNT: f64 = 0.01;
/// The fewest characters a description may have.
pub const MIN_DESCRIPTION_LENGTH: usize = 1;
/// The most characters a description may have.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

/// Check a JSON body of the form `{type, amount, description}` and convert it
/// into a [NewTransaction].
///
/// Properties other than the three above are ignored.
///
/// # Errors
/// Returns the first [ValidationError] found, checking that all properties
/// are present before checking their values.
pub fn validate_new_transaction(body: &JsonObject) -> Result<NewTransaction, ValidationError> {
    require_fields(body, &["type", "amount", "description"])?;

    let kind: TransactionType = string_field(body, "type")?.parse()?;
    let amount = at_least(number_field(body, "amount")?, "amount", MIN_AMOUNT)?;
    let description = string_field(body, "description")?;
    length_between(
        description,
        "description",
        MIN_DESCRIPTION_LENGTH,
        MAX_DESCRIPTION_LENGTH,
    )?;

    Ok(NewTransaction {
        kind,
        amount,
        description: description.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{
        transaction::{NewTransaction, TransactionType},
        validation::{JsonObject, ValidationError},
    };

    use super::validate_new_transaction;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(object) => object,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn accepts_valid_payload() {
        let body = object(json!({
            "type": "income",
            "amount": 5000,
            "description": "sauna session"
        }));

        let got = validate_new_transaction(&body);

        assert_eq!(
            got,
            Ok(NewTransaction {
                kind: TransactionType::Income,
                amount: 5000.0,
                description: "sauna session".to_owned(),
            })
        );
    }

    #[test]
    fn accepts_boundary_values() {
        let body = object(json!({
            "type": "expense",
            "amount": 0.01,
            "description": "x".repeat(100)
        }));

        assert!(validate_new_transaction(&body).is_ok());
    }

    #[test]
    fn ignores_extra_properties() {
        let body = object(json!({
            "id": 99,
            "type": "expense",
            "amount": 12.5,
            "description": "firewood",
            "createdAt": "yesterday"
        }));

        let got = validate_new_transaction(&body).unwrap();

        assert_eq!(got.description, "firewood");
    }

    #[test]
    fn rejects_invalid_payloads() {
        let cases = [
            (
                json!({ "type": "income", "amount": 0, "description": "free" }),
                ValidationError::BelowMinimum {
                    field: "amount",
                    minimum: 0.01,
                },
            ),
            (
                json!({ "type": "income", "amount": -5, "description": "refund" }),
                ValidationError::BelowMinimum {
                    field: "amount",
                    minimum: 0.01,
                },
            ),
            (
                json!({ "type": "income", "amount": 10, "description": "" }),
                ValidationError::TooShort {
                    field: "description",
                    min_length: 1,
                },
            ),
            (
                json!({ "type": "income", "amount": 10, "description": "a".repeat(101) }),
                ValidationError::TooLong {
                    field: "description",
                    max_length: 100,
                },
            ),
            (
                json!({ "type": "refund", "amount": 10, "description": "returned" }),
                ValidationError::UnknownTransactionType("refund".to_owned()),
            ),
            (
                json!({ "type": "income", "description": "no amount" }),
                ValidationError::MissingField("amount"),
            ),
            (
                json!({ "type": "income", "amount": "10", "description": "text amount" }),
                ValidationError::WrongType {
                    field: "amount",
                    expected: "number",
                },
            ),
        ];

        for (payload, want) in cases {
            let got = validate_new_transaction(&object(payload.clone()));

            assert_eq!(got, Err(want), "unexpected result for {payload}");
        }
    }
}
