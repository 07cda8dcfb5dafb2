//! Checks for JSON request bodies.
//!
//! Handlers take the raw JSON body and run it through the functions in this
//! module before touching the database, so that malformed requests are
//! rejected with a [ValidationError] describing the first violated constraint.

use axum::{Json, extract::rejection::JsonRejection};
use serde_json::{Map, Number, Value};

/// A JSON object received as a request body.
pub type JsonObject = Map<String, Value>;

/// Why a request body was rejected.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// The body could not be parsed as JSON, or was not sent as JSON.
    #[error("body must be valid JSON: {0}")]
    InvalidJson(String),

    /// The body was valid JSON, but not an object.
    #[error("body must be object")]
    NotAnObject,

    /// A required property was not in the body.
    #[error("body must have required property '{0}'")]
    MissingField(&'static str),

    /// A property had the wrong JSON type, e.g. a string where a number was expected.
    #[error("body/{field} must be {expected}")]
    WrongType {
        /// The name of the property.
        field: &'static str,
        /// The expected JSON type.
        expected: &'static str,
    },

    /// The transaction type was not one of the allowed values.
    #[error("body/type must be equal to one of the allowed values: income, expense (got \"{0}\")")]
    UnknownTransactionType(String),

    /// A number was smaller than the smallest allowed value.
    #[error("body/{field} must be >= {minimum}")]
    BelowMinimum {
        /// The name of the property.
        field: &'static str,
        /// The smallest allowed value.
        minimum: f64,
    },

    /// A number was larger than the largest allowed value.
    #[error("body/{field} must be <= {maximum}")]
    AboveMaximum {
        /// The name of the property.
        field: &'static str,
        /// The largest allowed value.
        maximum: i64,
    },

    /// A string had fewer characters than allowed.
    #[error("body/{field} must NOT have fewer than {min_length} characters")]
    TooShort {
        /// The name of the property.
        field: &'static str,
        /// The smallest allowed number of characters.
        min_length: usize,
    },

    /// A string had more characters than allowed.
    #[error("body/{field} must NOT have more than {max_length} characters")]
    TooLong {
        /// The name of the property.
        field: &'static str,
        /// The largest allowed number of characters.
        max_length: usize,
    },
}

/// Unwrap the JSON extractor result into a JSON object.
///
/// # Errors
/// Returns a:
/// - [ValidationError::InvalidJson] if axum could not extract the body as JSON,
/// - or [ValidationError::NotAnObject] if the body is not a JSON object.
pub fn json_object(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<JsonObject, ValidationError> {
    match payload {
        Ok(Json(Value::Object(object))) => Ok(object),
        Ok(_) => Err(ValidationError::NotAnObject),
        Err(rejection) => Err(ValidationError::InvalidJson(rejection.body_text())),
    }
}

/// Check that every field in `fields` is present in `body`.
///
/// Presence is checked before any types so that the first missing field is
/// reported, matching the order of `fields`.
pub fn require_fields(body: &JsonObject, fields: &[&'static str]) -> Result<(), ValidationError> {
    match fields.iter().find(|field| !body.contains_key(**field)) {
        Some(field) => Err(ValidationError::MissingField(*field)),
        None => Ok(()),
    }
}

/// Get the string value of `field`.
pub fn string_field<'a>(
    body: &'a JsonObject,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match body.get(field) {
        Some(Value::String(text)) => Ok(text.as_str()),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "string",
        }),
        None => Err(ValidationError::MissingField(field)),
    }
}

/// Get the numeric value of `field` as it was written in the request.
pub fn number_field<'a>(
    body: &'a JsonObject,
    field: &'static str,
) -> Result<&'a Number, ValidationError> {
    match body.get(field) {
        Some(Value::Number(number)) => Ok(number),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "number",
        }),
        None => Err(ValidationError::MissingField(field)),
    }
}

/// Convert `number` to a float, checking that it is at least `minimum`.
pub fn at_least(
    number: &Number,
    field: &'static str,
    minimum: f64,
) -> Result<f64, ValidationError> {
    let value = number.as_f64().ok_or(ValidationError::WrongType {
        field,
        expected: "number",
    })?;

    if value < minimum {
        return Err(ValidationError::BelowMinimum { field, minimum });
    }

    Ok(value)
}

/// Check that `text` has between `min_length` and `max_length` characters, inclusive.
///
/// Length is counted in Unicode scalar values, not bytes.
pub fn length_between(
    text: &str,
    field: &'static str,
    min_length: usize,
    max_length: usize,
) -> Result<(), ValidationError> {
    let length = text.chars().count();

    if length < min_length {
        Err(ValidationError::TooShort { field, min_length })
    } else if length > max_length {
        Err(ValidationError::TooLong { field, max_length })
    } else {
        Ok(())
    }
}
