//! Route handlers for reading and changing the bath price.
//!
//! The price is stored in the `bathPrice` setting as the JSON number the
//! client sent, and read back as its leading integer.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value, json};

use crate::{
    AppState, Error,
    db::lock_connection,
    setting::{BATH_PRICE_KEY, find_or_create_setting, get_setting, update_setting_value},
    validation::{
        JsonObject, ValidationError, at_least, json_object, number_field, require_fields,
    },
};

/// The smallest bath price that may be set.
pub const MIN_BATH_PRICE: f64 = 1.0;

/// The largest bath price that may be set, the largest price a GET can return.
pub const MAX_BATH_PRICE: i64 = i64::MAX;

/// The smallest float that is too large for an `i64`, i.e. 2^63.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// The state needed to read or change the bath price.
#[derive(Debug, Clone)]
pub struct SettingState {
    /// The database connection for managing settings.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a bath price response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BathPrice {
    /// The price of a sauna session.
    pub price: i64,
}

/// A route handler for getting the current bath price.
pub async fn get_bath_price_endpoint(State(state): State<SettingState>) -> Response {
    get_bath_price(&state.db_connection)
        .map(|price| Json(BathPrice { price }).into_response())
        .unwrap_or_else(|error| {
            error.into_json_response("Failed to fetch bath price", "Bath price setting")
        })
}

/// A route handler for setting the bath price, responds with the accepted price.
pub async fn set_bath_price_endpoint(
    State(state): State<SettingState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let result = json_object(payload)
        .and_then(|body| validate_bath_price(&body))
        .map_err(Error::from)
        .and_then(|price| set_bath_price(&price, &state.db_connection).map(|_| price));

    match result {
        Ok(price) => Json(json!({ "price": price })).into_response(),
        Err(error) => {
            error.into_json_response("Failed to update bath price", "Bath price setting")
        }
    }
}

fn get_bath_price(db_connection: &Mutex<Connection>) -> Result<i64, Error> {
    let connection = lock_connection(db_connection)?;
    let setting = get_setting(BATH_PRICE_KEY, &connection)?;

    parse_leading_integer(&setting.value).ok_or(Error::InvalidSettingValue {
        key: setting.key,
        value: setting.value,
    })
}

/// Store `price`, creating the setting if needed. No write happens if the
/// stored value already equals `price`.
fn set_bath_price(price: &Number, db_connection: &Mutex<Connection>) -> Result<(), Error> {
    let value = price.to_string();
    let connection = lock_connection(db_connection)?;

    let (setting, _) = find_or_create_setting(BATH_PRICE_KEY, &value, &connection)?;

    if setting.value != value {
        update_setting_value(setting.id, &value, &connection)?;
    }

    Ok(())
}

/// Check a JSON body of the form `{price}` and return the price.
///
/// Whole numbers written as floats (e.g. `2000000.0` or `1e16`) are
/// normalized to integers so that they are stored as plain digits and echoed
/// the same way as `2000000`.
///
/// # Errors
/// Returns a [ValidationError] if the price is missing, not a number, less
/// than one, or larger than [MAX_BATH_PRICE].
pub fn validate_bath_price(body: &JsonObject) -> Result<Number, ValidationError> {
    require_fields(body, &["price"])?;

    let price = number_field(body, "price")?;
    let value = at_least(price, "price", MIN_BATH_PRICE)?;

    if let Some(integer) = price.as_i64() {
        return Ok(Number::from(integer));
    }

    if price.is_u64() || value >= I64_UPPER_BOUND {
        return Err(ValidationError::AboveMaximum {
            field: "price",
            maximum: MAX_BATH_PRICE,
        });
    }

    // Floats above 2^52 have no fraction, so a fractional price is always
    // printed without an exponent.
    if value.fract() == 0.0 {
        return Ok(Number::from(value as i64));
    }

    Ok(price.clone())
}

/// Parse the integer at the start of `text`, ignoring anything after it.
///
/// Leading whitespace and a sign are allowed, so `" -12.5kg"` gives `-12`.
/// Returns `None` if `text` does not start with a digit after those.
fn parse_leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    unsigned[..end].parse::<i64>().ok().map(|number| sign * number)
}
