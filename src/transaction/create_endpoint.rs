//! Defines the endpoint for creating a new transaction.
use std::sync::Mutex;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::Value;

use crate::{
    Error,
    db::lock_connection,
    transaction::{
        Transaction, TransactionState, core::create_transaction, form::validate_new_transaction,
    },
    validation::json_object,
};

/// A route handler for creating a new transaction, responds with the stored transaction.
///
/// The body is validated before the database is touched, so a rejected
/// request never leaves a row behind.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    match create_from_payload(payload, &state.db_connection) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_json_response("Failed to create transaction", "Transaction"),
    }
}

fn create_from_payload(
    payload: Result<Json<Value>, JsonRejection>,
    db_connection: &Mutex<Connection>,
) -> Result<Transaction, Error> {
    let body = json_object(payload)?;
    let new_transaction = validate_new_transaction(&body)?;

    let connection = lock_connection(db_connection)?;
    create_transaction(new_transaction, &connection)
}
