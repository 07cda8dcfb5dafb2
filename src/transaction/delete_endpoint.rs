//! Defines the endpoint for deleting a transaction.
use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::lock_connection,
    transaction::{
        TransactionState, core::delete_transaction, get_endpoint::parse_transaction_id,
    },
};

/// The body sent when a transaction has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAcknowledgement {
    /// Always `true`.
    pub success: bool,
}

/// A route handler for deleting a transaction, responds with `{"success": true}`.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    let result = parse_transaction_id(&transaction_id).and_then(|id| {
        let connection = lock_connection(&state.db_connection)?;

        match delete_transaction(id, &connection)? {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    });

    match result {
        Ok(()) => Json(DeleteAcknowledgement { success: true }).into_response(),
        Err(error) => error.into_json_response("Failed to delete transaction", "Transaction"),
    }
}
