//! Defines the endpoints for listing transactions and getting a single transaction.
use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    database_id::TransactionId,
    db::lock_connection,
    transaction::{TransactionState, get_all_transactions, get_transaction},
};

/// A route handler for listing all transactions, most recent first.
pub async fn get_transactions_endpoint(State(state): State<TransactionState>) -> Response {
    let transactions = lock_connection(&state.db_connection)
        .and_then(|connection| get_all_transactions(&connection));

    match transactions {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_json_response("Failed to fetch transactions", "Transaction"),
    }
}

/// A route handler for getting a transaction by its database ID.
///
/// An ID that is not an integer cannot match any transaction and is
/// reported as not found.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Response {
    let transaction = parse_transaction_id(&transaction_id).and_then(|id| {
        let connection = lock_connection(&state.db_connection)?;
        get_transaction(id, &connection)
    });

    match transaction {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_json_response("Failed to fetch transaction", "Transaction"),
    }
}

/// Parse a transaction ID from a path segment.
///
/// # Errors
/// Returns [Error::NotFound] if `raw_id` is not an integer.
pub(crate) fn parse_transaction_id(raw_id: &str) -> Result<TransactionId, Error> {
    raw_id.parse().map_err(|_| Error::NotFound)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState, Error, build_router,
        db::lock_connection,
        endpoints::{self, format_endpoint},
        error::ErrorBody,
        transaction::{Transaction, get_endpoint::parse_transaction_id},
    };

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap())
            .expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    async fn create_transaction(server: &TestServer, description: &str) -> Transaction {
        server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "type": "income",
                "amount": 100,
                "description": description
            }))
            .await
            .json::<Transaction>()
    }

    #[tokio::test]
    async fn list_is_empty_initially() {
        let server = get_test_server();

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>(), Vec::new());
    }

    #[tokio::test]
    async fn list_returns_most_recent_first() {
        let server = get_test_server();
        let mut want = Vec::new();
        for i in 0..5 {
            want.push(create_transaction(&server, &format!("session {i}")).await);
        }
        want.reverse();

        let got = server
            .get(endpoints::TRANSACTIONS_API)
            .await
            .json::<Vec<Transaction>>();

        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn get_missing_transaction_is_not_found() {
        let server = get_test_server();

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, 42))
            .await;

        response.assert_status_not_found();
        assert_eq!(
            response.json::<ErrorBody>().error,
            "Transaction not found"
        );
    }

    #[tokio::test]
    async fn get_with_non_numeric_id_is_not_found() {
        let server = get_test_server();

        server
            .get("/api/transactions/abc")
            .await
            .assert_status_not_found();
    }

    fn get_test_server_without_table() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap())
            .expect("Could not create app state");
        lock_connection(&state.db_connection)
            .unwrap()
            .execute("DROP TABLE \"transaction\"", ())
            .unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn list_store_failure_is_internal_error() {
        let server = get_test_server_without_table();

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<ErrorBody>(),
            ErrorBody {
                error: "Failed to fetch transactions".to_owned(),
                details: None
            }
        );
    }

    #[tokio::test]
    async fn get_store_failure_is_internal_error() {
        let server = get_test_server_without_table();

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, 1))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<ErrorBody>(),
            ErrorBody {
                error: "Failed to fetch transaction".to_owned(),
                details: None
            }
        );
    }

    #[test]
    fn parses_numeric_ids_only() {
        assert_eq!(parse_transaction_id("7"), Ok(7));
        assert_eq!(parse_transaction_id("7a"), Err(Error::NotFound));
    }
}
