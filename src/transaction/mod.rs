//! Transaction management for the bath ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its database functions
//! - Validation of new transactions
//! - Route handlers for listing, getting, creating and deleting transactions

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod core;
mod create_endpoint;
mod delete_endpoint;
mod form;
mod get_endpoint;

pub use core::{
    NewTransaction, Transaction, TransactionType, create_transaction, create_transaction_table,
    delete_transaction, get_all_transactions, get_transaction, map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::{DeleteAcknowledgement, delete_transaction_endpoint};
pub use form::{
    MAX_DESCRIPTION_LENGTH, MIN_AMOUNT, MIN_DESCRIPTION_LENGTH, validate_new_transaction,
};
pub use get_endpoint::{get_transaction_endpoint, get_transactions_endpoint};

#[cfg(test)]
pub use core::count_transactions;

/// The state needed by the transaction route handlers.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
