//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId, validation::ValidationError};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a paid sauna session.
    Income,
    /// Money spent, e.g. firewood.
    Expense,
}

impl TransactionType {
    /// The name of the type as stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(ValidationError::UnknownTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are never edited, only created and deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The amount of money earned or spent, always at least 0.01.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last written to.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A transaction that has been validated but not yet stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// The checks on `type` and `amount` mirror the request validation so that
/// an invalid row cannot be written even if a caller skips it.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount REAL NOT NULL CHECK (amount >= 0.01),
                description TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_created_at ON \"transaction\"(created_at);",
        (),
    )?;

    Ok(())
}

/// Store a validated transaction, stamping it with the current time.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let now = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (type, amount, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, type, amount, description, created_at, updated_at",
        )?
        .query_row(
            (
                new_transaction.kind,
                new_transaction.amount,
                new_transaction.description,
                now,
                now,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, type, amount, description, created_at, updated_at
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve all transactions, most recently created first.
///
/// Transactions created at the same instant are ordered by descending ID so
/// that the result is always the reverse of insertion order.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let mut stmt = connection.prepare(
        "SELECT id, type, amount, description, created_at, updated_at
         FROM \"transaction\"
         ORDER BY created_at DESC, id DESC",
    )?;

    let transactions = stmt
        .query_map([], map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()?;

    Ok(transactions)
}

type RowsAffected = usize;

/// Delete the transaction with `id`, returning the number of deleted rows.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id)],
        )
        .map_err(|err| err.into())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let kind = row.get(1)?;
    let amount = row.get(2)?;
    let description = row.get(3)?;
    let created_at = row.get(4)?;
    let updated_at = row.get(5)?;

    Ok(Transaction {
        id,
        kind,
        amount,
        description,
        created_at,
        updated_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            NewTransaction, TransactionType, count_transactions, create_transaction,
            delete_transaction, get_all_transactions, get_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn income(amount: f64, description: &str) -> NewTransaction {
        NewTransaction {
            kind: TransactionType::Income,
            amount,
            description: description.to_owned(),
        }
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let transaction = create_transaction(income(5000.0, "sauna session"), &conn)
            .expect("Could not create transaction");

        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.kind, TransactionType::Income);
        assert_eq!(transaction.amount, 5000.0);
        assert_eq!(transaction.description, "sauna session");
        assert_eq!(transaction.created_at, transaction.updated_at);
    }

    #[test]
    fn get_round_trips_created_transaction() {
        let conn = get_test_connection();
        let created = create_transaction(
            NewTransaction {
                kind: TransactionType::Expense,
                amount: 0.01,
                description: "birch whisk".to_owned(),
            },
            &conn,
        )
        .unwrap();

        let fetched = get_transaction(created.id, &conn);

        assert_eq!(fetched, Ok(created));
    }

    #[test]
    fn get_missing_transaction_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_all_returns_reverse_insertion_order() {
        let conn = get_test_connection();
        let mut want = Vec::new();
        for i in 1..=10 {
            want.push(create_transaction(income(i as f64, "session"), &conn).unwrap());
        }
        want.reverse();

        let got = get_all_transactions(&conn).expect("Could not get transactions");

        assert_eq!(got, want);
    }

    #[test]
    fn get_all_on_empty_table() {
        let conn = get_test_connection();

        assert_eq!(get_all_transactions(&conn), Ok(Vec::new()));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let transaction = create_transaction(income(1.23, "Test"), &conn).unwrap();

        let rows_affected = delete_transaction(transaction.id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn delete_missing_transaction_affects_no_rows() {
        let conn = get_test_connection();

        assert_eq!(delete_transaction(42, &conn), Ok(0));
    }

    #[test]
    fn table_rejects_amount_below_minimum() {
        let conn = get_test_connection();

        let result = create_transaction(income(0.0, "free session"), &conn);

        assert!(matches!(result, Err(Error::SqlError(_))));
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn table_rejects_unknown_type() {
        let conn = get_test_connection();

        let result = conn.execute(
            "INSERT INTO \"transaction\" (type, amount, description, created_at, updated_at)
             VALUES ('refund', 1.0, 'x', '2025-01-01 00:00:00.0+00:00', '2025-01-01 00:00:00.0+00:00')",
            (),
        );

        assert!(result.is_err());
    }
}
