//! Defines the setting model and its database queries.
//!
//! Settings are key-value pairs with unique keys. Values are stored as text
//! and interpreted by whoever owns the key.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{Error, database_id::DatabaseId};

/// The key of the setting holding the price of a sauna session.
pub const BATH_PRICE_KEY: &str = "bathPrice";

/// The bath price stored when no price has been set yet.
pub const DEFAULT_BATH_PRICE: &str = "1500000";

/// A named, text encoded value.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    /// The ID of the setting.
    pub id: DatabaseId,
    /// The unique name of the setting.
    pub key: String,
    /// The text encoded value.
    pub value: String,
    /// When the setting was first stored.
    pub created_at: OffsetDateTime,
    /// When the value was last changed.
    pub updated_at: OffsetDateTime,
}

/// Create the setting table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_setting_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS setting (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                key TEXT NOT NULL UNIQUE,
                value TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Retrieve the setting with `key`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if there is no setting with `key`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_setting(key: &str, connection: &Connection) -> Result<Setting, Error> {
    let setting = connection
        .prepare(
            "SELECT id, key, value, created_at, updated_at FROM setting WHERE key = :key",
        )?
        .query_row(&[(":key", &key)], map_setting_row)?;

    Ok(setting)
}

/// Retrieve the setting with `key`, storing it with `default_value` first if
/// it does not exist.
///
/// Returns the setting and whether it was created by this call.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn find_or_create_setting(
    key: &str,
    default_value: &str,
    connection: &Connection,
) -> Result<(Setting, bool), Error> {
    let now = OffsetDateTime::now_utc();

    let rows_inserted = connection.execute(
        "INSERT INTO setting (key, value, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(key) DO NOTHING",
        (key, default_value, now, now),
    )?;

    let setting = get_setting(key, connection)?;

    Ok((setting, rows_inserted == 1))
}

/// Replace the value of the setting with `id` and stamp its update time.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid setting,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_setting_value(
    id: DatabaseId,
    value: &str,
    connection: &Connection,
) -> Result<Setting, Error> {
    let setting = connection
        .prepare(
            "UPDATE setting SET value = ?1, updated_at = ?2 WHERE id = ?3
             RETURNING id, key, value, created_at, updated_at",
        )?
        .query_row((value, OffsetDateTime::now_utc(), id), map_setting_row)?;

    Ok(setting)
}

/// Store the default bath price unless a price already exists.
///
/// Safe to call any number of times; only the first call on an empty
/// database writes anything.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn ensure_default_bath_price(connection: &Connection) -> Result<Setting, Error> {
    let (setting, created) =
        find_or_create_setting(BATH_PRICE_KEY, DEFAULT_BATH_PRICE, connection)?;

    if created {
        tracing::info!("Default bath price setting created");
    }

    Ok(setting)
}

/// Get the total number of settings in the database.
#[cfg(test)]
pub fn count_settings(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM setting;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Map a database row to a Setting.
fn map_setting_row(row: &Row) -> Result<Setting, rusqlite::Error> {
    Ok(Setting {
        id: row.get(0)?,
        key: row.get(1)?,
        value: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
