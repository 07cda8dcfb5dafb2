//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, setting::ensure_default_bath_price};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models and storing the default bath price if no price has
    /// been set.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;
        ensure_default_bath_price(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        AppState,
        db::lock_connection,
        setting::{BATH_PRICE_KEY, DEFAULT_BATH_PRICE, get_setting},
    };

    #[test]
    fn new_stores_default_bath_price() {
        let state = AppState::new(Connection::open_in_memory().unwrap()).unwrap();

        let connection = lock_connection(&state.db_connection).unwrap();
        let setting = get_setting(BATH_PRICE_KEY, &connection).unwrap();
        assert_eq!(setting.value, DEFAULT_BATH_PRICE);
    }
}
