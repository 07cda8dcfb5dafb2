//! The client data layer for front ends of the bath ledger.
//!
//! [ApiClient] wraps the REST API and [Ledger] keeps a local cache of the
//! transactions and bath price along with the income and expense totals.

mod api;
mod ledger;

pub use api::{ApiClient, ClientError, DEFAULT_BASE_URL};
pub use ledger::{DEFAULT_BATH_PRICE, Ledger};
