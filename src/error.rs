//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body did not satisfy the constraints of the resource.
    ///
    /// The wrapped error describes the first violated constraint and is safe
    /// to show to the client.
    #[error("invalid request body: {0}")]
    Validation(#[from] ValidationError),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A setting holds a value that cannot be interpreted, e.g. a bath price
    /// that does not start with an integer.
    #[error("the setting \"{key}\" has the invalid value \"{value}\"")]
    InvalidSettingValue {
        /// The key of the setting.
        key: String,
        /// The stored value.
        value: String,
    },

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A short, human readable summary of what failed.
    pub error: String,
    /// Why the request was rejected. Only set for validation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Error {
    /// Convert the error into a JSON response.
    ///
    /// `failure` is the summary used for validation and internal errors, e.g.
    /// "Failed to create transaction". `resource` names the thing that was
    /// looked up in not found messages, e.g. "Transaction".
    ///
    /// Internal errors are logged and their details are not sent to the client.
    pub fn into_json_response(self, failure: &str, resource: &str) -> Response {
        match self {
            Error::Validation(error) => {
                json_error(StatusCode::BAD_REQUEST, failure, Some(error.to_string()))
            }
            Error::NotFound => json_error(
                StatusCode::NOT_FOUND,
                &format!("{resource} not found"),
                None,
            ),
            error => {
                tracing::error!("{failure}: {error}");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, failure, None)
            }
        }
    }
}

/// Build a JSON error response from its parts.
pub(crate) fn json_error(
    status_code: StatusCode,
    error: &str,
    details: Option<String>,
) -> Response {
    (
        status_code,
        Json(ErrorBody {
            error: error.to_owned(),
            details,
        }),
    )
        .into_response()
}
