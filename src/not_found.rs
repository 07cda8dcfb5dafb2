use axum::{http::StatusCode, response::Response};

use crate::error::json_error;

/// The fallback route handler for paths that do not match any route.
pub async fn get_404_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not found", None)
}
