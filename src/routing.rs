//! Application router configuration.

use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState, endpoints,
    not_found::get_404_not_found,
    setting::{get_bath_price_endpoint, set_bath_price_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Requests from any origin are allowed.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(
            endpoints::TRANSACTIONS_API,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BATH_PRICE,
            get(get_bath_price_endpoint).post(set_bath_price_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(cors)
        .with_state(state)
}

/// The body of the liveness check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always "ok" while the server is accepting requests.
    pub status: String,
}

/// Report that the server is up.
async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_owned(),
    })
}
