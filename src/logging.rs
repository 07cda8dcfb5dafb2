//! Middleware for logging requests and responses.

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::{MatchedPath, Request},
    http::{StatusCode, request, response},
    middleware::{self, Next},
    response::Response,
};
use tower_http::trace::TraceLayer;

use crate::error::json_error;

/// The number of bytes of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Wrap `router` with [logging_middleware] and a tracing span per request.
pub fn add_logging_layers(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(tracing_layer)
}

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Bodies are passed on byte for byte, only the logged copy is decoded.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return json_error(
                StatusCode::BAD_REQUEST,
                "Could not read request body",
                Some(error.to_string()),
            );
        }
    };
    log_request(&parts, &body_bytes);

    let response = next.run(Request::from_parts(parts, Body::from(body_bytes))).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                None,
            );
        }
    };
    log_response(&parts, &body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

fn log_request(parts: &request::Parts, body: &[u8]) {
    let body = String::from_utf8_lossy(body);
    tracing::info!("Received request: {parts:#?}\nbody: {}", truncate_body(&body));

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("Full request body: {body:?}");
    }
}

fn log_response(parts: &response::Parts, body: &[u8]) {
    let body = String::from_utf8_lossy(body);
    tracing::info!("Sending response: {parts:#?}\nbody: {}", truncate_body(&body));

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("Full response body: {body:?}");
    }
}

/// Shorten `body` to at most [LOG_BODY_LENGTH_LIMIT] bytes, cutting on a
/// character boundary and marking the cut with `...`.
fn truncate_body(body: &str) -> String {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return format!("{body:?}");
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Bytes, http::StatusCode, middleware, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        AppState, build_router,
        db::lock_connection,
        endpoints::{self, format_endpoint},
        error::ErrorBody,
        transaction::{Transaction, count_transactions},
    };

    use super::{LOG_BODY_LENGTH_LIMIT, add_logging_layers, logging_middleware, truncate_body};

    fn get_logged_test_server() -> (TestServer, AppState) {
        let state = AppState::new(Connection::open_in_memory().unwrap())
            .expect("Could not create app state");
        let app = add_logging_layers(build_router(state.clone()));

        (
            TestServer::try_new(app).expect("Could not create test server."),
            state,
        )
    }

    #[test]
    fn short_bodies_are_kept_whole() {
        assert_eq!(truncate_body("{\"price\":1500000}"), "\"{\\\"price\\\":1500000}\"");
    }

    #[test]
    fn long_bodies_are_cut_at_the_limit() {
        let body = "a".repeat(LOG_BODY_LENGTH_LIMIT + 10);

        let got = truncate_body(&body);

        assert_eq!(got, format!("{}...", "a".repeat(LOG_BODY_LENGTH_LIMIT)));
    }

    #[test]
    fn truncation_does_not_split_characters() {
        // Each 'ä' is two bytes, so the limit falls inside a character.
        let body = format!("a{}", "ä".repeat(LOG_BODY_LENGTH_LIMIT));

        let got = truncate_body(&body);

        assert!(got.ends_with("..."));
        assert!(got.len() - 3 <= LOG_BODY_LENGTH_LIMIT);
    }

    #[tokio::test]
    async fn passes_bodies_through_unchanged() {
        async fn echo(body: Bytes) -> Bytes {
            body
        }
        let app = Router::new()
            .route("/echo", post(echo))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let body = Bytes::from_static(b"sauna \xff\xfe session");

        let response = server.post("/echo").bytes(body.clone()).await;

        response.assert_status_ok();
        assert_eq!(response.as_bytes(), &body);
    }

    #[tokio::test]
    async fn logged_router_round_trips_transaction() {
        let (server, _) = get_logged_test_server();

        let created = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({
                "type": "income",
                "amount": 5000,
                "description": "sauna session"
            }))
            .await
            .json::<Transaction>();

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, created.id))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Transaction>(), created);
    }

    #[tokio::test]
    async fn logged_router_rejects_invalid_utf8_body() {
        let (server, state) = get_logged_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .bytes(Bytes::from_static(
                b"{\"type\":\"income\",\"amount\":5,\"description\":\"ab\xff\xfe\"}",
            ))
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<ErrorBody>().error,
            "Failed to create transaction"
        );
        let connection = lock_connection(&state.db_connection).unwrap();
        assert_eq!(count_transactions(&connection), Ok(0));
    }

    #[tokio::test]
    async fn logged_router_rejects_malformed_json() {
        let (server, state) = get_logged_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .bytes(Bytes::from_static(b"{\"type\": \"income\","))
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let connection = lock_connection(&state.db_connection).unwrap();
        assert_eq!(count_transactions(&connection), Ok(0));
    }
}
