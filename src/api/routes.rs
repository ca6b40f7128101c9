use crate::api::{handlers, AppState};
use crate::error::AppError;
use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::{timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        // Free-text search
        .route("/v1/search", get(handlers::search))
        // Filter catalog and tooling
        .route("/v1/filters/fields/:entity", get(handlers::list_fields))
        .route(
            "/v1/filters/operators/:field_type",
            get(handlers::list_operators),
        )
        .route("/v1/filters/validate", post(handlers::validate_filter))
        .route("/v1/filters/compile/:entity", post(handlers::compile_filter))
        .route("/v1/filters/encode", post(handlers::encode_filter))
        .route("/v1/filters/decode", get(handlers::decode_filter))
        // Records
        .route("/v1/records/:entity", get(handlers::list_records))
        .route("/v1/records/:entity", post(handlers::create_record))
        .route("/v1/records/:entity/:id", get(handlers::get_record))
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

/// Map errors raised by the middleware stack onto API errors
async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::Timeout("request exceeded the configured timeout".to_string())
    } else {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_slow_request_times_out_with_error_body() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_middleware_error))
                    .layer(TimeoutLayer::new(Duration::from_millis(20))),
            );

        let response = app
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "TIMEOUT");
    }
}
