use std::any::Any;

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info_span};

use super::{handlers, ApiError, AppState};

/// Create the main API router.
pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            correlation_id = %request_id
        )
    });

    let api_routes = Router::new()
        .route("/generate", post(handlers::generate))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(trace_layer)
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .with_state(state)
}

/// Turn a handler panic into the generic 500 body.
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };

    error!(panic = %message, "Handler panicked");
    ApiError::internal(message).into_response()
}
