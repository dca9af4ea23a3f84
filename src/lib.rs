pub mod apartments;
pub mod appresult;
pub mod config;
pub mod contact;
pub mod featured;
pub mod model;
pub mod search;
pub mod store;
pub mod validation;

use std::time::Duration;

use axum::{
    debug_handler,
    extract::FromRef,
    http::{header, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub use appresult::{AppError, AppResult};
pub use config::Config;
pub use contact::{DynNotifier, LogNotifier, Notifier};
pub use store::{DynStore, Store};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: DynStore,
    pub notifier: DynNotifier,
}

#[debug_handler]
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found")
}

/// Routes only, no middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(apartments::router())
        .merge(contact::router())
        .fallback(not_found)
        .with_state(state)
}

/// The served application: routes plus tracing, CORS and the request timeout.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    serving_layers(router(state), request_timeout)
}

/// Wraps any routes in the serving middleware. A timed-out request gets a
/// 408 with the usual `{message}` body.
pub fn serving_layers(routes: Router, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    routes
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(appresult::timeout_body))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
