use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{billing, reminders};
use crate::middleware::{enforce_rate_limit, resolve_identity};
use crate::state::AppState;

/// Build the application router. Per-request pipeline order on v1 routes:
/// rate limiter first, then identity resolution, then the handler.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(v1_routes(&state))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn v1_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/reminders",
            get(reminders::list).post(reminders::create),
        )
        .route("/api/v1/billing/subscription", get(billing::subscription))
        // Layers added later wrap earlier ones: the limiter runs first
        .route_layer(from_fn_with_state(state.clone(), resolve_identity))
        .route_layer(from_fn_with_state(state.clone(), enforce_rate_limit))
}

async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}
