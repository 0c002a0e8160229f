use std::net::SocketAddr;
use std::sync::Arc;

use tailkeep_api::auth::{IdentityProvider, JwtIdentityProvider, OfflineIdentityProvider};
use tailkeep_api::config::AppConfig;
use tailkeep_api::routes;
use tailkeep_api::rpc::memory::{MemoryBilling, MemoryScheduling};
use tailkeep_api::rpc::ProcedureRouter;
use tailkeep_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up JWT_SECRET, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Tailkeep API gateway in {:?} mode", config.environment);

    // Identity strategy is fixed at process start; handlers never pick a mode
    let identity: Arc<dyn IdentityProvider> = if config.auth.offline_mode {
        tracing::warn!(
            org = %config.auth.offline_org_id,
            "offline mode enabled: credential checks are bypassed"
        );
        Arc::new(OfflineIdentityProvider::new(config.auth.offline_org_id.clone()))
    } else {
        Arc::new(JwtIdentityProvider::new(config.security.jwt_secret.clone()))
    };

    let rpc = ProcedureRouter::new(
        Arc::new(MemoryScheduling::new()),
        Arc::new(MemoryBilling::new()),
    );

    let app = routes::app(AppState::new(config, identity, rpc));

    // Allow tests or deployments to override port via env
    let port = std::env::var("TAILKEEP_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Tailkeep API gateway listening on http://{}", bind_addr);

    // Peer addresses feed the rate limiter's caller key for direct clients
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server");
}
