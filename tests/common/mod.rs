#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use tailkeep_api::auth::{IdentityProvider, JwtIdentityProvider, OfflineIdentityProvider};
use tailkeep_api::config::AppConfig;
use tailkeep_api::routes;
use tailkeep_api::rpc::memory::{MemoryBilling, MemoryScheduling};
use tailkeep_api::rpc::ProcedureRouter;
use tailkeep_api::state::AppState;

/// In-process server bound to an ephemeral port; the task is aborted when
/// the server is dropped at the end of a test.
pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(state: AppState) -> Self {
        let app = routes::app(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Handles onto the in-memory procedure backing, for seeding test data.
pub struct TestBackend {
    pub scheduling: Arc<MemoryScheduling>,
    pub billing: Arc<MemoryBilling>,
}

/// Development config: offline identity (org-1), rate limiting off.
pub fn offline_config() -> AppConfig {
    AppConfig::development()
}

/// State for an offline-mode gateway over fresh in-memory procedures.
pub fn offline_state(config: AppConfig) -> (AppState, TestBackend) {
    let identity = Arc::new(OfflineIdentityProvider::new(config.auth.offline_org_id.clone()));
    with_identity(config, identity)
}

/// State for a JWT-authenticated gateway with the given signing secret.
pub fn jwt_state(mut config: AppConfig, secret: &str) -> (AppState, TestBackend) {
    config.auth.offline_mode = false;
    config.security.jwt_secret = secret.to_string();
    let identity = Arc::new(JwtIdentityProvider::new(secret.to_string()));
    with_identity(config, identity)
}

fn with_identity(
    config: AppConfig,
    identity: Arc<dyn IdentityProvider>,
) -> (AppState, TestBackend) {
    let scheduling = Arc::new(MemoryScheduling::new());
    let billing = Arc::new(MemoryBilling::new());
    let rpc = ProcedureRouter::new(scheduling.clone(), billing.clone());

    let state = AppState::new(config, identity, rpc);
    (state, TestBackend { scheduling, billing })
}
