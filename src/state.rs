use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::config::AppConfig;
use crate::middleware::rate_limit::RateLimiter;
use crate::rpc::ProcedureRouter;

/// Shared application state injected into middleware and handlers.
/// The rate limiter is the only mutable piece; everything else is
/// read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub identity: Arc<dyn IdentityProvider>,
    pub rpc: ProcedureRouter,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        identity: Arc<dyn IdentityProvider>,
        rpc: ProcedureRouter,
    ) -> Self {
        let limiter = RateLimiter::for_config(&config.api);
        Self {
            config: Arc::new(config),
            identity,
            rpc,
            limiter,
        }
    }
}
