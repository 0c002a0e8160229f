pub mod auth;
pub mod rate_limit;
pub mod response;

pub use auth::resolve_identity;
pub use rate_limit::{enforce_rate_limit, RateLimiter};
pub use response::{ApiResponse, ApiResult};
