use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Identity-resolution middleware. Runs after rate limiting and before any
/// handler; on success the [`CallerIdentity`](crate::auth::CallerIdentity)
/// is available to handlers as a request extension.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = state.identity.resolve(request.headers()).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
