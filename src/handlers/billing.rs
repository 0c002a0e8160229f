use axum::extract::{Extension, State};

use crate::api::types::SubscriptionResponse;
use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/v1/billing/subscription - the caller organization's subscription
pub async fn subscription(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> ApiResult<SubscriptionResponse> {
    let org_id = identity.org_id.clone();
    let caller = state.rpc.caller(identity);

    let subscription = caller
        .get_subscription(&org_id)
        .await
        .map_err(|e| ApiError::from_rpc(e, "GET /api/v1/billing/subscription", &org_id))?
        .ok_or_else(|| ApiError::not_found("No subscription found for organization"))?;

    Ok(ApiResponse::success(subscription.into()))
}
