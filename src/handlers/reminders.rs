use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Extension, Query, State},
};
use serde_json::Value;

use crate::api::pagination::{self, Paginated};
use crate::api::types::ReminderResponse;
use crate::api::validate;
use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::rpc::{CreateReminderArgs, ListRemindersArgs};
use crate::state::AppState;

/// GET /api/v1/reminders - list reminders with filters and cursor pagination
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Paginated<ReminderResponse>> {
    let query = validate::validate_list_query(&params)
        .map_err(|details| ApiError::invalid_request("Validation failed", details))?;
    let window = pagination::decode(&params, &state.config.api);

    // Query override takes precedence over the caller's own organization
    let org_id = query.org_id.unwrap_or_else(|| identity.org_id.clone());

    let caller = state.rpc.caller(identity);
    let page = caller
        .list_reminders(ListRemindersArgs {
            org_id: org_id.clone(),
            record_id: query.record_id,
            status: query.status,
            priority: query.priority,
            search: query.q,
            limit: window.limit,
            offset: window.offset,
        })
        .await
        .map_err(|e| ApiError::from_rpc(e, "GET /api/v1/reminders", &org_id))?;

    let items: Vec<ReminderResponse> = page.reminders.into_iter().map(Into::into).collect();
    Ok(ApiResponse::success(pagination::paginate(
        items, window, page.total,
    )))
}

/// POST /api/v1/reminders - create a reminder
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    body: Bytes,
) -> ApiResult<ReminderResponse> {
    let raw: Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::invalid_request("Request body must be valid JSON", vec![]))?;
    let request = validate::validate_create_reminder(&raw)
        .map_err(|details| ApiError::invalid_request("Validation failed", details))?;

    // Body-supplied org id wins; the procedure layer owns authorization
    let org_id = request.org_id.unwrap_or_else(|| identity.org_id.clone());

    let caller = state.rpc.caller(identity);
    let reminder = caller
        .create_reminder(CreateReminderArgs {
            org_id: org_id.clone(),
            record_id: request.record_id,
            title: request.title,
            notes: request.notes,
            due_at: request.due_at,
            priority: request.priority,
        })
        .await
        .map_err(|e| ApiError::from_rpc(e, "POST /api/v1/reminders", &org_id))?;

    Ok(ApiResponse::created(reminder.into()))
}
