// HTTP API error types for the gateway boundary
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::rpc::RpcError;

/// One failed field check, reported in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Gateway error taxonomy. Every failure leaving the pipeline maps to
/// exactly one of these codes and its fixed HTTP status.
#[derive(Debug)]
pub enum ApiError {
    // 401
    Unauthenticated(String),

    // 400
    InvalidRequest {
        message: String,
        details: Vec<FieldError>,
    },

    // 404
    NotFound(String),

    // 429
    RateLimited(String),

    // 500
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
            ApiError::InvalidRequest { .. } => "INVALID_REQUEST",
            ApiError::NotFound(_) => "RESOURCE_NOT_FOUND",
            ApiError::RateLimited(_) => "RATE_LIMITED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthenticated(msg) => msg,
            ApiError::InvalidRequest { message, .. } => message,
            ApiError::NotFound(msg) => msg,
            ApiError::RateLimited(msg) => msg,
            ApiError::Internal(msg) => msg,
        }
    }

    /// Wire-level error envelope: `{ success: false, error: { code, message, details? } }`
    pub fn to_json(&self) -> Value {
        let mut error = json!({
            "code": self.error_code(),
            "message": self.message(),
        });

        if let ApiError::InvalidRequest { details, .. } = self {
            if !details.is_empty() {
                error["details"] = json!(details);
            }
        }

        json!({
            "success": false,
            "error": error,
        })
    }
}

// Static constructors
impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn invalid_request(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        ApiError::InvalidRequest {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        ApiError::RateLimited(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl ApiError {
    /// Normalize a procedure-layer failure at the handler boundary.
    /// Unanticipated errors are logged with the endpoint and organization id
    /// for diagnosis, then replaced by a fixed message.
    pub fn from_rpc(err: RpcError, endpoint: &str, org_id: &str) -> Self {
        match err {
            RpcError::NotFound(msg) => ApiError::not_found(msg),
            other => {
                tracing::error!(endpoint, org_id, error = %other, "procedure call failed");
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
