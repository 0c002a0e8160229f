use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// JWT claims for gateway access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub org: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, org_id: String, expiry_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            org: org_id,
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// The caller's resolved identity. Built once per request, carried as a
/// request extension, and dropped when the response is sent.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: Uuid,
    pub org_id: String,
    /// Raw bearer token, forwarded to the procedure layer as the
    /// backing-store session handle. Absent in offline mode.
    pub session_token: Option<String>,
}

/// Strategy for turning request headers into a [`CallerIdentity`].
/// Selected once at process start; handlers never choose between modes.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<CallerIdentity, ApiError>;
}

/// Verifies HS256 bearer tokens.
pub struct JwtIdentityProvider {
    secret: String,
}

impl JwtIdentityProvider {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, headers: &HeaderMap) -> Result<CallerIdentity, ApiError> {
        if self.secret.is_empty() {
            // Misconfiguration, not a caller problem
            tracing::error!("JWT secret not configured");
            return Err(ApiError::internal("An internal error occurred"));
        }

        let token = extract_bearer_token(headers)?;

        let token_data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| ApiError::unauthenticated(format!("Invalid access token: {}", e)))?;

        Ok(CallerIdentity {
            user_id: token_data.claims.sub,
            org_id: token_data.claims.org,
            session_token: Some(token),
        })
    }
}

/// Returns a fixed identity bound to a sentinel organization. Used only when
/// the explicit offline switch is set; there is no credential fallback path.
pub struct OfflineIdentityProvider {
    org_id: String,
}

impl OfflineIdentityProvider {
    pub fn new(org_id: String) -> Self {
        Self { org_id }
    }
}

#[async_trait]
impl IdentityProvider for OfflineIdentityProvider {
    async fn resolve(&self, _headers: &HeaderMap) -> Result<CallerIdentity, ApiError> {
        Ok(CallerIdentity {
            user_id: Uuid::nil(),
            org_id: self.org_id.clone(),
            session_token: None,
        })
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthenticated("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthenticated("Invalid Authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        Some(_) => Err(ApiError::unauthenticated("Empty bearer token")),
        None => Err(ApiError::unauthenticated(
            "Authorization header must use Bearer token format",
        )),
    }
}
