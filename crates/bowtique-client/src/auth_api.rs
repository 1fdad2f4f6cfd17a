//! Typed auth endpoints over the gateway.
//!
//! Request/response DTOs match the backend's auth module: `POST /auth/login`,
//! `POST /auth/register`, `GET /auth/me`. Response fields are all optional so
//! a partial payload never fails to decode.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::ApiError;
use crate::gateway::ApiGateway;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Payload returned by login/register (token plus identity fields) and by
/// the who-am-I endpoint (identity fields only).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthResponse {
    pub token: Option<String>,
    pub id: Option<i64>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

/// Seam for the auth endpoints, so use-cases can run against a test double.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;
    async fn me(&self) -> Result<AuthResponse, ApiError>;
}

/// Live implementation over the API gateway.
pub struct HttpAuthApi {
    gateway: Arc<ApiGateway>,
}

impl HttpAuthApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        decode(self.gateway.post("/auth/login", request).await?)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        decode(self.gateway.post("/auth/register", request).await?)
    }

    async fn me(&self) -> Result<AuthResponse, ApiError> {
        decode(self.gateway.get("/auth/me").await?)
    }
}

fn decode(value: Value) -> Result<AuthResponse, ApiError> {
    serde_json::from_value(value)
        .map_err(|err| ApiError::Transport(format!("malformed response body: {err}")))
}
