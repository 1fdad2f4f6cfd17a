//! HTTP client tier: the API gateway and typed auth endpoints.

pub mod auth_api;
pub mod error;
pub mod gateway;

pub use auth_api::{AuthApi, AuthResponse, HttpAuthApi, LoginRequest, RegisterRequest};
pub use error::ApiError;
pub use gateway::ApiGateway;
