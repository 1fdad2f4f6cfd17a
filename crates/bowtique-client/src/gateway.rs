//! The API gateway: outbound requests with uniform error semantics.
//!
//! Every call attaches the bearer token when one exists, always asks for
//! JSON, and composes non-success response bodies into one best-effort
//! message string. A 401 clears the token holder before surfacing, so the
//! rest of the app observes the forced logout immediately.

use std::sync::Arc;

use reqwest::{Client, Method, StatusCode, header};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use bowtique_core::auth::TokenHolder;

use crate::error::ApiError;

/// Gateway for all calls against the storefront backend.
///
/// Carries no timeout of its own; a hung request suspends the calling flow
/// until the transport gives up. Late responses are the caller's concern.
pub struct ApiGateway {
    client: Client,
    base_url: String,
    tokens: Arc<TokenHolder>,
}

impl ApiGateway {
    /// Creates a gateway against `base_url`, with cookies included on every
    /// request.
    pub fn new(base_url: impl Into<String>, tokens: Arc<TokenHolder>) -> Result<Self, ApiError> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::GET, path, None::<&Value>).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, None::<&Value>).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, ApiError> {
        let url = join_url(&self.base_url, path);
        debug!(%method, %url, "sending api request");

        let mut request = self
            .client
            .request(method, &url)
            .header(header::ACCEPT, "application/json");
        if let Some(body) = body {
            // Sets the JSON content type alongside the serialized body.
            request = request.json(body);
        }
        if let Some(token) = self.tokens.token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = compose_error_message(status, &text);
            if status == StatusCode::UNAUTHORIZED {
                debug!("unauthorized response, clearing stored token");
                self.tokens.clear_token();
                return Err(ApiError::SessionExpired { message });
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(parse_success_body(&text))
    }
}

/// Joins the configured base with a path, tolerating a missing leading slash.
fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Composes one message string from a non-success response body.
///
/// A JSON array joins its elements; an object prefers its `message` field,
/// then an `errors` array; any other JSON is re-serialized; non-JSON text is
/// used raw; an empty body falls back to the status reason phrase.
fn compose_error_message(status: StatusCode, text: &str) -> String {
    if text.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => join_values(&items),
        Ok(Value::Object(fields)) => {
            if let Some(message) = fields.get("message").filter(|value| !value.is_null()) {
                return match message {
                    Value::String(message) => message.clone(),
                    other => other.to_string(),
                };
            }
            if let Some(Value::Array(errors)) = fields.get("errors") {
                return join_values(errors);
            }
            Value::Object(fields).to_string()
        }
        Ok(Value::String(message)) => message,
        Ok(other) => other.to_string(),
        Err(_) => text.to_string(),
    }
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses a success body: empty becomes `{}`, unparseable text is wrapped so
/// an OK response never turns into an error.
fn parse_success_body(text: &str) -> Value {
    if text.is_empty() {
        return json!({});
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "message": text }))
}
