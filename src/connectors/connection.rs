use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

use super::errors::{
    ConnectorError, CONNECT_FAILED_MESSAGE, DEFAULT_CLIENT_ERROR_MESSAGE,
    MALFORMED_RESPONSE_MESSAGE, TOKEN_UNAVAILABLE_MESSAGE,
};
use super::token::TokenProvider;
use super::transport::{Headers, Method, RequestParams, Transport, TransportError};

pub const DEFAULT_AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

const FORBIDDEN: u16 = 403;

/// Which token an attempt is sent with.
///
/// A call starts at `Cached` when the caller allows it and can move to
/// `Fresh` once, after a 403. `Fresh` never transitions, which bounds a
/// call to two transport attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Cached,
    Fresh,
}

impl Attempt {
    fn use_cache(self) -> bool {
        matches!(self, Attempt::Cached)
    }
}

/// Outbound service connection.
///
/// Every request carries the service token in `auth_token_header`. When the
/// peer rejects a cached token with 403 the call is repeated once with a
/// freshly issued token.
pub struct Connection {
    token_provider: Arc<dyn TokenProvider>,
    transport: Arc<dyn Transport>,
    auth_token_header: String,
}

impl Connection {
    pub fn new(token_provider: Arc<dyn TokenProvider>, transport: Arc<dyn Transport>) -> Self {
        Self {
            token_provider,
            transport,
            auth_token_header: DEFAULT_AUTH_TOKEN_HEADER.to_string(),
        }
    }

    pub fn auth_token_header(&self) -> &str {
        &self.auth_token_header
    }

    pub fn set_auth_token_header(&mut self, header: impl Into<String>) {
        self.auth_token_header = header.into();
    }

    pub fn set_transport(&mut self, transport: Arc<dyn Transport>) {
        self.transport = transport;
    }

    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        headers: Headers,
        use_cache: bool,
    ) -> Result<Value, ConnectorError> {
        let span = tracing::info_span!("service_request", %method, endpoint);
        let payload = encode_body(body);

        let mut attempt = if use_cache {
            Attempt::Cached
        } else {
            Attempt::Fresh
        };

        let raw = loop {
            let token = self
                .token_provider
                .get_token(attempt.use_cache())
                .await
                .map_err(|err| {
                    tracing::error!(error = %err, "Could not obtain service token");
                    ConnectorError::ServiceUnavailable(TOKEN_UNAVAILABLE_MESSAGE.to_string())
                })?;

            let params = RequestParams {
                headers: merge_headers(&self.auth_token_header, token, &headers),
                body: payload.clone(),
            };

            match self
                .transport
                .request(method, endpoint, params)
                .instrument(span.clone())
                .await
            {
                Ok(raw) => break raw,
                Err(TransportError::Client { status, .. })
                    if status == FORBIDDEN && attempt == Attempt::Cached =>
                {
                    tracing::warn!(
                        %method,
                        endpoint,
                        "Cached service token rejected, retrying with a fresh one"
                    );
                    attempt = Attempt::Fresh;
                }
                Err(TransportError::Client { status, body }) => {
                    tracing::error!(%method, endpoint, status, "Service rejected request");
                    return Err(ConnectorError::ServiceUnavailable(client_error_message(&body)));
                }
                Err(TransportError::Failed(reason)) => {
                    tracing::error!(%method, endpoint, error = %reason, "Service request failed");
                    return Err(ConnectorError::ServiceUnavailable(
                        CONNECT_FAILED_MESSAGE.to_string(),
                    ));
                }
            }
        };

        interpret_response(&raw)
    }

    pub async fn get(&self, endpoint: &str, headers: Headers) -> Result<Value, ConnectorError> {
        self.request(Method::Get, endpoint, None, headers, true).await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        body: Option<Value>,
        headers: Headers,
    ) -> Result<Value, ConnectorError> {
        self.request(Method::Post, endpoint, body, headers, true).await
    }

    pub async fn put(
        &self,
        endpoint: &str,
        body: Option<Value>,
        headers: Headers,
    ) -> Result<Value, ConnectorError> {
        self.request(Method::Put, endpoint, body, headers, true).await
    }

    pub async fn delete(
        &self,
        endpoint: &str,
        body: Option<Value>,
        headers: Headers,
    ) -> Result<Value, ConnectorError> {
        self.request(Method::Delete, endpoint, body, headers, true).await
    }
}

/// Scalars go out as their plain text, arrays and objects as JSON.
/// `None` and JSON `null` send no body at all.
pub(crate) fn encode_body(body: Option<Value>) -> Option<String> {
    match body? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        structured => Some(structured.to_string()),
    }
}

/// Auth header first, then caller headers on top. Names compare
/// case-insensitively so a caller can override the token.
pub(crate) fn merge_headers(auth_header: &str, token: String, extra: &Headers) -> Headers {
    let mut merged = Headers::new();
    merged.insert(auth_header.to_string(), token);

    for (name, value) in extra {
        merged.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        merged.insert(name.clone(), value.clone());
    }

    merged
}

fn client_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(error_field)
        .unwrap_or_else(|| DEFAULT_CLIENT_ERROR_MESSAGE.to_string())
}

/// Top-level, non-null `error` member of an object, as text.
fn error_field(value: &Value) -> Option<String> {
    match value.as_object()?.get("error")? {
        Value::Null => None,
        Value::String(msg) => Some(msg.clone()),
        other => Some(other.to_string()),
    }
}

/// Null, false, zero, "", "0", [] and {} all count as "nothing came back".
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

pub(crate) fn interpret_response(raw: &str) -> Result<Value, ConnectorError> {
    let decoded = serde_json::from_str::<Value>(raw).unwrap_or(Value::Null);

    if is_empty(&decoded) && raw != "[]" && raw != "{}" {
        tracing::error!(body_len = raw.len(), "Malformed service response");
        return Err(ConnectorError::ServiceBadResponse(
            MALFORMED_RESPONSE_MESSAGE.to_string(),
        ));
    }

    if let Some(message) = error_field(&decoded) {
        return Err(ConnectorError::ServiceError(message));
    }

    Ok(decoded)
}
