use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;

pub(crate) const DEFAULT_CLIENT_ERROR_MESSAGE: &str = "Error while connecting to service";
pub(crate) const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to service";
pub(crate) const MALFORMED_RESPONSE_MESSAGE: &str = "Malformed service response";
pub(crate) const TOKEN_UNAVAILABLE_MESSAGE: &str = "Failed to obtain service token";

/// Errors that can occur during inter-service communication
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// Transport failed outright, or the peer rejected the call with a 4xx
    ServiceUnavailable(String),
    /// Response body was not the JSON shape we expect
    ServiceBadResponse(String),
    /// Response decoded fine but carried an application-level `error` field
    ServiceError(String),
}

impl ConnectorError {
    pub fn message(&self) -> &str {
        match self {
            Self::ServiceUnavailable(msg) | Self::ServiceBadResponse(msg) | Self::ServiceError(msg) => {
                msg
            }
        }
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            Self::ServiceBadResponse(msg) => write!(f, "Bad service response: {}", msg),
            Self::ServiceError(msg) => write!(f, "Service error: {}", msg),
        }
    }
}

impl std::error::Error for ConnectorError {}

impl ResponseError for ConnectorError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.message(),
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ServiceBadResponse(_) => StatusCode::BAD_GATEWAY,
            Self::ServiceError(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
