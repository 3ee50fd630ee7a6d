//! Outbound service connections
//!
//! Every call to another service goes through a [`Connection`], which attaches the
//! service token and interprets the JSON answer. The pieces behind it are traits so
//! they can be swapped per environment and mocked in tests.
//!
//! ## Architecture Pattern
//!
//! 1. [`Transport`] moves bytes (`HttpTransport` in production)
//! 2. [`TokenProvider`] hands out the service token (`CachedTokenProvider` in production)
//! 3. [`Connection`] glues them together and owns the 403 refresh-and-retry
//!
//! ## Usage
//!
//! ```ignore
//! let provider = Arc::new(CachedTokenProvider::new(StaticTokenSource::new(token)));
//! let transport = Arc::new(HttpTransport::from_settings(&settings.connection)?);
//! let connection = Connection::new(provider, transport);
//!
//! let profile = connection.get("/api/me", Headers::new()).await?;
//! ```

pub mod config;
pub mod connection;
pub mod errors;
#[cfg(test)]
pub mod mock;
pub mod token;
pub mod transport;

pub use config::ConnectionSettings;
pub use connection::{Connection, DEFAULT_AUTH_TOKEN_HEADER};
pub use errors::ConnectorError;
pub use token::{CachedTokenProvider, StaticTokenSource, TokenError, TokenProvider, TokenSource};
pub use transport::{Headers, HttpTransport, Method, RequestParams, Transport, TransportError};

use std::sync::Arc;

/// Build a connection from settings: static service token behind a cache, reqwest transport.
///
/// Returns `None` when no service token is configured.
pub fn init(settings: &ConnectionSettings) -> Result<Option<Connection>, TransportError> {
    let token = settings
        .service_token
        .clone()
        .or_else(|| std::env::var("SERVICE_AUTH_TOKEN").ok())
        .filter(|token| !token.is_empty());

    let Some(token) = token else {
        tracing::warn!("SERVICE_AUTH_TOKEN not set - outbound connection disabled");
        return Ok(None);
    };

    tracing::info!("Initializing service connection: {}", settings.base_url);
    let provider = Arc::new(CachedTokenProvider::new(StaticTokenSource::new(token)));
    let transport = Arc::new(HttpTransport::from_settings(settings)?);

    let mut connection = Connection::new(provider, transport);
    connection.set_auth_token_header(settings.auth_token_header.clone());

    Ok(Some(connection))
}
