use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::Instrument;

use super::config::ConnectionSettings;

/// HTTP verbs the connection layer is allowed to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Header name -> value, in the order the transport should apply them.
pub type Headers = BTreeMap<String, String>;

/// Everything a transport needs besides method and endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pub headers: Headers,
    pub body: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer answered with a 4xx status.
    #[error("client error {status}: {body}")]
    Client { status: u16, body: String },
    /// Anything else: connect failure, timeout, 5xx, unreadable body.
    #[error("transport failure: {0}")]
    Failed(String),
}

impl TransportError {
    pub fn client_status(&self) -> Option<u16> {
        match self {
            TransportError::Client { status, .. } => Some(*status),
            TransportError::Failed(_) => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Failed(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            Self::Failed(format!("Connection failed: {}", err))
        } else {
            Self::Failed(err.to_string())
        }
    }
}

/// The wire underneath a [`Connection`](super::Connection).
/// Swappable so tests and callers can bring their own client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the call and return the raw response body on success.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: RequestParams,
    ) -> Result<String, TransportError>;
}

/// reqwest-backed transport talking to a single upstream base URL
pub struct HttpTransport {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("interlink/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| TransportError::Failed(format!("HTTP client error: {}", err)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn from_settings(settings: &ConnectionSettings) -> Result<Self, TransportError> {
        Self::new(
            &settings.base_url,
            Duration::from_secs(settings.timeout_secs.max(1)),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: RequestParams,
    ) -> Result<String, TransportError> {
        let url = self.build_url(endpoint);
        let span = tracing::info_span!("interlink_http_request", %method, url = %url);

        let mut builder = self.http_client.request(method.into(), &url);
        for (name, value) in &params.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = params.body {
            builder = builder.body(body);
        }

        let resp = builder.send().instrument(span).await?;
        let status = resp.status();
        let text = resp.text().await?;

        if status.is_client_error() {
            return Err(TransportError::Client {
                status: status.as_u16(),
                body: text,
            });
        }
        if !status.is_success() {
            return Err(TransportError::Failed(format!(
                "upstream responded with {}",
                status
            )));
        }

        Ok(text)
    }
}
