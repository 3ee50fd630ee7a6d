use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token source returned no token")]
    Empty,
    #[error("token source failed: {0}")]
    Source(String),
}

/// Hands out the token attached to outbound calls.
///
/// With `use_cache = false` the provider must not return a previously
/// cached token; the connection relies on this to recover from a 403.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_token(&self, use_cache: bool) -> Result<String, TokenError>;
}

/// Where fresh tokens come from (the issuer side, outside this crate).
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<String, TokenError>;
}

/// Token handed out by configuration, e.g. `SERVICE_AUTH_TOKEN`.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn fetch_token(&self) -> Result<String, TokenError> {
        if self.token.is_empty() {
            return Err(TokenError::Empty);
        }
        Ok(self.token.clone())
    }
}

/// Keeps the last token from `S` and serves it until asked for a fresh one.
pub struct CachedTokenProvider<S> {
    source: S,
    cached: RwLock<Option<String>>,
}

impl<S: TokenSource> CachedTokenProvider<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: RwLock::new(None),
        }
    }

    /// Drop the cached token so the next call goes to the source.
    pub async fn invalidate(&self) {
        self.cached.write().await.take();
    }
}

#[async_trait]
impl<S: TokenSource> TokenProvider for CachedTokenProvider<S> {
    async fn get_token(&self, use_cache: bool) -> Result<String, TokenError> {
        if use_cache {
            if let Some(token) = self.cached.read().await.as_ref() {
                return Ok(token.clone());
            }
        }

        let token = self.source.fetch_token().await?;
        if token.is_empty() {
            return Err(TokenError::Empty);
        }
        *self.cached.write().await = Some(token.clone());
        tracing::debug!(use_cache, "Fetched service token from source");

        Ok(token)
    }
}
