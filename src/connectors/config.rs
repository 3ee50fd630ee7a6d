use serde::{Deserialize, Serialize};

use super::connection::DEFAULT_AUTH_TOKEN_HEADER;

/// Outbound connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Base URL every endpoint is resolved against (e.g., http://localhost:4100/server/user)
    pub base_url: String,
    /// Header carrying the service token
    #[serde(default = "ConnectionSettings::default_auth_token_header")]
    pub auth_token_header: String,
    /// HTTP request timeout in seconds
    #[serde(default = "ConnectionSettings::default_timeout_secs")]
    pub timeout_secs: u64,
    /// Service token for outbound calls (from env: SERVICE_AUTH_TOKEN)
    #[serde(skip)]
    pub service_token: Option<String>,
}

impl ConnectionSettings {
    fn default_auth_token_header() -> String {
        DEFAULT_AUTH_TOKEN_HEADER.to_string()
    }

    const fn default_timeout_secs() -> u64 {
        10
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4100".to_string(),
            auth_token_header: Self::default_auth_token_header(),
            timeout_secs: Self::default_timeout_secs(),
            service_token: None,
        }
    }
}
