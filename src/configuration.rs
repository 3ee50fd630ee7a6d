use std::collections::HashMap;

use crate::connectors::ConnectionSettings;

pub const DEFAULT_TOKEN_HEADER: &str = "X-Auth-Token";
pub const DEFAULT_SERVICE_HEADER: &str = "X-Service";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub app_port: u16,
    pub app_host: String,
    #[serde(default)]
    pub connection: ConnectionSettings,
    #[serde(default)]
    pub service_auth: ServiceAuthSettings,
}

/// Inbound service authentication.
///
/// Header names are optional; an unset or blank name falls back to the default.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ServiceAuthSettings {
    #[serde(default)]
    pub token_header: Option<String>,
    #[serde(default)]
    pub service_header: Option<String>,
    /// service name -> token it must present
    #[serde(default)]
    pub services: HashMap<String, String>,
}

impl ServiceAuthSettings {
    pub fn token_header_name(&self) -> &str {
        non_blank(&self.token_header).unwrap_or(DEFAULT_TOKEN_HEADER)
    }

    pub fn service_header_name(&self) -> &str {
        non_blank(&self.service_header).unwrap_or(DEFAULT_SERVICE_HEADER)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let settings = config::Config::builder()
        // configuration.yaml / .json / .toml next to the binary
        .add_source(config::File::with_name("configuration").required(false))
        // APP__CONNECTION__BASE_URL=... overrides connection.base_url
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .set_default("app_host", "127.0.0.1")?
        .set_default("app_port", 8000)?
        .build()?;

    let mut config: Settings = settings.try_deserialize()?;

    if config.connection.service_token.is_none() {
        config.connection.service_token = std::env::var("SERVICE_AUTH_TOKEN").ok();
    }

    Ok(config)
}
