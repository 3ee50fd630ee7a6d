use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("unknown service {0}")]
    UnknownService(String),
    #[error("token could not be verified: {0}")]
    Invalid(String),
}

/// Decides whether `token` really belongs to `service`.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, token: &str, service: &str) -> Result<bool, VerificationError>;
}

/// Allow-list of service name -> expected token, loaded from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticVerifier {
    services: HashMap<String, String>,
}

impl StaticVerifier {
    pub fn new(services: HashMap<String, String>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Verifier for StaticVerifier {
    async fn verify(&self, token: &str, service: &str) -> Result<bool, VerificationError> {
        let expected = self
            .services
            .get(service)
            .ok_or_else(|| VerificationError::UnknownService(service.to_string()))?;

        Ok(!expected.is_empty() && expected == token)
    }
}
