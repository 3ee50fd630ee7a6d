use actix_web::http::header::HeaderMap;
use actix_web::HttpRequest;
use std::sync::Arc;

use super::getheader::get_header;
use super::verifier::{VerificationError, Verifier};
use crate::configuration::ServiceAuthSettings;

/// The calling service, once its token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("header {0} is missing")]
    MissingHeader(String),
    #[error("{0}")]
    InvalidHeader(String),
    #[error("token rejected for service {0}")]
    Rejected(String),
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// Checks the token/service header pair of inbound calls.
#[derive(Clone)]
pub struct AuthGate {
    verifier: Arc<dyn Verifier>,
    token_header: String,
    service_header: String,
}

impl AuthGate {
    pub fn new(verifier: Arc<dyn Verifier>, settings: &ServiceAuthSettings) -> Self {
        Self {
            verifier,
            token_header: settings.token_header_name().to_string(),
            service_header: settings.service_header_name().to_string(),
        }
    }

    pub fn token_header(&self) -> &str {
        &self.token_header
    }

    pub fn service_header(&self) -> &str {
        &self.service_header
    }

    /// `true` only when the verifier accepts the pair. Every failure,
    /// verification errors included, reads as `false`.
    pub async fn check_auth(&self, req: &HttpRequest) -> bool {
        self.verify_headers(req.headers()).await.is_ok()
    }

    #[tracing::instrument(name = "Verify service token", skip(self, headers))]
    pub async fn verify_headers(&self, headers: &HeaderMap) -> Result<ServiceIdentity, AuthFailure> {
        let token = self.read(headers, &self.token_header)?;
        let service = self.read(headers, &self.service_header)?;

        match self.verifier.verify(&token, &service).await {
            Ok(true) => {
                tracing::debug!(service = %service, "Service authenticated");
                Ok(ServiceIdentity { name: service })
            }
            Ok(false) => {
                tracing::warn!(service = %service, "Service token rejected");
                Err(AuthFailure::Rejected(service))
            }
            Err(err) => {
                tracing::warn!(service = %service, error = %err, "Service token verification failed");
                Err(err.into())
            }
        }
    }

    fn read(&self, headers: &HeaderMap, name: &str) -> Result<String, AuthFailure> {
        get_header::<String>(headers, name)
            .map_err(AuthFailure::InvalidHeader)?
            .ok_or_else(|| AuthFailure::MissingHeader(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Accepts (t1, svc1), raises for svc-broken, rejects the rest; records calls
    #[derive(Default)]
    struct RecordingVerifier {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Verifier for RecordingVerifier {
        async fn verify(&self, token: &str, service: &str) -> Result<bool, VerificationError> {
            self.calls
                .lock()
                .unwrap()
                .push((token.to_string(), service.to_string()));
            match (token, service) {
                (_, "svc-broken") => Err(VerificationError::Invalid("bad signature".to_string())),
                ("t1", "svc1") => Ok(true),
                _ => Ok(false),
            }
        }
    }

    fn gate(settings: ServiceAuthSettings) -> (AuthGate, Arc<RecordingVerifier>) {
        let verifier = Arc::new(RecordingVerifier::default());
        (AuthGate::new(verifier.clone(), &settings), verifier)
    }

    #[actix_web::test]
    async fn default_headers_with_valid_pair_pass() {
        let (gate, verifier) = gate(ServiceAuthSettings::default());
        let req = TestRequest::default()
            .insert_header(("X-Auth-Token", "t1"))
            .insert_header(("X-Service", "svc1"))
            .to_http_request();

        assert!(gate.check_auth(&req).await);
        assert_eq!(
            verifier.calls.lock().unwrap().clone(),
            vec![("t1".to_string(), "svc1".to_string())]
        );
    }

    #[actix_web::test]
    async fn verification_error_reads_as_false() {
        let (gate, _) = gate(ServiceAuthSettings::default());
        let req = TestRequest::default()
            .insert_header(("X-Auth-Token", "t1"))
            .insert_header(("X-Service", "svc-broken"))
            .to_http_request();

        assert!(!gate.check_auth(&req).await);
        assert_eq!(
            gate.verify_headers(req.headers()).await,
            Err(AuthFailure::Verification(VerificationError::Invalid(
                "bad signature".to_string()
            )))
        );
    }

    #[actix_web::test]
    async fn rejected_pair_is_false() {
        let (gate, _) = gate(ServiceAuthSettings::default());
        let req = TestRequest::default()
            .insert_header(("X-Auth-Token", "wrong"))
            .insert_header(("X-Service", "svc1"))
            .to_http_request();

        assert!(!gate.check_auth(&req).await);
    }

    #[actix_web::test]
    async fn missing_header_skips_verifier() {
        let (gate, verifier) = gate(ServiceAuthSettings::default());
        let req = TestRequest::default()
            .insert_header(("X-Auth-Token", "t1"))
            .to_http_request();

        assert_eq!(
            gate.verify_headers(req.headers()).await,
            Err(AuthFailure::MissingHeader("X-Service".to_string()))
        );
        assert!(verifier.calls.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn configured_header_names_are_used() {
        let (gate, _) = gate(ServiceAuthSettings {
            token_header: Some("X-Internal-Token".to_string()),
            service_header: None,
            ..Default::default()
        });
        assert_eq!(gate.token_header(), "X-Internal-Token");
        assert_eq!(gate.service_header(), "X-Service");

        let req = TestRequest::default()
            .insert_header(("X-Internal-Token", "t1"))
            .insert_header(("X-Service", "svc1"))
            .to_http_request();
        assert!(gate.check_auth(&req).await);

        let req = TestRequest::default()
            .insert_header(("X-Auth-Token", "t1"))
            .insert_header(("X-Service", "svc1"))
            .to_http_request();
        assert!(!gate.check_auth(&req).await);
    }
}
