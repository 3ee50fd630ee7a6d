//! Inbound service authentication
//!
//! Callers identify themselves with a token header and a service-name header.
//! [`AuthGate`] asks a [`Verifier`] about the pair; [`ServiceAuth`] wraps a scope
//! and answers `403 {"error": "Service authentication failed"}` when the gate says no.

mod gate;
mod getheader;
mod manager;
mod manager_middleware;
mod verifier;

pub use gate::{AuthFailure, AuthGate, ServiceIdentity};
pub use getheader::get_header;
pub use manager::ServiceAuth;
pub use manager_middleware::ServiceAuthMiddleware;
pub use verifier::{StaticVerifier, VerificationError, Verifier};
