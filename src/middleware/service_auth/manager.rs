use super::gate::AuthGate;
use super::manager_middleware::ServiceAuthMiddleware;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use std::future::{ready, Ready};
use std::rc::Rc;

/// Rejects requests whose service token does not verify with a 403 JSON error.
pub struct ServiceAuth {
    gate: AuthGate,
}

impl ServiceAuth {
    pub fn new(gate: AuthGate) -> Self {
        Self { gate }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ServiceAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ServiceAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ServiceAuthMiddleware {
            service: Rc::new(service),
            gate: self.gate.clone(),
        }))
    }
}
