use super::gate::AuthGate;
use crate::helpers::auth_failed;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse},
    Error, HttpMessage,
};
use futures::future::{FutureExt, LocalBoxFuture};
use std::rc::Rc;
use std::sync::Arc;

pub struct ServiceAuthMiddleware<S> {
    pub(super) service: Rc<S>,
    pub(super) gate: AuthGate,
}

impl<S, B> Service<ServiceRequest> for ServiceAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let gate = self.gate.clone();

        async move {
            match gate.verify_headers(req.headers()).await {
                Ok(identity) => {
                    req.extensions_mut().insert(Arc::new(identity));
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(failure) => {
                    tracing::info!(path = %req.path(), reason = %failure, "Service authentication failed");
                    Ok(req.into_response(auth_failed()).map_into_right_body())
                }
            }
        }
        .boxed_local()
    }
}
