use crate::connectors::Headers;
use crate::helpers::json;
use crate::middleware::service_auth::ServiceIdentity;
use actix_web::{get, http::StatusCode, web, HttpResponse};
use serde_json::json as json_value;
use std::sync::Arc;

/// Lets a peer check that its service token is accepted.
#[tracing::instrument(name = "Service ping.", skip(identity))]
#[get("/ping")]
pub async fn ping(identity: web::ReqData<Arc<ServiceIdentity>>) -> HttpResponse {
    json(
        json_value!({ "service": identity.name }),
        StatusCode::OK,
        Headers::new(),
    )
}
