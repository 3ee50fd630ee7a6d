use crate::connectors::{Connection, ConnectorError, Headers};
use crate::helpers::{json, json_error};
use actix_web::{get, http::StatusCode, web, HttpResponse};
use std::sync::Arc;

/// Forward a GET to the upstream service with our own service token.
#[tracing::instrument(name = "Relay to upstream service.", skip(connection))]
#[get("/relay/{endpoint:.*}")]
pub async fn relay(
    endpoint: web::Path<String>,
    connection: web::Data<Option<Arc<Connection>>>,
) -> Result<HttpResponse, ConnectorError> {
    let Some(connection) = connection.get_ref() else {
        return Ok(json_error(
            "Outbound connection is not configured",
            StatusCode::SERVICE_UNAVAILABLE,
            Headers::new(),
        ));
    };

    let result = connection
        .get(&format!("/{}", endpoint.into_inner()), Headers::new())
        .await?;

    Ok(json(result, StatusCode::OK, Headers::new()))
}
