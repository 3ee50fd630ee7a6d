use crate::configuration::Settings;
use crate::connectors;
use crate::middleware::service_auth::{AuthGate, ServiceAuth, StaticVerifier, Verifier};
use crate::routes;
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub async fn run(listener: TcpListener, settings: Settings) -> Result<Server, std::io::Error> {
    let verifier: Arc<dyn Verifier> =
        Arc::new(StaticVerifier::new(settings.service_auth.services.clone()));
    let gate = AuthGate::new(verifier, &settings.service_auth);
    tracing::info!(
        token_header = gate.token_header(),
        service_header = gate.service_header(),
        "Service authentication configured"
    );

    let connection = connectors::init(&settings.connection)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?
        .map(Arc::new);
    let connection = web::Data::new(connection);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(connection.clone())
            .service(web::scope("/health_check").service(routes::health_check))
            .service(
                web::scope("/service")
                    .wrap(ServiceAuth::new(gate.clone()))
                    .service(routes::service::ping)
                    .service(routes::service::relay),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
