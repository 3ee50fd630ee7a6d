use interlink::configuration::{ServiceAuthSettings, Settings};
use interlink::connectors::ConnectionSettings;
use std::collections::HashMap;
use std::net::TcpListener;

pub struct TestApp {
    pub address: String,
}

pub fn test_settings(upstream: &str) -> Settings {
    Settings {
        app_port: 0,
        app_host: "127.0.0.1".to_string(),
        connection: ConnectionSettings {
            base_url: upstream.to_string(),
            service_token: Some("outbound-token".to_string()),
            ..Default::default()
        },
        service_auth: ServiceAuthSettings {
            services: HashMap::from([("billing".to_string(), "billing-token".to_string())]),
            ..Default::default()
        },
    }
}

pub async fn spawn_app(settings: Settings) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let server = interlink::startup::run(listener, settings)
        .await
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp { address }
}
