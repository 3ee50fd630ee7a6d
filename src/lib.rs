pub mod configuration;
pub mod connectors;
pub mod helpers;
pub mod middleware;
pub mod routes;
pub mod startup;
pub mod telemetry;
