//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_worker_interval() -> u64 {
    60
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared by the HTTP server and the mailing worker.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub zmq_emailer_pub: String,
    pub templates_dir: String,
    pub secret: String,
    pub auth_service_url: String,
    /// Hub whose email settings the emailer applies to outgoing mailings.
    pub hub_id: i32,
    /// Seconds between two polls of the task registry.
    #[serde(default = "default_worker_interval")]
    pub worker_interval_secs: u64,
}

/// Loads `config/default.yaml`, the optional `config/{APP_ENV}.yaml` and
/// `APP_*` environment overrides, in that order.
#[cfg(feature = "server")]
pub fn load_server_config() -> Result<ServerConfig, config::ConfigError> {
    dotenvy::dotenv().ok();

    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    config::Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build()?
        .try_deserialize::<ServerConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_interval_defaults_to_a_minute() {
        let config: ServerConfig = serde_json::from_value(serde_json::json!({
            "domain": "localhost",
            "address": "127.0.0.1",
            "port": 8080,
            "database_url": "app.db",
            "zmq_emailer_pub": "tcp://127.0.0.1:5557",
            "templates_dir": "templates/**/*",
            "secret": "secret",
            "auth_service_url": "http://localhost/auth",
            "hub_id": 1,
        }))
        .unwrap();
        assert_eq!(config.worker_interval_secs, 60);
    }
}
