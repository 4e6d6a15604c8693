use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: u64,
}

impl AppConfig {
    pub fn build() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("server.rust_log", "info,catalogo_server=debug")?
            // Plain DATABASE_URL keeps parity with the usual Postgres setup;
            // APP_DATABASE__URL still wins when both are set.
            .set_default(
                "database.url",
                std::env::var("DATABASE_URL").unwrap_or_default(),
            )?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 30)?
            // Environment variables with an APP prefix, e.g.
            // `APP_SERVER__PORT=8080` sets `ServerConfig.port`
            .add_source(Environment::default().separator("__").prefix("APP"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply() {
        let config = AppConfig::build().expect("defaults must satisfy the schema");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.database.max_connections, 10);
        assert!(!config.server.rust_log.is_empty());
    }
}
