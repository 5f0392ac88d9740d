use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Runtime configuration: compiled-in defaults overridden by `LIFEBOARD_*`
/// environment variables (e.g. `LIFEBOARD_DATABASE_URL`, `LIFEBOARD_LISTEN_ADDR`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Drop the cookie `Secure` attribute for plain-HTTP deployments.
    pub insecure_cookie: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:lifeboard.sqlite".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            insecure_cookie: false,
        }
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("LIFEBOARD_"))
        .extract()
        .expect("invalid LIFEBOARD_* environment configuration")
});
