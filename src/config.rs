use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection settings for the raffle data backend (the list service that
/// owns participants / prizes / mappings / cancels).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_retry_max_attempts() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    200
}

fn default_backend_base_url() -> String {
    "http://localhost:6001/api".to_string()
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Read the config file if present, otherwise build entirely from
        // environment variables and defaults.
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse config: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 6002u16),
                    },
                    backend: BackendConfig {
                        base_url: get_env("BACKEND_BASE_URL")
                            .unwrap_or_else(default_backend_base_url),
                        retry_max_attempts: get_env_parse(
                            "BACKEND_RETRY_MAX_ATTEMPTS",
                            default_retry_max_attempts(),
                        ),
                        retry_delay_ms: get_env_parse(
                            "BACKEND_RETRY_DELAY_MS",
                            default_retry_delay_ms(),
                        ),
                    },
                }
            }
            Err(e) => return Err(Box::new(e)),
        };

        // Environment variables take precedence over file values.
        if let Ok(host) = env::var("SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| format!("Invalid SERVER_PORT: {e}"))?;
        }
        if let Ok(base_url) = env::var("BACKEND_BASE_URL") {
            config.backend.base_url = base_url;
        }

        if config.backend.retry_max_attempts == 0 {
            return Err("backend.retry_max_attempts must be at least 1".into());
        }

        Ok(config)
    }
}
