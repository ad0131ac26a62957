/// Configuration for the dashboard server
///
/// # Environment Variables
///
/// - `DASHBOARD_HOST`: Host to bind to (default: 127.0.0.1)
/// - `DASHBOARD_PORT`: Port to bind to (default: 8501)
/// - `API_BASE_URL`: TaskFlow API to call (default: http://127.0.0.1:8000)
/// - `RUST_LOG`: Log level (default: taskflow_dashboard=debug,tower_http=debug)

use std::env;

/// Default API location
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Base URL of the TaskFlow API
    pub api_base_url: String,
}

impl Config {
    /// Loads configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("DASHBOARD_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("DASHBOARD_PORT")
            .unwrap_or_else(|| "8501".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("DASHBOARD_PORT must be a port number: {}", e))?;
        let api_base_url =
            lookup("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            anyhow::bail!("API_BASE_URL must be an http(s) URL, got '{}'", api_base_url);
        }

        Ok(Self {
            host,
            port,
            api_base_url,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8501");
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(|key| match key {
            "DASHBOARD_PORT" => Some("9501".to_string()),
            "API_BASE_URL" => Some("https://tasks.example.com".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.port, 9501);
        assert_eq!(config.api_base_url, "https://tasks.example.com");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(|key| (key == "DASHBOARD_PORT").then(|| "x".to_string())).is_err());
        assert!(Config::from_lookup(|key| (key == "API_BASE_URL").then(|| "localhost:8000".to_string())).is_err());
    }
}
