//! API configuration.

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Name reported by `/health`
    pub service_name: String,
    /// Seed for the synthetic job catalog
    pub catalog_seed: u64,
    /// Number of postings in the synthetic catalog
    pub catalog_size: usize,
    /// Expose Prometheus metrics at `/metrics`
    pub metrics_enabled: bool,
    /// Emit JSON logs instead of human-readable ones
    pub log_json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors_origins: vec!["*".to_string()],
            service_name: "zkjobs-api".to_string(),
            catalog_seed: 42,
            catalog_size: 48,
            metrics_enabled: true,
            log_json: false,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            service_name: std::env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            catalog_seed: std::env::var("CATALOG_SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.catalog_seed),
            catalog_size: std::env::var("CATALOG_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.catalog_size),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
            log_json: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.log_json),
        }
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
