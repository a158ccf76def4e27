//! Client configuration.
//!
//! The mocking switch lives here and nowhere else: it is read once from the
//! environment (or set explicitly) and handed to [`build_transport`].
//!
//! [`build_transport`]: crate::transport::build_transport

use std::time::Duration;

use thiserror::Error;

/// Default API base URL for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api/v1";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

// =============================================================================
// Runtime context
// =============================================================================

/// Where the client is running. Interception is only ever installed in a
/// browser context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeContext {
    Browser,
    #[default]
    Server,
}

impl RuntimeContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeContext::Browser => "browser",
            RuntimeContext::Server => "server",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "browser" | "client" | "web" => Some(RuntimeContext::Browser),
            "server" | "node" | "ssr" => Some(RuntimeContext::Server),
            _ => None,
        }
    }
}

// =============================================================================
// Mock network configuration
// =============================================================================

/// Settings for the mock network layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MockConfig {
    /// Whether mocking was requested
    pub enabled: bool,
    /// Seed for the synthetic catalog, jitter and failure injection
    pub seed: u64,
    /// Fixed delay added to every intercepted request
    pub latency: Duration,
    /// Upper bound of extra random delay
    pub jitter: Duration,
    /// Probability in [0, 1] that a handled request answers HTTP 500
    pub failure_rate: f64,
    /// Number of postings in the synthetic catalog
    pub catalog_size: usize,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            seed: 42,
            latency: Duration::ZERO,
            jitter: Duration::ZERO,
            failure_rate: 0.0,
            catalog_size: 48,
        }
    }
}

impl MockConfig {
    /// Enabled mock configuration with the given seed and no latency or
    /// failures.
    pub fn seeded(seed: u64) -> Self {
        Self {
            enabled: true,
            seed,
            ..Default::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Set the failure rate, clamped to [0, 1].
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = clamp_rate(rate);
        self
    }

    pub fn with_catalog_size(mut self, size: usize) -> Self {
        self.catalog_size = size;
        self
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            enabled: std::env::var("ZKJOBS_ENABLE_MOCKING")
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
            seed: env_parse("ZKJOBS_MOCK_SEED").unwrap_or(defaults.seed),
            latency: env_parse("ZKJOBS_MOCK_LATENCY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.latency),
            jitter: env_parse("ZKJOBS_MOCK_JITTER_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.jitter),
            failure_rate: env_parse("ZKJOBS_MOCK_FAILURE_RATE")
                .map(clamp_rate)
                .unwrap_or(defaults.failure_rate),
            catalog_size: env_parse("ZKJOBS_MOCK_CATALOG_SIZE").unwrap_or(defaults.catalog_size),
        }
    }
}

// =============================================================================
// Client configuration
// =============================================================================

/// Jobs API client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is appended to
    pub base_url: String,
    /// Total request timeout; expiry surfaces as a `network` error
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Where the client runs
    pub runtime: RuntimeContext,
    /// Mock network settings
    pub mock: MockConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            runtime: RuntimeContext::default(),
            mock: MockConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with default timeouts and mocking off.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_runtime(mut self, runtime: RuntimeContext) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn with_mock(mut self, mock: MockConfig) -> Self {
        self.mock = mock;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            std::env::var("ZKJOBS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let runtime = match std::env::var("ZKJOBS_RUNTIME") {
            Ok(value) => RuntimeContext::parse(&value).ok_or(ConfigError::InvalidValue {
                name: "ZKJOBS_RUNTIME",
                value,
            })?,
            Err(_) => RuntimeContext::default(),
        };

        let timeout_secs: u64 = env_parse("ZKJOBS_TIMEOUT_SECS").unwrap_or(10);
        let connect_timeout_secs: u64 = env_parse("ZKJOBS_CONNECT_TIMEOUT_SECS").unwrap_or(5);

        let config = Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            runtime,
            mock: MockConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: reason.to_string(),
        };

        let url = url::Url::parse(&self.base_url).map_err(|e| invalid(&e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(&format!("unsupported scheme {}", other))),
        }
    }

    /// Whether requests should go to the mock network instead of HTTP.
    pub fn mocking_active(&self) -> bool {
        self.mock.enabled && self.runtime == RuntimeContext::Browser
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

pub(crate) fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            "ZKJOBS_API_URL",
            "ZKJOBS_RUNTIME",
            "ZKJOBS_TIMEOUT_SECS",
            "ZKJOBS_CONNECT_TIMEOUT_SECS",
            "ZKJOBS_ENABLE_MOCKING",
            "ZKJOBS_MOCK_SEED",
            "ZKJOBS_MOCK_LATENCY_MS",
            "ZKJOBS_MOCK_JITTER_MS",
            "ZKJOBS_MOCK_FAILURE_RATE",
            "ZKJOBS_MOCK_CATALOG_SIZE",
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_mocking_requires_browser_context() {
        let mock = MockConfig::seeded(1);
        let server = ClientConfig::default().with_mock(mock.clone());
        assert!(!server.mocking_active());

        let browser = server.with_runtime(RuntimeContext::Browser);
        assert!(browser.mocking_active());

        let disabled = ClientConfig::default().with_runtime(RuntimeContext::Browser);
        assert!(!disabled.mocking_active());
    }

    #[test]
    fn test_failure_rate_is_clamped() {
        assert_eq!(MockConfig::default().with_failure_rate(3.0).failure_rate, 1.0);
        assert_eq!(MockConfig::default().with_failure_rate(-1.0).failure_rate, 0.0);
        assert_eq!(MockConfig::default().with_failure_rate(f64::NAN).failure_rate, 0.0);
    }

    #[test]
    fn test_runtime_parse() {
        assert_eq!(RuntimeContext::parse("Browser"), Some(RuntimeContext::Browser));
        assert_eq!(RuntimeContext::parse("ssr"), Some(RuntimeContext::Server));
        assert_eq!(RuntimeContext::parse("toaster"), None);
    }

    #[test]
    fn test_validate_rejects_relative_base_url() {
        assert!(ClientConfig::new("/api/v1").validate().is_err());
        assert!(ClientConfig::new("ftp://example.com").validate().is_err());
        assert!(ClientConfig::new("https://jobs.example.com/api/v1").validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.runtime, RuntimeContext::Server);
        assert!(!config.mock.enabled);
        assert_eq!(config.mock.seed, 42);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_mock_settings() {
        clear_env();
        std::env::set_var("ZKJOBS_ENABLE_MOCKING", "true");
        std::env::set_var("ZKJOBS_RUNTIME", "browser");
        std::env::set_var("ZKJOBS_MOCK_SEED", "7");
        std::env::set_var("ZKJOBS_MOCK_LATENCY_MS", "250");
        std::env::set_var("ZKJOBS_MOCK_FAILURE_RATE", "0.25");
        let config = ClientConfig::from_env().unwrap();
        assert!(config.mocking_active());
        assert_eq!(config.mock.seed, 7);
        assert_eq!(config.mock.latency, Duration::from_millis(250));
        assert_eq!(config.mock.failure_rate, 0.25);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_falsy_flag_disables_mocking() {
        clear_env();
        std::env::set_var("ZKJOBS_ENABLE_MOCKING", "0");
        std::env::set_var("ZKJOBS_RUNTIME", "browser");
        let config = ClientConfig::from_env().unwrap();
        assert!(!config.mocking_active());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_runtime() {
        clear_env();
        std::env::set_var("ZKJOBS_RUNTIME", "toaster");
        assert!(ClientConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_invalid_numbers() {
        clear_env();
        std::env::set_var("ZKJOBS_TIMEOUT_SECS", "soon");
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.timeout, Duration::from_secs(10));
        clear_env();
    }
}
