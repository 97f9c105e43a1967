use std::time::Duration;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Dev,
    Uat,
    Prod,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "local" => Environment::Local,
            "dev" => Environment::Dev,
            "uat" => Environment::Uat,
            "prod" => Environment::Prod,
            other => {
                warn!("Unknown RECEIPTS_ENV '{}', falling back to production logging", other);
                Environment::Prod
            }
        }
    }

    /// Default log directive when RUST_LOG is not set
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Local | Environment::Dev | Environment::Uat => "debug",
            Environment::Prod => "info",
        }
    }
}

/// Which Result Cache adapter the server wires in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheBackend {
    /// DashMap entries with a tokio timer per expiring key
    Ttl,
    /// moka cache with per-entry expiry
    Moka,
}

impl CacheBackend {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "ttl" => CacheBackend::Ttl,
            "moka" => CacheBackend::Moka,
            other => {
                warn!("Unknown RECEIPTS_CACHE_BACKEND '{}', using 'ttl'", other);
                CacheBackend::Ttl
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub env: Environment,
    pub host: String,
    pub http_port: u16,
    pub request_timeout: Duration,
    pub shutdown_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_backend: CacheBackend,
    pub warm_queue_capacity: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("request timeout must be positive")]
    ZeroRequestTimeout,
    #[error("shutdown timeout must be positive")]
    ZeroShutdownTimeout,
    #[error("cache warm queue capacity must be positive")]
    ZeroWarmQueueCapacity,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 4_000;
    const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 10_000;
    const DEFAULT_CACHE_TTL_MS: u64 = 300_000; // 5 minutes
    const DEFAULT_WARM_QUEUE_CAPACITY: usize = 1024;

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |name: &str, default: u64| -> u64 {
            match lookup(name) {
                Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                    warn!("{} is not a valid number ('{}'), using {}", name, raw, default);
                    default
                }),
                None => default,
            }
        };

        let http_port = lookup("RECEIPTS_HTTP_PORT")
            .and_then(|raw| raw.trim().parse::<u16>().ok())
            .unwrap_or(Self::DEFAULT_HTTP_PORT);

        Self {
            env: lookup("RECEIPTS_ENV")
                .map(|raw| Environment::parse(&raw))
                .unwrap_or(Environment::Local),
            host: lookup("RECEIPTS_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            http_port,
            request_timeout: Duration::from_millis(number(
                "RECEIPTS_REQUEST_TIMEOUT_MS",
                Self::DEFAULT_REQUEST_TIMEOUT_MS,
            )),
            shutdown_timeout: Duration::from_millis(number(
                "RECEIPTS_SHUTDOWN_TIMEOUT_MS",
                Self::DEFAULT_SHUTDOWN_TIMEOUT_MS,
            )),
            cache_ttl: Duration::from_millis(number(
                "RECEIPTS_CACHE_TTL_MS",
                Self::DEFAULT_CACHE_TTL_MS,
            )),
            cache_backend: lookup("RECEIPTS_CACHE_BACKEND")
                .map(|raw| CacheBackend::parse(&raw))
                .unwrap_or(CacheBackend::Ttl),
            warm_queue_capacity: number(
                "RECEIPTS_WARM_QUEUE_CAPACITY",
                Self::DEFAULT_WARM_QUEUE_CAPACITY as u64,
            ) as usize,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        if self.shutdown_timeout.is_zero() {
            return Err(ConfigError::ZeroShutdownTimeout);
        }
        if self.warm_queue_capacity == 0 {
            return Err(ConfigError::ZeroWarmQueueCapacity);
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);

        assert_eq!(config.env, Environment::Local);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(4));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.cache_backend, CacheBackend::Ttl);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("RECEIPTS_ENV", "prod"),
            ("RECEIPTS_HOST", "127.0.0.1"),
            ("RECEIPTS_HTTP_PORT", "9000"),
            ("RECEIPTS_CACHE_TTL_MS", "1500"),
            ("RECEIPTS_CACHE_BACKEND", "Moka"),
        ]);

        assert_eq!(config.env, Environment::Prod);
        assert_eq!(config.env.default_log_level(), "info");
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.cache_ttl, Duration::from_millis(1500));
        assert_eq!(config.cache_backend, CacheBackend::Moka);
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = config_from(&[
            ("RECEIPTS_HTTP_PORT", "not-a-port"),
            ("RECEIPTS_REQUEST_TIMEOUT_MS", "soon"),
        ]);

        assert_eq!(config.http_port, 8080);
        assert_eq!(config.request_timeout, Duration::from_secs(4));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let config = config_from(&[("RECEIPTS_REQUEST_TIMEOUT_MS", "0")]);
        assert_eq!(config.validate(), Err(ConfigError::ZeroRequestTimeout));

        let config = config_from(&[("RECEIPTS_SHUTDOWN_TIMEOUT_MS", "0")]);
        assert_eq!(config.validate(), Err(ConfigError::ZeroShutdownTimeout));
    }
}
