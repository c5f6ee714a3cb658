//! Configuration for the WHOIS client and DNS helper
//!
//! Defaults are compile-time constants. Callers override them by building a
//! [`Config`] explicitly (see [`ConfigBuilder`]) or from the environment with
//! [`Config::from_env`]; the resulting values are handed to the clients at
//! construction time.

use std::time::Duration;

/// Default WHOIS service host
pub const DEFAULT_WHOIS_HOST: &str = "bgp.tools";
/// Default WHOIS service port
pub const DEFAULT_WHOIS_PORT: u16 = 43;
/// Default WHOIS read deadline in milliseconds, measured from connection open
pub const DEFAULT_WHOIS_TIMEOUT_MS: u64 = 10_000;
/// Default recursive DNS resolver
pub const DEFAULT_DNS_SERVER: &str = "1.1.1.1:53";
/// Default timeout for a single DNS exchange in milliseconds
pub const DEFAULT_DNS_TIMEOUT_MS: u64 = 5_000;

/// Environment variable overriding the WHOIS host
pub const ENV_WHOIS_HOST: &str = "ADDR_WHOIS_HOST";
/// Environment variable overriding the WHOIS port
pub const ENV_WHOIS_PORT: &str = "ADDR_WHOIS_PORT";
/// Environment variable overriding the DNS server (`host:port`)
pub const ENV_DNS_SERVER: &str = "ADDR_DNS_SERVER";

/// Errors for invalid configuration values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// WHOIS host is empty
    #[error("WHOIS host must not be empty")]
    EmptyWhoisHost,

    /// WHOIS port is zero
    #[error("WHOIS port must be greater than 0")]
    ZeroWhoisPort,

    /// DNS server is empty
    #[error("DNS server must not be empty")]
    EmptyDnsServer,

    /// A timeout is zero
    #[error("{0} timeout must be greater than 0")]
    ZeroTimeout(&'static str),

    /// An environment variable holds an unusable value
    #[error("invalid value '{value}' for {name}")]
    InvalidEnv {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// WHOIS client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoisConfig {
    /// Host name or address of the WHOIS service
    pub host: String,
    /// TCP port of the WHOIS service
    pub port: u16,
    /// Read deadline for one query, measured from connection open
    pub timeout: Duration,
}

impl WhoisConfig {
    /// Settings for a specific host and port with the default timeout
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Replace the read deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `host:port` target string
    pub fn target(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            // Bare IPv6 literal
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyWhoisHost);
        }
        if self.port == 0 {
            return Err(ConfigError::ZeroWhoisPort);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("WHOIS"));
        }
        Ok(())
    }
}

impl Default for WhoisConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WHOIS_HOST.to_string(),
            port: DEFAULT_WHOIS_PORT,
            timeout: Duration::from_millis(DEFAULT_WHOIS_TIMEOUT_MS),
        }
    }
}

/// DNS helper settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsConfig {
    /// Recursive resolver as `host:port`
    pub server: String,
    /// Timeout for one query/response exchange
    pub timeout: Duration,
}

impl DnsConfig {
    /// Settings for a specific server with the default timeout
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Self::default()
        }
    }

    /// Replace the exchange timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.trim().is_empty() {
            return Err(ConfigError::EmptyDnsServer);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("DNS"));
        }
        Ok(())
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_DNS_SERVER.to_string(),
            timeout: Duration::from_millis(DEFAULT_DNS_TIMEOUT_MS),
        }
    }
}

/// Complete configuration for a [`crate::Resolver`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// WHOIS client settings
    pub whois: WhoisConfig,
    /// DNS helper settings
    pub dns: DnsConfig,
}

impl Config {
    /// Create a new builder starting from the defaults
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Defaults with any `ADDR_*` environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut builder = ConfigBuilder::new();
        if let Some(host) = lookup(ENV_WHOIS_HOST) {
            builder = builder.whois_host(host);
        }
        if let Some(port) = lookup(ENV_WHOIS_PORT) {
            let parsed = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_WHOIS_PORT,
                value: port.clone(),
            })?;
            builder = builder.whois_port(parsed);
        }
        if let Some(server) = lookup(ENV_DNS_SERVER) {
            builder = builder.dns_server(server);
        }
        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.whois.validate()?;
        self.dns.validate()
    }
}

/// Builder for [`Config`]
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the WHOIS service host
    pub fn whois_host(mut self, host: impl Into<String>) -> Self {
        self.config.whois.host = host.into();
        self
    }

    /// Set the WHOIS service port
    pub fn whois_port(mut self, port: u16) -> Self {
        self.config.whois.port = port;
        self
    }

    /// Set the WHOIS read deadline
    pub fn whois_timeout(mut self, timeout: Duration) -> Self {
        self.config.whois.timeout = timeout;
        self
    }

    /// Set the DNS resolver (`host:port`)
    pub fn dns_server(mut self, server: impl Into<String>) -> Self {
        self.config.dns.server = server.into();
        self
    }

    /// Set the DNS exchange timeout
    pub fn dns_timeout(mut self, timeout: Duration) -> Self {
        self.config.dns.timeout = timeout;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl From<Config> for ConfigBuilder {
    fn from(config: Config) -> Self {
        Self { config }
    }
}
