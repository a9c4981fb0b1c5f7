//! Client configuration and builder pattern.

use crate::error::{ClientError, Result};
use crate::rotator::url_host;
use std::net::SocketAddr;
use std::time::Duration;

/// Identity sent as `user.name` when none is configured.
pub const DEFAULT_USER_NAME: &str = "APP";

/// Default WebHCat port.
pub const DEFAULT_PORT: u16 = 50111;

/// Host used when no pool is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Configuration for the WebHCat client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identity injected as `user.name` on every request (default: "APP")
    pub user_name: String,
    /// Port shared by every host in the pool (default: 50111)
    pub port: u16,
    /// Ordered pool of interchangeable hosts (default: ["localhost"])
    pub hosts: Vec<String>,
    /// Request timeout (default: 30 seconds)
    pub timeout: Duration,
    /// Maximum host failovers per call; `None` means one per pooled host
    pub max_failovers: Option<usize>,
    /// Replay query parameters and body on failover (default: false)
    pub replay_on_failover: bool,
    /// Retries for connection-level failures on the same host (default: 0)
    pub connect_retries: u32,
    /// Initial retry delay for exponential backoff (default: 100ms)
    pub retry_initial_delay: Duration,
    /// Maximum retry delay (default: 10 seconds)
    pub retry_max_delay: Duration,
    /// Host names pinned to socket addresses, bypassing DNS
    pub dns_overrides: Vec<(String, SocketAddr)>,
    /// Ignore proxy settings from the environment (default: false)
    pub no_proxy: bool,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_name: DEFAULT_USER_NAME.to_string(),
            port: DEFAULT_PORT,
            hosts: vec![DEFAULT_HOST.to_string()],
            timeout: Duration::from_secs(30),
            max_failovers: None,
            replay_on_failover: false,
            connect_retries: 0,
            retry_initial_delay: Duration::from_millis(100),
            retry_max_delay: Duration::from_secs(10),
            dns_overrides: Vec::new(),
            no_proxy: false,
            user_agent: format!("webhcat-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Minimum allowed timeout value.
    pub const MIN_TIMEOUT: Duration = Duration::from_millis(100);

    /// Number of failovers a single call may perform.
    pub fn failover_limit(&self) -> usize {
        self.max_failovers.unwrap_or(self.hosts.len())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.hosts.is_empty() {
            return Err(ClientError::Config(
                "hosts must contain at least one host".to_string(),
            ));
        }

        for host in &self.hosts {
            if host.trim().is_empty() {
                return Err(ClientError::Config("host names cannot be empty".to_string()));
            }
            if host.contains('/') {
                return Err(ClientError::Config(format!(
                    "host '{}' must be a bare host name, not a URL",
                    host
                )));
            }
            if url_host(host).is_none() {
                return Err(ClientError::Config(format!(
                    "host '{}' must not carry a port; use the port setting",
                    host
                )));
            }
        }

        if self.port == 0 {
            return Err(ClientError::Config("port must be non-zero".to_string()));
        }

        if self.user_name.is_empty() {
            return Err(ClientError::Config("user_name cannot be empty".to_string()));
        }

        if self.retry_initial_delay > self.retry_max_delay {
            return Err(ClientError::Config(format!(
                "retry_initial_delay ({:?}) must be <= retry_max_delay ({:?})",
                self.retry_initial_delay, self.retry_max_delay
            )));
        }

        if self.timeout < Self::MIN_TIMEOUT {
            return Err(ClientError::Config(format!(
                "timeout ({:?}) must be >= {:?}",
                self.timeout,
                Self::MIN_TIMEOUT
            )));
        }

        Ok(())
    }
}

/// Builder for client configuration.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder starting from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity sent as `user.name`.
    pub fn user_name(mut self, user_name: impl Into<String>) -> Self {
        self.config.user_name = user_name.into();
        self
    }

    /// Set the port shared by every host.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Replace the host pool.
    pub fn hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Cap the number of host failovers per call.
    pub fn max_failovers(mut self, max_failovers: usize) -> Self {
        self.config.max_failovers = Some(max_failovers);
        self
    }

    /// Resend the original query parameters and body when failing over.
    pub fn replay_on_failover(mut self, replay: bool) -> Self {
        self.config.replay_on_failover = replay;
        self
    }

    /// Set the number of retries for connection-level failures.
    pub fn connect_retries(mut self, retries: u32) -> Self {
        self.config.connect_retries = retries;
        self
    }

    /// Set the initial retry delay for exponential backoff.
    pub fn retry_initial_delay(mut self, delay: Duration) -> Self {
        self.config.retry_initial_delay = delay;
        self
    }

    /// Set the maximum retry delay.
    pub fn retry_max_delay(mut self, delay: Duration) -> Self {
        self.config.retry_max_delay = delay;
        self
    }

    /// Resolve `host` to `addr` instead of asking DNS.
    ///
    /// The port of `addr` is ignored; requests always use the configured port.
    pub fn resolve(mut self, host: impl Into<String>, addr: SocketAddr) -> Self {
        self.config.dns_overrides.push((host.into(), addr));
        self
    }

    /// Ignore `HTTP_PROXY`-style environment settings.
    pub fn no_proxy(mut self) -> Self {
        self.config.no_proxy = true;
        self
    }

    /// Set a custom User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration, validating all settings.
    pub fn build(self) -> Result<ClientConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
