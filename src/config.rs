// src/config.rs
//
// Runtime configuration shared by the CLI and the server.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Identifies our traffic to operators of analyzed sites.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; SiteAuditBot/1.0; +http://siteaudit.io/bot)";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Default page size for `GET /api/reports`.
pub const DEFAULT_LIST_LIMIT: usize = 10;
pub const MAX_LIST_LIMIT: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl FetchConfig {
    pub fn new(timeout_secs: u64, user_agent: impl Into<String>) -> Result<Self, ConfigError> {
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            timeout: Duration::from_secs(timeout_secs),
            user_agent: user_agent.into(),
        })
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub seed: Option<PathBuf>,
    pub fetch: FetchConfig,
}

impl ServerConfig {
    pub fn new(
        host: &str,
        port: u16,
        seed: Option<PathBuf>,
        fetch: FetchConfig,
    ) -> Result<Self, ConfigError> {
        // Bare IPv6 hosts such as `::` carry colons, so the port is not
        // appended textually.
        let ip: IpAddr = host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(host.to_string()))?;
        Ok(Self {
            addr: SocketAddr::new(ip, port),
            seed,
            fetch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fetch_config() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(config.user_agent.contains("SiteAuditBot"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert_eq!(FetchConfig::new(0, "ua"), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_server_config_parses_bind_address() {
        let config = ServerConfig::new("127.0.0.1", 8080, None, FetchConfig::default()).unwrap();
        assert_eq!(config.addr.port(), 8080);

        let err = ServerConfig::new("not a host", 8080, None, FetchConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddress(_)));
    }

    #[test]
    fn test_server_config_accepts_ipv6_hosts() {
        for host in ["::", "::1", "[::1]"] {
            let config = ServerConfig::new(host, 3000, None, FetchConfig::default()).unwrap();
            assert!(config.addr.is_ipv6(), "{}", host);
            assert_eq!(config.addr.port(), 3000);
        }
        let config = ServerConfig::new("::", 3000, None, FetchConfig::default()).unwrap();
        assert_eq!(config.addr.to_string(), "[::]:3000");
    }
}
