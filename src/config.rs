//! Configuration (C8): bootstrap endpoints and the handful of tunables the
//! router and connection cache need.

use crate::error::ClusterError;

const DEFAULT_PORT: u16 = 6379;

/// Number of connections the cache is allowed to hold before it must evict.
pub const DEFAULT_MAX_CONN: usize = 16;

/// Redirection hops a single `execute` call may follow before giving up.
pub const DEFAULT_REDIRECTION_TTL: u32 = 16;

/// Replicas tracked per slot entry.
pub const DEFAULT_SLOT_ENDPOINT_BOUND: usize = 8;

/// A host/port pair identifying one cluster node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    /// Renders as `host:port`, the form used both on the wire (MOVED/ASK
    /// addresses) and as the connection cache key.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.addr())
    }
}

/// Parses `host:port`, including bracketed IPv6 addresses (`[::1]:6379`).
pub fn parse_host_port(s: &str) -> Result<Endpoint, ClusterError> {
    if let Some(rest) = s.strip_prefix('[') {
        let close = rest
            .find(']')
            .ok_or_else(|| ClusterError::Config(format!("unclosed IPv6 bracket: {s}")))?;
        let host = rest[..close].to_string();
        let after = &rest[close + 1..];
        let port = match after.strip_prefix(':') {
            Some(port_str) => port_str
                .parse()
                .map_err(|_| ClusterError::Config(format!("invalid port: {port_str}")))?,
            None => DEFAULT_PORT,
        };
        return Ok(Endpoint::new(host, port));
    }

    match s.rsplit_once(':') {
        Some((host, port_str)) => match port_str.parse::<u16>() {
            Ok(port) => Ok(Endpoint::new(host, port)),
            Err(_) => Err(ClusterError::Config(format!("invalid host:port: {s}"))),
        },
        None => Err(ClusterError::Config(format!("missing port in: {s}"))),
    }
}

/// Bootstrap + tuning knobs for a [`crate::client::ClusterClient`].
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Seed nodes tried, in order, whenever the slot map must be rebuilt.
    pub bootstrap: Vec<Endpoint>,
    /// Bound on the connection cache's size before it evicts.
    pub max_conn: usize,
    /// Redirection hops a single command may follow.
    pub redirection_ttl: u32,
    /// Replicas retained per slot entry.
    pub slot_endpoint_bound: usize,
}

impl ClusterConfig {
    /// Builds a config from explicit bootstrap endpoints.
    pub fn new(bootstrap: Vec<Endpoint>) -> Result<Self, ClusterError> {
        if bootstrap.is_empty() {
            return Err(ClusterError::Config("bootstrap endpoint list is empty".into()));
        }
        Ok(Self {
            bootstrap,
            max_conn: DEFAULT_MAX_CONN,
            redirection_ttl: DEFAULT_REDIRECTION_TTL,
            slot_endpoint_bound: DEFAULT_SLOT_ENDPOINT_BOUND,
        })
    }

    /// Builds a config from a comma-separated `"host1:port1,host2:port2"` string.
    pub fn from_nodes_str(nodes: &str) -> Result<Self, ClusterError> {
        let bootstrap: Result<Vec<Endpoint>, ClusterError> = nodes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_host_port)
            .collect();
        Self::new(bootstrap?)
    }

    pub fn with_max_conn(mut self, max_conn: usize) -> Self {
        self.max_conn = max_conn;
        self
    }

    pub fn with_redirection_ttl(mut self, ttl: u32) -> Self {
        self.redirection_ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_host_port() {
        let ep = parse_host_port("127.0.0.1:6379").unwrap();
        assert_eq!(ep.host, "127.0.0.1");
        assert_eq!(ep.port, 6379);
    }

    #[test]
    fn parses_bracketed_ipv6() {
        let ep = parse_host_port("[::1]:6380").unwrap();
        assert_eq!(ep.host, "::1");
        assert_eq!(ep.port, 6380);
    }

    #[test]
    fn bracketed_ipv6_without_port_uses_default() {
        let ep = parse_host_port("[::1]").unwrap();
        assert_eq!(ep.port, DEFAULT_PORT);
    }

    #[test]
    fn rejects_missing_port() {
        assert!(parse_host_port("127.0.0.1").is_err());
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(parse_host_port("127.0.0.1:abc").is_err());
    }

    #[test]
    fn endpoint_addr_roundtrips() {
        let ep = Endpoint::new("127.0.0.1", 6379);
        assert_eq!(ep.addr(), "127.0.0.1:6379");
        assert_eq!(ep.to_string(), "127.0.0.1:6379");
    }

    #[test]
    fn config_from_nodes_str_parses_multiple() {
        let config = ClusterConfig::from_nodes_str("10.0.0.1:7000, 10.0.0.2:7001").unwrap();
        assert_eq!(config.bootstrap.len(), 2);
        assert_eq!(config.bootstrap[0].port, 7000);
        assert_eq!(config.bootstrap[1].port, 7001);
    }

    #[test]
    fn config_rejects_empty_bootstrap_list() {
        assert!(ClusterConfig::new(vec![]).is_err());
        assert!(ClusterConfig::from_nodes_str("").is_err());
    }

    #[test]
    fn config_defaults() {
        let config = ClusterConfig::new(vec![Endpoint::new("127.0.0.1", 6379)]).unwrap();
        assert_eq!(config.max_conn, DEFAULT_MAX_CONN);
        assert_eq!(config.redirection_ttl, DEFAULT_REDIRECTION_TTL);
        assert_eq!(config.slot_endpoint_bound, DEFAULT_SLOT_ENDPOINT_BOUND);
    }

    #[test]
    fn builder_overrides_apply() {
        let config = ClusterConfig::new(vec![Endpoint::new("127.0.0.1", 6379)])
            .unwrap()
            .with_max_conn(2)
            .with_redirection_ttl(4);
        assert_eq!(config.max_conn, 2);
        assert_eq!(config.redirection_ttl, 4);
    }
}
