use std::time::Duration;

use crate::error::ConfigurationError;
use crate::network::EthereumNetwork;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Tcp,
    Ssl,
}

/// A parsed `tcp://host:port` or `ssl://host:port` url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUrl {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl BackendUrl {
    pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
        let invalid = || ConfigurationError::InvalidBackendUrl(s.to_string());
        let trimmed = s.trim();

        let (scheme, rest) = if let Some(rest) = trimmed.strip_prefix("ssl://") {
            (Scheme::Ssl, rest)
        } else if let Some(rest) = trimmed.strip_prefix("tcp://") {
            (Scheme::Tcp, rest)
        } else {
            return Err(invalid());
        };

        let (host, port) = rest.rsplit_once(':').ok_or_else(invalid)?;
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse::<u16>().map_err(|_| invalid())?;

        Ok(Self {
            scheme,
            host: host.to_string(),
            port,
        })
    }
}

/// Where and how to reach the indexing backend of one network.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Tried in order; the first one that connects is used.
    pub urls: Vec<BackendUrl>,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl BackendConfig {
    pub fn new<S: AsRef<str>>(
        network: &EthereumNetwork,
        urls: &[S],
    ) -> Result<Self, ConfigurationError> {
        if urls.is_empty() {
            return Err(ConfigurationError::NoBackend(network.to_string()));
        }
        let urls = urls
            .iter()
            .map(|u| BackendUrl::parse(u.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            urls,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::get_ethereum_network;

    #[test]
    fn parses_both_schemes() {
        let ssl = BackendUrl::parse("ssl://eth.example.org:9130").unwrap();
        assert_eq!(ssl.scheme, Scheme::Ssl);
        assert_eq!(ssl.host, "eth.example.org");
        assert_eq!(ssl.port, 9130);

        let tcp = BackendUrl::parse(" tcp://127.0.0.1:50001 ").unwrap();
        assert_eq!(tcp.scheme, Scheme::Tcp);
        assert_eq!(tcp.port, 50001);
    }

    #[test]
    fn rejects_unsupported_urls() {
        for url in ["https://eth.example.org", "ssl://:1", "tcp://host", "tcp://host:99999"] {
            assert_eq!(
                BackendUrl::parse(url),
                Err(ConfigurationError::InvalidBackendUrl(url.to_string())),
                "{url}"
            );
        }
    }

    #[test]
    fn empty_url_list_is_rejected() {
        let eth = get_ethereum_network("eth").unwrap();
        let err = BackendConfig::new::<&str>(&eth, &[]).unwrap_err();
        assert!(matches!(err, ConfigurationError::NoBackend(_)));
    }
}
