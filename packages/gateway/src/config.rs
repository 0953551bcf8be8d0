//! Gateway configuration, populated from environment variables.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use flowgate::{DoubleFormat, UnknownDoubleFormat};

/// Runtime configuration for the gateway.
///
/// All fields have defaults, so the gateway starts with zero configuration
/// next to an engine listening on `/tmp/engine-socket`.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `FLOWGATE_BIND` | `0.0.0.0:8080` | TCP socket address to listen on |
/// | `FLOWGATE_ENGINE_SOCKET` | `/tmp/engine-socket` | Engine Unix socket path |
/// | `FLOWGATE_ENGINE_TIMEOUT_SECS` | `0` (none) | Per-call engine timeout |
/// | `FLOWGATE_DOUBLE_FORMAT` | `number` | `number` or `fixed` (3-decimal string) |
/// | `FLOWGATE_API_TITLE` | `Flow Engine API` | `info.title` of the OpenAPI document |
/// | `FLOWGATE_API_VERSION` | `1.0.0` | `info.version` of the OpenAPI document |
/// | `FLOWGATE_PUBLIC_URL` | derived from `FLOWGATE_BIND` | Server URL used when a request has no `Host` |
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Path of the engine's Unix domain socket.
    pub engine_socket: PathBuf,

    /// Upper bound on a single engine call. `None` waits as long as the
    /// transport does.
    pub engine_timeout: Option<Duration>,

    /// How doubles are rendered in JSON replies. Applies to every response
    /// of this deployment.
    pub double_format: DoubleFormat,

    pub api_title: String,
    pub api_version: String,

    /// Server URL advertised in the OpenAPI document when the request
    /// carries no `Host` header.
    pub public_url: String,
}

/// A configuration variable held a value that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("FLOWGATE_BIND must be a socket address (e.g. 0.0.0.0:8080), got {value:?}: {source}")]
    InvalidBind {
        value: String,
        source: AddrParseError,
    },

    #[error("FLOWGATE_ENGINE_TIMEOUT_SECS must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),

    #[error("FLOWGATE_DOUBLE_FORMAT: {0}")]
    InvalidDoubleFormat(#[from] UnknownDoubleFormat),
}

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_ENGINE_SOCKET: &str = "/tmp/engine-socket";
pub const DEFAULT_API_TITLE: &str = "Flow Engine API";
pub const DEFAULT_API_VERSION: &str = "1.0.0";

impl GatewayConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Populate config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = lookup("FLOWGATE_BIND").unwrap_or_else(|| DEFAULT_BIND.into());
        let bind_addr: SocketAddr = bind
            .parse()
            .map_err(|source| ConfigError::InvalidBind {
                value: bind.clone(),
                source,
            })?;

        let engine_timeout = match lookup("FLOWGATE_ENGINE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let double_format = match lookup("FLOWGATE_DOUBLE_FORMAT") {
            Some(raw) => raw.parse::<DoubleFormat>()?,
            None => DoubleFormat::default(),
        };

        Ok(Self {
            bind_addr,
            engine_socket: lookup("FLOWGATE_ENGINE_SOCKET")
                .unwrap_or_else(|| DEFAULT_ENGINE_SOCKET.into())
                .into(),
            engine_timeout,
            double_format,
            api_title: lookup("FLOWGATE_API_TITLE").unwrap_or_else(|| DEFAULT_API_TITLE.into()),
            api_version: lookup("FLOWGATE_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.into()),
            public_url: lookup("FLOWGATE_PUBLIC_URL")
                .unwrap_or_else(|| format!("http://{bind_addr}")),
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let bind_addr = SocketAddr::from(([0, 0, 0, 0], 8080));
        Self {
            bind_addr,
            engine_socket: DEFAULT_ENGINE_SOCKET.into(),
            engine_timeout: None,
            double_format: DoubleFormat::default(),
            api_title: DEFAULT_API_TITLE.into(),
            api_version: DEFAULT_API_VERSION.into(),
            public_url: format!("http://{bind_addr}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = from_pairs(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.engine_socket, PathBuf::from("/tmp/engine-socket"));
        assert_eq!(cfg.engine_timeout, None);
        assert_eq!(cfg.double_format, DoubleFormat::Number);
        assert_eq!(cfg.public_url, "http://0.0.0.0:8080");
        assert_eq!(cfg.api_title, "Flow Engine API");
    }

    #[test]
    fn variables_override_defaults() {
        let cfg = from_pairs(&[
            ("FLOWGATE_BIND", "127.0.0.1:9000"),
            ("FLOWGATE_ENGINE_SOCKET", "/run/engine.sock"),
            ("FLOWGATE_ENGINE_TIMEOUT_SECS", "5"),
            ("FLOWGATE_DOUBLE_FORMAT", "fixed"),
            ("FLOWGATE_PUBLIC_URL", "https://flows.example.com"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.engine_socket, PathBuf::from("/run/engine.sock"));
        assert_eq!(cfg.engine_timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.double_format, DoubleFormat::Fixed);
        assert_eq!(cfg.public_url, "https://flows.example.com");
    }

    #[test]
    fn default_impl_matches_empty_environment() {
        let from_env = from_pairs(&[]).unwrap();
        let default = GatewayConfig::default();
        assert_eq!(default.bind_addr, from_env.bind_addr);
        assert_eq!(default.public_url, from_env.public_url);
        assert_eq!(default.engine_socket, from_env.engine_socket);
        assert_eq!(default.api_version, from_env.api_version);
    }

    #[test]
    fn zero_timeout_means_none() {
        let cfg = from_pairs(&[("FLOWGATE_ENGINE_TIMEOUT_SECS", "0")]).unwrap();
        assert_eq!(cfg.engine_timeout, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            from_pairs(&[("FLOWGATE_BIND", "not-an-addr")]),
            Err(ConfigError::InvalidBind { .. })
        ));
        assert!(matches!(
            from_pairs(&[("FLOWGATE_ENGINE_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidTimeout(_))
        ));
        assert!(matches!(
            from_pairs(&[("FLOWGATE_DOUBLE_FORMAT", "decimal")]),
            Err(ConfigError::InvalidDoubleFormat(_))
        ));
    }
}
