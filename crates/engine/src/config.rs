//! Server configuration loaded from environment variables.
//!
//! A `.env` file in the working directory or any parent is loaded first
//! (missing file is fine); real environment variables take precedence.
//!
//! | Variable                  | Required | Default       | Description                          |
//! |---------------------------|----------|---------------|--------------------------------------|
//! | `GRPC_PORT`               | yes      |               | gRPC listen port                     |
//! | `SERVER_PORT`             | yes      |               | HTTP listen port                     |
//! | `ARANGO_URL`              | yes      |               | ArangoDB endpoint                    |
//! | `ARANGO_DB`               | yes      |               | Database name                        |
//! | `ARANGO_USERNAME`         | yes      |               | Basic-auth user                      |
//! | `ARANGO_PASSWORD`         | yes      |               | Basic-auth password                  |
//! | `SERVER_HOST`             | no       | `0.0.0.0`     | Bind address for both listeners      |
//! | `ARANGO_GRAPH`            | no       | `osint_graph` | Named graph holding every relation   |
//! | `ARANGO_TIMEOUT_SECS`     | no       | `30`          | Per-request timeout toward the store |
//! | `EVENT_WINDOW_ALLOW_ZERO` | no       | `false`       | Accept `0` as a GetEvents bound      |
//! | `CORS_ALLOWED_ORIGINS`    | no       |               | `*` or comma list; HTTP CORS off if unset |

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use geovision_domain::WindowPolicy;
use url::Url;

/// Default name of the graph uniting all vertex and edge collections.
pub const DEFAULT_GRAPH_NAME: &str = "osint_graph";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Connection settings for the ArangoDB gateway.
#[derive(Clone)]
pub struct ArangoConfig {
    pub url: Url,
    pub database: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ArangoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArangoConfig")
            .field("url", &self.url.as_str())
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Runtime configuration for the engine process.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub grpc_port: u16,
    pub http_port: u16,
    pub arango: ArangoConfig,
    pub graph_name: String,
    pub window_policy: WindowPolicy,
    pub cors_allowed_origins: Option<String>,
}

impl Config {
    /// Load `.env` (if any) and then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let grpc_port = parse_port("GRPC_PORT", &required("GRPC_PORT")?)?;
        let http_port = parse_port("SERVER_PORT", &required("SERVER_PORT")?)?;

        let raw_url = required("ARANGO_URL")?;
        let url = Url::parse(&raw_url).map_err(|e| ConfigError::Invalid {
            name: "ARANGO_URL",
            message: e.to_string(),
        })?;

        let arango = ArangoConfig {
            url,
            database: required("ARANGO_DB")?,
            username: required("ARANGO_USERNAME")?,
            password: required("ARANGO_PASSWORD")?,
            timeout: Duration::from_secs(match lookup("ARANGO_TIMEOUT_SECS") {
                Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                    name: "ARANGO_TIMEOUT_SECS",
                    message: format!("'{raw}' is not a number of seconds"),
                })?,
                None => DEFAULT_TIMEOUT_SECS,
            }),
        };

        let host = match lookup("SERVER_HOST") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "SERVER_HOST",
                message: format!("'{raw}' is not an IP address"),
            })?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let window_policy = match lookup("EVENT_WINDOW_ALLOW_ZERO").as_deref() {
            Some("1") | Some("true") | Some("yes") => WindowPolicy::AllowZero,
            _ => WindowPolicy::RequireNonZero,
        };

        Ok(Self {
            host,
            grpc_port,
            http_port,
            arango,
            graph_name: lookup("ARANGO_GRAPH")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_GRAPH_NAME.to_string()),
            window_policy,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS").filter(|v| !v.trim().is_empty()),
        })
    }

    pub fn grpc_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.grpc_port)
    }

    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.http_port)
    }
}

fn parse_port(name: &'static str, raw: &str) -> Result<u16, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        name,
        message: format!("'{raw}' is not a valid port"),
    })
}
