use crate::error::{ConfigError, ConfigResult};
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

pub const DEFAULT_LOCAL_ADDR: &str = "127.0.0.1";
pub const DEFAULT_LOCAL_PORT: &str = "1984";
pub const DEFAULT_REMOTE_ADDR: &str = "127.0.0.1";
pub const DEFAULT_REMOTE_PORT: &str = "1080";
pub const DEFAULT_PATH: &str = "/";
pub const DEFAULT_HOST: &str = "cloudfront.com";
pub const DEFAULT_MODE: &str = "websocket";

/// Values of the command-line flags, after the environment overlay is applied.
///
/// Ports and mode stay as strings here; they are validated during assembly so
/// the overlay can replace them verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagValues {
    pub vpn: bool,
    pub fast_open: bool,
    pub local_addr: String,
    pub local_port: String,
    pub remote_addr: String,
    pub remote_port: String,
    pub path: String,
    pub host: String,
    pub tls: bool,
    pub cert: Option<String>,
    pub cert_raw: Option<String>,
    pub key: Option<String>,
    pub mode: String,
    pub server: bool,
    pub log_level: String,
}

impl Default for FlagValues {
    fn default() -> Self {
        Self {
            vpn: false,
            fast_open: false,
            local_addr: DEFAULT_LOCAL_ADDR.to_string(),
            local_port: DEFAULT_LOCAL_PORT.to_string(),
            remote_addr: DEFAULT_REMOTE_ADDR.to_string(),
            remote_port: DEFAULT_REMOTE_PORT.to_string(),
            path: DEFAULT_PATH.to_string(),
            host: DEFAULT_HOST.to_string(),
            tls: false,
            cert: None,
            cert_raw: None,
            key: None,
            mode: DEFAULT_MODE.to_string(),
            server: false,
            log_level: String::new(),
        }
    }
}

impl FlagValues {
    pub fn role(&self) -> Role {
        if self.server {
            Role::Server
        } else {
            Role::Client
        }
    }

    /// Certificate path, ignoring empty strings
    pub fn cert_path(&self) -> Option<&str> {
        non_empty(&self.cert)
    }

    /// Inline certificate content, ignoring empty strings
    pub fn cert_inline(&self) -> Option<&str> {
        non_empty(&self.cert_raw)
    }

    /// Key path, ignoring empty strings
    pub fn key_path(&self) -> Option<&str> {
        non_empty(&self.key)
    }

    /// Parse `localPort` as the listening port.
    pub fn listen_port(&self) -> ConfigResult<u16> {
        self.local_port
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort {
                field: "localPort",
                value: self.local_port.clone(),
            })
    }

    /// Parse `remotePort` as the forward port.
    pub fn forward_port(&self) -> ConfigResult<u32> {
        self.remote_port
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidPort {
                field: "remotePort",
                value: self.remote_port.clone(),
            })
    }

    pub fn listen_endpoint(&self) -> ConfigResult<Endpoint> {
        Ok(Endpoint {
            address: Address::parse(&self.local_addr),
            port: self.listen_port()?,
        })
    }

    pub fn forward_destination(&self) -> ConfigResult<Destination> {
        Ok(Destination {
            address: Address::parse(&self.remote_addr),
            port: self.forward_port()?,
        })
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_flag(&self.log_level)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Which side of the tunnel this process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Server,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Client => f.write_str("client"),
            Role::Server => f.write_str("server"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Websocket,
    Quic,
}

impl FromStr for TransportMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "websocket" => Ok(TransportMode::Websocket),
            "quic" => Ok(TransportMode::Quic),
            other => Err(ConfigError::UnsupportedMode {
                mode: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Websocket => f.write_str("websocket"),
            TransportMode::Quic => f.write_str("quic"),
        }
    }
}

/// An IP literal or a domain name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Address {
    Ip(IpAddr),
    Domain(String),
}

impl Address {
    /// Parse an IP literal, accepting bracketed IPv6 like `[::1]`, else a domain.
    pub fn parse(s: &str) -> Self {
        let unbracketed = s
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(s);
        match unbracketed.parse::<IpAddr>() {
            Ok(ip) => Address::Ip(ip),
            Err(_) => Address::Domain(s.to_string()),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Ip(ip) => write!(f, "{}", ip),
            Address::Domain(domain) => f.write_str(domain),
        }
    }
}

/// Listening address and port
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub address: Address,
    pub port: u16,
}

/// Forward target of the outbound handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub address: Address,
    pub port: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    None,
}

impl LogLevel {
    /// Map a `-loglevel` value. Empty and unrecognised values fall back to warning.
    pub fn from_flag(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "error" => LogLevel::Error,
            "none" => LogLevel::None,
            "" | "warning" => LogLevel::Warning,
            other => {
                tracing::warn!("Unknown log level {:?}, using warning", other);
                LogLevel::Warning
            }
        }
    }

    /// Filter directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
            LogLevel::None => "off",
        }
    }
}
