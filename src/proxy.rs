//! Configuration handed to the proxy engine.

use crate::config::{Address, Destination, LogLevel, TransportMode};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Serialize, Serializer};

/// Placeholder target the server's pass-through inbound uses so the engine
/// can demultiplex connections coming from a multiplexing client.
pub const MUX_PLACEHOLDER_DOMAIN: &str = "v1.mux.cool";

/// Concurrency of the client's multiplexed outbound
pub const MUX_CONCURRENCY: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProxyConfig {
    pub inbound: Vec<InboundHandlerConfig>,
    pub outbound: Vec<OutboundHandlerConfig>,
    pub apps: Vec<AppModule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundHandlerConfig {
    pub receiver: ReceiverSettings,
    pub proxy: InboundProxy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiverSettings {
    pub listen: Address,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<StreamSettings>,
}

/// Pass-through inbound: accepts connections and hands them on unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundProxy {
    pub target: Address,
    pub networks: Vec<Network>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Tcp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundHandlerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<SenderSettings>,
    pub proxy: OutboundProxy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderSettings {
    pub stream: StreamSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplex: Option<MultiplexSettings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MultiplexSettings {
    pub concurrency: u32,
}

/// Direct outbound forwarding every connection to a fixed destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundProxy {
    pub destination: Destination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppModule {
    Dispatcher,
    InboundManager,
    OutboundManager,
    Log { level: LogLevel },
}

impl AppModule {
    /// The fixed app module set, in engine registration order
    pub fn defaults(level: LogLevel) -> Vec<AppModule> {
        vec![
            AppModule::Dispatcher,
            AppModule::InboundManager,
            AppModule::OutboundManager,
            AppModule::Log { level },
        ]
    }
}

/// Transport and TLS settings attached to one side of a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamSettings {
    pub transport: TransportSettings,
    pub fast_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsSettings>,
}

impl StreamSettings {
    pub fn mode(&self) -> TransportMode {
        self.transport.mode()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TransportSettings {
    Websocket { path: String, headers: Vec<Header> },
    Quic { security: QuicSecurity },
}

impl TransportSettings {
    pub fn mode(&self) -> TransportMode {
        match self {
            TransportSettings::Websocket { .. } => TransportMode::Websocket,
            TransportSettings::Quic { .. } => TransportMode::Quic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

/// Packet-level security of the QUIC transport. TLS is layered separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuicSecurity {
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TlsSettings {
    pub server_name: String,
    pub certificates: Vec<CertificateMaterial>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateUsage {
    /// Identity presented by the server
    Encipherment,
    /// CA or peer certificate the client verifies against
    AuthorityVerify,
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CertificateMaterial {
    #[serde(serialize_with = "serialize_pem")]
    pub certificate: Vec<u8>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_redacted"
    )]
    pub key: Option<Vec<u8>>,
    pub usage: CertificateUsage,
}

impl std::fmt::Debug for CertificateMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateMaterial")
            .field("certificate_len", &self.certificate.len())
            .field("key_len", &self.key.as_ref().map(Vec::len))
            .field("usage", &self.usage)
            .finish()
    }
}

/// PEM text as-is; binary (DER) material as `base64:<data>`.
fn serialize_pem<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    match std::str::from_utf8(bytes) {
        Ok(text) => serializer.serialize_str(text),
        Err(_) => serializer.serialize_str(&format!("base64:{}", STANDARD.encode(bytes))),
    }
}

fn serialize_redacted<S: Serializer>(
    key: &Option<Vec<u8>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let len = key.as_ref().map(Vec::len).unwrap_or(0);
    serializer.serialize_str(&format!("<redacted {} bytes>", len))
}
