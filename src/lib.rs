pub mod app;
pub mod assembler;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod overlay;
pub mod proxy;
pub mod tls_utils;
pub mod transport;

// Re-export commonly used types for convenience
pub use config::{FlagValues, Role, TransportMode};
pub use engine::{DryRunEngine, Engine};
pub use error::{ConfigError, PluginError};
pub use proxy::ProxyConfig;
