/// Error types for the tunnel plugin
use thiserror::Error;

/// Exit code used for configuration failures. Process supervisors are expected
/// not to restart on it.
pub const CONFIG_EXIT_CODE: i32 = 23;

/// Top-level error returned by the startup path
#[derive(Error, Debug)]
pub enum PluginError {
    /// The overlay variable was present but could not be decoded
    #[error("failed to parse plugin options: {0}")]
    Overlay(#[from] ParseError),

    /// Configuration synthesis failed
    #[error("failed to parse config: {0}")]
    Config(#[from] ConfigError),

    /// The engine could not be created or started
    #[error("failed to launch engine: {0}")]
    Launch(#[from] LaunchError),
}

impl PluginError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            PluginError::Overlay(_) | PluginError::Config(_) => CONFIG_EXIT_CODE,
            PluginError::Launch(_) => 1,
        }
    }
}

/// Overlay decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The environment variable is not set
    #[error("environment variable {var} is not set")]
    Missing { var: String },

    /// The value ends in an unpaired backslash
    #[error("dangling escape at end of plugin options")]
    DanglingEscape,

    /// An entry has a value but no key
    #[error("empty key in plugin option entry: {entry:?}")]
    EmptyKey { entry: String },
}

/// Certificate and key material loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    /// Neither a path nor inline content was supplied
    #[error("missing")]
    Missing,

    /// Reading the file failed
    #[error("failed to read {path}: {source}")]
    IoFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Semantic validation errors raised while assembling a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A port flag did not parse
    #[error("invalid {field}: {value}")]
    InvalidPort { field: &'static str, value: String },

    /// The transport mode is not one of websocket or quic
    #[error("unsupported mode: {mode}")]
    UnsupportedMode { mode: String },

    /// Server TLS was requested without a key
    #[error("no certificates configured")]
    NoServerCredentials,

    /// Certificate or key material could not be loaded
    #[error("failed to read {what}: {source}")]
    CredentialLoadFailed {
        what: &'static str,
        #[source]
        source: LoadError,
    },
}

/// Errors reported by an engine implementation
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine refused or failed to start
    #[error("failed to start engine: {0}")]
    StartFailed(String),

    /// Writing engine output failed
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be encoded for the engine
    #[error("failed to encode config: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised by the launcher
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The engine failed to start
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Installing the signal listener failed
    #[error("failed to listen for shutdown signal: {0}")]
    Signal(#[from] std::io::Error),
}

/// Result type alias for configuration synthesis
pub type ConfigResult<T> = Result<T, ConfigError>;
