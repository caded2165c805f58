use tunnel_plugin::error::{
    CONFIG_EXIT_CODE, ConfigError, EngineError, LaunchError, LoadError, ParseError, PluginError,
};

#[test]
fn test_config_error_invalid_port() {
    let error = ConfigError::InvalidPort {
        field: "localPort",
        value: "abc".to_string(),
    };
    assert_eq!(error.to_string(), "invalid localPort: abc");
}

#[test]
fn test_config_error_credential_load_failed() {
    let error = ConfigError::CredentialLoadFailed {
        what: "cert",
        source: LoadError::Missing,
    };
    assert!(error.to_string().contains("failed to read cert"));
    assert!(error.to_string().contains("missing"));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_load_error_io_failure() {
    let error = LoadError::IoFailure {
        path: "/path/to/cert.pem".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"),
    };
    assert!(error.to_string().contains("/path/to/cert.pem"));
    assert!(error.to_string().contains("File not found"));
}

#[test]
fn test_parse_error_missing() {
    let error = ParseError::Missing {
        var: "SS_PLUGIN_OPTIONS".to_string(),
    };
    assert!(error.to_string().contains("SS_PLUGIN_OPTIONS"));
}

#[test]
fn test_plugin_error_from_config() {
    let error: PluginError = ConfigError::NoServerCredentials.into();
    assert!(matches!(error, PluginError::Config(_)));
    assert_eq!(error.exit_code(), CONFIG_EXIT_CODE);
    assert_eq!(
        error.to_string(),
        "failed to parse config: no certificates configured"
    );
}

#[test]
fn test_plugin_error_from_overlay() {
    let error: PluginError = ParseError::DanglingEscape.into();
    assert_eq!(error.exit_code(), 23);
}

#[test]
fn test_plugin_error_from_launch() {
    let launch: LaunchError = EngineError::StartFailed("boom".to_string()).into();
    let error: PluginError = launch.into();
    assert_eq!(error.exit_code(), 1);
    assert_eq!(
        error.to_string(),
        "failed to launch engine: failed to start engine: boom"
    );
}

#[test]
fn test_engine_error_from_io() {
    let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
    let error: EngineError = io_error.into();
    assert!(matches!(error, EngineError::Io(_)));
}
