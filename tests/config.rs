use tunnel_plugin::config::*;
use tunnel_plugin::error::ConfigError;

#[test]
fn test_default_flags() {
    let flags = FlagValues::default();
    assert_eq!(flags.local_addr, "127.0.0.1");
    assert_eq!(flags.local_port, "1984");
    assert_eq!(flags.remote_addr, "127.0.0.1");
    assert_eq!(flags.remote_port, "1080");
    assert_eq!(flags.path, "/");
    assert_eq!(flags.host, "cloudfront.com");
    assert_eq!(flags.mode, "websocket");
    assert!(!flags.tls);
    assert_eq!(flags.role(), Role::Client);
}

#[test]
fn test_role_from_server_flag() {
    let flags = FlagValues {
        server: true,
        ..FlagValues::default()
    };
    assert_eq!(flags.role(), Role::Server);
}

#[test]
fn test_listen_port_valid() {
    let flags = FlagValues::default();
    let endpoint = flags.listen_endpoint().unwrap();
    assert_eq!(endpoint.port, 1984);
    assert_eq!(endpoint.address, Address::parse("127.0.0.1"));
}

#[test]
fn test_listen_port_invalid() {
    let flags = FlagValues {
        local_port: "notanumber".to_string(),
        ..FlagValues::default()
    };
    let err = flags.listen_port().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidPort {
            field: "localPort",
            ..
        }
    ));
    assert!(err.to_string().contains("notanumber"));
}

#[test]
fn test_listen_port_out_of_range() {
    let flags = FlagValues {
        local_port: "70000".to_string(),
        ..FlagValues::default()
    };
    assert!(matches!(
        flags.listen_port(),
        Err(ConfigError::InvalidPort { .. })
    ));
}

#[test]
fn test_forward_port_accepts_32_bit() {
    let flags = FlagValues {
        remote_port: "70000".to_string(),
        ..FlagValues::default()
    };
    assert_eq!(flags.forward_port().unwrap(), 70000);

    let flags = FlagValues {
        remote_port: "-1".to_string(),
        ..FlagValues::default()
    };
    assert!(matches!(
        flags.forward_port(),
        Err(ConfigError::InvalidPort {
            field: "remotePort",
            ..
        })
    ));
}

#[test]
fn test_empty_credentials_are_unset() {
    let flags = FlagValues {
        cert: Some(String::new()),
        cert_raw: Some("PEM".to_string()),
        key: Some(String::new()),
        ..FlagValues::default()
    };
    assert_eq!(flags.cert_path(), None);
    assert_eq!(flags.cert_inline(), Some("PEM"));
    assert_eq!(flags.key_path(), None);
}

#[test]
fn test_address_parse() {
    assert!(matches!(Address::parse("1.2.3.4"), Address::Ip(_)));
    assert!(matches!(Address::parse("::1"), Address::Ip(_)));
    assert_eq!(
        Address::parse("example.com"),
        Address::Domain("example.com".to_string())
    );
    assert_eq!(Address::parse("example.com").to_string(), "example.com");
}

#[test]
fn test_address_parse_bracketed_ipv6() {
    assert_eq!(Address::parse("[::1]"), Address::parse("::1"));
    assert!(matches!(Address::parse("[::1]"), Address::Ip(ip) if ip.is_loopback()));
    assert!(matches!(Address::parse("[::]"), Address::Ip(ip) if ip.is_unspecified()));
    assert_eq!(
        Address::parse("[not-an-ip]"),
        Address::Domain("[not-an-ip]".to_string())
    );
}

#[test]
fn test_transport_mode_parse() {
    assert_eq!(
        "websocket".parse::<TransportMode>().unwrap(),
        TransportMode::Websocket
    );
    assert_eq!("quic".parse::<TransportMode>().unwrap(), TransportMode::Quic);
    assert!(matches!(
        "http2".parse::<TransportMode>(),
        Err(ConfigError::UnsupportedMode { .. })
    ));
}

#[test]
fn test_log_level_mapping() {
    assert_eq!(LogLevel::from_flag(""), LogLevel::Warning);
    assert_eq!(LogLevel::from_flag("debug"), LogLevel::Debug);
    assert_eq!(LogLevel::from_flag("INFO"), LogLevel::Info);
    assert_eq!(LogLevel::from_flag("none"), LogLevel::None);
    assert_eq!(LogLevel::from_flag("verbose"), LogLevel::Warning);
    assert_eq!(LogLevel::Warning.as_directive(), "warn");
    assert_eq!(LogLevel::None.as_directive(), "off");
}
