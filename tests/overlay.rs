use tunnel_plugin::config::{FlagValues, Role};
use tunnel_plugin::error::ParseError;
use tunnel_plugin::overlay::{self, OptionSet};

#[test]
fn test_parse_pairs_and_bare_keys() {
    let options = overlay::parse("mode=quic;tls;host=example.com").unwrap();
    assert_eq!(options.len(), 3);
    assert_eq!(options.get("mode"), Some("quic"));
    assert!(options.contains("tls"));
    assert_eq!(options.get("tls"), Some(""));
    assert_eq!(options.get("host"), Some("example.com"));
    assert_eq!(options.get("path"), None);
}

#[test]
fn test_parse_escapes() {
    let options = overlay::parse(r"path=/a\;b;host=x\=y;k\\=v=w").unwrap();
    assert_eq!(options.get("path"), Some("/a;b"));
    assert_eq!(options.get("host"), Some("x=y"));
    assert_eq!(options.get(r"k\"), Some("v=w"));
}

#[test]
fn test_parse_skips_empty_entries() {
    let options = overlay::parse(";;tls;").unwrap();
    assert_eq!(options.len(), 1);
    assert!(overlay::parse("").unwrap().is_empty());
}

#[test]
fn test_parse_last_duplicate_wins() {
    let options = overlay::parse("host=a;host=b").unwrap();
    assert_eq!(options.get("host"), Some("b"));
}

#[test]
fn test_parse_errors() {
    assert_eq!(
        overlay::parse("tls\\"),
        Err(ParseError::DanglingEscape)
    );
    assert!(matches!(
        overlay::parse("=value"),
        Err(ParseError::EmptyKey { .. })
    ));
}

#[test]
fn test_from_env_missing() {
    let result = overlay::from_env("TUNNEL_PLUGIN_TEST_UNSET_VARIABLE");
    assert!(matches!(result, Err(ParseError::Missing { .. })));
}

#[test]
fn test_apply_simple_keys() {
    let options = overlay::parse("mode=quic;tls=false;host=example.com;path=/ws").unwrap();
    let flags = overlay::apply(FlagValues::default(), &options);
    assert_eq!(flags.mode, "quic");
    // presence alone enables it
    assert!(flags.tls);
    assert_eq!(flags.host, "example.com");
    assert_eq!(flags.path, "/ws");
    assert_eq!(flags.role(), Role::Client);
}

#[test]
fn test_apply_client_maps_straight_through() {
    let options =
        overlay::parse("localAddr=10.0.0.1;localPort=1000;remoteAddr=10.0.0.2;remotePort=2000")
            .unwrap();
    let flags = overlay::apply(FlagValues::default(), &options);
    assert_eq!(flags.local_addr, "10.0.0.1");
    assert_eq!(flags.local_port, "1000");
    assert_eq!(flags.remote_addr, "10.0.0.2");
    assert_eq!(flags.remote_port, "2000");
}

#[test]
fn test_apply_server_key_swaps_endpoints() {
    let options = overlay::parse(
        "server;localAddr=10.0.0.1;localPort=1000;remoteAddr=0.0.0.0;remotePort=443",
    )
    .unwrap();
    let flags = overlay::apply(FlagValues::default(), &options);
    assert_eq!(flags.role(), Role::Server);
    assert_eq!(flags.remote_addr, "10.0.0.1");
    assert_eq!(flags.remote_port, "1000");
    assert_eq!(flags.local_addr, "0.0.0.0");
    assert_eq!(flags.local_port, "443");
}

#[test]
fn test_apply_server_flag_swaps_endpoints() {
    let defaults = FlagValues {
        server: true,
        ..FlagValues::default()
    };
    let options = overlay::parse("localPort=1000").unwrap();
    let flags = overlay::apply(defaults, &options);
    assert_eq!(flags.remote_port, "1000");
    assert_eq!(flags.local_port, "1984");
}

#[test]
fn test_apply_is_idempotent() {
    let inputs = [
        "",
        "tls;mode=quic",
        "server;localAddr=1.1.1.1;remotePort=8443",
        "localAddr=1.1.1.1;localPort=1;remoteAddr=2.2.2.2;remotePort=2",
    ];
    for server in [false, true] {
        for input in inputs {
            let options = overlay::parse(input).unwrap();
            let defaults = FlagValues {
                server,
                ..FlagValues::default()
            };
            let once = overlay::apply(defaults, &options);
            let twice = overlay::apply(once.clone(), &options);
            assert_eq!(once, twice, "overlay {:?} with server={}", input, server);
        }
    }
}

#[test]
fn test_apply_empty_overlay_keeps_flags() {
    let flags = overlay::apply(FlagValues::default(), &OptionSet::new());
    assert_eq!(flags, FlagValues::default());
}
