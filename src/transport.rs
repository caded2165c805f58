use crate::config::{FlagValues, TransportMode};
use crate::error::ConfigResult;
use crate::proxy::{Header, QuicSecurity, TransportSettings};
use tracing::debug;

/// Transport settings for `mode`, plus whether the mode forces TLS on.
///
/// QUIC always runs over TLS, so callers must OR the returned flag into their
/// own TLS decision.
pub fn build(mode: &str, flags: &FlagValues) -> ConfigResult<(TransportSettings, bool)> {
    let mode: TransportMode = mode.parse()?;
    let built = match mode {
        TransportMode::Websocket => (
            TransportSettings::Websocket {
                path: flags.path.clone(),
                headers: vec![Header {
                    key: "Host".to_string(),
                    value: flags.host.clone(),
                }],
            },
            false,
        ),
        TransportMode::Quic => (
            TransportSettings::Quic {
                security: QuicSecurity::None,
            },
            true,
        ),
    };
    debug!("Built {} transport settings (tls forced: {})", mode, built.1);
    Ok(built)
}
