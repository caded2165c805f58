use crate::config::{Address, Destination, FlagValues, Role};
use crate::error::ConfigResult;
use crate::proxy::{
    AppModule, InboundHandlerConfig, InboundProxy, MUX_CONCURRENCY, MUX_PLACEHOLDER_DOMAIN,
    MultiplexSettings, Network, OutboundHandlerConfig, OutboundProxy, ProxyConfig,
    ReceiverSettings, SenderSettings, StreamSettings,
};
use crate::tls_utils::{self, CertificateSource};
use crate::transport;
use std::net::{IpAddr, Ipv4Addr};
use tracing::{debug, info};

/// Role-dependent decisions of the handler layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleProfile {
    /// Stream settings go on the inbound receiver rather than the outbound sender
    pub stream_on_receiver: bool,
    /// Multiplexing applied to the outbound sender, if any
    pub multiplex: Option<MultiplexSettings>,
    /// Target of the pass-through inbound
    pub inbound_target: Address,
}

impl RoleProfile {
    /// Stream settings always sit on the side facing the public network.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Server => Self {
                stream_on_receiver: true,
                multiplex: None,
                inbound_target: Address::Domain(MUX_PLACEHOLDER_DOMAIN.to_string()),
            },
            Role::Client => Self {
                stream_on_receiver: false,
                multiplex: Some(MultiplexSettings {
                    concurrency: MUX_CONCURRENCY,
                }),
                inbound_target: Address::Ip(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            },
        }
    }
}

/// Build the stream settings (transport, socket options and TLS) from flags.
pub fn build_stream_settings(flags: &FlagValues) -> ConfigResult<StreamSettings> {
    let (transport, tls_forced) = transport::build(&flags.mode, flags)?;
    let tls = if flags.tls || tls_forced {
        let source = CertificateSource::new(flags.cert_path(), flags.cert_inline());
        Some(tls_utils::build(
            flags.role(),
            &flags.host,
            source,
            flags.key_path(),
        )?)
    } else {
        None
    };

    Ok(StreamSettings {
        transport,
        fast_open: flags.fast_open,
        tls,
    })
}

/// Lay out the inbound and outbound handlers for `role`.
pub fn assemble(
    role: Role,
    flags: &FlagValues,
    stream: StreamSettings,
    outbound_target: Destination,
) -> ConfigResult<ProxyConfig> {
    let listen = flags.listen_endpoint()?;
    let profile = RoleProfile::for_role(role);

    let (receiver_stream, sender) = if profile.stream_on_receiver {
        (Some(stream), None)
    } else {
        (
            None,
            Some(SenderSettings {
                stream,
                multiplex: profile.multiplex,
            }),
        )
    };

    let inbound = InboundHandlerConfig {
        receiver: ReceiverSettings {
            listen: listen.address,
            port: listen.port,
            stream: receiver_stream,
        },
        proxy: InboundProxy {
            target: profile.inbound_target,
            networks: vec![Network::Tcp],
        },
    };
    let outbound = OutboundHandlerConfig {
        sender,
        proxy: OutboundProxy {
            destination: outbound_target,
        },
    };

    Ok(ProxyConfig {
        inbound: vec![inbound],
        outbound: vec![outbound],
        apps: AppModule::defaults(flags.log_level()),
    })
}

/// Produce the complete engine configuration from flag values.
pub fn generate(flags: &FlagValues) -> ConfigResult<ProxyConfig> {
    // port checks come first so a bad port is reported before any file is read
    flags.listen_port()?;
    let destination = flags.forward_destination()?;
    let stream = build_stream_settings(flags)?;
    let role = flags.role();

    debug!(
        "Stream settings: mode={}, tls={}, fast_open={}",
        stream.mode(),
        stream.tls.is_some(),
        stream.fast_open
    );
    let config = assemble(role, flags, stream, destination)?;
    info!(
        "Generated {} config: listen {}:{}, forward {}:{}",
        role, flags.local_addr, flags.local_port, flags.remote_addr, flags.remote_port
    );
    Ok(config)
}
