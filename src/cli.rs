use crate::config::{
    DEFAULT_HOST, DEFAULT_LOCAL_ADDR, DEFAULT_LOCAL_PORT, DEFAULT_MODE, DEFAULT_PATH,
    DEFAULT_REMOTE_ADDR, DEFAULT_REMOTE_PORT, FlagValues,
};
use clap::{ArgAction, CommandFactory, Parser};
use std::ffi::OsString;

/// Command-line interface definition.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tunnel-plugin",
    about = "Websocket/QUIC tunnel plugin",
    disable_version_flag = true
)]
pub struct Cli {
    /// Run in VPN mode.
    #[arg(short = 'V')]
    pub vpn: bool,

    /// Enable TCP fast open.
    #[arg(
        long = "fast-open",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value_t = false,
        action = ArgAction::Set
    )]
    pub fast_open: bool,

    /// Local address to listen on.
    #[arg(long = "localAddr", default_value = DEFAULT_LOCAL_ADDR)]
    pub local_addr: String,

    /// Local port to listen on.
    #[arg(long = "localPort", default_value = DEFAULT_LOCAL_PORT)]
    pub local_port: String,

    /// Remote address to forward.
    #[arg(long = "remoteAddr", default_value = DEFAULT_REMOTE_ADDR)]
    pub remote_addr: String,

    /// Remote port to forward.
    #[arg(long = "remotePort", default_value = DEFAULT_REMOTE_PORT)]
    pub remote_port: String,

    /// URL path for websocket.
    #[arg(long = "path", default_value = DEFAULT_PATH)]
    pub path: String,

    /// Host header for websocket.
    #[arg(long = "host", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Enable TLS.
    #[arg(
        long = "tls",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value_t = false,
        action = ArgAction::Set
    )]
    pub tls: bool,

    /// Path to TLS certificate file. Overrides certRaw.
    #[arg(long = "cert", value_name = "FILE")]
    pub cert: Option<String>,

    /// Raw TLS certificate content. Intended only for Android.
    #[arg(long = "certRaw", value_name = "PEM")]
    pub cert_raw: Option<String>,

    /// (server) Path to TLS key file.
    #[arg(long = "key", value_name = "FILE")]
    pub key: Option<String>,

    /// Transport mode: websocket, quic (enforced tls).
    #[arg(long = "mode", default_value = DEFAULT_MODE)]
    pub mode: String,

    /// Run in server mode
    #[arg(
        long = "server",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value_t = false,
        action = ArgAction::Set
    )]
    pub server: bool,

    /// Log level: debug, info, warning (default), error, none.
    #[arg(long = "loglevel", default_value = "")]
    pub log_level: String,
}

impl Cli {
    /// Parse the process arguments, accepting single-dash long flags.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }
}

impl From<Cli> for FlagValues {
    fn from(cli: Cli) -> Self {
        FlagValues {
            vpn: cli.vpn,
            fast_open: cli.fast_open,
            local_addr: cli.local_addr,
            local_port: cli.local_port,
            remote_addr: cli.remote_addr,
            remote_port: cli.remote_port,
            path: cli.path,
            host: cli.host,
            tls: cli.tls,
            cert: cli.cert,
            cert_raw: cli.cert_raw,
            key: cli.key,
            mode: cli.mode,
            server: cli.server,
            log_level: cli.log_level,
        }
    }
}

/// Rewrite `-name` and `-name=value` to `--name...` when `name` is a long flag.
///
/// A value-taking flag given without `=` is joined with the next argument as
/// `--name=value`, so values that start with `-` stay values. Arguments after a
/// bare `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Cli::command();
    let long_names: Vec<&str> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long())
        .chain(["help"])
        .collect();
    let value_names: Vec<&str> = command
        .get_arguments()
        .filter(|arg| arg.get_action().takes_values() && !arg.is_require_equals_set())
        .filter_map(|arg| arg.get_long())
        .collect();

    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            normalized.push(arg);
            normalized.extend(args.by_ref());
            break;
        }
        let rest = match text.strip_prefix("--") {
            Some(rest) => rest,
            None => match text.strip_prefix('-') {
                Some(rest) => rest,
                None => {
                    normalized.push(arg);
                    continue;
                }
            },
        };
        let (name, has_value) = match rest.split_once('=') {
            Some((name, _)) => (name, true),
            None => (rest, false),
        };
        if name.len() < 2 || !long_names.contains(&name) {
            normalized.push(arg);
            continue;
        }

        let flag = format!("--{}", rest);
        if !has_value && value_names.contains(&name) {
            match args.next() {
                Some(value) => {
                    let mut joined = OsString::from(format!("{}=", flag));
                    joined.push(value);
                    normalized.push(joined);
                }
                None => normalized.push(OsString::from(flag)),
            }
        } else {
            normalized.push(OsString::from(flag));
        }
    }

    normalized
}
