//! Environment overlay for plugin options.
//!
//! The variable holds `;`-separated entries of the form `key=value` or a bare
//! `key`. A backslash escapes the next character, so `\;`, `\=` and `\\` are
//! literal.

use crate::config::{FlagValues, Role};
use crate::error::ParseError;
use std::collections::HashMap;

/// Environment variable carrying the overlay
pub const PLUGIN_OPTIONS_VAR: &str = "SS_PLUGIN_OPTIONS";

/// Decoded overlay entries. A key maps to `None` when it was given without a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: HashMap<String, Option<String>>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.entries.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Value of `key`; a bare key yields an empty string.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(|value| value.as_deref().unwrap_or(""))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read and decode the overlay from the process environment.
pub fn from_env(var: &str) -> Result<OptionSet, ParseError> {
    let value = std::env::var(var).map_err(|_| ParseError::Missing {
        var: var.to_string(),
    })?;
    parse(&value)
}

/// Decode an overlay string.
pub fn parse(input: &str) -> Result<OptionSet, ParseError> {
    let mut options = OptionSet::new();
    let mut key = String::new();
    let mut value: Option<String> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next().ok_or(ParseError::DanglingEscape)?;
                match value.as_mut() {
                    Some(v) => v.push(escaped),
                    None => key.push(escaped),
                }
            }
            '=' if value.is_none() => value = Some(String::new()),
            ';' => {
                commit(&mut options, &mut key, &mut value)?;
            }
            _ => match value.as_mut() {
                Some(v) => v.push(c),
                None => key.push(c),
            },
        }
    }
    commit(&mut options, &mut key, &mut value)?;

    Ok(options)
}

fn commit(
    options: &mut OptionSet,
    key: &mut String,
    value: &mut Option<String>,
) -> Result<(), ParseError> {
    let key = std::mem::take(key);
    let value = value.take();
    if key.is_empty() {
        return match value {
            // blank entry, e.g. a trailing ';'
            None => Ok(()),
            Some(v) => Err(ParseError::EmptyKey {
                entry: format!("={}", v),
            }),
        };
    }
    options.insert(key, value);
    Ok(())
}

/// Merge `overlay` onto `flags`.
///
/// `tls` and `server` are presence-only. Once the effective role is known,
/// server processes swap the overlay's local and remote endpoints: the overlay
/// describes addresses from the operator's side, and a server listens where a
/// client considers "remote".
pub fn apply(mut flags: FlagValues, overlay: &OptionSet) -> FlagValues {
    if let Some(mode) = overlay.get("mode") {
        flags.mode = mode.to_string();
    }
    if overlay.contains("tls") {
        flags.tls = true;
    }
    if let Some(host) = overlay.get("host") {
        flags.host = host.to_string();
    }
    if let Some(path) = overlay.get("path") {
        flags.path = path.to_string();
    }
    if overlay.contains("server") {
        flags.server = true;
    }

    let swap = flags.role() == Role::Server;
    let overlay_endpoints = [
        ("localAddr", swap),
        ("localPort", swap),
        ("remoteAddr", !swap),
        ("remotePort", !swap),
    ];
    for (key, to_remote) in overlay_endpoints {
        let Some(value) = overlay.get(key) else {
            continue;
        };
        let slot = match (key.ends_with("Addr"), to_remote) {
            (true, true) => &mut flags.remote_addr,
            (true, false) => &mut flags.local_addr,
            (false, true) => &mut flags.remote_port,
            (false, false) => &mut flags.local_port,
        };
        *slot = value.to_string();
    }

    flags
}
