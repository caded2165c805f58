use crate::config::Role;
use crate::error::{ConfigError, ConfigResult, LoadError};
use crate::proxy::{CertificateMaterial, CertificateUsage, TlsSettings};
use std::fs;
use tracing::debug;

/// Where certificate bytes come from. A path wins over inline content.
#[derive(Debug, Clone, Copy, Default)]
pub struct CertificateSource<'a> {
    pub path: Option<&'a str>,
    pub raw: Option<&'a str>,
}

impl<'a> CertificateSource<'a> {
    pub fn new(path: Option<&'a str>, raw: Option<&'a str>) -> Self {
        Self {
            path: path.filter(|p| !p.is_empty()),
            raw: raw.filter(|r| !r.is_empty()),
        }
    }

    pub fn is_set(&self) -> bool {
        self.path.is_some() || self.raw.is_some()
    }
}

pub struct CertificateLoader;

impl CertificateLoader {
    /// Load certificate bytes, preferring the file over inline content.
    pub fn load(source: CertificateSource<'_>) -> Result<Vec<u8>, LoadError> {
        if let Some(path) = source.path {
            return read_file(path);
        }
        if let Some(raw) = source.raw {
            return Ok(raw.as_bytes().to_vec());
        }
        Err(LoadError::Missing)
    }
}

fn read_file(path: &str) -> Result<Vec<u8>, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::IoFailure {
        path: path.to_string(),
        source,
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path);
    Ok(bytes)
}

/// Assemble TLS settings for `role`.
///
/// Servers must present an identity, so a key is required. Clients pin the
/// given certificate if one is configured and otherwise leave trust to the
/// engine's defaults.
pub fn build(
    role: Role,
    host: &str,
    cert: CertificateSource<'_>,
    key_path: Option<&str>,
) -> ConfigResult<TlsSettings> {
    let certificates = match role {
        Role::Server => {
            let key_path = key_path
                .filter(|k| !k.is_empty())
                .ok_or(ConfigError::NoServerCredentials)?;
            let certificate = CertificateLoader::load(cert).map_err(|source| {
                ConfigError::CredentialLoadFailed {
                    what: "cert",
                    source,
                }
            })?;
            let key =
                read_file(key_path).map_err(|source| ConfigError::CredentialLoadFailed {
                    what: "key file",
                    source,
                })?;
            vec![CertificateMaterial {
                certificate,
                key: Some(key),
                usage: CertificateUsage::Encipherment,
            }]
        }
        Role::Client if cert.is_set() => {
            let certificate = CertificateLoader::load(cert).map_err(|source| {
                ConfigError::CredentialLoadFailed {
                    what: "cert",
                    source,
                }
            })?;
            vec![CertificateMaterial {
                certificate,
                key: None,
                usage: CertificateUsage::AuthorityVerify,
            }]
        }
        Role::Client => Vec::new(),
    };

    Ok(TlsSettings {
        server_name: host.to_string(),
        certificates,
    })
}
