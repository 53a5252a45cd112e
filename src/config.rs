// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the two configuration values
//! built from them at startup: [`RelayConfig`] for the CORS relay and
//! [`ClientConfig`] for the mint session orchestrator.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Relay bind address | `0.0.0.0` |
//! | `PORT` | Relay bind port | `3000` |
//! | `UPSTREAM_API_BASE` | Minting API base URL | `https://www.arbonnft.xyz/api` |
//! | `RELAY_API_BASE` | Relay base URL used by the client | `http://localhost:3000` |
//! | `USE_RELAY` | Route client calls through the relay | `true` |
//! | `NFT_CONTRACT` | Target NFT contract address | ArbOn contract |
//! | `TARGET_CHAIN_ID` | Required chain id (hex or decimal) | `0xa4b1` |
//! | `RPC_URL` | JSON-RPC endpoint for the local wallet | Arbitrum One public RPC |
//! | `WALLET_PRIVATE_KEY` | Hex private key for the local wallet | Required by `mint-session` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files enabling HTTPS on the relay | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{net::SocketAddr, time::Duration};

use url::Url;

use crate::blockchain::{parse_chain_id, ARBITRUM_ONE};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const UPSTREAM_API_BASE_ENV: &str = "UPSTREAM_API_BASE";
pub const RELAY_API_BASE_ENV: &str = "RELAY_API_BASE";
pub const USE_RELAY_ENV: &str = "USE_RELAY";
pub const NFT_CONTRACT_ENV: &str = "NFT_CONTRACT";
pub const TARGET_CHAIN_ID_ENV: &str = "TARGET_CHAIN_ID";
pub const RPC_URL_ENV: &str = "RPC_URL";
pub const WALLET_PRIVATE_KEY_ENV: &str = "WALLET_PRIVATE_KEY";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_API_BASE: &str = "https://www.arbonnft.xyz/api";
pub const DEFAULT_RELAY_API_BASE: &str = "http://localhost:3000";
pub const DEFAULT_NFT_CONTRACT: &str = "0x2079606049B99adB4cF70844496A026e53e47C60";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Per-attempt timeout for every call to the relay or the upstream API.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Interval between receipt polls while waiting for a mint confirmation.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Upper bound on the confirmation wait.
pub const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

impl ConfigError {
    fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Relay server settings.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    /// Base URL requests are forwarded to (`{base}/challenge`, `{base}/mint`).
    pub upstream_base: Url,
    /// Certificate and key paths; plain HTTP when absent.
    pub tls: Option<TlsPaths>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_optional)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid(PORT_ENV, e.to_string()))?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::invalid(HOST_ENV, e.to_string()))?;

        let upstream_base = parse_base_url(
            UPSTREAM_API_BASE_ENV,
            &lookup(UPSTREAM_API_BASE_ENV).unwrap_or_else(|| DEFAULT_UPSTREAM_API_BASE.to_string()),
        )?;

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert_path), Some(key_path)) => Some(TlsPaths {
                cert_path,
                key_path,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV.to_string())),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV.to_string())),
        };

        Ok(Self {
            bind_addr,
            upstream_base,
            tls,
        })
    }
}

/// Mint client settings consumed by the session orchestrator.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub upstream_base: Url,
    pub relay_base: Url,
    pub use_relay: bool,
    pub nft_contract: String,
    pub chain_id: u64,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_optional)
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let upstream_base = parse_base_url(
            UPSTREAM_API_BASE_ENV,
            &lookup(UPSTREAM_API_BASE_ENV).unwrap_or_else(|| DEFAULT_UPSTREAM_API_BASE.to_string()),
        )?;
        let relay_base = parse_base_url(
            RELAY_API_BASE_ENV,
            &lookup(RELAY_API_BASE_ENV).unwrap_or_else(|| DEFAULT_RELAY_API_BASE.to_string()),
        )?;
        let use_relay = match lookup(USE_RELAY_ENV) {
            Some(raw) => parse_bool(USE_RELAY_ENV, &raw)?,
            None => true,
        };
        let nft_contract =
            lookup(NFT_CONTRACT_ENV).unwrap_or_else(|| DEFAULT_NFT_CONTRACT.to_string());
        let chain_id = match lookup(TARGET_CHAIN_ID_ENV) {
            Some(raw) => parse_chain_id(&raw).ok_or_else(|| {
                ConfigError::invalid(TARGET_CHAIN_ID_ENV, format!("`{raw}` is not a chain id"))
            })?,
            None => ARBITRUM_ONE.chain_id,
        };

        Ok(Self {
            upstream_base,
            relay_base,
            use_relay,
            nft_contract,
            chain_id,
        })
    }
}

/// Join a route onto a base URL, keeping any path prefix the base carries.
pub fn endpoint(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn parse_base_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::invalid(name, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::invalid(name, format!("unsupported scheme `{other}`"))),
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(name, format!("`{raw}` is not a boolean"))),
    }
}

/// Read an environment variable, treating blank values as unset.
pub fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn env_required(name: &str) -> Result<String, ConfigError> {
    env_optional(name).ok_or_else(|| ConfigError::Missing(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn relay_defaults() {
        let config = RelayConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.upstream_base.as_str(), "https://www.arbonnft.xyz/api");
        assert!(config.tls.is_none());
    }

    #[test]
    fn relay_requires_both_tls_paths() {
        let err = RelayConfig::from_lookup(lookup_from(&[(TLS_CERT_PATH_ENV, "/tls/cert.pem")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(TLS_KEY_PATH_ENV.to_string()));

        let config = RelayConfig::from_lookup(lookup_from(&[
            (TLS_CERT_PATH_ENV, "/tls/cert.pem"),
            (TLS_KEY_PATH_ENV, "/tls/key.pem"),
        ]))
        .unwrap();
        assert_eq!(
            config.tls,
            Some(TlsPaths {
                cert_path: "/tls/cert.pem".into(),
                key_path: "/tls/key.pem".into(),
            })
        );
    }

    #[test]
    fn relay_rejects_bad_port() {
        let err = RelayConfig::from_lookup(lookup_from(&[(PORT_ENV, "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref name, .. } if name == PORT_ENV));
    }

    #[test]
    fn client_defaults_target_arbitrum_via_relay() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert!(config.use_relay);
        assert_eq!(config.chain_id, 42161);
        assert_eq!(config.nft_contract, DEFAULT_NFT_CONTRACT);
        assert_eq!(config.relay_base.as_str(), "http://localhost:3000/");
    }

    #[test]
    fn client_parses_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (USE_RELAY_ENV, "off"),
            (TARGET_CHAIN_ID_ENV, "0x66eee"),
            (UPSTREAM_API_BASE_ENV, "http://127.0.0.1:9000/api"),
        ]))
        .unwrap();
        assert!(!config.use_relay);
        assert_eq!(config.chain_id, 421614);
        assert_eq!(
            endpoint(&config.upstream_base, "/challenge"),
            "http://127.0.0.1:9000/api/challenge"
        );
    }

    #[test]
    fn client_rejects_invalid_values() {
        assert!(ClientConfig::from_lookup(lookup_from(&[(USE_RELAY_ENV, "maybe")])).is_err());
        assert!(ClientConfig::from_lookup(lookup_from(&[(TARGET_CHAIN_ID_ENV, "arb")])).is_err());
        assert!(
            ClientConfig::from_lookup(lookup_from(&[(RELAY_API_BASE_ENV, "ftp://relay")])).is_err()
        );
    }

    #[test]
    fn endpoint_handles_trailing_slashes() {
        let base = Url::parse("http://localhost:3000/").unwrap();
        assert_eq!(endpoint(&base, "api/mint"), "http://localhost:3000/api/mint");
        let base = Url::parse("https://www.arbonnft.xyz/api").unwrap();
        assert_eq!(endpoint(&base, "/mint"), "https://www.arbonnft.xyz/api/mint");
    }
}
