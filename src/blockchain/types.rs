// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

/// EVM network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: &'static str,
    /// Block explorer URL
    pub explorer_url: &'static str,
}

/// Arbitrum One mainnet configuration.
pub const ARBITRUM_ONE: NetworkConfig = NetworkConfig {
    name: "Arbitrum Mainnet",
    chain_id: 42161,
    rpc_url: "https://arb1.arbitrum.io/rpc",
    explorer_url: "https://arbiscan.io",
};

/// Arbitrum Sepolia testnet configuration.
pub const ARBITRUM_SEPOLIA: NetworkConfig = NetworkConfig {
    name: "Arbitrum Sepolia",
    chain_id: 421614,
    rpc_url: "https://sepolia-rollup.arbitrum.io/rpc",
    explorer_url: "https://sepolia.arbiscan.io",
};

const KNOWN_NETWORKS: [NetworkConfig; 2] = [ARBITRUM_ONE, ARBITRUM_SEPOLIA];

/// Look up a known network by chain id.
pub fn network_for_chain(chain_id: u64) -> Option<NetworkConfig> {
    KNOWN_NETWORKS.into_iter().find(|n| n.chain_id == chain_id)
}

/// Display name for a chain id, falling back to the hex id.
pub fn network_name(chain_id: u64) -> String {
    network_for_chain(chain_id)
        .map(|n| n.name.to_string())
        .unwrap_or_else(|| format_chain_id(chain_id))
}

/// Parse a chain id given as `0x`-prefixed hex (EIP-1193 style) or decimal.
pub fn parse_chain_id(raw: &str) -> Option<u64> {
    let value = raw.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) if !hex.is_empty() => u64::from_str_radix(hex, 16).ok(),
        Some(_) => None,
        None => value.parse().ok(),
    }
}

/// Format a chain id the way wallet providers report it (`0xa4b1`).
pub fn format_chain_id(chain_id: u64) -> String {
    format!("{chain_id:#x}")
}
