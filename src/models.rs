// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wire Models
//!
//! Request and response bodies of the upstream minting API. Field names are
//! camelCase on the wire and must stay byte-compatible with the upstream.
//!
//! The relay forwards bodies without deserializing into these types; they are
//! used by the session client and by the OpenAPI document.

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Ethereum-compatible wallet address wrapper.
///
/// Format: `0x` followed by 40 hexadecimal characters (20 bytes). The value is
/// passed through as the wallet reported it; no checksum normalization.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

// =============================================================================
// Challenge
// =============================================================================

/// `POST /challenge` request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    pub wallet_address: WalletAddress,
}

/// `POST /challenge` response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub success: bool,
    /// Puzzle text shown to the user.
    #[serde(default)]
    pub challenge: String,
    /// Opaque id echoed back with the answer.
    #[serde(default)]
    pub challenge_id: String,
}

// =============================================================================
// Mint
// =============================================================================

/// `POST /mint` request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    pub wallet_address: WalletAddress,
    pub challenge_id: String,
    pub answer: String,
}

/// `POST /mint` response.
///
/// Every field is optional on the wire; the session client decides which
/// absences are fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MintResponse {
    /// Call data for the mint transaction.
    #[serde(default)]
    pub hex: Option<String>,
    /// Destination contract address.
    #[serde(default)]
    pub ca: Option<String>,
    /// `free` or `public`.
    #[serde(default)]
    pub mint_type: Option<String>,
    /// Price in ether; upstream sends either a string or a number.
    #[serde(default, deserialize_with = "deserialize_decimal")]
    #[schema(value_type = Option<String>)]
    pub value: Option<String>,
}

/// Mint category granted by the upstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MintType {
    /// Whitelisted, gas only.
    Free,
    #[default]
    Public,
}

impl MintType {
    /// Anything other than `free` is treated as a public mint.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "free" => MintType::Free,
            _ => MintType::Public,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MintType::Free => "You are whitelisted! Free mint available (gas fees only).",
            MintType::Public => "Public mint requires payment.",
        }
    }
}

impl std::fmt::Display for MintType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MintType::Free => write!(f, "free"),
            MintType::Public => write!(f, "public"),
        }
    }
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string()).filter(|s| !s.is_empty())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a decimal string or number, got {other}"
        ))),
    }
}
