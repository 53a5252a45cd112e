// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Mint Session
//!
//! Client-side state for one wallet working through the mint flow:
//!
//! ```text
//! Disconnected -> Connected -> NetworkVerified -> ChallengeIssued
//!              -> AnswerAccepted -> Minting -> Minted
//! ```
//!
//! The [`Session`] value is owned by the caller and passed by `&mut` into each
//! [`Orchestrator`] operation, so two mutating operations on one session can
//! never overlap. Wallet events are applied through [`Session::apply`], a pure
//! transition with no I/O.

use std::str::FromStr;

use alloy::primitives::{Address, Bytes, U256};

use crate::{
    blockchain::{parse_ether, MintTransaction, TxReceipt, WalletEvent},
    models::{MintResponse, MintType},
};

pub mod client;
pub mod error;
pub mod orchestrator;
pub mod view;

pub use client::{MintApiClient, Route};
pub use error::{ApiFailure, SessionError};
pub use orchestrator::Orchestrator;
pub use view::{LogLine, LogSource, ResultKind, SessionView, TracingView};

/// Display price when the upstream omits `value`.
pub const DEFAULT_MINT_PRICE: &str = "0.0005";

/// In-memory session fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub connected: bool,
    pub address: Option<String>,
    pub network_ok: bool,
    /// Native balance in ether.
    pub balance: String,
    pub challenge: Option<Challenge>,
    pub mint_payload: Option<MintPayload>,
    /// Hash of a broadcast mint still waiting for its confirmation.
    pub pending_tx: Option<String>,
    /// Receipt of the most recent confirmed mint.
    pub last_mint: Option<TxReceipt>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            connected: false,
            address: None,
            network_ok: false,
            balance: "0".to_string(),
            challenge: None,
            mint_payload: None,
            pending_tx: None,
            last_mint: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Disconnected,
    Connected,
    NetworkVerified,
    ChallengeIssued,
    AnswerAccepted,
    Minting,
    Minted,
}

/// What a wallet event did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventEffect {
    Ignored,
    /// Session was reset to its empty form.
    Disconnected,
    /// A different account became active; the session was reset.
    AccountChanged(String),
    /// The chain changed; the network must be verified again.
    ChainChanged(u64),
}

impl Session {
    pub fn phase(&self) -> SessionPhase {
        if !self.connected {
            SessionPhase::Disconnected
        } else if !self.network_ok {
            SessionPhase::Connected
        } else if self.pending_tx.is_some() {
            SessionPhase::Minting
        } else if self.mint_payload.is_some() {
            SessionPhase::AnswerAccepted
        } else if self.challenge.is_some() {
            SessionPhase::ChallengeIssued
        } else if self.last_mint.is_some() {
            SessionPhase::Minted
        } else {
            SessionPhase::NetworkVerified
        }
    }

    pub fn reset(&mut self) {
        *self = Session::default();
    }

    /// Forget the challenge, payload and in-flight transaction while keeping
    /// the wallet connection.
    pub fn reset_mint_cycle(&mut self) {
        self.challenge = None;
        self.mint_payload = None;
        self.pending_tx = None;
    }

    /// Apply a wallet event. Never performs I/O.
    pub fn apply(&mut self, event: &WalletEvent) -> EventEffect {
        match event {
            WalletEvent::Disconnected => {
                self.reset();
                EventEffect::Disconnected
            }
            WalletEvent::AccountsChanged(accounts) => match accounts.first() {
                None => {
                    self.reset();
                    EventEffect::Disconnected
                }
                Some(_) if !self.connected => EventEffect::Ignored,
                Some(account)
                    if self
                        .address
                        .as_deref()
                        .is_some_and(|current| current.eq_ignore_ascii_case(account)) =>
                {
                    EventEffect::Ignored
                }
                Some(account) => {
                    self.reset();
                    EventEffect::AccountChanged(account.clone())
                }
            },
            WalletEvent::ChainChanged(chain_id) => {
                if !self.connected {
                    return EventEffect::Ignored;
                }
                self.network_ok = false;
                EventEffect::ChainChanged(*chain_id)
            }
        }
    }
}

/// Puzzle issued by the upstream for one wallet address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub id: String,
    pub prompt: String,
}

/// Transaction parameters granted after a correct answer.
///
/// Kept as the upstream sent them; only [`MintPayload::transaction`] parses
/// the fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintPayload {
    pub contract_address: String,
    pub call_data: String,
    pub mint_type: MintType,
    /// Price shown to the user, in ether.
    pub price: String,
    /// Value the upstream asked to be attached, in ether.
    pub declared_value: Option<String>,
}

impl MintPayload {
    pub fn from_response(response: MintResponse) -> Result<Self, error::SessionError> {
        let call_data = non_empty(response.hex)
            .ok_or_else(|| error::SessionError::InvalidMintResponse("missing `hex`".into()))?;
        let contract_address = non_empty(response.ca)
            .ok_or_else(|| error::SessionError::InvalidMintResponse("missing `ca`".into()))?;

        Ok(Self {
            contract_address,
            call_data,
            mint_type: MintType::from_wire(response.mint_type.as_deref()),
            price: response
                .value
                .clone()
                .unwrap_or_else(|| DEFAULT_MINT_PRICE.to_string()),
            declared_value: response.value,
        })
    }

    /// Build the `{to, data, value}` transaction. An absent declared value
    /// sends zero.
    pub fn transaction(&self) -> Result<MintTransaction, error::SessionError> {
        let to = Address::from_str(&self.contract_address)
            .map_err(|e| invalid_field("contract address", e))?;
        let data = Bytes::from_str(&self.call_data).map_err(|e| invalid_field("call data", e))?;
        let value = match &self.declared_value {
            Some(amount) => parse_ether(amount).map_err(|e| invalid_field("value", e))?,
            None => U256::ZERO,
        };

        Ok(MintTransaction { to, data, value })
    }
}

fn invalid_field(what: &str, e: impl std::fmt::Display) -> error::SessionError {
    error::SessionError::InvalidMintResponse(format!("{what}: {e}"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
