// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors surfaced by session operations.

use crate::blockchain::WalletError;

/// Why a call to the relay or the upstream API failed.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ApiFailure {
    /// The request never got an HTTP answer: unreachable host, timeout, or a
    /// cross-origin block in a browser.
    #[error("network or CORS failure: {0}")]
    Network(String),

    /// The server answered, but not with a usable body.
    #[error("{0}")]
    Upstream(String),
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No wallet provider detected. Please install a wallet extension first.")]
    NoProvider,

    #[error("Request rejected. Please approve it in your wallet.")]
    UserRejected,

    #[error("No accounts found. Please unlock your wallet.")]
    NoAccount,

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Network not verified. Switch to the target network first.")]
    NetworkNotVerified,

    #[error("Wrong network: wallet is on {actual:#x}, expected {expected:#x}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("{0}")]
    ChallengeUnavailable(ApiFailure),

    #[error("No challenge to solve")]
    NoChallengePending,

    #[error("Challenge {got} is not the pending challenge {expected}")]
    ChallengeMismatch { expected: String, got: String },

    #[error("Please enter an answer")]
    EmptyAnswer,

    #[error("{0}")]
    AnswerRejected(ApiFailure),

    #[error("Invalid mint response: {0}")]
    InvalidMintResponse(String),

    #[error("Mint data or wallet not available")]
    NoMintPayload,

    #[error("Transaction {tx_hash} failed")]
    TransactionFailed { tx_hash: String },

    #[error("Wallet error: {0}")]
    Wallet(WalletError),
}

impl From<WalletError> for SessionError {
    fn from(error: WalletError) -> Self {
        match error {
            WalletError::UserRejected => SessionError::UserRejected,
            other => SessionError::Wallet(other),
        }
    }
}
