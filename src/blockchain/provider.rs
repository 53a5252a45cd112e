// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet provider capability consumed by the session orchestrator.
//!
//! Mirrors the subset of an EIP-1193 provider the mint flow needs: account
//! access, chain id, chain switching, balance, transaction broadcast and
//! receipt lookup, plus an event stream for account/chain/disconnect changes.

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

/// EIP-1193 error code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Events a wallet pushes independently of any request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The exposed account list changed; empty means the wallet locked or
    /// revoked access.
    AccountsChanged(Vec<String>),
    /// The active chain changed.
    ChainChanged(u64),
    Disconnected,
}

/// A fully-resolved transaction ready for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintTransaction {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

/// Transaction receipt after confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
    /// Block number where transaction was included
    pub block_number: u64,
    /// Gas actually used
    pub gas_used: u64,
    /// Whether the transaction was successful
    pub success: bool,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("User rejected the request")]
    UserRejected,

    #[error("Chain switch rejected: {0}")]
    ChainSwitchRejected(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Timed out waiting for receipt of {0}")]
    ReceiptTimeout(String),
}

impl WalletError {
    /// Map a JSON-RPC style error code and message onto a wallet error.
    pub fn from_rpc_code(code: i64, message: impl Into<String>) -> Self {
        if code == USER_REJECTED_CODE {
            WalletError::UserRejected
        } else {
            WalletError::Rpc(message.into())
        }
    }
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Prompt for account access (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    /// Account already exposed without prompting, if any.
    fn selected_address(&self) -> Option<String>;

    /// Active chain id (`eth_chainId`).
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Ask the wallet to switch chains (`wallet_switchEthereumChain`).
    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

    /// Native balance of `address` in wei.
    async fn balance(&self, address: &str) -> Result<U256, WalletError>;

    /// Sign and broadcast, returning the transaction hash.
    async fn send_transaction(&self, tx: MintTransaction) -> Result<String, WalletError>;

    /// Wait until the transaction has one confirmation.
    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<TxReceipt, WalletError>;

    /// Take the event stream. Only the first call returns a receiver.
    fn subscribe(&self) -> Option<UnboundedReceiver<WalletEvent>>;
}
