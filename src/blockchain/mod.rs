// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM integration for the mint flow.
//!
//! This module provides:
//! - The wallet provider capability the session orchestrator drives
//! - A local-key wallet backed by a JSON-RPC endpoint
//! - Network constants and chain id helpers
//! - Ether unit conversion

pub mod client;
pub mod provider;
pub mod types;
pub mod units;

pub use client::{create_signer, LocalWallet};
pub use provider::{MintTransaction, TxReceipt, WalletError, WalletEvent, WalletProvider};
pub use types::*;
pub use units::{format_ether, parse_ether, UnitsError};
