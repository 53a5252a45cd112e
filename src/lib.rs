// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ArbOn Mint - challenge-gated NFT minting on Arbitrum
//!
//! This crate provides a CORS relay in front of the upstream minting API and
//! the client-side session that walks a wallet from connection to a confirmed
//! mint transaction.
//!
//! ## Modules
//!
//! - `api` - Relay HTTP handlers (Axum)
//! - `relay` - Upstream forwarder used by the relay handlers
//! - `session` - Mint session state and orchestrator
//! - `blockchain` - Wallet provider capability and Arbitrum integration

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod relay;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_support;
