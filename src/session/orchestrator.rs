// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Mint Orchestrator
//!
//! Drives one [`Session`] through connect, network check, challenge, answer
//! and mint. Every public operation logs its failure once, at its own
//! boundary, then re-renders the session.

use std::sync::Arc;

use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver};
use tracing::debug;

use crate::{
    blockchain::{format_ether, network_for_chain, network_name, WalletEvent, WalletProvider},
    config::ClientConfig,
    models::{ChallengeRequest, MintRequest},
};

use super::{
    client::{MintApiClient, Route},
    error::{ApiFailure, SessionError},
    view::{LogLine, LogSource, ResultKind, SessionView},
    Challenge, EventEffect, MintPayload, Session,
};

pub struct Orchestrator {
    config: ClientConfig,
    wallet: Option<Arc<dyn WalletProvider>>,
    api: MintApiClient,
    view: Arc<dyn SessionView>,
}

impl Orchestrator {
    /// `wallet` is `None` when no provider is available; every wallet
    /// operation then fails with [`SessionError::NoProvider`].
    pub fn new(
        config: ClientConfig,
        wallet: Option<Arc<dyn WalletProvider>>,
        view: Arc<dyn SessionView>,
    ) -> Result<Self, reqwest::Error> {
        let api = MintApiClient::new(&config)?;
        Ok(Self {
            config,
            wallet,
            api,
            view,
        })
    }

    /// Take the wallet's event stream. Call once at startup.
    pub fn subscribe(&self) -> Option<UnboundedReceiver<WalletEvent>> {
        self.wallet.as_ref().and_then(|wallet| wallet.subscribe())
    }

    // =========================================================================
    // Wallet
    // =========================================================================

    /// Prompt for account access, then verify the network.
    ///
    /// A network failure is reported but leaves the session connected.
    pub async fn connect(&self, session: &mut Session) -> Result<(), SessionError> {
        let result = self.try_connect(session).await;
        self.finish(session, "Wallet connection failed", result)
    }

    async fn try_connect(&self, session: &mut Session) -> Result<(), SessionError> {
        let wallet = self.wallet()?;

        self.log(LogSource::Wallet, "Requesting account access...");
        let accounts = wallet.request_accounts().await?;
        let address = accounts
            .into_iter()
            .find(|account| !account.trim().is_empty())
            .ok_or(SessionError::NoAccount)?;

        self.attach(session, address).await;
        Ok(())
    }

    /// Restore a connection the wallet already granted, without prompting.
    /// Returns whether a connection was restored.
    pub async fn auto_connect(&self, session: &mut Session) -> bool {
        let Some(address) = self.wallet.as_ref().and_then(|w| w.selected_address()) else {
            debug!("No previously authorized account");
            return false;
        };

        self.log(LogSource::Wallet, "Restoring previous wallet connection...");
        self.attach(session, address).await;
        self.view.render_session(session);
        true
    }

    async fn attach(&self, session: &mut Session, address: String) {
        session.connected = true;
        session.address = Some(address.clone());
        self.log(LogSource::Success, format!("Connected: {address}"));
        self.view.render_session(session);

        // Failure is already reported by verify_network.
        let _ = self.verify_network(session).await;
    }

    /// Check the wallet is on the target chain, asking it to switch at most
    /// once, then refresh the balance.
    pub async fn verify_network(&self, session: &mut Session) -> Result<(), SessionError> {
        let result = self.try_verify_network(session).await;
        self.finish(session, "Network check failed", result)
    }

    async fn try_verify_network(&self, session: &mut Session) -> Result<(), SessionError> {
        let wallet = self.wallet()?;
        let address = connected_address(session)?;
        session.network_ok = false;

        let expected = self.config.chain_id;
        let actual = wallet.chain_id().await?;
        if actual != expected {
            self.log(
                LogSource::Warning,
                format!(
                    "Wrong network ({}), switching to {}...",
                    network_name(actual),
                    network_name(expected)
                ),
            );
            if let Err(e) = wallet.switch_chain(expected).await {
                self.log(LogSource::Wallet, format!("Network switch refused: {e}"));
                return Err(SessionError::WrongNetwork { expected, actual });
            }

            let actual = wallet.chain_id().await?;
            if actual != expected {
                return Err(SessionError::WrongNetwork { expected, actual });
            }
        }

        session.network_ok = true;
        self.log(
            LogSource::Success,
            format!("Connected to {}", network_name(expected)),
        );
        self.refresh_balance(wallet.as_ref(), session, &address).await;
        Ok(())
    }

    async fn refresh_balance(
        &self,
        wallet: &dyn WalletProvider,
        session: &mut Session,
        address: &str,
    ) {
        match wallet.balance(address).await {
            Ok(wei) => {
                session.balance = format_ether(wei);
                self.log(LogSource::Wallet, format!("Balance: {} ETH", session.balance));
            }
            Err(e) => self.log(LogSource::Warning, format!("Could not fetch balance: {e}")),
        }
    }

    // =========================================================================
    // Challenge
    // =========================================================================

    /// Fetch a challenge for the connected address. With the relay enabled a
    /// relay failure gets exactly one direct attempt.
    pub async fn request_challenge(&self, session: &mut Session) -> Result<(), SessionError> {
        let result = self.try_request_challenge(session).await;
        self.finish(session, "Failed to get challenge", result)
    }

    async fn try_request_challenge(&self, session: &mut Session) -> Result<(), SessionError> {
        let address = verified_address(session)?;
        let request = ChallengeRequest {
            wallet_address: address.into(),
        };

        self.log(LogSource::Api, "Requesting challenge...");
        let fetched = if self.api.uses_relay() {
            match self.api.challenge(Route::Relay, &request).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    self.log(
                        LogSource::Warning,
                        format!("Relay failed: {e}, trying direct API..."),
                    );
                    self.api.challenge(Route::Direct, &request).await
                }
            }
        } else {
            self.api.challenge(Route::Direct, &request).await
        };
        let response = fetched.map_err(SessionError::ChallengeUnavailable)?;

        // A refusal delivered by the relay is final; only transport and
        // status failures fall back.
        if !response.success || response.challenge_id.trim().is_empty() {
            return Err(SessionError::ChallengeUnavailable(ApiFailure::Upstream(
                "Invalid challenge response".to_string(),
            )));
        }
        let challenge = Challenge {
            id: response.challenge_id,
            prompt: response.challenge,
        };

        self.log(
            LogSource::Success,
            format!("Challenge received: {}", challenge.prompt),
        );
        session.reset_mint_cycle();
        session.challenge = Some(challenge);
        Ok(())
    }

    /// Submit the answer to the pending challenge and store the mint payload
    /// the upstream grants.
    pub async fn submit_answer(
        &self,
        session: &mut Session,
        challenge_id: &str,
        answer: &str,
    ) -> Result<(), SessionError> {
        let result = self.try_submit_answer(session, challenge_id, answer).await;
        self.finish(session, "Answer rejected", result)
    }

    async fn try_submit_answer(
        &self,
        session: &mut Session,
        challenge_id: &str,
        answer: &str,
    ) -> Result<(), SessionError> {
        let address = connected_address(session)?;
        let pending = session
            .challenge
            .as_ref()
            .ok_or(SessionError::NoChallengePending)?;
        if pending.id != challenge_id {
            return Err(SessionError::ChallengeMismatch {
                expected: pending.id.clone(),
                got: challenge_id.to_string(),
            });
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SessionError::EmptyAnswer);
        }

        self.log(LogSource::Api, "Submitting answer...");
        let response = self
            .api
            .mint(&MintRequest {
                wallet_address: address.into(),
                challenge_id: challenge_id.to_string(),
                answer: answer.to_string(),
            })
            .await
            .map_err(SessionError::AnswerRejected)?;
        let payload = MintPayload::from_response(response)?;

        if !payload
            .contract_address
            .eq_ignore_ascii_case(&self.config.nft_contract)
        {
            self.log(
                LogSource::Warning,
                format!(
                    "Mint targets {} instead of {}",
                    payload.contract_address, self.config.nft_contract
                ),
            );
        }
        self.log(
            LogSource::Success,
            format!("Answer accepted! {}", payload.mint_type.description()),
        );
        self.log(LogSource::Api, format!("Mint price: {} ETH", payload.price));
        self.view.render_result(ResultKind::Success, "Challenge solved! You can mint now.");
        session.mint_payload = Some(payload);
        Ok(())
    }

    // =========================================================================
    // Mint
    // =========================================================================

    /// Send the mint transaction and wait for one confirmation.
    ///
    /// Without a stored payload nothing is sent. A reverted transaction keeps
    /// the payload so the mint can be retried.
    pub async fn mint(&self, session: &mut Session) -> Result<(), SessionError> {
        let result = self.try_mint(session).await;
        self.finish(session, "Mint failed", result)
    }

    async fn try_mint(&self, session: &mut Session) -> Result<(), SessionError> {
        let payload = session
            .mint_payload
            .clone()
            .ok_or(SessionError::NoMintPayload)?;
        let address = verified_address(session)?;
        let wallet = self.wallet()?;
        let tx = payload.transaction()?;

        self.log(LogSource::Transaction, "Sending mint transaction...");
        self.view.render_result(
            ResultKind::Pending,
            "Please confirm the transaction in your wallet",
        );
        let tx_hash = wallet.send_transaction(tx).await?;

        session.pending_tx = Some(tx_hash.clone());
        self.log(LogSource::Transaction, format!("Transaction sent: {tx_hash}"));
        self.view.render_result(ResultKind::Pending, "Waiting for confirmation...");
        self.view.render_session(session);

        let receipt = wallet.wait_for_receipt(&tx_hash).await;
        session.pending_tx = None;
        let receipt = receipt?;
        if !receipt.success {
            return Err(SessionError::TransactionFailed { tx_hash });
        }

        self.log(
            LogSource::Success,
            format!("NFT minted! Block {}", receipt.block_number),
        );
        if let Some(network) = network_for_chain(self.config.chain_id) {
            self.log(
                LogSource::Transaction,
                format!("{}/tx/{}", network.explorer_url, receipt.tx_hash),
            );
        }
        self.view.render_result(ResultKind::Success, "NFT minted successfully!");
        session.reset_mint_cycle();
        session.last_mint = Some(receipt);
        self.refresh_balance(wallet.as_ref(), session, &address).await;
        Ok(())
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Apply one wallet event. A chain change re-runs the network check.
    pub async fn handle_event(&self, session: &mut Session, event: WalletEvent) {
        match session.apply(&event) {
            EventEffect::Ignored => debug!(?event, "Wallet event ignored"),
            EventEffect::Disconnected => self.log(LogSource::Wallet, "Wallet disconnected"),
            EventEffect::AccountChanged(account) => self.log(
                LogSource::Wallet,
                format!("Account changed to {account}. Please reconnect."),
            ),
            EventEffect::ChainChanged(chain_id) => {
                self.log(
                    LogSource::Wallet,
                    format!("Network changed to {}", network_name(chain_id)),
                );
                // Failure is already reported by verify_network.
                let _ = self.verify_network(session).await;
            }
        }
        self.view.render_session(session);
    }

    /// Apply every queued event without waiting for more. Returns how many
    /// were applied.
    pub async fn drain_events(
        &self,
        session: &mut Session,
        events: &mut UnboundedReceiver<WalletEvent>,
    ) -> usize {
        let mut applied = 0;
        loop {
            match events.try_recv() {
                Ok(event) => {
                    self.handle_event(session, event).await;
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Wallet event stream closed");
                    break;
                }
            }
        }
        applied
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn wallet(&self) -> Result<Arc<dyn WalletProvider>, SessionError> {
        self.wallet.clone().ok_or(SessionError::NoProvider)
    }

    fn log(&self, source: LogSource, message: impl Into<String>) {
        self.view.render_log(&LogLine {
            source,
            message: message.into(),
        });
    }

    fn finish<T>(
        &self,
        session: &Session,
        context: &str,
        result: Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        if let Err(error) = &result {
            let message = format!("{context}: {error}");
            self.log(LogSource::Error, message.clone());
            self.view.render_result(ResultKind::Error, &message);
        }
        self.view.render_session(session);
        result
    }
}

fn connected_address(session: &Session) -> Result<String, SessionError> {
    session
        .address
        .clone()
        .filter(|_| session.connected)
        .ok_or(SessionError::NotConnected)
}

fn verified_address(session: &Session) -> Result<String, SessionError> {
    let address = connected_address(session)?;
    if !session.network_ok {
        return Err(SessionError::NetworkNotVerified);
    }
    Ok(address)
}
