// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local-key wallet provider backed by an EVM JSON-RPC endpoint.

use std::{
    str::FromStr,
    sync::Mutex,
    time::{Duration, Instant},
};

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, B256, U256},
    providers::{
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::TransportError,
};
use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use super::provider::{MintTransaction, TxReceipt, WalletError, WalletEvent, WalletProvider};
use crate::config::{RECEIPT_POLL_INTERVAL, RECEIPT_TIMEOUT};

/// HTTP provider with the recommended fillers and a signing wallet.
type SigningProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider<Ethereum>,
>;

/// Wallet that signs with a local private key and talks to one RPC endpoint.
///
/// It cannot switch chains: a switch request succeeds only when the endpoint
/// already serves the requested chain.
pub struct LocalWallet {
    address: Address,
    provider: SigningProvider,
    events_tx: UnboundedSender<WalletEvent>,
    events_rx: Mutex<Option<UnboundedReceiver<WalletEvent>>>,
    poll_interval: Duration,
    receipt_timeout: Duration,
}

impl LocalWallet {
    /// Create a wallet for `private_key_hex` (with or without `0x`).
    pub fn new(rpc_url: &str, private_key_hex: &str) -> Result<Self, WalletError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| WalletError::InvalidRpcUrl(e.to_string()))?;

        let signer = create_signer(private_key_hex)?;
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url);

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            address,
            provider,
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            poll_interval: RECEIPT_POLL_INTERVAL,
            receipt_timeout: RECEIPT_TIMEOUT,
        })
    }

    /// Checksummed signer address.
    pub fn address(&self) -> String {
        self.address.to_checksum(None)
    }

    /// Drop the connection, notifying subscribers.
    pub fn disconnect(&self) {
        let _ = self.events_tx.send(WalletEvent::Disconnected);
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        Ok(vec![self.address()])
    }

    fn selected_address(&self) -> Option<String> {
        Some(self.address())
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| WalletError::Rpc(e.to_string()))
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        let current = self.chain_id().await?;
        if current == chain_id {
            return Ok(());
        }
        Err(WalletError::ChainSwitchRejected(format!(
            "RPC endpoint serves chain {current:#x}, not {chain_id:#x}"
        )))
    }

    async fn balance(&self, address: &str) -> Result<U256, WalletError> {
        let addr = Address::from_str(address)
            .map_err(|e| WalletError::InvalidAddress(e.to_string()))?;

        self.provider
            .get_balance(addr)
            .await
            .map_err(|e| rpc_error("Failed to get balance", e))
    }

    async fn send_transaction(&self, tx: MintTransaction) -> Result<String, WalletError> {
        let request = TransactionRequest::default()
            .from(self.address)
            .to(tx.to)
            .input(tx.data.into())
            .value(tx.value);

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| rpc_error("Failed to send", e))?;

        Ok(format!("{:?}", pending.tx_hash()))
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<TxReceipt, WalletError> {
        let hash = B256::from_str(tx_hash)
            .map_err(|e| WalletError::Rpc(format!("Invalid tx hash: {e}")))?;
        let started = Instant::now();

        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| rpc_error("Failed to get receipt", e))?;

            if let Some(receipt) = receipt {
                return Ok(TxReceipt {
                    tx_hash: tx_hash.to_string(),
                    block_number: receipt.block_number.unwrap_or(0),
                    gas_used: receipt.gas_used as u64,
                    success: receipt.status(),
                });
            }

            if started.elapsed() >= self.receipt_timeout {
                return Err(WalletError::ReceiptTimeout(tx_hash.to_string()));
            }

            debug!(tx_hash, "receipt not available yet");
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn subscribe(&self) -> Option<UnboundedReceiver<WalletEvent>> {
        self.events_rx.lock().ok().and_then(|mut rx| rx.take())
    }
}

/// JSON-RPC error responses keep their code so a user rejection stays
/// distinguishable from other failures.
fn rpc_error(context: &str, error: TransportError) -> WalletError {
    match error.as_error_resp() {
        Some(payload) => {
            WalletError::from_rpc_code(payload.code, format!("{context}: {}", payload.message))
        }
        None => WalletError::Rpc(format!("{context}: {error}")),
    }
}

/// Create a signer from a hex-encoded private key.
pub fn create_signer(private_key_hex: &str) -> Result<PrivateKeySigner, WalletError> {
    let trimmed = private_key_hex.trim();
    let key_hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let key_bytes = alloy::hex::decode(key_hex)
        .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development key (first account of the default test mnemonic).
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn create_signer_accepts_prefixed_and_bare_keys() {
        let prefixed = create_signer(DEV_KEY).unwrap();
        let bare = create_signer(DEV_KEY.trim_start_matches("0x")).unwrap();
        assert_eq!(prefixed.address(), bare.address());
        assert_eq!(prefixed.address().to_checksum(None), DEV_ADDRESS);
    }

    #[test]
    fn create_signer_rejects_bad_keys() {
        assert!(matches!(
            create_signer("not-hex"),
            Err(WalletError::InvalidPrivateKey(_))
        ));
        assert!(matches!(
            create_signer("0x1234"),
            Err(WalletError::InvalidPrivateKey(_))
        ));
    }

    #[tokio::test]
    async fn local_wallet_exposes_signer_account() {
        let wallet = LocalWallet::new("http://127.0.0.1:8545", DEV_KEY).unwrap();
        assert_eq!(wallet.request_accounts().await.unwrap(), vec![DEV_ADDRESS]);
        assert_eq!(wallet.selected_address().as_deref(), Some(DEV_ADDRESS));
    }

    #[tokio::test]
    async fn local_wallet_event_stream_is_taken_once() {
        let wallet = LocalWallet::new("http://127.0.0.1:8545", DEV_KEY).unwrap();
        let mut events = wallet.subscribe().expect("first subscription");
        assert!(wallet.subscribe().is_none());

        wallet.disconnect();
        assert_eq!(events.recv().await, Some(WalletEvent::Disconnected));
    }

    #[test]
    fn local_wallet_rejects_bad_rpc_url() {
        assert!(matches!(
            LocalWallet::new("not a url", DEV_KEY),
            Err(WalletError::InvalidRpcUrl(_))
        ));
    }
}
