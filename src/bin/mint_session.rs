// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Terminal driver for one mint session.
//!
//! Signs with `WALLET_PRIVATE_KEY` against `RPC_URL`, asks the upstream for a
//! challenge, reads the answer from stdin and mints.

use std::sync::Arc;

use arbon_mint::{
    blockchain::{LocalWallet, WalletEvent, WalletProvider, ARBITRUM_ONE},
    config::{env_optional, env_required, ClientConfig, RPC_URL_ENV, WALLET_PRIVATE_KEY_ENV},
    logging::init_tracing,
    session::{Orchestrator, Session, TracingView},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::mpsc::UnboundedReceiver,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ClientConfig::from_env()?;
    let rpc_url = env_optional(RPC_URL_ENV).unwrap_or_else(|| ARBITRUM_ONE.rpc_url.to_string());
    let private_key = env_required(WALLET_PRIVATE_KEY_ENV)?;

    let wallet: Arc<dyn WalletProvider> = Arc::new(LocalWallet::new(&rpc_url, &private_key)?);
    let orchestrator = Orchestrator::new(config, Some(wallet), Arc::new(TracingView))?;
    let mut events = orchestrator.subscribe();
    let mut session = Session::default();

    if !orchestrator.auto_connect(&mut session).await {
        orchestrator.connect(&mut session).await?;
    }
    drain(&orchestrator, &mut session, events.as_mut()).await;
    if !session.network_ok {
        return Err("wallet is not on the target network".into());
    }

    orchestrator.request_challenge(&mut session).await?;
    let Some(challenge) = session.challenge.clone() else {
        return Err("no challenge issued".into());
    };

    let answer = prompt(&format!("{}\n> ", challenge.prompt)).await?;
    drain(&orchestrator, &mut session, events.as_mut()).await;
    orchestrator
        .submit_answer(&mut session, &challenge.id, &answer)
        .await?;

    if let Some(payload) = &session.mint_payload {
        info!(
            mint_type = %payload.mint_type,
            price = %payload.price,
            contract = %payload.contract_address,
            "Mint payload ready"
        );
    }

    drain(&orchestrator, &mut session, events.as_mut()).await;
    orchestrator.mint(&mut session).await?;

    if let Some(receipt) = &session.last_mint {
        info!(
            tx_hash = %receipt.tx_hash,
            block = receipt.block_number,
            gas_used = receipt.gas_used,
            "Mint confirmed"
        );
    }
    Ok(())
}

async fn drain(
    orchestrator: &Orchestrator,
    session: &mut Session,
    events: Option<&mut UnboundedReceiver<WalletEvent>>,
) {
    if let Some(events) = events {
        orchestrator.drain_events(session, events).await;
    }
}

async fn prompt(question: &str) -> std::io::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(question.as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line.trim().to_string())
}
