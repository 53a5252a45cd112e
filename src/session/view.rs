// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Presentation capability handed to the orchestrator.

use tracing::{debug, error, info, warn};

use super::Session;

/// Tag attached to every log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    System,
    Success,
    Error,
    Warning,
    Wallet,
    Api,
    Transaction,
}

impl std::fmt::Display for LogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LogSource::System => "System",
            LogSource::Success => "Success",
            LogSource::Error => "Error",
            LogSource::Warning => "Warning",
            LogSource::Wallet => "Wallet",
            LogSource::Api => "API",
            LogSource::Transaction => "Transaction",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub source: LogSource,
    pub message: String,
}

/// Outcome banner of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Success,
    Error,
    Pending,
}

pub trait SessionView: Send + Sync {
    fn render_session(&self, session: &Session);

    fn render_log(&self, line: &LogLine);

    /// Outcome banner; views without one ignore it.
    fn render_result(&self, _kind: ResultKind, _message: &str) {}
}

/// Renders everything through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingView;

impl SessionView for TracingView {
    fn render_session(&self, session: &Session) {
        debug!(
            phase = ?session.phase(),
            address = session.address.as_deref(),
            network_ok = session.network_ok,
            balance = %session.balance,
            challenge_id = session.challenge.as_ref().map(|c| c.id.as_str()),
            "session updated"
        );
    }

    fn render_log(&self, line: &LogLine) {
        match line.source {
            LogSource::Error => error!(source = %line.source, "{}", line.message),
            LogSource::Warning => warn!(source = %line.source, "{}", line.message),
            _ => info!(source = %line.source, "{}", line.message),
        }
    }

    fn render_result(&self, kind: ResultKind, message: &str) {
        match kind {
            ResultKind::Error => error!(result = ?kind, "{message}"),
            _ => info!(result = ?kind, "{message}"),
        }
    }
}
