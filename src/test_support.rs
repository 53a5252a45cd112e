// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process HTTP stubs and recording views for tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use axum::Router;
use tokio::net::TcpListener;

use crate::session::{LogLine, LogSource, ResultKind, Session, SessionView};

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{addr}")
}

/// Shared request counter for stub handlers.
#[derive(Clone, Default)]
pub struct HitCounter(Arc<AtomicUsize>);

impl HitCounter {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// View that keeps everything it is asked to render.
#[derive(Default)]
pub struct RecordingView {
    lines: Mutex<Vec<LogLine>>,
    results: Mutex<Vec<(ResultKind, String)>>,
    renders: AtomicUsize,
}

impl RecordingView {
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().unwrap().clone()
    }

    /// Messages logged under `source`, in order.
    pub fn messages(&self, source: LogSource) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.source == source)
            .map(|line| line.message)
            .collect()
    }

    pub fn results(&self) -> Vec<(ResultKind, String)> {
        self.results.lock().unwrap().clone()
    }

    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl SessionView for RecordingView {
    fn render_session(&self, _session: &Session) {
        self.renders.fetch_add(1, Ordering::SeqCst);
    }

    fn render_log(&self, line: &LogLine) {
        self.lines.lock().unwrap().push(line.clone());
    }

    fn render_result(&self, kind: ResultKind, message: &str) {
        self.results.lock().unwrap().push((kind, message.to_string()));
    }
}
