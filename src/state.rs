// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::relay::RelayForwarder;

#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<RelayForwarder>,
}

impl AppState {
    pub fn new(forwarder: RelayForwarder) -> Self {
        Self {
            forwarder: Arc::new(forwarder),
        }
    }
}
