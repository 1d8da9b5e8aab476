//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use crate::session::{Session, SessionState};
use std::collections::HashMap;
use std::sync::Arc;
use terrastead_common::account::AccountId;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Session manager for in-memory session tracking
pub struct SessionManager {
    /// Active sessions keyed by token
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,

    /// Idle timeout in seconds
    timeout_seconds: i64,
}

impl SessionManager {
    pub fn new(timeout_seconds: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            timeout_seconds,
        }
    }

    /// Open a session for a verified account
    pub async fn open(&self, account_id: AccountId) -> Session {
        let session = Session::new(account_id);

        {
            let mut sessions = self.sessions.write().await;
            sessions.insert(session.token, session.clone());
        }

        tracing::debug!("Opened session {} for account {}", session.token, account_id);
        session
    }

    /// Resolve a token to the state it grants
    ///
    /// Unknown or expired tokens are `Anonymous`; expired ones are dropped.
    /// A live session has its activity time refreshed.
    pub async fn resolve(&self, token: Uuid) -> SessionState {
        let mut sessions = self.sessions.write().await;

        let Some(session) = sessions.get_mut(&token) else {
            return SessionState::Anonymous;
        };

        if session.is_expired(self.timeout_seconds) {
            tracing::debug!("Session {} expired", token);
            sessions.remove(&token);
            return SessionState::Anonymous;
        }

        session.touch();
        SessionState::Anonymous.authenticate(session.account_id)
    }

    pub async fn get(&self, token: Uuid) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions.get(&token).cloned()
    }

    /// Close a session; returns whether it existed
    pub async fn close(&self, token: Uuid) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&token).is_some()
    }

    /// Close every session bound to an account
    ///
    /// `keep` survives, so a password change can leave the caller logged in.
    pub async fn close_all_for(&self, account_id: AccountId, keep: Option<Uuid>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|token, session| {
            session.account_id != account_id || Some(*token) == keep
        });
        let closed = before - sessions.len();

        if closed > 0 {
            tracing::debug!("Closed {} session(s) for account {}", closed, account_id);
        }
        closed
    }

    /// Drop all sessions idle past the timeout
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(self.timeout_seconds));
        before - sessions.len()
    }

    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    #[cfg(test)]
    pub(crate) async fn age_session(&self, token: Uuid, seconds: i64) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&token) {
            session.last_activity -= chrono::Duration::seconds(seconds);
        }
    }
}
