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

//! Session data types

use crate::account::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A logged-in session bound to one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque token handed to the client
    pub token: Uuid,

    /// Account this session authenticates
    pub account_id: AccountId,

    /// Session creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Create a new session for an account
    pub fn new(account_id: AccountId) -> Self {
        let now = Utc::now();
        Self {
            token: Uuid::new_v4(),
            account_id,
            created_at: now,
            last_activity: now,
        }
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Check if session is expired
    pub fn is_expired(&self, timeout_seconds: i64) -> bool {
        let now = Utc::now();
        let duration = now.signed_duration_since(self.last_activity);
        duration.num_seconds() > timeout_seconds
    }
}

/// Authentication state of a single request context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    /// No session, or one that no longer resolves to a live account
    #[default]
    Anonymous,

    /// Bound to an account by a successful login
    Authenticated(AccountId),
}

impl SessionState {
    /// Transition taken on successful credential verification
    pub fn authenticate(self, account_id: AccountId) -> SessionState {
        SessionState::Authenticated(account_id)
    }

    /// Transition taken on explicit logout
    pub fn logout(self) -> SessionState {
        SessionState::Anonymous
    }

    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(account_id) => Some(*account_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}
