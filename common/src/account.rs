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

//! Account data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque account identifier assigned by the credential store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl AccountId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum username length accepted at registration
pub const MAX_USERNAME_LENGTH: usize = 80;

/// Maximum password length in bytes; bcrypt ignores anything past this
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Account information (the password digest is never included)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_creation() {
        let account = Account {
            id: AccountId(7),
            username: "alice".to_string(),
            created_at: Utc::now(),
        };

        assert_eq!(account.id, AccountId(7));
        assert_eq!(account.username, "alice");
    }

    #[test]
    fn test_account_serialization() {
        let account = Account {
            id: AccountId(42),
            username: "alice".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["username"], "alice");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_account_id_display() {
        assert_eq!(AccountId(12).to_string(), "12");
        assert_eq!(AccountId(12).as_i64(), 12);
    }
}
