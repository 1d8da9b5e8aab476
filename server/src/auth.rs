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

//! Credential storage and verification
//!
//! Accounts live in the `accounts` table. Passwords are stored only as bcrypt
//! digests and the digest never leaves this module.

use crate::error::{Result, ServerError, is_unique_violation};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use terrastead_common::account::{Account, AccountId, MAX_PASSWORD_BYTES, MAX_USERNAME_LENGTH};
use tokio::sync::OnceCell;

/// Lowest bcrypt cost, used to keep tests fast
#[cfg(test)]
pub(crate) const TEST_BCRYPT_COST: u32 = 4;

/// Verified against when a username is unknown, so both failure paths cost one hash check
const DUMMY_PASSWORD: &str = "terrastead-dummy-password";

/// Credential store backed by the `accounts` table
pub struct CredentialStore {
    pool: SqlitePool,

    /// bcrypt work factor
    cost: u32,

    dummy_digest: OnceCell<String>,
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: AccountId,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<CredentialRow> for Account {
    fn from(row: CredentialRow) -> Self {
        Account {
            id: row.id,
            username: row.username,
            created_at: row.created_at,
        }
    }
}

/// Check a username/password pair before anything touches storage
pub fn validate_credentials(username: &str, password: &str) -> Result<()> {
    if username.is_empty() || password.is_empty() {
        return Err(ServerError::Validation(
            "Missing username or password".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ServerError::Validation(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    validate_password_length(password)
}

/// bcrypt only reads the first 72 bytes, so longer passwords are refused
fn validate_password_length(password: &str) -> Result<()> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ServerError::Validation(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

impl CredentialStore {
    pub fn new(pool: SqlitePool, cost: u32) -> Self {
        Self {
            pool,
            cost,
            dummy_digest: OnceCell::new(),
        }
    }

    /// Create a new account with a freshly salted digest
    pub async fn create(&self, username: &str, password: &str) -> Result<Account> {
        validate_credentials(username, password)?;
        let digest = self.hash_password(password).await?;

        let mut conn = self.pool.acquire().await?;
        self.insert(&mut conn, username, &digest).await
    }

    /// Insert an account row on an existing connection or transaction
    ///
    /// The `UNIQUE` constraint on `username` decides concurrent registrations.
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        username: &str,
        digest: &str,
    ) -> Result<Account> {
        let account: Account = sqlx::query_as(
            "INSERT INTO accounts (username, password_hash, created_at)
             VALUES (?, ?, ?)
             RETURNING id, username, created_at",
        )
        .bind(username)
        .bind(digest)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ServerError::DuplicateUsername
            } else {
                ServerError::Storage(e)
            }
        })?;

        tracing::info!("Created account {} ({})", account.id, account.username);
        Ok(account)
    }

    /// Derive a bcrypt digest on the blocking pool
    pub async fn hash_password(&self, password: &str) -> Result<String> {
        let cost = self.cost;
        let password = password.to_owned();
        let digest = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(digest)
    }

    async fn check_digest(&self, password: &str, digest: String) -> Result<bool> {
        let password = password.to_owned();
        let matches =
            tokio::task::spawn_blocking(move || bcrypt::verify(password, &digest)).await??;
        Ok(matches)
    }

    /// Check a password against the dummy digest and discard the result
    async fn check_dummy(&self, password: &str) -> Result<()> {
        let digest = self
            .dummy_digest
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD))
            .await?
            .clone();
        self.check_digest(password, digest).await?;
        Ok(())
    }

    /// Verify a username and password
    ///
    /// Unknown usernames, wrong passwords, empty fields and passwords too long
    /// to have been stored all fail with the same error.
    pub async fn verify(&self, username: &str, password: &str) -> Result<Account> {
        if username.is_empty() || password.is_empty() || password.len() > MAX_PASSWORD_BYTES {
            self.check_dummy(password).await?;
            tracing::debug!("Login attempt with unusable credentials");
            return Err(ServerError::InvalidCredentials);
        }

        let row: Option<CredentialRow> = sqlx::query_as(
            "SELECT id, username, password_hash, created_at FROM accounts WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let digest = row.password_hash.clone();
                if self.check_digest(password, digest).await? {
                    Ok(row.into())
                } else {
                    tracing::debug!("Password mismatch for account {}", row.id);
                    Err(ServerError::InvalidCredentials)
                }
            }
            None => {
                self.check_dummy(password).await?;
                tracing::debug!("Login attempt for unknown username");
                Err(ServerError::InvalidCredentials)
            }
        }
    }

    /// Look up an account by id
    pub async fn find(&self, account_id: AccountId) -> Result<Option<Account>> {
        let account = sqlx::query_as("SELECT id, username, created_at FROM accounts WHERE id = ?")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn get(&self, account_id: AccountId) -> Result<Account> {
        self.find(account_id)
            .await?
            .ok_or(ServerError::AccountNotFound(account_id))
    }

    /// Replace an account's digest
    pub async fn change_password(&self, account_id: AccountId, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(ServerError::Validation("Missing new password".to_string()));
        }
        validate_password_length(new_password)?;
        let digest = self.hash_password(new_password).await?;

        let result = sqlx::query("UPDATE accounts SET password_hash = ? WHERE id = ?")
            .bind(&digest)
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServerError::AccountNotFound(account_id));
        }
        tracing::info!("Changed password for account {}", account_id);
        Ok(())
    }

    /// Delete an account; its player record goes with it
    pub async fn delete(&self, account_id: AccountId) -> Result<()> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServerError::AccountNotFound(account_id));
        }
        tracing::info!("Deleted account {}", account_id);
        Ok(())
    }

    #[cfg(test)]
    async fn digest_of(&self, username: &str) -> String {
        let (digest,): (String,) =
            sqlx::query_as("SELECT password_hash FROM accounts WHERE username = ?")
                .bind(username)
                .fetch_one(&self.pool)
                .await
                .unwrap();
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;

    async fn create_test_store() -> CredentialStore {
        let pool = database::connect("sqlite::memory:", 1).await.unwrap();
        CredentialStore::new(pool, TEST_BCRYPT_COST)
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("alice", "pw123").is_ok());
        assert!(matches!(
            validate_credentials("", "pw123"),
            Err(ServerError::Validation(_))
        ));
        assert!(matches!(
            validate_credentials("alice", ""),
            Err(ServerError::Validation(_))
        ));
        let long = "a".repeat(MAX_USERNAME_LENGTH + 1);
        assert!(matches!(
            validate_credentials(&long, "pw123"),
            Err(ServerError::Validation(_))
        ));
        assert!(validate_credentials("alice", &"p".repeat(MAX_PASSWORD_BYTES)).is_ok());
        assert!(matches!(
            validate_credentials("alice", &"p".repeat(MAX_PASSWORD_BYTES + 1)),
            Err(ServerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_password_longer_than_bcrypt_input_is_refused() {
        let store = create_test_store().await;
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);

        let result = store.create("alice", &format!("{}secret1", prefix)).await;
        assert!(matches!(result, Err(ServerError::Validation(_))));
        assert!(store.find(AccountId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_verify_rejects_suffix_past_bcrypt_input() {
        let store = create_test_store().await;
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        store.create("alice", &prefix).await.unwrap();

        let result = store
            .verify("alice", &format!("{}totally-different", prefix))
            .await;
        assert!(matches!(result, Err(ServerError::InvalidCredentials)));
        assert!(store.verify("alice", &prefix).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_empty_fields() {
        let store = create_test_store().await;
        store.create("alice", "pw123").await.unwrap();

        assert!(matches!(
            store.verify("alice", "").await,
            Err(ServerError::InvalidCredentials)
        ));
        assert!(matches!(
            store.verify("", "pw123").await,
            Err(ServerError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_create_and_verify() {
        let store = create_test_store().await;

        let account = store.create("alice", "pw123").await.unwrap();
        assert_eq!(account.username, "alice");

        let verified = store.verify("alice", "pw123").await.unwrap();
        assert_eq!(verified.id, account.id);
    }

    #[tokio::test]
    async fn test_digest_is_not_plaintext() {
        let store = create_test_store().await;
        store.create("alice", "pw123").await.unwrap();

        let digest = store.digest_of("alice").await;
        assert_ne!(digest, "pw123");
        assert!(digest.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_duplicate_username_leaves_digest_unchanged() {
        let store = create_test_store().await;
        store.create("alice", "pw123").await.unwrap();
        let before = store.digest_of("alice").await;

        let result = store.create("alice", "other").await;
        assert!(matches!(result, Err(ServerError::DuplicateUsername)));

        assert_eq!(store.digest_of("alice").await, before);
        assert!(store.verify("alice", "pw123").await.is_ok());
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let store = create_test_store().await;
        store.create("alice", "pw123").await.unwrap();
        assert!(store.create("Alice", "pw123").await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_fails_uniformly() {
        let store = create_test_store().await;
        store.create("alice", "pw123").await.unwrap();

        let wrong_password = store.verify("alice", "wrong").await;
        let unknown_user = store.verify("bob", "pw123").await;

        assert!(matches!(wrong_password, Err(ServerError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(ServerError::InvalidCredentials)));
        assert_eq!(
            wrong_password.unwrap_err().to_string(),
            unknown_user.unwrap_err().to_string()
        );
    }

    #[tokio::test]
    async fn test_get_account() {
        let store = create_test_store().await;
        let account = store.create("alice", "pw123").await.unwrap();

        assert_eq!(store.get(account.id).await.unwrap().username, "alice");
        assert!(matches!(
            store.get(AccountId(999)).await,
            Err(ServerError::AccountNotFound(AccountId(999)))
        ));
    }

    #[tokio::test]
    async fn test_change_password() {
        let store = create_test_store().await;
        let account = store.create("alice", "pw123").await.unwrap();

        store.change_password(account.id, "newpass").await.unwrap();

        assert!(store.verify("alice", "pw123").await.is_err());
        assert!(store.verify("alice", "newpass").await.is_ok());

        let too_long = "n".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(matches!(
            store.change_password(account.id, &too_long).await,
            Err(ServerError::Validation(_))
        ));
        assert!(store.verify("alice", "newpass").await.is_ok());
        assert!(matches!(
            store.change_password(AccountId(999), "x").await,
            Err(ServerError::AccountNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_account() {
        let store = create_test_store().await;
        let account = store.create("alice", "pw123").await.unwrap();

        store.delete(account.id).await.unwrap();

        assert!(store.find(account.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(account.id).await,
            Err(ServerError::AccountNotFound(_))
        ));
    }
}
