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

//! Account lifecycle: registration, login, logout and session resolution

use crate::auth::{CredentialStore, validate_credentials};
use crate::error::Result;
use crate::player::PlayerStore;
use crate::session::{Session, SessionManager, SessionState};
use sqlx::SqlitePool;
use std::sync::Arc;
use terrastead_common::account::{Account, AccountId};
use uuid::Uuid;

/// Orchestrates the credential store, player store and session manager
pub struct AccountService {
    pool: SqlitePool,
    credentials: Arc<CredentialStore>,
    players: Arc<PlayerStore>,
    sessions: Arc<SessionManager>,
}

impl AccountService {
    pub fn new(
        pool: SqlitePool,
        credentials: Arc<CredentialStore>,
        players: Arc<PlayerStore>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            pool,
            credentials,
            players,
            sessions,
        }
    }

    /// Register an account together with its empty player record
    ///
    /// Both rows are written in one transaction; if either insert fails
    /// neither row remains.
    pub async fn register(&self, username: &str, password: &str) -> Result<Account> {
        validate_credentials(username, password)?;
        let digest = self.credentials.hash_password(password).await?;

        let mut tx = self.pool.begin().await?;
        let account = self.credentials.insert(&mut *tx, username, &digest).await?;
        let record = self.players.insert_empty(&mut *tx, account.id).await?;
        tx.commit().await?;

        tracing::info!(
            "Registered account {} ({}) with player {}",
            account.id,
            account.username,
            record.id
        );
        Ok(account)
    }

    /// Verify credentials and open a session
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let account = self.credentials.verify(username, password).await?;
        let session = self.sessions.open(account.id).await;

        tracing::info!("Account {} logged in", account.id);
        Ok(session)
    }

    /// Close a session; returns whether it was open
    pub async fn logout(&self, token: Uuid) -> bool {
        let closed = self.sessions.close(token).await;
        if closed {
            tracing::info!("Session {} logged out", token);
        }
        closed
    }

    /// Resolve a session token to a live account
    ///
    /// A session whose account no longer exists is closed and treated as
    /// `Anonymous`.
    pub async fn resolve(&self, token: Uuid) -> Result<SessionState> {
        let state = self.sessions.resolve(token).await;

        let Some(account_id) = state.account_id() else {
            return Ok(state);
        };

        if self.credentials.find(account_id).await?.is_none() {
            tracing::warn!("Session {} refers to missing account {}", token, account_id);
            self.sessions.close(token).await;
            return Ok(state.logout());
        }

        Ok(state)
    }

    /// Change a password after checking the current one
    ///
    /// Every other session of the account is closed; `current` stays open.
    pub async fn change_password(
        &self,
        account_id: AccountId,
        old_password: &str,
        new_password: &str,
        current: Option<Uuid>,
    ) -> Result<()> {
        let account = self.credentials.get(account_id).await?;
        self.credentials.verify(&account.username, old_password).await?;
        self.credentials
            .change_password(account_id, new_password)
            .await?;
        self.sessions.close_all_for(account_id, current).await;
        Ok(())
    }

    /// Delete an account, its player record and all of its sessions
    pub async fn delete_account(&self, account_id: AccountId) -> Result<()> {
        self.credentials.delete(account_id).await?;
        let closed = self.sessions.close_all_for(account_id, None).await;
        tracing::info!(
            "Deleted account {} and closed {} session(s)",
            account_id,
            closed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;
    use crate::error::ServerError;

    struct Fixture {
        pool: SqlitePool,
        service: AccountService,
        players: Arc<PlayerStore>,
        sessions: Arc<SessionManager>,
    }

    async fn create_fixture() -> Fixture {
        let pool = database::connect("sqlite::memory:", 1).await.unwrap();
        let credentials = Arc::new(CredentialStore::new(pool.clone(), crate::auth::TEST_BCRYPT_COST));
        let players = Arc::new(PlayerStore::new(pool.clone()));
        let sessions = Arc::new(SessionManager::new(300));
        let service = AccountService::new(
            pool.clone(),
            credentials,
            players.clone(),
            sessions.clone(),
        );
        Fixture {
            pool,
            service,
            players,
            sessions,
        }
    }

    async fn account_count(pool: &SqlitePool) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let fixture = create_fixture().await;

        let account = fixture.service.register("alice", "pw123").await.unwrap();
        let session = fixture.service.login("alice", "pw123").await.unwrap();

        assert_eq!(session.account_id, account.id);
        assert_eq!(
            fixture.service.resolve(session.token).await.unwrap(),
            SessionState::Authenticated(account.id)
        );
    }

    #[tokio::test]
    async fn test_register_creates_default_player() {
        let fixture = create_fixture().await;
        let account = fixture.service.register("alice", "pw123").await.unwrap();

        let record = fixture.players.get_by_account(account.id).await.unwrap();
        assert_eq!(record.health, 100);
        assert_eq!(record.position(), (0.0, 0.0));
        assert!(record.inventory.is_empty());
        assert!(record.equipped_item.is_none());
    }

    #[tokio::test]
    async fn test_register_validation() {
        let fixture = create_fixture().await;

        assert!(matches!(
            fixture.service.register("", "pw").await,
            Err(ServerError::Validation(_))
        ));
        assert!(matches!(
            fixture.service.register("alice", "").await,
            Err(ServerError::Validation(_))
        ));
        assert_eq!(account_count(&fixture.pool).await, 0);
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let fixture = create_fixture().await;
        fixture.service.register("alice", "pw123").await.unwrap();

        assert!(matches!(
            fixture.service.register("alice", "other").await,
            Err(ServerError::DuplicateUsername)
        ));
        assert!(fixture.service.login("alice", "pw123").await.is_ok());
        assert!(fixture.service.login("alice", "other").await.is_err());
    }

    #[tokio::test]
    async fn test_register_rolls_back_when_player_insert_fails() {
        let fixture = create_fixture().await;
        sqlx::query(
            "CREATE TRIGGER reject_players BEFORE INSERT ON players
             BEGIN SELECT RAISE(ABORT, 'players unavailable'); END",
        )
        .execute(&fixture.pool)
        .await
        .unwrap();

        let result = fixture.service.register("alice", "pw123").await;

        assert!(matches!(result, Err(ServerError::Storage(_))));
        assert_eq!(account_count(&fixture.pool).await, 0);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let fixture = create_fixture().await;
        fixture.service.register("alice", "pw123").await.unwrap();

        assert!(matches!(
            fixture.service.login("alice", "wrong").await,
            Err(ServerError::InvalidCredentials)
        ));
        assert_eq!(fixture.sessions.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_empty_fields_fail_like_wrong_password() {
        let fixture = create_fixture().await;
        fixture.service.register("alice", "pw123").await.unwrap();

        for (username, password) in [("", "pw123"), ("alice", ""), ("", "")] {
            assert!(matches!(
                fixture.service.login(username, password).await,
                Err(ServerError::InvalidCredentials)
            ));
        }
        assert_eq!(fixture.sessions.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_logout() {
        let fixture = create_fixture().await;
        fixture.service.register("alice", "pw123").await.unwrap();
        let session = fixture.service.login("alice", "pw123").await.unwrap();

        assert!(fixture.service.logout(session.token).await);
        assert_eq!(
            fixture.service.resolve(session.token).await.unwrap(),
            SessionState::Anonymous
        );
    }

    #[tokio::test]
    async fn test_resolve_after_account_removed_out_of_band() {
        let fixture = create_fixture().await;
        let account = fixture.service.register("alice", "pw123").await.unwrap();
        let session = fixture.service.login("alice", "pw123").await.unwrap();

        sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(account.id)
            .execute(&fixture.pool)
            .await
            .unwrap();

        assert_eq!(
            fixture.service.resolve(session.token).await.unwrap(),
            SessionState::Anonymous
        );
        assert_eq!(fixture.sessions.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_change_password() {
        let fixture = create_fixture().await;
        let account = fixture.service.register("alice", "pw123").await.unwrap();
        let current = fixture.service.login("alice", "pw123").await.unwrap();
        let other = fixture.service.login("alice", "pw123").await.unwrap();

        assert!(matches!(
            fixture
                .service
                .change_password(account.id, "wrong", "newpass", Some(current.token))
                .await,
            Err(ServerError::InvalidCredentials)
        ));

        fixture
            .service
            .change_password(account.id, "pw123", "newpass", Some(current.token))
            .await
            .unwrap();

        assert!(fixture.service.login("alice", "newpass").await.is_ok());
        assert!(fixture.service.resolve(current.token).await.unwrap().is_authenticated());
        assert!(!fixture.service.resolve(other.token).await.unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_delete_account_closes_sessions() {
        let fixture = create_fixture().await;
        let account = fixture.service.register("alice", "pw123").await.unwrap();
        let session = fixture.service.login("alice", "pw123").await.unwrap();

        fixture.service.delete_account(account.id).await.unwrap();

        assert!(fixture.sessions.get(session.token).await.is_none());
        assert!(matches!(
            fixture.players.get_by_account(account.id).await,
            Err(ServerError::NotFound(_))
        ));
        assert!(matches!(
            fixture.service.login("alice", "pw123").await,
            Err(ServerError::InvalidCredentials)
        ));
    }
}
