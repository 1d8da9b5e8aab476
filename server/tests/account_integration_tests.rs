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
//! Account lifecycle against a file-backed database with a real connection pool

use futures::future::join_all;
use std::sync::Arc;
use terrastead_server::account::AccountService;
use terrastead_server::auth::CredentialStore;
use terrastead_server::database;
use terrastead_server::error::ServerError;
use terrastead_server::player::PlayerStore;
use terrastead_server::session::{SessionManager, SessionState};
use tempfile::TempDir;

const TEST_BCRYPT_COST: u32 = 4;

/// Helper to create a service over a fresh database file
async fn create_test_service() -> (TempDir, Arc<AccountService>, Arc<PlayerStore>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("terrastead.db").display());

    let pool = database::connect(&url, 8)
        .await
        .expect("Failed to open test database");

    let credentials = Arc::new(CredentialStore::new(pool.clone(), TEST_BCRYPT_COST));
    let players = Arc::new(PlayerStore::new(pool.clone()));
    let sessions = Arc::new(SessionManager::new(300));
    let service = Arc::new(AccountService::new(
        pool,
        credentials,
        Arc::clone(&players),
        sessions,
    ));

    (dir, service, players)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_single_winner() {
    let (_dir, service, _) = create_test_service().await;
    const CALLERS: usize = 8;

    let attempts = (0..CALLERS).map(|i| {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .register("alice", &format!("password-{}", i))
                .await
        })
    });

    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("Registration task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(ServerError::DuplicateUsername)))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(duplicates, CALLERS - 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_distinct_usernames() {
    let (_dir, service, players) = create_test_service().await;

    let attempts = (0..6).map(|i| {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.register(&format!("player{}", i), "pw123").await })
    });

    for joined in join_all(attempts).await {
        let account = joined.unwrap().unwrap();
        let record = players.get_by_account(account.id).await.unwrap();
        assert_eq!(record.health, 100);
    }
}

#[tokio::test]
async fn test_full_account_lifecycle() {
    let (_dir, service, players) = create_test_service().await;

    let account = service.register("alice", "pw123").await.unwrap();
    assert!(matches!(
        service.login("alice", "wrong").await,
        Err(ServerError::InvalidCredentials)
    ));

    let session = service.login("alice", "pw123").await.unwrap();
    assert_eq!(
        service.resolve(session.token).await.unwrap(),
        SessionState::Authenticated(account.id)
    );

    let mut record = players.get_by_account(account.id).await.unwrap();
    record.x = 10.0;
    record.health = 80;
    players.save(&record).await.unwrap();
    assert_eq!(players.get(record.id).await.unwrap().health, 80);

    assert!(service.logout(session.token).await);
    assert_eq!(
        service.resolve(session.token).await.unwrap(),
        SessionState::Anonymous
    );

    service.delete_account(account.id).await.unwrap();
    assert!(players.get(record.id).await.is_err());
    assert!(service.register("alice", "pw456").await.is_ok());
}
