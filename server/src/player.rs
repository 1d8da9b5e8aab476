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

//! Persisted player state, one record per account

use crate::error::{Result, ServerError, is_foreign_key_violation, is_unique_violation};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use terrastead_common::account::AccountId;
use terrastead_common::player::{DEFAULT_HEALTH, ItemId, PlayerId, PlayerRecord};

const PLAYER_COLUMNS: &str = "id, account_id, x, y, health, inventory, equipped_item, last_save";

/// Player record store backed by the `players` table
pub struct PlayerStore {
    pool: SqlitePool,
}

/// Storage shape of a player record
///
/// The inventory is a JSON array in a TEXT column and the equipped item uses
/// `0` for "nothing equipped".
#[derive(sqlx::FromRow)]
struct PlayerRow {
    id: PlayerId,
    account_id: AccountId,
    x: f64,
    y: f64,
    health: i32,
    inventory: String,
    equipped_item: i64,
    last_save: DateTime<Utc>,
}

impl TryFrom<PlayerRow> for PlayerRecord {
    type Error = ServerError;

    fn try_from(row: PlayerRow) -> Result<Self> {
        let inventory: Vec<ItemId> = serde_json::from_str(&row.inventory)?;
        Ok(PlayerRecord {
            id: row.id,
            account_id: row.account_id,
            x: row.x,
            y: row.y,
            health: row.health,
            inventory,
            equipped_item: ItemId::decode(row.equipped_item),
            last_save: row.last_save,
        })
    }
}

impl PlayerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the default record for an account
    pub async fn create_empty(&self, account_id: AccountId) -> Result<PlayerRecord> {
        let mut conn = self.pool.acquire().await?;
        self.insert_empty(&mut conn, account_id).await
    }

    /// Insert the default record on an existing connection or transaction
    pub async fn insert_empty(
        &self,
        conn: &mut SqliteConnection,
        account_id: AccountId,
    ) -> Result<PlayerRecord> {
        let row: PlayerRow = sqlx::query_as(&format!(
            "INSERT INTO players (account_id, x, y, health, inventory, equipped_item, last_save)
             VALUES (?, 0, 0, ?, '[]', ?, ?)
             RETURNING {}",
            PLAYER_COLUMNS
        ))
        .bind(account_id)
        .bind(DEFAULT_HEALTH)
        .bind(ItemId::NONE)
        .bind(Utc::now())
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ServerError::DuplicateRecord(account_id)
            } else if is_foreign_key_violation(&e) {
                ServerError::AccountNotFound(account_id)
            } else {
                ServerError::Storage(e)
            }
        })?;

        tracing::debug!("Created player record {} for account {}", row.id, account_id);
        row.try_into()
    }

    pub async fn get(&self, player_id: PlayerId) -> Result<PlayerRecord> {
        let row: Option<PlayerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM players WHERE id = ?",
            PLAYER_COLUMNS
        ))
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| ServerError::NotFound("Player".to_string()))?
            .try_into()
    }

    pub async fn get_by_account(&self, account_id: AccountId) -> Result<PlayerRecord> {
        let row: Option<PlayerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM players WHERE account_id = ?",
            PLAYER_COLUMNS
        ))
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| ServerError::NotFound("Player".to_string()))?
            .try_into()
    }

    /// Persist every mutable field and stamp `last_save`
    ///
    /// A record cannot be moved to a different account through `save`.
    pub async fn save(&self, record: &PlayerRecord) -> Result<PlayerRecord> {
        let inventory = serde_json::to_string(&record.inventory)?;

        let row: Option<PlayerRow> = sqlx::query_as(&format!(
            "UPDATE players
             SET x = ?, y = ?, health = ?, inventory = ?, equipped_item = ?, last_save = ?
             WHERE id = ? AND account_id = ?
             RETURNING {}",
            PLAYER_COLUMNS
        ))
        .bind(record.x)
        .bind(record.y)
        .bind(record.health)
        .bind(inventory)
        .bind(ItemId::encode(record.equipped_item))
        .bind(Utc::now())
        .bind(record.id)
        .bind(record.account_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                tracing::debug!("Saved player record {}", row.id);
                row.try_into()
            }
            None => {
                let owner: Option<(AccountId,)> =
                    sqlx::query_as("SELECT account_id FROM players WHERE id = ?")
                        .bind(record.id)
                        .fetch_optional(&self.pool)
                        .await?;
                match owner {
                    Some(_) => Err(ServerError::Conflict(format!(
                        "Player {} belongs to another account",
                        record.id
                    ))),
                    None => Err(ServerError::NotFound("Player".to_string())),
                }
            }
        }
    }
}
