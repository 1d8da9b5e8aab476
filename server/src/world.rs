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

//! The shared world record

use crate::error::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use terrastead_common::world::{Tile, World};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct WorldRow {
    name: String,
    seed: i64,
    tiles: String,
    entities: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<WorldRow> for World {
    type Error = crate::error::ServerError;

    fn try_from(row: WorldRow) -> Result<Self> {
        let tiles: Vec<Tile> = serde_json::from_str(&row.tiles)?;
        let entities: Vec<Uuid> = serde_json::from_str(&row.entities)?;
        Ok(World {
            name: row.name,
            seed: row.seed,
            tiles,
            entities,
            created_at: row.created_at,
        })
    }
}

pub struct WorldStore {
    pool: SqlitePool,
}

impl WorldStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load the named world, creating an empty one with `seed` if absent
    ///
    /// An existing world keeps its stored seed.
    pub async fn load_or_create(&self, name: &str, seed: i64) -> Result<World> {
        sqlx::query(
            "INSERT INTO worlds (name, seed, tiles, entities, created_at)
             VALUES (?, ?, '[]', '[]', ?)
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(seed)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let row: WorldRow = sqlx::query_as(
            "SELECT name, seed, tiles, entities, created_at FROM worlds WHERE name = ?",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Loaded world '{}' (seed {})", row.name, row.seed);
        row.try_into()
    }
}
