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

//! Non-persistent demo players and items
//!
//! The registry lives exactly as long as the server context that owns it.
//! Nothing here reaches the database.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use terrastead_common::item::Item;
use terrastead_common::player::DEFAULT_HEALTH;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A throwaway player created through the demo endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoPlayer {
    pub id: Uuid,
    pub name: String,
    pub class: String,
    pub health: i32,
    pub x: f64,
    pub y: f64,
    pub inventory: Vec<Uuid>,
}

impl DemoPlayer {
    pub fn new(name: String, class: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            class,
            health: DEFAULT_HEALTH,
            x: 0.0,
            y: 0.0,
            inventory: Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct DemoRegistry {
    players: RwLock<HashMap<Uuid, DemoPlayer>>,
    items: RwLock<HashMap<Uuid, Item>>,
}

impl DemoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_player(&self, name: String, class: String) -> DemoPlayer {
        let player = DemoPlayer::new(name, class);
        self.players.write().await.insert(player.id, player.clone());
        tracing::debug!("Created demo player {}", player.id);
        player
    }

    pub async fn get_player(&self, id: Uuid) -> Option<DemoPlayer> {
        self.players.read().await.get(&id).cloned()
    }

    pub async fn create_item(&self, name: String, item_type: String) -> Item {
        let item = Item::new(name, item_type);
        self.items.write().await.insert(item.id, item.clone());
        tracing::debug!("Created demo item {}", item);
        item
    }

    pub async fn get_item(&self, id: Uuid) -> Option<Item> {
        self.items.read().await.get(&id).cloned()
    }

    /// Forget every demo player and item
    pub async fn clear(&self) {
        self.players.write().await.clear();
        self.items.write().await.clear();
    }
}
