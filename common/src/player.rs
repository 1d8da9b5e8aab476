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

//! Persisted player state
//!
//! Every account owns exactly one [`PlayerRecord`]. The record is created with
//! default values during registration and rewritten in full on every save.

use crate::account::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health of a freshly created player
pub const DEFAULT_HEALTH: i32 = 100;

/// Opaque player record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
#[serde(transparent)]
pub struct PlayerId(pub i64);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to an item held in an inventory or equipped
///
/// Zero is reserved as the "nothing equipped" marker and is never a valid
/// reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    /// Wire and storage encoding of "no item"
    pub const NONE: i64 = 0;

    /// Decode a stored equipped-item column
    pub fn decode(raw: i64) -> Option<ItemId> {
        if raw == Self::NONE {
            None
        } else {
            Some(ItemId(raw))
        }
    }

    /// Encode an optional item for storage or the wire
    pub fn encode(item: Option<ItemId>) -> i64 {
        item.map(|item| item.0).unwrap_or(Self::NONE)
    }
}

/// Gameplay state persisted for one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub account_id: AccountId,
    pub x: f64,
    pub y: f64,
    pub health: i32,
    pub inventory: Vec<ItemId>,
    #[serde(with = "equipped_item")]
    pub equipped_item: Option<ItemId>,
    pub last_save: DateTime<Utc>,
}

impl PlayerRecord {
    /// Default-valued record for a newly registered account
    pub fn new(id: PlayerId, account_id: AccountId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            account_id,
            x: 0.0,
            y: 0.0,
            health: DEFAULT_HEALTH,
            inventory: Vec::new(),
            equipped_item: None,
            last_save: created_at,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Apply a client-supplied update. Fields left as `None` are unchanged.
    ///
    /// The update is validated as a whole before any field is written.
    pub fn apply(&mut self, update: PlayerUpdate) -> Result<(), String> {
        if update.health.is_some_and(|health| health < 0) {
            return Err("Health cannot be negative".to_string());
        }
        if update.x.is_some_and(|x| !x.is_finite()) || update.y.is_some_and(|y| !y.is_finite()) {
            return Err("Position must be finite".to_string());
        }
        if let Some(inventory) = &update.inventory {
            if inventory.iter().any(|item| item.0 == ItemId::NONE) {
                return Err("Inventory cannot contain item 0".to_string());
            }
        }

        if let Some(health) = update.health {
            self.health = health;
        }
        if let Some(x) = update.x {
            self.x = x;
        }
        if let Some(y) = update.y {
            self.y = y;
        }
        if let Some(inventory) = update.inventory {
            self.inventory = inventory;
        }
        if let Some(equipped) = update.equipped_item {
            self.equipped_item = ItemId::decode(equipped);
        }
        Ok(())
    }
}

/// Partial update of a player record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub health: Option<i32>,
    #[serde(default)]
    pub inventory: Option<Vec<ItemId>>,
    /// Zero clears the equipped item
    #[serde(default)]
    pub equipped_item: Option<i64>,
}

mod equipped_item {
    use super::ItemId;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(item: &Option<ItemId>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(ItemId::encode(*item))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ItemId>, D::Error> {
        Ok(ItemId::decode(i64::deserialize(deserializer)?))
    }
}
